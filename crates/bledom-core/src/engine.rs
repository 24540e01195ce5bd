//! Animation playback.
//!
//! A [`Player`] walks the steps of an [`AnimationSpec`] in order: encode,
//! write through the [`Transport`] (with the acknowledged/unacknowledged
//! fallback of [`send_frame`]), then sleep for the step's hold time. A
//! failed step is logged and skipped; the sequence always runs to the end.
//!
//! ```text
//! Idle ──play──▶ Running { step } ──last step──▶ Complete
//! ```

use std::fmt;

use serde::Serialize;
use tracing::{debug, info, warn};

use bledom_types::encode;

use crate::animation::AnimationSpec;
use crate::transport::{Transport, send_frame};

/// Where a player is in its current run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    /// Nothing played yet.
    #[default]
    Idle,
    /// Writing step `step` (zero-based) of `total`.
    Running { step: usize, total: usize },
    /// Every step has been attempted.
    Complete,
}

impl fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Running { step, total } => write!(f, "step {}/{}", step + 1, total),
            Self::Complete => write!(f, "complete"),
        }
    }
}

/// Outcome of one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PlaybackReport {
    /// Steps whose frame reached the controller.
    pub frames_sent: usize,
    /// Steps skipped because both write modes failed.
    pub frames_failed: usize,
}

impl PlaybackReport {
    /// Steps attempted.
    pub fn total(&self) -> usize {
        self.frames_sent + self.frames_failed
    }

    /// True when no step failed.
    pub fn is_clean(&self) -> bool {
        self.frames_failed == 0
    }
}

type StepObserver = Box<dyn FnMut(PlaybackState) + Send>;

/// Drives animations through a transport.
///
/// # Example
///
/// ```
/// use bledom_core::{AnimationSpec, MockTransport, Player, PlaybackState};
/// use bledom_types::Color;
///
/// #[tokio::main]
/// async fn main() {
///     let mut player = Player::new(MockTransport::new());
///     let report = player.play(&AnimationSpec::raw(Color::RED)).await;
///
///     assert_eq!(report.frames_sent, 1);
///     assert_eq!(player.state(), PlaybackState::Complete);
/// }
/// ```
pub struct Player<T> {
    transport: T,
    state: PlaybackState,
    observer: Option<StepObserver>,
}

impl<T> fmt::Debug for Player<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Player")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl<T: Transport> Player<T> {
    /// Create an idle player.
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            state: PlaybackState::Idle,
            observer: None,
        }
    }

    /// Call `observer` every time the state changes.
    #[must_use]
    pub fn with_observer(mut self, observer: impl FnMut(PlaybackState) + Send + 'static) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    /// Current state.
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// The underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Consume the player, returning the transport.
    pub fn into_inner(self) -> T {
        self.transport
    }

    /// Play `spec` to completion.
    ///
    /// Never fails: per-step write errors are logged and counted in the
    /// returned report.
    #[tracing::instrument(level = "info", skip_all, fields(kind = spec.kind()))]
    pub async fn play(&mut self, spec: &AnimationSpec) -> PlaybackReport {
        let steps = spec.steps();
        let total = steps.len();
        let mut report = PlaybackReport::default();

        info!("Playing {} ({} frames)", spec, total);

        for (step, frame_step) in steps.iter().enumerate() {
            self.transition(PlaybackState::Running { step, total });

            let frame = encode(frame_step.color);
            let label = format!("{} {}/{}", spec.kind(), step + 1, total);
            if send_frame(&self.transport, &frame, &label).await {
                report.frames_sent += 1;
            } else {
                report.frames_failed += 1;
            }

            if !frame_step.hold.is_zero() {
                tokio::time::sleep(frame_step.hold).await;
            }
        }

        self.transition(PlaybackState::Complete);

        if report.is_clean() {
            debug!("{} finished, {} frames sent", spec.kind(), report.frames_sent);
        } else {
            warn!(
                "{} finished with {} of {} frames failed",
                spec.kind(),
                report.frames_failed,
                report.total()
            );
        }
        report
    }

    fn transition(&mut self, next: PlaybackState) {
        self.state = next;
        if let Some(observer) = self.observer.as_mut() {
            observer(next);
        }
    }
}

/// Play `spec` once on `transport`.
pub async fn play<T: Transport>(transport: T, spec: &AnimationSpec) -> PlaybackReport {
    Player::new(transport).play(spec).await
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use super::*;
    use crate::mock::MockTransport;
    use crate::transport::WriteMode;
    use bledom_types::{Brightness, Color};

    #[tokio::test(start_paused = true)]
    async fn test_play_static_color() {
        let mock = MockTransport::new();
        let report = play(&mock, &AnimationSpec::raw(Color::GREEN)).await;

        assert_eq!(
            report,
            PlaybackReport {
                frames_sent: 1,
                frames_failed: 0
            }
        );
        assert_eq!(mock.colors().await, vec![Color::GREEN]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_play_sends_every_step_in_order() {
        let mock = MockTransport::new();
        let spec = AnimationSpec::Smooth {
            color: Color::RED,
            from: Brightness::OFF,
            to: Brightness::FULL,
            duration: Duration::from_millis(400),
            steps: 4,
        };

        let report = play(&mock, &spec).await;

        let expected: Vec<_> = spec.steps().iter().map(|s| s.color).collect();
        assert_eq!(mock.colors().await, expected);
        assert_eq!(report.frames_sent, 5);
        assert!(report.is_clean());
    }

    #[tokio::test(start_paused = true)]
    async fn test_play_waits_hold_between_frames() {
        let mock = MockTransport::new();
        let spec = AnimationSpec::flash(Color::BLUE, Brightness::FULL);

        let start = tokio::time::Instant::now();
        play(&mock, &spec).await;

        let intervals = mock.intervals().await;
        assert_eq!(intervals.len(), 9);
        assert!(intervals.iter().all(|d| *d == Duration::from_millis(200)));
        assert_eq!(start.elapsed(), Duration::from_millis(2000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_running_ends_without_trailing_hold() {
        let mock = MockTransport::new();
        let spec = AnimationSpec::running(Color::WHITE, Brightness::FULL);

        let start = tokio::time::Instant::now();
        let report = play(&mock, &spec).await;

        assert_eq!(report.frames_sent, 22);
        assert_eq!(start.elapsed(), Duration::from_millis(2100));
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_steps_are_skipped() {
        let mock = MockTransport::new();
        // Both modes of the first step, then one mode of the second.
        mock.fail_next(3);

        let spec = AnimationSpec::flash(Color::RED, Brightness::FULL);
        let report = play(&mock, &spec).await;

        assert_eq!(report.frames_failed, 1);
        assert_eq!(report.frames_sent, 9);
        assert_eq!(report.total(), 10);
        assert_eq!(mock.attempt_count(), 12);

        let writes = mock.writes().await;
        assert_eq!(writes[0].frame.color(), Color::BLACK);
        assert_eq!(writes[0].mode, WriteMode::WithoutResponse);
        assert_eq!(writes[1].mode, WriteMode::WithResponse);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dead_transport_still_completes() {
        let mock = MockTransport::new();
        mock.set_should_fail(true);

        let mut player = Player::new(mock.clone());
        let spec = AnimationSpec::pulse(Color::RED, Brightness::FULL);
        let report = player.play(&spec).await;

        assert_eq!(report.frames_sent, 0);
        assert_eq!(report.frames_failed, 41);
        assert_eq!(mock.attempt_count(), 82);
        assert_eq!(player.state(), PlaybackState::Complete);
    }

    #[tokio::test(start_paused = true)]
    async fn test_observer_sees_every_transition() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);

        let mut player = Player::new(MockTransport::new())
            .with_observer(move |state| sink.lock().unwrap().push(state));
        assert_eq!(player.state(), PlaybackState::Idle);

        let spec = AnimationSpec::Flash {
            color: Color::WHITE,
            brightness: Brightness::FULL,
            count: 1,
            on_off_duration: Duration::from_millis(10),
        };
        player.play(&spec).await;

        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                PlaybackState::Running { step: 0, total: 2 },
                PlaybackState::Running { step: 1, total: 2 },
                PlaybackState::Complete,
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_animation_completes_immediately() {
        let mock = MockTransport::new();
        let mut player = Player::new(mock.clone());
        let spec = AnimationSpec::Flash {
            color: Color::WHITE,
            brightness: Brightness::FULL,
            count: 0,
            on_off_duration: Duration::from_millis(10),
        };

        let report = player.play(&spec).await;
        assert_eq!(report.total(), 0);
        assert_eq!(player.state(), PlaybackState::Complete);
        assert_eq!(mock.attempt_count(), 0);
    }

    #[test]
    fn test_state_display() {
        assert_eq!(PlaybackState::Idle.to_string(), "idle");
        assert_eq!(
            PlaybackState::Running { step: 2, total: 10 }.to_string(),
            "step 3/10"
        );
        assert_eq!(PlaybackState::Complete.to_string(), "complete");
    }

    #[test]
    fn test_report_serializes() {
        let report = PlaybackReport {
            frames_sent: 8,
            frames_failed: 2,
        };
        let json = serde_json::to_value(report).unwrap();
        assert_eq!(json["frames_sent"], 8);
        assert_eq!(json["frames_failed"], 2);
        assert_eq!(report.total(), 10);
        assert!(!report.is_clean());
    }
}
