//! Integration tests for bledom-core
//!
//! These exercise the public API end to end against [`MockTransport`], from
//! an animation description down to the bytes that reach the transport.
//! They need no hardware.

use std::sync::Arc;
use std::time::Duration;

use bledom_core::{
    AnimationSpec, MockTransport, PlaybackState, Player, Transport, WriteMode, play, send_frame,
};
use bledom_types::{Brightness, Color, FRAME_FOOTER, FRAME_HEADER, Frame, encode};

fn assert_well_formed(frames: &[Frame]) {
    for frame in frames {
        let bytes = frame.as_bytes();
        assert_eq!(&bytes[..4], &FRAME_HEADER);
        assert_eq!(&bytes[7..], &FRAME_FOOTER);
    }
}

#[tokio::test(start_paused = true)]
async fn test_half_red_reaches_the_wire() {
    let mock = MockTransport::new();
    play(
        &mock,
        &AnimationSpec::set_color(Color::RED, Brightness::from_percent(50)),
    )
    .await;

    let frames = mock.frames().await;
    assert_eq!(frames.len(), 1);
    assert_eq!(
        frames[0].as_bytes(),
        &[0x7E, 0x07, 0x05, 0x03, 115, 0, 0, 0x10, 0xEF]
    );
}

#[tokio::test(start_paused = true)]
async fn test_every_animation_emits_well_formed_frames() {
    let specs = [
        AnimationSpec::pulse(Color::new(200, 30, 90), Brightness::from_percent(70)),
        AnimationSpec::smooth(Color::BLUE, Brightness::OFF, Brightness::FULL),
        AnimationSpec::flash(Color::WHITE, Brightness::from_percent(10)),
        AnimationSpec::rainbow(Brightness::from_percent(40)),
        AnimationSpec::running(Color::new(255, 128, 64), Brightness::FULL),
    ];

    for spec in specs {
        let mock = MockTransport::new();
        let report = play(&mock, &spec).await;

        let frames = mock.frames().await;
        assert_eq!(frames.len(), spec.frame_count(), "{}", spec);
        assert_eq!(report.frames_sent, frames.len());
        assert_well_formed(&frames);
    }
}

#[tokio::test(start_paused = true)]
async fn test_pulse_total_time() {
    let mock = MockTransport::new();
    let start = tokio::time::Instant::now();

    play(&mock, &AnimationSpec::pulse(Color::RED, Brightness::FULL)).await;

    // 41 frames, 50 ms after each.
    assert_eq!(start.elapsed(), Duration::from_millis(2050));
    assert_eq!(mock.frames().await.len(), 41);
}

#[tokio::test(start_paused = true)]
async fn test_flaky_transport_falls_back_without_losing_frames() {
    let mock = MockTransport::new();
    mock.fail_mode(WriteMode::WithResponse);

    let spec = AnimationSpec::running(Color::WHITE, Brightness::FULL);
    let report = play(&mock, &spec).await;

    assert_eq!(report.frames_sent, 22);
    assert!(report.is_clean());
    assert!(
        mock.writes()
            .await
            .iter()
            .all(|w| w.mode == WriteMode::WithoutResponse)
    );
}

#[tokio::test(start_paused = true)]
async fn test_lost_connection_mid_animation() {
    let mock = MockTransport::new();
    let observer_mock = mock.clone();

    // Drop the link once the fourth frame is about to go out.
    let mut player = Player::new(mock.clone()).with_observer(move |state| {
        if state == (PlaybackState::Running { step: 3, total: 10 }) {
            observer_mock.drop_connection();
        }
    });

    let report = player
        .play(&AnimationSpec::flash(Color::RED, Brightness::FULL))
        .await;

    assert_eq!(report.frames_sent, 3);
    assert_eq!(report.frames_failed, 7);
    assert_eq!(player.state(), PlaybackState::Complete);
}

#[tokio::test]
async fn test_shared_transport_through_arc() {
    let mock = MockTransport::new();
    let shared: Arc<dyn Transport> = Arc::new(mock.clone());

    assert!(send_frame(shared.as_ref(), &encode(Color::RED), "red").await);
    assert_eq!(mock.colors().await, vec![Color::RED]);
}
