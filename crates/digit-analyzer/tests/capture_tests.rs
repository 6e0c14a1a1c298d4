use digit_analyzer::{channel, run_capture, spawn_capture};
use digit_camera::{
    Camera, CameraConfig, CameraError, FormatError, PatternCamera, PlanarFrame,
};
use std::collections::VecDeque;

/// Replays a fixed script, then reports a closed channel.
struct ScriptedCamera {
    script: VecDeque<Result<PlanarFrame, CameraError>>,
}

impl Camera for ScriptedCamera {
    async fn recv(&mut self) -> Result<PlanarFrame, CameraError> {
        self.script
            .pop_front()
            .unwrap_or_else(|| Err(CameraError::Channel("closed".to_string())))
    }
}

fn frame(index: u64) -> PlanarFrame {
    let config = CameraConfig::default().with_width(16).with_height(16);
    PatternCamera::new(config).frame(index)
}

#[tokio::test]
async fn test_capture_keeps_latest_and_skips_bad_frames() {
    let camera = ScriptedCamera {
        script: VecDeque::from(vec![
            Ok(frame(0)),
            Err(CameraError::Format(FormatError::Dimensions {
                width: 0,
                height: 0,
            })),
            Ok(frame(30)),
        ]),
    };
    let (tx, rx) = channel();
    let stats = run_capture(camera, tx).await;

    assert_eq!(stats.frames, 2);
    assert_eq!(stats.replaced, 1);
    assert_eq!(stats.skipped, 1);
    assert_eq!(rx.recv(), Some(frame(30)));
    assert_eq!(rx.recv(), None);
}

#[test]
fn test_capture_thread_stops_without_analyzer() {
    let config = CameraConfig::default()
        .with_width(16)
        .with_height(16)
        .with_fps(200);
    let (tx, rx) = channel();
    drop(rx);

    let stats = spawn_capture(PatternCamera::new(config), tx)
        .unwrap()
        .join()
        .unwrap();
    assert_eq!(stats.frames, 0);
}
