use crate::latest::LatestSender;
use digit_camera::{Camera, CameraError, PlanarFrame};
use std::thread;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CaptureStats {
    pub frames: u64,
    pub replaced: u64,
    pub skipped: u64,
}

/// Pull frames from `camera` into the slot until the analyzer side closes or
/// the camera fails.
///
/// Malformed frames are skipped. A frame not yet picked up by the analyzer is
/// replaced by the next one.
pub async fn run_capture<C: Camera>(
    mut camera: C,
    frames: LatestSender<PlanarFrame>,
) -> CaptureStats {
    let mut stats = CaptureStats::default();
    loop {
        match camera.recv().await {
            Ok(frame) => match frames.send(frame) {
                Ok(replaced) => {
                    stats.frames += 1;
                    if replaced {
                        stats.replaced += 1;
                    }
                }
                Err(_) => {
                    log::debug!("analyzer gone, stopping capture");
                    break;
                }
            },
            Err(CameraError::Format(e)) => {
                stats.skipped += 1;
                log::warn!("dropping malformed frame: {}", e);
            }
            Err(e) => {
                log::error!("camera stopped: {}", e);
                break;
            }
        }
    }
    log::info!(
        "capture stopped: {} frames, {} replaced, {} skipped",
        stats.frames,
        stats.replaced,
        stats.skipped
    );
    stats
}

/// Run [`run_capture`] on a dedicated thread with its own single-threaded runtime.
pub fn spawn_capture<C>(
    camera: C,
    frames: LatestSender<PlanarFrame>,
) -> std::io::Result<thread::JoinHandle<CaptureStats>>
where
    C: Camera + Send + 'static,
{
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;
    thread::Builder::new()
        .name("digit-capture".to_string())
        .spawn(move || runtime.block_on(run_capture(camera, frames)))
}
