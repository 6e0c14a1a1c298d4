mod config;
mod draw;

use config::{ViewConfig, CAPTURE_HEIGHT, CAPTURE_WIDTH};
use digit_analyzer::{
    channel, run_capture, AlwaysGranted, Analyzer, AnalyzerStats, CaptureStats,
    DeviceAccessGate, Permission, PermissionGate, UiEvent, UiState, UI_CHANNEL_CAPACITY,
};
use digit_camera::{bind, CameraKind, FrameConverter};
use digit_infer::{create_registry, DigitClassifier, ModelSource};
use minifb::{Key, Window, WindowOptions};
use std::thread::JoinHandle;
use std::time::Instant;
use tokio::sync::mpsc;
use tokio::task;

/// Running capture task and analyzer thread.
struct Pipeline {
    capture: task::JoinHandle<CaptureStats>,
    analyzer: JoinHandle<AnalyzerStats>,
}

/// Ask for camera access, bind the camera and start the workers.
///
/// Returns `Ok(None)` when access is denied or the camera cannot be bound;
/// the UI then keeps showing the prompt or a notice.
fn start_pipeline(
    config: &ViewConfig,
    ui: mpsc::Sender<UiEvent>,
) -> Result<Option<Pipeline>, Box<dyn std::error::Error>> {
    let permission = match config.camera() {
        CameraKind::Pattern => AlwaysGranted.request(),
        CameraKind::V4l2 => DeviceAccessGate::new(config.video_device()).request(),
    };
    if let Permission::Denied(reason) = permission {
        log::warn!("camera access denied: {}", reason);
        return Ok(None);
    }
    let _ = ui.try_send(UiEvent::Ready);

    let camera = match bind(config.camera(), config.camera_config()) {
        Ok(camera) => camera,
        Err(e) => {
            log::error!("{}", e);
            let _ = ui.try_send(UiEvent::Notice(e.to_string()));
            return Ok(None);
        }
    };

    let mut registry = create_registry(config.device().clone());
    let backend = registry
        .take("onnx")
        .ok_or("onnx backend not available in this build")?;
    let classifier = DigitClassifier::new(
        backend,
        ModelSource::File(config.model_path().to_path_buf()),
    )
    .with_policy(config.policy());

    let (frames_tx, frames_rx) = channel();
    let analyzer = Analyzer::new(FrameConverter::default(), classifier, ui).spawn(frames_rx)?;
    let capture = tokio::spawn(run_capture(camera, frames_tx));

    Ok(Some(Pipeline { capture, analyzer }))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = ViewConfig::from_env()?;
    match config.log_dir() {
        Some(dir) => digit_base::init_file_logger(dir)?,
        None => digit_base::init_stdout_logger(),
    }

    log::info!("Digit View");
    log::info!("Model: {}", config.model_path().display());
    log::info!(
        "Camera: {:?} ({}), {}x{}",
        config.camera(),
        config.video_device(),
        CAPTURE_WIDTH,
        CAPTURE_HEIGHT
    );
    log::info!("Inference: {} on {}", config.policy(), config.device());

    // Preview is rotated a quarter turn, so the window is portrait.
    let width = CAPTURE_HEIGHT as usize;
    let height = CAPTURE_WIDTH as usize;

    let mut state = UiState::new();
    let mut window = Window::new(state.label(), width, height, WindowOptions::default())?;
    window.set_target_fps(30);

    let (ui_tx, mut ui_rx) = mpsc::channel(UI_CHANNEL_CAPACITY);
    let pipeline = start_pipeline(&config, ui_tx)?;

    let mut title = state.label().to_string();
    let background = draw::blank(width, height);

    while window.is_open() && !window.is_key_down(Key::Escape) {
        let now = Instant::now();
        state.drain(&mut ui_rx, now);

        if state.text(now) != title {
            title = state.text(now).to_string();
            window.set_title(&title);
        }

        match state.preview() {
            Some(bitmap) => {
                let argb = draw::bitmap_to_argb(bitmap);
                window.update_with_buffer(&argb, bitmap.width(), bitmap.height())?;
            }
            None => window.update_with_buffer(&background, width, height)?,
        }
    }

    log::info!("Exiting...");
    drop(ui_rx);

    if let Some(Pipeline { capture, analyzer }) = pipeline {
        // Stopping capture drops the camera and the slot sender, which wakes
        // an analyzer still waiting for a frame.
        capture.abort();
        match capture.await {
            Ok(captured) => log::info!(
                "captured {} frames ({} replaced)",
                captured.frames,
                captured.replaced
            ),
            Err(e) if e.is_cancelled() => log::debug!("capture stopped"),
            Err(e) => return Err(e.into()),
        }

        let analyzed = task::spawn_blocking(move || analyzer.join())
            .await?
            .map_err(|_| "analyzer thread panicked")?;
        log::info!(
            "analyzed {} frames ({} predictions)",
            analyzed.frames,
            analyzed.predictions
        );
    }
    Ok(())
}
