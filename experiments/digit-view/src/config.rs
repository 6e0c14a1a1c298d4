use digit_camera::{CameraConfig, CameraKind};
use digit_infer::{Device, SessionPolicy};
use std::env;
use std::error::Error;
use std::path::{Path, PathBuf};

pub const DEFAULT_MODEL_PATH: &str = "models/mnist.onnx";
pub const DEFAULT_VIDEO_DEVICE: &str = "/dev/video0";
pub const CAPTURE_WIDTH: u32 = 640;
pub const CAPTURE_HEIGHT: u32 = 480;

/// Settings for the viewer, read from `DIGIT_*` environment variables.
#[derive(Debug, Clone)]
pub struct ViewConfig {
    model_path: PathBuf,
    camera: CameraKind,
    video_device: String,
    device: Device,
    policy: SessionPolicy,
    log_dir: Option<PathBuf>,
}

impl ViewConfig {
    pub fn from_env() -> Result<Self, Box<dyn Error>> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup. Unset or empty keys fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Box<dyn Error>> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let camera = match get("DIGIT_CAMERA") {
            Some(kind) => kind.parse()?,
            None if cfg!(feature = "v4l2") => CameraKind::V4l2,
            None => CameraKind::Pattern,
        };
        let device = match get("DIGIT_DEVICE") {
            Some(device) => device.parse()?,
            None => Device::Cpu,
        };
        let policy = match get("DIGIT_SESSION") {
            Some(policy) => policy.parse()?,
            None => SessionPolicy::default(),
        };

        Ok(Self {
            model_path: get("DIGIT_MODEL_PATH")
                .unwrap_or_else(|| DEFAULT_MODEL_PATH.to_string())
                .into(),
            camera,
            video_device: get("DIGIT_VIDEO").unwrap_or_else(|| DEFAULT_VIDEO_DEVICE.to_string()),
            device,
            policy,
            log_dir: get("DIGIT_LOG_DIR").map(PathBuf::from),
        })
    }

    pub fn model_path(&self) -> &Path {
        &self.model_path
    }

    pub fn camera(&self) -> CameraKind {
        self.camera
    }

    pub fn video_device(&self) -> &str {
        &self.video_device
    }

    pub fn device(&self) -> &Device {
        &self.device
    }

    pub fn policy(&self) -> SessionPolicy {
        self.policy
    }

    pub fn log_dir(&self) -> Option<&Path> {
        self.log_dir.as_deref()
    }

    pub fn camera_config(&self) -> CameraConfig {
        CameraConfig::default()
            .with_device(self.video_device.clone())
            .with_width(CAPTURE_WIDTH)
            .with_height(CAPTURE_HEIGHT)
    }
}
