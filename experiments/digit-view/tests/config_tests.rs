use digit_camera::CameraKind;
use digit_infer::{Device, SessionPolicy};
use std::collections::HashMap;
use std::path::Path;

mod config {
    include!("../src/config.rs");
}

use config::*;

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn test_defaults() {
    let config = ViewConfig::from_lookup(lookup(&[])).unwrap();
    assert_eq!(config.model_path(), Path::new(DEFAULT_MODEL_PATH));
    assert_eq!(config.video_device(), DEFAULT_VIDEO_DEVICE);
    assert_eq!(config.device(), &Device::Cpu);
    assert_eq!(config.policy(), SessionPolicy::PerFrame);
    assert!(config.log_dir().is_none());

    let expected = if cfg!(feature = "v4l2") {
        CameraKind::V4l2
    } else {
        CameraKind::Pattern
    };
    assert_eq!(config.camera(), expected);
}

#[test]
fn test_overrides() {
    let config = ViewConfig::from_lookup(lookup(&[
        ("DIGIT_MODEL_PATH", "/tmp/digits.onnx"),
        ("DIGIT_CAMERA", "pattern"),
        ("DIGIT_VIDEO", "/dev/video2"),
        ("DIGIT_DEVICE", "cuda:1"),
        ("DIGIT_SESSION", "persistent"),
        ("DIGIT_LOG_DIR", "/var/log/digit"),
    ]))
    .unwrap();
    assert_eq!(config.model_path(), Path::new("/tmp/digits.onnx"));
    assert_eq!(config.camera(), CameraKind::Pattern);
    assert_eq!(config.device(), &Device::Cuda { device_id: 1 });
    assert_eq!(config.policy(), SessionPolicy::Persistent);
    assert_eq!(config.log_dir(), Some(Path::new("/var/log/digit")));

    let camera = config.camera_config();
    assert_eq!(camera.device(), "/dev/video2");
    assert_eq!((camera.width(), camera.height()), (CAPTURE_WIDTH, CAPTURE_HEIGHT));
}

#[test]
fn test_empty_values_use_defaults() {
    let config = ViewConfig::from_lookup(lookup(&[("DIGIT_SESSION", "  ")])).unwrap();
    assert_eq!(config.policy(), SessionPolicy::PerFrame);
}

#[test]
fn test_bad_values_are_errors() {
    assert!(ViewConfig::from_lookup(lookup(&[("DIGIT_CAMERA", "webcam")])).is_err());
    assert!(ViewConfig::from_lookup(lookup(&[("DIGIT_DEVICE", "tpu")])).is_err());
    assert!(ViewConfig::from_lookup(lookup(&[("DIGIT_SESSION", "often")])).is_err());
}
