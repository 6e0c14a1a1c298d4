//! Camera capture and frame conversion for the digit pipeline.
//!
//! Cameras deliver planar YUV 4:2:0 [`PlanarFrame`]s through the async
//! [`Camera`] trait. [`FrameConverter`] turns a frame into a rotated RGB
//! [`digit_image::Bitmap`].

pub mod config;
pub mod convert;
pub mod error;
pub mod frame;
pub mod pattern;
pub mod traits;

#[cfg(feature = "v4l2")]
pub mod v4l2;

pub use config::{CameraConfig, Lens};
pub use convert::FrameConverter;
pub use error::{CameraError, FormatError, PlaneKind};
pub use frame::{Plane, PlanarFrame};
pub use pattern::PatternCamera;
pub use traits::Camera;

#[cfg(feature = "v4l2")]
pub use v4l2::V4l2Camera;

/// Which camera implementation to bind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CameraKind {
    Pattern,
    V4l2,
}

impl std::str::FromStr for CameraKind {
    type Err = CameraError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pattern" => Ok(CameraKind::Pattern),
            "v4l2" => Ok(CameraKind::V4l2),
            other => Err(CameraError::Binding(format!("unknown camera kind: {other}"))),
        }
    }
}

/// A bound camera of any supported kind.
#[derive(Debug)]
pub enum AnyCamera {
    Pattern(PatternCamera),
    #[cfg(feature = "v4l2")]
    V4l2(V4l2Camera),
}

impl Camera for AnyCamera {
    async fn recv(&mut self) -> Result<PlanarFrame, CameraError> {
        match self {
            AnyCamera::Pattern(camera) => camera.recv().await,
            #[cfg(feature = "v4l2")]
            AnyCamera::V4l2(camera) => camera.recv().await,
        }
    }
}

/// Open and configure a camera, reporting any failure as `CameraError::Binding`.
pub fn bind(kind: CameraKind, config: CameraConfig) -> Result<AnyCamera, CameraError> {
    match kind {
        CameraKind::Pattern => Ok(AnyCamera::Pattern(PatternCamera::new(config))),
        #[cfg(feature = "v4l2")]
        CameraKind::V4l2 => V4l2Camera::new(config)
            .map(AnyCamera::V4l2)
            .map_err(|e| CameraError::Binding(e.to_string())),
        #[cfg(not(feature = "v4l2"))]
        CameraKind::V4l2 => Err(CameraError::Binding(
            "built without the v4l2 feature".to_string(),
        )),
    }
}
