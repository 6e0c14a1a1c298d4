use crate::{CameraError, PlanarFrame};

/// Async camera trait for frame capture.
///
/// Implementations return planar YUV 4:2:0 frames. A frame is handed over by
/// value and is not retained by the camera afterwards.
#[allow(async_fn_in_trait)]
pub trait Camera {
    /// Receive the next frame from the camera.
    async fn recv(&mut self) -> Result<PlanarFrame, CameraError>;
}
