use crate::{Camera, CameraConfig, CameraError, PlanarFrame};
use std::thread::{self, JoinHandle};
use tokio::sync::mpsc;
use v4l::buffer::Type;
use v4l::io::mmap::Stream as MmapStream;
use v4l::io::traits::CaptureStream;
use v4l::video::Capture;
use v4l::{Device, Format, FourCC};

type FrameResult = Result<PlanarFrame, CameraError>;

const YU12: &[u8; 4] = b"YU12";

/// V4L2 camera delivering YU12 (I420) frames.
pub struct V4l2Camera {
    config: CameraConfig,
    device: Option<Device>,
    format: Format,
    receiver: Option<mpsc::Receiver<FrameResult>>,
    thread_handle: Option<JoinHandle<()>>,
}

impl std::fmt::Debug for V4l2Camera {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("V4l2Camera")
            .field("config", &self.config)
            .field("device", &"<v4l::Device>")
            .field("receiver", &self.receiver.is_some())
            .field("thread_handle", &self.thread_handle.is_some())
            .finish()
    }
}

impl Camera for V4l2Camera {
    async fn recv(&mut self) -> Result<PlanarFrame, CameraError> {
        self.ensure_started()?;

        let receiver = self
            .receiver
            .as_mut()
            .ok_or_else(|| CameraError::Channel("Receiver not initialized".to_string()))?;

        receiver
            .recv()
            .await
            .ok_or_else(|| CameraError::Channel("Channel closed".to_string()))?
    }
}

impl Drop for V4l2Camera {
    fn drop(&mut self) {
        // Dropping the receiver makes the capture thread's next send fail
        drop(self.receiver.take());

        if let Some(handle) = self.thread_handle.take() {
            let _ = handle.join();
        }
    }
}

impl V4l2Camera {
    /// Open the device at `config.device()` and negotiate YU12 at the
    /// requested resolution and frame rate.
    ///
    /// # Errors
    ///
    /// Returns `CameraError::Device` if the device cannot be opened, does not
    /// accept YU12, or rejects the format/parameters.
    pub fn new(config: CameraConfig) -> Result<Self, CameraError> {
        let device = Device::with_path(config.device())?;

        let requested = Format::new(config.width(), config.height(), FourCC::new(YU12));
        let format = Capture::set_format(&device, &requested)?;
        if format.fourcc != FourCC::new(YU12) {
            return Err(CameraError::Device(format!(
                "YU12 format not supported by device (got {})",
                format.fourcc
            )));
        }

        let params = v4l::video::capture::Parameters::with_fps(config.fps());
        Capture::set_params(&device, &params)?;

        log::info!(
            "V4L2 camera {} ({} lens) negotiated {}x{} stride {}",
            config.device(),
            config.lens(),
            format.width,
            format.height,
            format.stride
        );

        Ok(Self {
            config,
            device: Some(device),
            format,
            receiver: None,
            thread_handle: None,
        })
    }

    /// Start the capture thread if not already running.
    fn ensure_started(&mut self) -> Result<(), CameraError> {
        if self.receiver.is_some() {
            return Ok(());
        }

        let device = self
            .device
            .take()
            .ok_or_else(|| CameraError::Device("Device already consumed".to_string()))?;

        let buffer_count = self.config.buffer_count() as usize;
        let format = self.format.clone();
        let (tx, rx) = mpsc::channel(buffer_count);

        let handle = thread::Builder::new()
            .name("v4l2-capture".to_string())
            .spawn(move || {
                if let Err(e) = Self::capture_loop(device, format, tx, buffer_count) {
                    log::error!("Capture thread error: {}", e);
                }
            })?;

        self.receiver = Some(rx);
        self.thread_handle = Some(handle);

        Ok(())
    }

    /// Background capture loop: read YU12 buffers and split them into planes.
    fn capture_loop(
        device: Device,
        format: Format,
        tx: mpsc::Sender<FrameResult>,
        buffer_count: usize,
    ) -> Result<(), CameraError> {
        let mut stream = MmapStream::with_buffers(&device, Type::VideoCapture, buffer_count as u32)?;
        let width = format.width as usize;
        let height = format.height as usize;
        let stride = (format.stride as usize).max(width);

        loop {
            let (data, metadata) = CaptureStream::next(&mut stream)?;
            let used = (metadata.bytesused as usize).min(data.len());

            // The mmap buffer is only valid until the next call; from_i420 copies.
            let frame = PlanarFrame::from_i420(width, height, stride, &data[..used])
                .map_err(CameraError::from);

            if tx.blocking_send(frame).is_err() {
                break;
            }
        }

        Ok(())
    }

    pub fn config(&self) -> &CameraConfig {
        &self.config
    }
}
