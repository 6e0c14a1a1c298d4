use crate::{Camera, CameraConfig, CameraError, Plane, PlanarFrame};
use std::time::Duration;
use tokio::time::{Interval, MissedTickBehavior};

const PAPER: u8 = 235;
const INK: u8 = 16;
const NEUTRAL_CHROMA: u8 = 128;
/// Frames shown per glyph before switching.
const GLYPH_FRAMES: u64 = 30;

/// Synthetic camera producing dark strokes on a light background.
///
/// Alternates between a ring ("0") and a vertical bar ("1") every
/// `GLYPH_FRAMES` frames, paced at the configured fps.
pub struct PatternCamera {
    config: CameraConfig,
    frame_index: u64,
    interval: Option<Interval>,
}

impl std::fmt::Debug for PatternCamera {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PatternCamera")
            .field("config", &self.config)
            .field("frame_index", &self.frame_index)
            .finish()
    }
}

impl PatternCamera {
    pub fn new(config: CameraConfig) -> Self {
        Self {
            config,
            frame_index: 0,
            interval: None,
        }
    }

    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    /// Number of frames handed out so far.
    pub fn frames_sent(&self) -> u64 {
        self.frame_index
    }

    /// Render frame `index`. Deterministic for a given configuration.
    pub fn frame(&self, index: u64) -> PlanarFrame {
        let width = self.config.width() as usize;
        let height = self.config.height() as usize;
        let ring = (index / GLYPH_FRAMES) % 2 == 0;

        let cx = width as f32 / 2.0;
        let cy = height as f32 / 2.0;
        let scale = width.min(height) as f32;

        let mut luma = Vec::with_capacity(width * height);
        for row in 0..height {
            for col in 0..width {
                let dx = col as f32 + 0.5 - cx;
                let dy = row as f32 + 0.5 - cy;
                let inked = if ring {
                    let r = (dx * dx + dy * dy).sqrt() / scale;
                    (0.22..0.32).contains(&r)
                } else {
                    dx.abs() / scale < 0.05 && dy.abs() / scale < 0.32
                };
                luma.push(if inked { INK } else { PAPER });
            }
        }

        let chroma_width = width.div_ceil(2);
        let chroma_len = chroma_width * height.div_ceil(2);
        PlanarFrame::new(
            width,
            height,
            Plane::packed(luma, width),
            Plane::packed(vec![NEUTRAL_CHROMA; chroma_len], chroma_width),
            Plane::packed(vec![NEUTRAL_CHROMA; chroma_len], chroma_width),
        )
    }
}

impl Camera for PatternCamera {
    async fn recv(&mut self) -> Result<PlanarFrame, CameraError> {
        let fps = self.config.fps().max(1);
        let interval = self.interval.get_or_insert_with(|| {
            let mut interval = tokio::time::interval(Duration::from_secs(1) / fps);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            interval
        });
        interval.tick().await;

        let frame = self.frame(self.frame_index);
        self.frame_index += 1;
        Ok(frame)
    }
}
