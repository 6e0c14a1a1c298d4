use crate::latest::LatestReceiver;
use crate::ui::UiEvent;
use digit_camera::{FrameConverter, PlanarFrame};
use digit_infer::{DigitClassifier, Prediction};
use std::thread;
use tokio::sync::mpsc::{self, error::TrySendError};

/// Capacity of the analyzer to UI channel. Events beyond it are dropped.
pub const UI_CHANNEL_CAPACITY: usize = 4;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct AnalyzerStats {
    pub frames: u64,
    pub predictions: u64,
    pub format_errors: u64,
    pub inference_errors: u64,
    pub ui_events_dropped: u64,
}

/// Converts frames, classifies them and posts the results to the UI.
///
/// Runs on its own thread and handles one frame at a time.
pub struct Analyzer {
    converter: FrameConverter,
    classifier: DigitClassifier,
    ui: mpsc::Sender<UiEvent>,
    stats: AnalyzerStats,
}

impl Analyzer {
    pub fn new(
        converter: FrameConverter,
        classifier: DigitClassifier,
        ui: mpsc::Sender<UiEvent>,
    ) -> Self {
        Self {
            converter,
            classifier,
            ui,
            stats: AnalyzerStats::default(),
        }
    }

    pub fn stats(&self) -> AnalyzerStats {
        self.stats
    }

    /// Process one frame. The frame is released when this returns.
    ///
    /// A frame that fails conversion is skipped. A failed classification
    /// still posts the preview but leaves the label untouched.
    pub fn analyze(&mut self, frame: PlanarFrame) -> Option<Prediction> {
        self.stats.frames += 1;

        let bitmap = match self.converter.convert(&frame) {
            Ok(bitmap) => bitmap,
            Err(e) => {
                self.stats.format_errors += 1;
                log::warn!("skipping frame {}: {}", self.stats.frames, e);
                return None;
            }
        };
        drop(frame);

        // Label first; a full channel then drops the preview.
        let prediction = match self.classifier.classify(&bitmap) {
            Ok(prediction) => {
                self.stats.predictions += 1;
                self.post(UiEvent::Prediction(prediction));
                Some(prediction)
            }
            Err(e) => {
                self.stats.inference_errors += 1;
                log::warn!("classification failed: {}", e);
                None
            }
        };
        self.post(UiEvent::Preview(bitmap));
        prediction
    }

    /// Analyze frames until the slot closes or the UI goes away.
    pub fn run(mut self, frames: LatestReceiver<PlanarFrame>) -> AnalyzerStats {
        log::info!("analyzer started ({} policy)", self.classifier.policy());
        while let Some(frame) = frames.recv() {
            self.analyze(frame);
            if self.ui.is_closed() {
                log::debug!("ui closed, stopping analyzer");
                break;
            }
        }
        let slot = frames.stats();
        log::info!(
            "analyzer stopped: {} frames, {} replaced in slot, {} format errors, {} inference errors",
            self.stats.frames,
            slot.replaced,
            self.stats.format_errors,
            self.stats.inference_errors
        );
        self.stats
    }

    pub fn spawn(
        self,
        frames: LatestReceiver<PlanarFrame>,
    ) -> std::io::Result<thread::JoinHandle<AnalyzerStats>> {
        thread::Builder::new()
            .name("digit-analyzer".to_string())
            .spawn(move || self.run(frames))
    }

    fn post(&mut self, event: UiEvent) {
        match self.ui.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                self.stats.ui_events_dropped += 1;
                log::trace!("ui channel full, dropping event");
            }
            Err(TrySendError::Closed(_)) => {}
        }
    }
}
