use digit_image::Bitmap;
use digit_infer::Prediction;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

pub const PERMISSION_PROMPT: &str = "您尚未允許拍照權限";
pub const READY_MESSAGE: &str = "用相機辨識手寫數字";

/// How long a notice replaces the label.
pub const NOTICE_DURATION: Duration = Duration::from_secs(2);

/// Updates sent from the analyzer (or startup code) to the UI loop.
#[derive(Debug, Clone)]
pub enum UiEvent {
    /// Camera access was granted and capture is starting.
    Ready,
    /// Latest converted frame.
    Preview(Bitmap),
    /// Latest classification.
    Prediction(Prediction),
    /// Short-lived message, e.g. a binding failure.
    Notice(String),
}

#[derive(Debug, Clone)]
struct Notice {
    text: String,
    expires: Instant,
}

/// Everything the screen shows. Only the UI loop mutates it.
#[derive(Debug, Clone)]
pub struct UiState {
    label: String,
    preview: Option<Bitmap>,
    prediction: Option<Prediction>,
    notice: Option<Notice>,
}

impl Default for UiState {
    fn default() -> Self {
        Self::new()
    }
}

impl UiState {
    /// Starts out showing the permission prompt.
    pub fn new() -> Self {
        Self {
            label: PERMISSION_PROMPT.to_string(),
            preview: None,
            prediction: None,
            notice: None,
        }
    }

    pub fn apply(&mut self, event: UiEvent, now: Instant) {
        match event {
            UiEvent::Ready => self.label = READY_MESSAGE.to_string(),
            UiEvent::Preview(bitmap) => self.preview = Some(bitmap),
            UiEvent::Prediction(prediction) => {
                self.label = prediction.label();
                self.prediction = Some(prediction);
            }
            UiEvent::Notice(text) => {
                self.notice = Some(Notice {
                    text,
                    expires: now + NOTICE_DURATION,
                })
            }
        }
    }

    /// Apply every queued event without blocking. Returns how many were applied.
    pub fn drain(&mut self, events: &mut mpsc::Receiver<UiEvent>, now: Instant) -> usize {
        let mut applied = 0;
        while let Ok(event) = events.try_recv() {
            self.apply(event, now);
            applied += 1;
        }
        applied
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Text to show right now: an unexpired notice, else the label.
    pub fn text(&self, now: Instant) -> &str {
        match &self.notice {
            Some(notice) if now < notice.expires => &notice.text,
            _ => &self.label,
        }
    }

    pub fn preview(&self) -> Option<&Bitmap> {
        self.preview.as_ref()
    }

    pub fn prediction(&self) -> Option<&Prediction> {
        self.prediction.as_ref()
    }
}
