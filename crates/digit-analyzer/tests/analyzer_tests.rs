use digit_analyzer::{channel, Analyzer, UiEvent, UiState, READY_MESSAGE};
use digit_base::Tensor;
use digit_camera::{CameraConfig, FrameConverter, PatternCamera, Plane, PlanarFrame};
use digit_infer::{Backend, DigitClassifier, InferError, ModelSource, Session};
use std::collections::HashMap;
use std::time::Instant;
use tokio::sync::mpsc;

/// Always answers `digit`, or fails every run when `digit` is `None`.
struct FixedBackend {
    digit: Option<usize>,
}

struct FixedSession {
    digit: Option<usize>,
    inputs: Vec<String>,
    outputs: Vec<String>,
}

impl Backend for FixedBackend {
    fn name(&self) -> &str {
        "fixed"
    }

    fn load_model(&self, _model: &ModelSource) -> Result<Box<dyn Session>, InferError> {
        Ok(Box::new(FixedSession {
            digit: self.digit,
            inputs: vec!["x".to_string()],
            outputs: vec!["y".to_string()],
        }))
    }
}

impl Session for FixedSession {
    fn run(
        &mut self,
        _inputs: &[(&str, Tensor<f32>)],
    ) -> Result<HashMap<String, Tensor<f32>>, InferError> {
        let digit = self
            .digit
            .ok_or_else(|| InferError::Backend("delegate crashed".to_string()))?;
        let scores = (0..10).map(|i| if i == digit { 0.9 } else { 0.01 }).collect();
        let mut out = HashMap::new();
        out.insert("y".to_string(), Tensor::new(vec![1, 10], scores)?);
        Ok(out)
    }

    fn input_names(&self) -> &[String] {
        &self.inputs
    }

    fn output_names(&self) -> &[String] {
        &self.outputs
    }
}

fn analyzer(digit: Option<usize>, capacity: usize) -> (Analyzer, mpsc::Receiver<UiEvent>) {
    let classifier = DigitClassifier::new(
        Box::new(FixedBackend { digit }),
        ModelSource::Memory(Vec::new()),
    );
    let (tx, rx) = mpsc::channel(capacity);
    (Analyzer::new(FrameConverter::default(), classifier, tx), rx)
}

fn good_frame() -> PlanarFrame {
    let config = CameraConfig::default().with_width(32).with_height(24);
    PatternCamera::new(config).frame(0)
}

fn short_frame() -> PlanarFrame {
    PlanarFrame::new(
        4,
        4,
        Plane::packed(vec![16; 3], 4),
        Plane::packed(vec![128; 4], 2),
        Plane::packed(vec![128; 4], 2),
    )
}

#[test]
fn test_frame_reaches_ui_as_label_and_preview() {
    let (mut analyzer, mut rx) = analyzer(Some(7), 8);
    let prediction = analyzer.analyze(good_frame()).unwrap();
    assert_eq!(prediction.digit, 7);

    match rx.try_recv().unwrap() {
        UiEvent::Prediction(p) => assert_eq!(p.label(), "辨識結果：7"),
        other => panic!("expected prediction, got {other:?}"),
    }
    match rx.try_recv().unwrap() {
        UiEvent::Preview(bitmap) => assert_eq!((bitmap.width(), bitmap.height()), (24, 32)),
        other => panic!("expected preview, got {other:?}"),
    }
    assert!(rx.try_recv().is_err());
}

#[test]
fn test_malformed_frame_is_skipped() {
    let (mut analyzer, mut rx) = analyzer(Some(3), 8);
    assert!(analyzer.analyze(short_frame()).is_none());
    assert!(rx.try_recv().is_err());

    assert_eq!(analyzer.analyze(good_frame()).map(|p| p.digit), Some(3));
    let stats = analyzer.stats();
    assert_eq!(stats.frames, 2);
    assert_eq!(stats.format_errors, 1);
    assert_eq!(stats.predictions, 1);
}

#[test]
fn test_inference_failure_keeps_label() {
    let (mut analyzer, mut rx) = analyzer(None, 8);
    let mut state = UiState::new();
    state.apply(UiEvent::Ready, Instant::now());

    assert!(analyzer.analyze(good_frame()).is_none());
    assert_eq!(state.drain(&mut rx, Instant::now()), 1);
    assert!(state.preview().is_some());
    assert_eq!(state.label(), READY_MESSAGE);
    assert_eq!(analyzer.stats().inference_errors, 1);
}

#[test]
fn test_full_ui_channel_drops_events() {
    let (mut analyzer, _rx) = analyzer(Some(1), 1);
    analyzer.analyze(good_frame());
    analyzer.analyze(good_frame());
    let stats = analyzer.stats();
    assert_eq!(stats.predictions, 2);
    assert_eq!(stats.ui_events_dropped, 3);
}

#[test]
fn test_backed_up_ui_keeps_label_over_preview() {
    let (mut analyzer, mut rx) = analyzer(Some(6), 1);
    analyzer.analyze(good_frame());
    assert!(matches!(rx.try_recv(), Ok(UiEvent::Prediction(p)) if p.digit == 6));
    assert!(rx.try_recv().is_err());
    assert_eq!(analyzer.stats().ui_events_dropped, 1);
}

#[test]
fn test_worker_sees_only_latest_frame() {
    let (analyzer, mut rx) = analyzer(Some(5), 8);
    let (tx, frames) = channel();
    for _ in 0..3 {
        tx.send(good_frame()).unwrap();
    }
    drop(tx);

    let stats = analyzer.spawn(frames).unwrap().join().unwrap();
    assert_eq!(stats.frames, 1);
    assert_eq!(stats.predictions, 1);

    let mut state = UiState::new();
    state.drain(&mut rx, Instant::now());
    assert_eq!(state.label(), "辨識結果：5");
}

#[test]
fn test_worker_stops_when_ui_closes() {
    let (analyzer, rx) = analyzer(Some(0), 8);
    drop(rx);
    let (tx, frames) = channel();
    tx.send(good_frame()).unwrap();

    let worker = analyzer.spawn(frames).unwrap();
    let stats = worker.join().unwrap();
    assert_eq!(stats.frames, 1);
    assert!(tx.send(good_frame()).is_err());
}

#[test]
fn test_worker_stops_when_capture_ends_without_frames() {
    let (analyzer, rx) = analyzer(Some(0), 8);
    drop(rx);
    let (tx, frames) = channel::<PlanarFrame>();

    let worker = analyzer.spawn(frames).unwrap();
    drop(tx);
    let stats = worker.join().unwrap();
    assert_eq!(stats.frames, 0);
}
