use digit_base::Tensor;
use digit_image::Bitmap;
use digit_infer::{
    Backend, DigitClassifier, InferError, ModelHandle, ModelSource, Session, SessionPolicy,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct Counters {
    loads: AtomicUsize,
    releases: AtomicUsize,
    runs: AtomicUsize,
}

/// Scores the blue mean into class `round(mean * 9)`; optionally fails.
#[derive(Clone)]
enum Behavior {
    BlueMean,
    Fail,
    Output(Vec<f32>),
    NoInputs,
}

struct FakeBackend {
    counters: Arc<Counters>,
    behavior: Arc<Mutex<Behavior>>,
    fail_load: bool,
}

struct FakeSession {
    counters: Arc<Counters>,
    behavior: Behavior,
    inputs: Vec<String>,
    outputs: Vec<String>,
}

impl Backend for FakeBackend {
    fn name(&self) -> &str {
        "fake"
    }

    fn load_model(&self, _model: &ModelSource) -> Result<Box<dyn Session>, InferError> {
        if self.fail_load {
            return Err(InferError::ModelLoad("no such model".to_string()));
        }
        self.counters.loads.fetch_add(1, Ordering::SeqCst);
        let behavior = self.behavior.lock().unwrap().clone();
        let inputs = match behavior {
            Behavior::NoInputs => vec![],
            _ => vec!["input".to_string()],
        };
        Ok(Box::new(FakeSession {
            counters: self.counters.clone(),
            behavior,
            inputs,
            outputs: vec!["scores".to_string()],
        }))
    }
}

impl Drop for FakeSession {
    fn drop(&mut self) {
        self.counters.releases.fetch_add(1, Ordering::SeqCst);
    }
}

impl Session for FakeSession {
    fn run(
        &mut self,
        inputs: &[(&str, Tensor<f32>)],
    ) -> Result<HashMap<String, Tensor<f32>>, InferError> {
        self.counters.runs.fetch_add(1, Ordering::SeqCst);
        let (name, tensor) = &inputs[0];
        assert_eq!(*name, "input");
        assert_eq!(tensor.shape, vec![1, 28, 28]);

        let scores = match &self.behavior {
            Behavior::BlueMean => {
                let mean = tensor.data.iter().sum::<f32>() / tensor.data.len() as f32;
                let class = (mean * 9.0).round() as usize;
                (0..10).map(|i| if i == class { 1.0 } else { 0.0 }).collect()
            }
            Behavior::Fail => return Err(InferError::Backend("out of memory".to_string())),
            Behavior::Output(values) => values.clone(),
            Behavior::NoInputs => unreachable!(),
        };
        let len = scores.len();
        let mut out = HashMap::new();
        out.insert("scores".to_string(), Tensor::new(vec![1, len], scores)?);
        Ok(out)
    }

    fn input_names(&self) -> &[String] {
        &self.inputs
    }

    fn output_names(&self) -> &[String] {
        &self.outputs
    }
}

fn classifier(behavior: Behavior) -> (DigitClassifier, Arc<Counters>) {
    let counters = Arc::new(Counters::default());
    let backend = FakeBackend {
        counters: counters.clone(),
        behavior: Arc::new(Mutex::new(behavior)),
        fail_load: false,
    };
    let classifier = DigitClassifier::new(
        Box::new(backend),
        ModelSource::Memory(b"fake".to_vec()),
    );
    (classifier, counters)
}

fn blue_bitmap(blue: u8) -> Bitmap {
    Bitmap::filled(120, 90, [0, 0, blue]).unwrap()
}

#[test]
fn test_classify_picks_model_argmax() {
    let (mut classifier, _) = classifier(Behavior::BlueMean);
    let prediction = classifier.classify(&blue_bitmap(255)).unwrap();
    assert_eq!(prediction.digit, 9);
    assert_eq!(prediction.label(), "辨識結果：9");

    let prediction = classifier.classify(&blue_bitmap(0)).unwrap();
    assert_eq!(prediction.digit, 0);
}

#[test]
fn test_classify_twice_is_stable() {
    let (mut classifier, _) = classifier(Behavior::BlueMean);
    let bitmap = Bitmap::from_fn(64, 64, |x, y| [0, 0, ((x + y) * 2) as u8]).unwrap();
    let first = classifier.classify(&bitmap).unwrap();
    let second = classifier.classify(&bitmap).unwrap();
    assert_eq!(first.digit, second.digit);
    assert_eq!(first.scores, second.scores);
}

#[test]
fn test_per_frame_acquires_and_releases_each_time() {
    let (mut classifier, counters) = classifier(Behavior::BlueMean);
    assert_eq!(classifier.policy(), SessionPolicy::PerFrame);

    for _ in 0..3 {
        classifier.classify(&blue_bitmap(128)).unwrap();
    }
    assert_eq!(counters.loads.load(Ordering::SeqCst), 3);
    assert_eq!(counters.releases.load(Ordering::SeqCst), 3);
    assert!(!classifier.is_resident());
}

#[test]
fn test_per_frame_releases_on_inference_failure() {
    let (mut classifier, counters) = classifier(Behavior::Fail);
    let err = classifier.classify(&blue_bitmap(10)).unwrap_err();
    assert!(matches!(err, InferError::Backend(_)));
    assert_eq!(counters.loads.load(Ordering::SeqCst), 1);
    assert_eq!(counters.releases.load(Ordering::SeqCst), 1);
}

#[test]
fn test_persistent_loads_once() {
    let (classifier, counters) = classifier(Behavior::BlueMean);
    let mut classifier = classifier.with_policy(SessionPolicy::Persistent);

    for _ in 0..4 {
        classifier.classify(&blue_bitmap(200)).unwrap();
    }
    assert!(classifier.is_resident());
    assert_eq!(counters.loads.load(Ordering::SeqCst), 1);
    assert_eq!(counters.runs.load(Ordering::SeqCst), 4);
    assert_eq!(counters.releases.load(Ordering::SeqCst), 0);

    drop(classifier);
    assert_eq!(counters.releases.load(Ordering::SeqCst), 1);
}

#[test]
fn test_switching_to_per_frame_releases_resident_model() {
    let (classifier, counters) = classifier(Behavior::BlueMean);
    let mut classifier = classifier.with_policy(SessionPolicy::Persistent);
    classifier.classify(&blue_bitmap(1)).unwrap();

    let classifier = classifier.with_policy(SessionPolicy::PerFrame);
    assert!(!classifier.is_resident());
    assert_eq!(counters.releases.load(Ordering::SeqCst), 1);
}

#[test]
fn test_wrong_output_length_is_shape_error() {
    let (mut classifier, counters) = classifier(Behavior::Output(vec![0.1; 12]));
    let err = classifier.classify(&blue_bitmap(0)).unwrap_err();
    assert!(matches!(err, InferError::Shape(_)));
    assert_eq!(counters.releases.load(Ordering::SeqCst), 1);
}

#[test]
fn test_tie_in_model_output() {
    let output = vec![0.5, 0.9, 0.9, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0];
    let (mut classifier, _) = classifier(Behavior::Output(output));
    assert_eq!(classifier.classify(&blue_bitmap(0)).unwrap().digit, 1);
}

#[test]
fn test_model_without_inputs() {
    let (mut classifier, _) = classifier(Behavior::NoInputs);
    let err = classifier.classify(&blue_bitmap(0)).unwrap_err();
    assert!(err.to_string().contains("no inputs"));
}

#[test]
fn test_model_load_failure() {
    let backend = FakeBackend {
        counters: Arc::new(Counters::default()),
        behavior: Arc::new(Mutex::new(Behavior::BlueMean)),
        fail_load: true,
    };
    let source = ModelSource::File("missing.onnx".into());
    assert!(matches!(
        ModelHandle::acquire(&backend, &source),
        Err(InferError::ModelLoad(_))
    ));

    let mut classifier = DigitClassifier::new(Box::new(backend), source);
    assert!(classifier.classify(&blue_bitmap(0)).is_err());
}

#[test]
fn test_session_policy_parse() {
    assert_eq!("persistent".parse::<SessionPolicy>().unwrap(), SessionPolicy::Persistent);
    assert_eq!("Per-Frame".parse::<SessionPolicy>().unwrap(), SessionPolicy::PerFrame);
    assert!("sometimes".parse::<SessionPolicy>().is_err());
    assert_eq!(SessionPolicy::Persistent.to_string(), "persistent");
}
