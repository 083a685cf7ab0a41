use crate::error::{Error, Result};
use crate::preprocess::ImageTensor;

/// Width of the classification head.
pub const NUM_CLASSES: usize = 10;

/// Raw class scores from one forward pass.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifierOutput {
    scores: Vec<f32>,
}

impl ClassifierOutput {
    pub fn new(scores: Vec<f32>) -> Result<Self> {
        if scores.len() != NUM_CLASSES {
            return Err(Error::Model(format!(
                "expected {} class scores, model produced {}",
                NUM_CLASSES,
                scores.len()
            )));
        }
        Ok(ClassifierOutput { scores })
    }

    pub fn scores(&self) -> &[f32] {
        &self.scores
    }

    /// Index of the highest score; the first one wins a tie.
    pub fn argmax(&self) -> usize {
        let mut best = 0;
        for (i, &score) in self.scores.iter().enumerate() {
            if score > self.scores[best] {
                best = i;
            }
        }
        best
    }
}

pub trait Classifier: Send + Sync {
    fn scores(&self, input: &ImageTensor) -> Result<ClassifierOutput>;

    fn classify(&self, input: &ImageTensor) -> Result<usize> {
        Ok(self.scores(input)?.argmax())
    }
}

#[cfg(feature = "tensorflow")]
pub use self::tf::TensorflowClassifier;

#[cfg(feature = "tensorflow")]
mod tf {
    use std::path::Path;

    use tensorflow::{
        Graph, ImportGraphDefOptions, Operation, Session, SessionOptions, SessionRunArgs, Tensor,
    };
    use tracing::{debug, info};

    use super::{Classifier, ClassifierOutput};
    use crate::error::{Error, Result};
    use crate::preprocess::ImageTensor;

    /// A frozen graph: ImageNet backbone with a 10-way head.
    pub struct TensorflowClassifier {
        session: Session,
        input: Operation,
        output: Operation,
    }

    fn model_err(err: impl std::fmt::Display) -> Error {
        Error::Model(err.to_string())
    }

    impl TensorflowClassifier {
        pub fn load(model_path: &Path, input_op: &str, output_op: &str) -> Result<Self> {
            let model_bytes = std::fs::read(model_path)?;

            let mut graph = Graph::new();
            graph
                .import_graph_def(&model_bytes, &ImportGraphDefOptions::new())
                .map_err(model_err)?;

            let session = Session::new(&SessionOptions::new(), &graph).map_err(model_err)?;

            let input = graph
                .operation_by_name(input_op)
                .map_err(model_err)?
                .ok_or_else(|| Error::Model(format!("input operation {input_op:?} not found in graph")))?;
            let output = graph
                .operation_by_name(output_op)
                .map_err(model_err)?
                .ok_or_else(|| Error::Model(format!("output operation {output_op:?} not found in graph")))?;

            info!(path = %model_path.display(), input_op, output_op, "loaded frozen graph");

            Ok(TensorflowClassifier {
                session,
                input,
                output,
            })
        }
    }

    impl Classifier for TensorflowClassifier {
        fn scores(&self, input: &ImageTensor) -> Result<ClassifierOutput> {
            let mut tensor = Tensor::<f32>::new(&input.shape);
            tensor.copy_from_slice(&input.data);

            let mut args = SessionRunArgs::new();
            args.add_feed(&self.input, 0, &tensor);
            let output_token = args.request_fetch(&self.output, 0);
            self.session.run(&mut args).map_err(model_err)?;

            let output: Tensor<f32> = args.fetch(output_token).map_err(model_err)?;
            debug!(dims = ?output.dims(), "forward pass finished");
            ClassifierOutput::new(output.to_vec())
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Deterministic stand-in for the network: scores depend only on the pixels.
    pub(crate) struct PixelSumClassifier;

    impl Classifier for PixelSumClassifier {
        fn scores(&self, input: &ImageTensor) -> Result<ClassifierOutput> {
            let total: f32 = input.data.iter().sum();
            let hot = (total as usize) % NUM_CLASSES;
            let mut scores = vec![0.0; NUM_CLASSES];
            scores[hot] = 1.0;
            ClassifierOutput::new(scores)
        }
    }

    pub(crate) struct FixedClassifier(pub usize);

    impl Classifier for FixedClassifier {
        fn scores(&self, _input: &ImageTensor) -> Result<ClassifierOutput> {
            let mut scores = vec![-1.0; NUM_CLASSES];
            scores[self.0] = 3.5;
            ClassifierOutput::new(scores)
        }
    }

    pub(crate) struct BrokenClassifier;

    impl Classifier for BrokenClassifier {
        fn scores(&self, _input: &ImageTensor) -> Result<ClassifierOutput> {
            Err(Error::Model("session run failed".into()))
        }
    }

    fn tensor() -> ImageTensor {
        ImageTensor {
            shape: [1, 2, 2, 3],
            data: vec![0.5; 12],
        }
    }

    #[test]
    fn argmax_picks_highest_score() {
        let output =
            ClassifierOutput::new(vec![0.1, 0.3, -2.0, 7.5, 0.0, 1.0, 7.4, 0.2, 0.2, 0.9]).unwrap();
        assert_eq!(output.argmax(), 3);
    }

    #[test]
    fn argmax_prefers_first_on_ties() {
        let output = ClassifierOutput::new(vec![1.0; NUM_CLASSES]).unwrap();
        assert_eq!(output.argmax(), 0);

        let mut scores = vec![0.0; NUM_CLASSES];
        scores[4] = 2.0;
        scores[8] = 2.0;
        assert_eq!(ClassifierOutput::new(scores).unwrap().argmax(), 4);
    }

    #[test]
    fn wrong_head_width_is_a_model_error() {
        let result = ClassifierOutput::new(vec![0.0; 1000]);
        assert!(matches!(result, Err(Error::Model(_))));
    }

    #[test]
    fn classify_stays_in_head_range() {
        for i in 0..NUM_CLASSES {
            assert_eq!(FixedClassifier(i).classify(&tensor()).unwrap(), i);
        }
        assert!(PixelSumClassifier.classify(&tensor()).unwrap() < NUM_CLASSES);
    }

    #[test]
    fn classify_is_deterministic() {
        let input = tensor();
        let first = PixelSumClassifier.classify(&input).unwrap();
        for _ in 0..5 {
            assert_eq!(PixelSumClassifier.classify(&input).unwrap(), first);
        }
    }
}
