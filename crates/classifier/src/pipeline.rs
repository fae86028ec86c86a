use std::sync::Arc;

use runner_core::{ModelInfo, Runner, RunnerConfig};
use tracing::{info, warn};

use crate::error::{ClassifyError, ModelLoadError, Result};
use crate::loader::{LoaderStatus, ModelLoader};
use crate::predict::{classify, PredictionResult};
use crate::preprocess::{decode, to_tensor, PreprocessConfig, UploadedImage};
use crate::session::{SessionEvent, SessionState};

/// Everything the presenter needs to show for one successful upload.
#[derive(Debug, Clone)]
pub struct Classification {
    pub prediction: PredictionResult,
    pub image: UploadedImage,
}

/// Upload bytes in, prediction out. Holds the shared model and nothing
/// else, so one instance serves every interaction.
pub struct Pipeline<R: Runner> {
    loader: ModelLoader<R>,
    preprocess: PreprocessConfig,
}

impl<R: Runner> Pipeline<R> {
    pub fn new(runner: RunnerConfig, preprocess: PreprocessConfig) -> Self {
        Self {
            loader: ModelLoader::new(runner),
            preprocess,
        }
    }

    /// Force the model load. Returns the model metadata when it succeeded.
    pub fn warm_up(&self) -> std::result::Result<ModelInfo, ModelLoadError> {
        self.loader.get().map(|runner| runner.info())
    }

    /// The state every new interaction starts from, resolving the model if needed.
    pub fn session_state(&self) -> SessionState {
        let event = match self.loader.get() {
            Ok(_) => SessionEvent::ModelLoaded,
            Err(_) => SessionEvent::ModelLoadFailed,
        };
        SessionState::Idle
            .transition(event)
            .unwrap_or(SessionState::FatalError)
    }

    pub fn loader_status(&self) -> LoaderStatus {
        self.loader.status()
    }

    pub fn model_info(&self) -> Option<ModelInfo> {
        self.loader.info()
    }

    pub fn runner_config(&self) -> &RunnerConfig {
        self.loader.config()
    }

    pub fn preprocess_config(&self) -> &PreprocessConfig {
        &self.preprocess
    }

    pub fn run(&self, bytes: Vec<u8>) -> Result<Classification> {
        let model: Arc<R> = self.loader.get()?;
        let state = SessionState::Idle
            .transition(SessionEvent::ModelLoaded)?
            .transition(SessionEvent::Upload)?;

        let image = match decode(bytes, &self.preprocess) {
            Ok(image) => image,
            Err(e) => return Err(self.fail(state, e.into())),
        };
        info!(
            width = image.width,
            height = image.height,
            format = ?image.format,
            bytes = image.bytes.len(),
            "Image decoded"
        );

        let tensor = to_tensor(&image.image, &self.preprocess);
        let state = state.transition(SessionEvent::Preprocessed)?;

        let prediction = match classify(&tensor, model.as_ref()) {
            Ok(prediction) => prediction,
            Err(e) => return Err(self.fail(state, e.into())),
        };
        state.transition(SessionEvent::Inferred)?;

        info!(
            score = prediction.score,
            label = %prediction.label,
            confidence = %prediction.confidence_display(),
            "Image classified"
        );
        Ok(Classification { prediction, image })
    }

    fn fail(&self, state: SessionState, err: ClassifyError) -> ClassifyError {
        match state.transition(SessionEvent::Failed) {
            Ok(_) => {
                warn!(stage = %state, error = %err, "Upload could not be classified");
                err
            }
            Err(session) => session.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ImageDecodeError, InferenceError};
    use crate::predict::Label;
    use crate::testing::FixedRunner;
    use image::{DynamicImage, ImageBuffer, ImageFormat, Rgb};
    use std::io::Cursor;

    fn pipeline(path: &str) -> Pipeline<FixedRunner> {
        Pipeline::new(
            RunnerConfig {
                model_path: path.to_string(),
                ..RunnerConfig::default()
            },
            PreprocessConfig::default(),
        )
    }

    fn jpeg(width: u32, height: u32) -> Vec<u8> {
        let img = ImageBuffer::from_fn(width, height, |x, y| Rgb([x as u8, y as u8, 128]));
        let mut buf = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(img)
            .write_to(&mut buf, ImageFormat::Jpeg)
            .unwrap();
        buf.into_inner()
    }

    #[test]
    fn test_dog_upload() {
        let pipeline = pipeline("0.93");
        let result = pipeline.run(jpeg(500, 500)).unwrap();
        assert_eq!(result.prediction.label, Label::Dog);
        assert!(result.prediction.confidence_percent >= 50.0);
        assert_eq!((result.image.width, result.image.height), (500, 500));
    }

    #[test]
    fn test_boundary_score_is_cat() {
        let result = pipeline("0.5").run(jpeg(64, 64)).unwrap();
        assert_eq!(result.prediction.label, Label::Cat);
        assert_eq!(result.prediction.confidence_display(), "50.0%");
    }

    #[test]
    fn test_corrupt_upload_then_recovery() {
        let pipeline = pipeline("0.2");
        let err = pipeline.run(b"\x89PNG garbage".to_vec()).unwrap_err();
        assert!(matches!(err, ClassifyError::ImageDecode(ImageDecodeError::Malformed(_))));
        assert!(!err.is_fatal());
        assert_eq!(pipeline.session_state(), SessionState::Ready);

        let result = pipeline.run(jpeg(32, 32)).unwrap();
        assert_eq!(result.prediction.label, Label::Cat);
    }

    #[test]
    fn test_inference_failure_is_recoverable() {
        let pipeline = pipeline("broken");
        let err = pipeline.run(jpeg(32, 32)).unwrap_err();
        assert!(matches!(err, ClassifyError::Inference(InferenceError::Runtime(_))));
        assert!(pipeline.session_state().accepts_upload());
    }

    #[test]
    fn test_missing_model_is_fatal() {
        let pipeline = pipeline("models/missing.onnx");
        assert!(pipeline.warm_up().is_err());
        assert_eq!(pipeline.session_state(), SessionState::FatalError);

        let err = pipeline.run(jpeg(32, 32)).unwrap_err();
        assert!(err.is_fatal());
        assert!(err.to_string().contains("models/missing.onnx"));
    }

    #[test]
    fn test_warm_up_reports_model() {
        let pipeline = pipeline("0.6");
        assert_eq!(pipeline.loader_status(), LoaderStatus::Unloaded);
        let info = pipeline.warm_up().unwrap();
        assert_eq!(info.backend, "mock");
        assert_eq!(info.input_shape, pipeline.preprocess_config().input_shape());
        assert_eq!(pipeline.loader_status(), LoaderStatus::Ready);
    }
}
