use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::error::{ClassifierError, Result};
use crate::vectorizer::TfidfVectorizer;

/// On-disk model: a fitted TF-IDF vocabulary plus binary logistic regression
/// weights, where the positive class is "real".
///
/// Exported from a fitted scikit-learn `TfidfVectorizer` + `LogisticRegression`
/// pair (class labels 0 = fake, 1 = real):
///
/// | field          | source                                   |
/// |----------------|------------------------------------------|
/// | `vocabulary`   | `vectorizer.vocabulary_` (term → column) |
/// | `idf`          | `vectorizer.idf_.tolist()`               |
/// | `ngram_range`  | `vectorizer.ngram_range`                 |
/// | `sublinear_tf` | `vectorizer.sublinear_tf`                |
/// | `lowercase`    | `vectorizer.lowercase`                   |
/// | `coef`         | `model.coef_[0].tolist()`                |
/// | `intercept`    | `float(model.intercept_[0])`             |
/// | `test_accuracy`| held-out accuracy, optional              |
/// | `model_type`   | display name, optional                   |
///
/// The vectorizer must use the default `token_pattern` and `norm="l2"`;
/// `vocabulary_` values are numpy ints and need `int(...)` before dumping.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelFile {
    #[serde(default = "default_model_type")]
    pub model_type: String,
    #[serde(default)]
    pub test_accuracy: Option<f64>,
    pub vocabulary: HashMap<String, usize>,
    pub idf: Vec<f64>,
    pub coef: Vec<f64>,
    pub intercept: f64,
    #[serde(default = "default_ngram_range")]
    pub ngram_range: (usize, usize),
    #[serde(default)]
    pub sublinear_tf: bool,
    #[serde(default = "default_lowercase")]
    pub lowercase: bool,
}

fn default_model_type() -> String {
    "Logistic Regression + TF-IDF".to_string()
}

fn default_ngram_range() -> (usize, usize) {
    (1, 1)
}

fn default_lowercase() -> bool {
    true
}

#[derive(Debug, Clone)]
pub struct Classifier {
    vectorizer: TfidfVectorizer,
    coef: Vec<f64>,
    intercept: f64,
    model_type: String,
    test_accuracy: Option<f64>,
}

impl Classifier {
    /// Load and validate a model exported as JSON.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| ClassifierError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let model: ModelFile = serde_json::from_reader(BufReader::new(file))?;
        let classifier = Self::from_model(model)?;

        info!(
            path = %path.display(),
            model_type = %classifier.model_type,
            features = classifier.vectorizer.dimensions(),
            test_accuracy = ?classifier.test_accuracy,
            "Model loaded"
        );
        Ok(classifier)
    }

    pub fn from_model(model: ModelFile) -> Result<Self> {
        if model.idf.len() != model.coef.len() {
            return Err(ClassifierError::Invalid(format!(
                "idf has {} weights but coef has {}",
                model.idf.len(),
                model.coef.len()
            )));
        }
        if let Some((term, idx)) = model
            .vocabulary
            .iter()
            .find(|(_, idx)| **idx >= model.idf.len())
        {
            return Err(ClassifierError::Invalid(format!(
                "vocabulary term {term:?} points at feature {idx}, model has {}",
                model.idf.len()
            )));
        }
        let (min_n, max_n) = model.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(ClassifierError::Invalid(format!(
                "bad ngram_range ({min_n}, {max_n})"
            )));
        }

        Ok(Self {
            vectorizer: TfidfVectorizer::new(
                model.vocabulary,
                model.idf,
                model.ngram_range,
                model.sublinear_tf,
                model.lowercase,
            ),
            coef: model.coef,
            intercept: model.intercept,
            model_type: model.model_type,
            test_accuracy: model.test_accuracy,
        })
    }

    /// Probability that `text` is real news.
    pub fn probability_real(&self, text: &str) -> f64 {
        let features = self.vectorizer.transform(text);
        let z = self.intercept
            + features
                .iter()
                .map(|(idx, w)| self.coef[*idx] * w)
                .sum::<f64>();
        sigmoid(z)
    }

    pub fn model_type(&self) -> &str {
        &self.model_type
    }

    pub fn test_accuracy(&self) -> Option<f64> {
        self.test_accuracy
    }
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}
