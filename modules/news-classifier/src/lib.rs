pub mod error;
pub mod model;
pub mod vectorizer;

pub use error::{ClassifierError, Result};
pub use model::{Classifier, ModelFile};
pub use vectorizer::TfidfVectorizer;
