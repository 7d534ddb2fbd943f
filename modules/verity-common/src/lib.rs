pub mod config;
pub mod error;
pub mod text;
pub mod types;

pub use config::Config;
pub use error::VerityError;
pub use text::{extract_keywords, extract_search_terms, truncate_to_char_boundary};
pub use types::*;
