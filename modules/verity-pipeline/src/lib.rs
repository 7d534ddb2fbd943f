pub mod dispatcher;
pub mod services;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;
pub mod traits;

pub use dispatcher::{Collaborators, VerificationDispatcher};
