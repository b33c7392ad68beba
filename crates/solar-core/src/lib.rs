pub mod error;

pub use error::{ProviderError, Result};
