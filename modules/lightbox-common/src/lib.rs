pub mod config;
pub mod error;
pub mod types;

pub use config::LightboxConfig;
pub use error::LightboxError;
pub use types::*;
