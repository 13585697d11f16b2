pub mod config;
pub mod error;
pub mod logging;
pub mod types;

pub use config::ScriptflowConfig;
pub use error::{Result, ScriptflowError};
pub use types::*;
