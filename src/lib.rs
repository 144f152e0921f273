// Re-export modules so they can be used from tests
pub mod cli;
pub mod config;
pub mod dataproc;
pub mod error;
pub mod jdbc;
pub mod logging;

pub use error::{ControllerError, Error, Result, SelectorError, UrlError};
