//! Command-line front end: configuration and follow-up dispatch.
mod config;
mod dispatch;

pub use config::AppConfig;
pub use dispatch::{DispatchOptions, DispatchSummary, Dispatcher};
