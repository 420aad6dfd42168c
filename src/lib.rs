// Library surface for headless/integration tests and reuse.
// Keep this lean to avoid coupling to bin-only types in main.rs.
pub mod app_dirs;
pub mod config;
pub mod document;
pub mod error;
pub mod logging;
pub mod render;
pub mod runtime;
pub mod session;
pub mod source;
pub mod stats;
pub mod text;
pub mod tracker;

pub use error::{JailError, Result};
