//! # Registry Node
//!
//! Runtime for the username registry.
//!
//! ## Modular Structure
//!
//! - `container/` - Configuration loading and the composition root
//! - `serve` - Line-delimited JSON request loop
//!
//! ## Startup Sequence
//!
//! 1. Load configuration (defaults, then `UR_*` environment, then flags)
//! 2. Discover generation files in the data directory
//! 3. Load the active file (or create a fresh one) and attach historical files
//! 4. Wire the service to its cache, profile directory and file store
//! 5. Answer one command, or serve requests until stdin closes

pub mod container;
pub mod serve;

pub use container::{ConfigOverrides, RegistryContainer};
pub use serve::serve;
