//! Tree formatting and display
//!
//! # Module Structure
//!
//! - `config` - Output configuration types
//! - `template` - Line templates (`{name}`, `{hash:.8}`, `{size:>10}`, ...)
//! - `tree` - Lazy tree renderer
//! - `streaming` - Writes rendered lines to stdout

mod config;
mod streaming;
mod template;
mod tree;

pub use config::OutputConfig;
pub use streaming::{LINE_ENDING, StreamingFormatter};
pub use template::{DEFAULT_TEMPLATE, Field, FieldValues, Template};
pub use tree::{TreeLine, TreeLines, TreeRenderer};
