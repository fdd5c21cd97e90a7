//! fstree-hash - content-addressed hashes and tree listings of directory trees

pub mod error;
pub mod escape;
pub mod fs;
pub mod hash;
pub mod logging;
pub mod output;
pub mod stats;
pub mod tree;

#[cfg(feature = "test-utils")]
pub mod test_utils;

pub use error::{Error, Result};
pub use escape::escape_filename;
pub use fs::{Backend, EntryInfo, EntryKind, LocalFs, MemoryFs};
pub use hash::{Algorithm, DEFAULT_ALGORITHM, HashCache, HashEngine};
pub use output::{OutputConfig, StreamingFormatter, Template, TreeLine, TreeRenderer};
pub use stats::TreeStats;
pub use tree::{EntryFilter, TreeWalker, WalkerConfig, format_size};
