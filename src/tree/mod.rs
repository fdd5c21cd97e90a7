//! Directory tree walking logic
//!
//! - `EntryFilter`: include/exclude glob patterns
//! - `TreeWalker`: canonical ordering, filtered listing and lazy pre-order
//!   traversal with first/last sibling marks

mod config;
mod filter;
mod utils;
mod walker;

pub use config::WalkerConfig;
pub use filter::EntryFilter;
pub use utils::format_size;
pub use walker::{TreeWalker, Visit, Visited, sort_entries};
