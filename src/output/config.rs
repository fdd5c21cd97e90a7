//! Output configuration types

use super::template::DEFAULT_TEMPLATE;

/// Configuration for tree rendering.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Line template for every entry, see [`super::Template`].
    pub template: String,
    /// Deepest level to list; `None` lists everything. Display only.
    pub max_depth: Option<usize>,
    /// Append a blank line and the directory/file counts.
    pub print_stats: bool,
    /// Colour directory lines when writing to a terminal.
    pub use_color: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            template: DEFAULT_TEMPLATE.to_string(),
            max_depth: None,
            print_stats: true,
            use_color: false,
        }
    }
}
