//! Configuration types for tree walkers

/// Configuration for which entries a walk visits and in what order.
#[derive(Debug, Clone)]
pub struct WalkerConfig {
    /// Glob patterns; a path matching any of them is skipped.
    pub excludes: Vec<String>,
    /// Glob patterns; when non-empty, a path must match one of them.
    pub includes: Vec<String>,
    /// List directories before files. Display order only; hash input
    /// always uses the canonical dirs-first order.
    pub dirs_first: bool,
}

impl Default for WalkerConfig {
    fn default() -> Self {
        Self {
            excludes: Vec::new(),
            includes: Vec::new(),
            dirs_first: true,
        }
    }
}
