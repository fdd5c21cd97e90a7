//! Storage backends and the entry model they report
//!
//! The walker, hash engine and renderer only see a [`Backend`]: something
//! that can describe a path, list a directory and open a file. Paths are
//! logical, `/`-separated strings.

mod local;
mod memory;
mod native;

use std::io::Read;

pub use local::LocalFs;
pub use memory::MemoryFs;
pub(crate) use native::{escaped_byte, order_key};

use crate::error::Result;

/// The closed set of entry kinds a backend can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    Directory,
    File,
    /// Listed, never followed.
    Link,
    /// FIFO, socket or device node: listed, never read.
    Special,
}

impl EntryKind {
    /// Type tag used in hash listings and the `{type}` template field.
    pub fn label(self) -> &'static str {
        match self {
            EntryKind::Directory => "dir",
            EntryKind::File => "file",
            EntryKind::Link => "link",
            EntryKind::Special => "special",
        }
    }

    pub fn is_dir(self) -> bool {
        self == EntryKind::Directory
    }
}

/// One directory entry as reported by a backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryInfo {
    /// Raw, unescaped name, unique within its parent.
    pub name: String,
    pub kind: EntryKind,
    /// Byte size, only filled in when the caller asked for sizes.
    pub size: Option<u64>,
}

impl EntryInfo {
    pub fn new(name: impl Into<String>, kind: EntryKind) -> Self {
        Self {
            name: name.into(),
            kind,
            size: None,
        }
    }

    pub fn with_size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }

    /// Path of this entry inside `parent`.
    pub fn make_path(&self, parent: &str) -> String {
        join_path(parent, &self.name)
    }
}

/// Uniform access to a storage location.
///
/// Implementations resolve their own addressing; the core only passes back
/// paths it got from [`join_path`] or from the user.
pub trait Backend {
    /// Describe a single path.
    fn get_info(&self, path: &str) -> Result<EntryInfo>;

    /// List the immediate children of a directory, in whatever order the
    /// backend enumerates them. Sizes are filled in only if `want_size`.
    fn list_children(&self, path: &str, want_size: bool) -> Result<Vec<EntryInfo>>;

    /// Open a file for sequential reading.
    fn open_for_read(&self, path: &str) -> Result<Box<dyn Read + '_>>;
}

/// Join a name onto a parent path and normalise the result.
///
/// `.` and empty components are dropped and `..` removes the previous
/// component, so `join_path(".", "a")` is `a` and `join_path("/", "a")` is
/// `/a`.
pub fn join_path(parent: &str, name: &str) -> String {
    let absolute = parent.starts_with('/');
    let mut components: Vec<&str> = Vec::new();
    for component in parent.split('/').chain(name.split('/')) {
        match component {
            "" | "." => {}
            ".." => match components.last() {
                Some(&last) if last != ".." => {
                    components.pop();
                }
                _ if !absolute => components.push(".."),
                _ => {}
            },
            other => components.push(other),
        }
    }
    let joined = components.join("/");
    if absolute {
        format!("/{}", joined)
    } else if joined.is_empty() {
        ".".to_string()
    } else {
        joined
    }
}

/// Last component of a logical path, or the path itself if it has none.
pub fn base_name(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    match trimmed.rsplit_once('/') {
        Some((_, name)) if !name.is_empty() => name,
        _ if trimmed.is_empty() => path,
        _ => trimmed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_path_normalises() {
        assert_eq!(join_path(".", "a.txt"), "a.txt");
        assert_eq!(join_path("./", "a.txt"), "a.txt");
        assert_eq!(join_path("dir", "a.txt"), "dir/a.txt");
        assert_eq!(join_path("dir/", "a.txt"), "dir/a.txt");
        assert_eq!(join_path("/", "a.txt"), "/a.txt");
        assert_eq!(join_path("/tmp/x", "a"), "/tmp/x/a");
        assert_eq!(join_path("a/./b", "c"), "a/b/c");
        assert_eq!(join_path("a/b/..", "c"), "a/c");
        assert_eq!(join_path("..", "c"), "../c");
        assert_eq!(join_path("../..", "c"), "../../c");
        assert_eq!(join_path("/..", "c"), "/c");
    }

    #[test]
    fn test_make_path_uses_join() {
        let info = EntryInfo::new("x", EntryKind::File);
        assert_eq!(info.make_path("."), "x");
        assert_eq!(info.make_path("d"), "d/x");
    }

    #[test]
    fn test_base_name() {
        assert_eq!(base_name("a/b/c.txt"), "c.txt");
        assert_eq!(base_name("c.txt"), "c.txt");
        assert_eq!(base_name("dir/"), "dir");
        assert_eq!(base_name("/"), "/");
    }

    #[test]
    fn test_kind_labels() {
        assert_eq!(EntryKind::Directory.label(), "dir");
        assert_eq!(EntryKind::File.label(), "file");
        assert_eq!(EntryKind::Link.label(), "link");
        assert_eq!(EntryKind::Special.label(), "special");
    }
}
