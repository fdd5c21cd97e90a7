//! In-memory backend
//!
//! Keeps children in insertion order, which makes it easy to check that
//! digests do not depend on enumeration order. Also counts reads and
//! listings so caching can be observed.

use std::cell::Cell;
use std::io::{self, Cursor, Read};

use super::{Backend, EntryInfo, EntryKind, base_name};
use crate::error::{Error, Result};

#[derive(Debug, Clone)]
enum Node {
    Dir(Vec<(String, Node)>),
    File(Vec<u8>),
    Link(String),
}

impl Node {
    fn kind(&self) -> EntryKind {
        match self {
            Node::Dir(_) => EntryKind::Directory,
            Node::File(_) => EntryKind::File,
            Node::Link(_) => EntryKind::Link,
        }
    }

    fn size(&self) -> Option<u64> {
        match self {
            Node::Dir(_) => None,
            Node::File(bytes) => Some(bytes.len() as u64),
            Node::Link(target) => Some(target.len() as u64),
        }
    }
}

/// A tree held entirely in memory.
#[derive(Debug)]
pub struct MemoryFs {
    root: Node,
    reads: Cell<usize>,
    listings: Cell<usize>,
}

impl Default for MemoryFs {
    fn default() -> Self {
        Self::new()
    }
}

fn components(path: &str) -> Vec<&str> {
    path.split('/')
        .filter(|c| !c.is_empty() && *c != ".")
        .collect()
}

impl MemoryFs {
    /// Create an empty tree; the root is addressed as `.` or `/`.
    pub fn new() -> Self {
        Self {
            root: Node::Dir(Vec::new()),
            reads: Cell::new(0),
            listings: Cell::new(0),
        }
    }

    /// Create a directory and any missing parents.
    pub fn add_dir(&mut self, path: &str) -> &mut Self {
        self.insert(path, Node::Dir(Vec::new()));
        self
    }

    /// Create or replace a file, creating missing parents.
    pub fn add_file(&mut self, path: &str, content: impl AsRef<[u8]>) -> &mut Self {
        self.insert(path, Node::File(content.as_ref().to_vec()));
        self
    }

    /// Create or replace a symbolic link, creating missing parents.
    pub fn add_link(&mut self, path: &str, target: &str) -> &mut Self {
        self.insert(path, Node::Link(target.to_string()));
        self
    }

    /// Remove an entry and everything below it. Returns whether it existed.
    pub fn remove(&mut self, path: &str) -> bool {
        let parts = components(path);
        let Some((last, parents)) = parts.split_last() else {
            return false;
        };
        let mut node = &mut self.root;
        for part in parents {
            node = match node {
                Node::Dir(children) => match children.iter_mut().find(|(n, _)| n == part) {
                    Some((_, child)) => child,
                    None => return false,
                },
                _ => return false,
            };
        }
        match node {
            Node::Dir(children) => {
                let before = children.len();
                children.retain(|(n, _)| n != last);
                children.len() != before
            }
            _ => false,
        }
    }

    /// Reverse the stored order of every directory's children.
    pub fn reverse_order(&mut self) {
        fn reverse(node: &mut Node) {
            if let Node::Dir(children) = node {
                children.reverse();
                for (_, child) in children.iter_mut() {
                    reverse(child);
                }
            }
        }
        reverse(&mut self.root);
    }

    /// Number of files opened so far.
    pub fn reads(&self) -> usize {
        self.reads.get()
    }

    /// Number of directory listings served so far.
    pub fn listings(&self) -> usize {
        self.listings.get()
    }

    fn insert(&mut self, path: &str, new_node: Node) {
        let parts = components(path);
        let Some((last, parents)) = parts.split_last() else {
            return;
        };
        let mut node = &mut self.root;
        for part in parents {
            let Node::Dir(children) = node else {
                return;
            };
            let idx = match children.iter().position(|(n, _)| n == part) {
                Some(idx) => idx,
                None => {
                    children.push((part.to_string(), Node::Dir(Vec::new())));
                    children.len() - 1
                }
            };
            node = &mut children[idx].1;
        }
        if let Node::Dir(children) = node {
            match children.iter_mut().find(|(n, _)| n == last) {
                Some((_, existing)) => *existing = new_node,
                None => children.push((last.to_string(), new_node)),
            }
        }
    }

    fn lookup(&self, path: &str) -> Result<&Node> {
        let mut node = &self.root;
        for part in components(path) {
            node = match node {
                Node::Dir(children) => children
                    .iter()
                    .find(|(n, _)| n == part)
                    .map(|(_, child)| child)
                    .ok_or_else(|| Error::NotFound(path.to_string()))?,
                _ => return Err(Error::NotFound(path.to_string())),
            };
        }
        Ok(node)
    }
}

impl Backend for MemoryFs {
    fn get_info(&self, path: &str) -> Result<EntryInfo> {
        let node = self.lookup(path)?;
        Ok(EntryInfo {
            name: base_name(path).to_string(),
            kind: node.kind(),
            size: node.size(),
        })
    }

    fn list_children(&self, path: &str, want_size: bool) -> Result<Vec<EntryInfo>> {
        match self.lookup(path)? {
            Node::Dir(children) => {
                self.listings.set(self.listings.get() + 1);
                Ok(children
                    .iter()
                    .map(|(name, node)| EntryInfo {
                        name: name.clone(),
                        kind: node.kind(),
                        size: if want_size { node.size() } else { None },
                    })
                    .collect())
            }
            _ => Err(Error::Io {
                path: path.to_string(),
                source: io::Error::other("not a directory"),
            }),
        }
    }

    fn open_for_read(&self, path: &str) -> Result<Box<dyn Read + '_>> {
        match self.lookup(path)? {
            Node::File(bytes) => {
                self.reads.set(self.reads.get() + 1);
                Ok(Box::new(Cursor::new(bytes.as_slice())))
            }
            _ => Err(Error::Io {
                path: path.to_string(),
                source: io::Error::other("not a regular file"),
            }),
        }
    }
}
