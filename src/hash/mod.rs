//! Content hashing of files and directory trees
//!
//! A file's hash is the digest of its bytes. A directory's hash is the
//! digest of one line per visible child,
//!
//! ```text
//! {type:<4} {hash} {escaped_name}\n
//! ```
//!
//! in canonical dirs-first order, where each child's hash is computed first
//! (Merkle composition). Lines always end in `\n`, whatever the platform.

mod algorithm;

use std::collections::HashMap;
use std::io::{ErrorKind, Read};

use log::{debug, trace};

use crate::error::{Error, Result};
use crate::escape::escape_filename;
use crate::fs::{EntryInfo, EntryKind};
use crate::tree::TreeWalker;

pub use algorithm::{Algorithm, DEFAULT_ALGORITHM, Digester};

/// Files are digested in chunks of this many bytes.
pub const CHUNK_SIZE: usize = 1024 * 1024;

/// Per-run memo of path -> hex digest.
#[derive(Debug, Default)]
pub struct HashCache {
    entries: HashMap<String, String>,
    hits: usize,
}

impl HashCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&mut self, path: &str) -> Option<&str> {
        let found = self.entries.get(path);
        if found.is_some() {
            self.hits += 1;
        }
        found.map(String::as_str)
    }

    pub fn insert(&mut self, path: &str, digest: String) {
        self.entries.insert(path.to_string(), digest);
    }

    /// Number of distinct paths hashed.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of lookups answered from the cache.
    pub fn hits(&self) -> usize {
        self.hits
    }
}

/// Type tag of an entry that has a defined hash.
fn hashable_label(path: &str, kind: EntryKind) -> Result<&'static str> {
    match kind {
        EntryKind::Directory | EntryKind::File => Ok(kind.label()),
        EntryKind::Link | EntryKind::Special => Err(Error::UnsupportedKind {
            path: path.to_string(),
            kind: kind.label(),
        }),
    }
}

/// Computes and memoises content hashes for one run.
pub struct HashEngine<'a> {
    walker: TreeWalker<'a>,
    algorithm: Algorithm,
    cache: HashCache,
    buffer: Vec<u8>,
}

impl<'a> HashEngine<'a> {
    /// Create an engine for the named algorithm.
    ///
    /// Directory listings go through `walker`'s filter, re-sorted into the
    /// canonical order.
    pub fn new(walker: &TreeWalker<'a>, algorithm: &str) -> Result<Self> {
        let algorithm = Algorithm::from_name(algorithm)?;
        debug!("hashing with {}", algorithm.name());
        Ok(Self::with_algorithm(walker, algorithm))
    }

    pub fn with_algorithm(walker: &TreeWalker<'a>, algorithm: Algorithm) -> Self {
        Self {
            walker: walker.canonical(),
            algorithm,
            cache: HashCache::new(),
            buffer: Vec::new(),
        }
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn cache(&self) -> &HashCache {
        &self.cache
    }

    /// Hash of the entry at `path`.
    pub fn hash(&mut self, path: &str) -> Result<String> {
        let info = self.walker.backend().get_info(path)?;
        self.hash_entry(path, &info)
    }

    /// `"{type} {hash}"` for the entry at `path`.
    pub fn path_hash(&mut self, path: &str) -> Result<String> {
        let info = self.walker.backend().get_info(path)?;
        let label = hashable_label(path, info.kind)?;
        let digest = self.hash_entry(path, &info)?;
        Ok(format!("{} {}", label, digest))
    }

    /// The lines a directory's hash is computed from (without line
    /// terminators), or the `path_hash` line for anything else.
    pub fn listing(&mut self, path: &str) -> Result<Vec<String>> {
        let info = self.walker.backend().get_info(path)?;
        if info.kind.is_dir() {
            self.tree_lines(path)
        } else {
            Ok(vec![self.path_hash(path)?])
        }
    }

    /// Hash of an entry whose info is already known, memoised by path.
    pub fn hash_entry(&mut self, path: &str, info: &EntryInfo) -> Result<String> {
        if let Some(cached) = self.cache.get(path) {
            trace!("cache hit: {}", path);
            return Ok(cached.to_string());
        }
        let digest = match info.kind {
            EntryKind::Directory => self.hash_tree(path)?,
            EntryKind::File => self.hash_file(path)?,
            EntryKind::Link | EntryKind::Special => {
                return Err(Error::UnsupportedKind {
                    path: path.to_string(),
                    kind: info.kind.label(),
                });
            }
        };
        self.cache.insert(path, digest.clone());
        Ok(digest)
    }

    /// One line per visible child; children are hashed before the line is
    /// built.
    fn tree_lines(&mut self, path: &str) -> Result<Vec<String>> {
        let children = self.walker.scan(path, false)?;
        let mut lines = Vec::with_capacity(children.len());
        for child in &children {
            let child_path = child.make_path(path);
            let label = hashable_label(&child_path, child.kind)?;
            let digest = self.hash_entry(&child_path, child)?;
            lines.push(format!(
                "{:<4} {} {}",
                label,
                digest,
                escape_filename(&child.name)
            ));
        }
        Ok(lines)
    }

    fn hash_tree(&mut self, path: &str) -> Result<String> {
        let lines = self.tree_lines(path)?;
        let mut digester = self.algorithm.digester();
        for line in &lines {
            digester.update(line.as_bytes());
            digester.update(b"\n");
        }
        let digest = digester.finalize_hex();
        debug!("dir {} ({} entries): {}", path, lines.len(), digest);
        Ok(digest)
    }

    fn hash_file(&mut self, path: &str) -> Result<String> {
        let backend = self.walker.backend();
        let mut reader = backend.open_for_read(path)?;
        if self.buffer.len() != CHUNK_SIZE {
            self.buffer.resize(CHUNK_SIZE, 0);
        }
        let mut digester = self.algorithm.digester();
        loop {
            let n = match reader.read(&mut self.buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(Error::io(path, e)),
            };
            digester.update(&self.buffer[..n]);
        }
        let digest = digester.finalize_hex();
        trace!("file {}: {}", path, digest);
        Ok(digest)
    }
}
