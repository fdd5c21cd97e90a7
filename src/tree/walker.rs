//! TreeWalker - ordered, filtered directory traversal

use std::iter::Peekable;
use std::vec;

use crate::error::Result;
use crate::fs::{Backend, EntryInfo, EntryKind, order_key};

use super::config::WalkerConfig;
use super::filter::EntryFilter;

/// Sort rank of an entry: directories first when requested.
fn kind_rank(kind: EntryKind, dirs_first: bool) -> u8 {
    if dirs_first && kind.is_dir() { 1 } else { 2 }
}

/// Sort entries into canonical `(kind_rank, name)` order.
pub fn sort_entries(entries: &mut [EntryInfo], dirs_first: bool) {
    entries.sort_by(|a, b| {
        kind_rank(a.kind, dirs_first)
            .cmp(&kind_rank(b.kind, dirs_first))
            .then_with(|| {
                a.name
                    .chars()
                    .map(order_key)
                    .cmp(b.name.chars().map(order_key))
            })
    });
}

/// Lists directories through a backend, applying the filter and the
/// canonical order.
pub struct TreeWalker<'a> {
    backend: &'a dyn Backend,
    filter: EntryFilter,
    dirs_first: bool,
}

impl<'a> TreeWalker<'a> {
    pub fn new(backend: &'a dyn Backend, config: &WalkerConfig) -> Self {
        let filter = EntryFilter::new(&config.excludes, &config.includes);
        Self::with_filter(backend, filter, config.dirs_first)
    }

    pub fn with_filter(backend: &'a dyn Backend, filter: EntryFilter, dirs_first: bool) -> Self {
        Self {
            backend,
            filter,
            dirs_first,
        }
    }

    /// A walker over the same backend and filter that uses the canonical
    /// dirs-first order.
    pub fn canonical(&self) -> TreeWalker<'a> {
        Self::with_filter(self.backend, self.filter.clone(), true)
    }

    pub fn backend(&self) -> &'a dyn Backend {
        self.backend
    }

    pub fn filter(&self) -> &EntryFilter {
        &self.filter
    }

    /// Read, sort and filter the immediate children of a directory.
    pub fn scan(&self, path: &str, want_size: bool) -> Result<Vec<EntryInfo>> {
        let mut entries = self.backend.list_children(path, want_size)?;
        sort_entries(&mut entries, self.dirs_first);
        entries.retain(|info| self.filter.is_included(&info.make_path(path)));
        Ok(entries)
    }

    /// Depth-first, pre-order traversal below `root`.
    ///
    /// The root itself is not yielded. Children at depth `max_depth` are
    /// yielded but not descended into; links are never descended into.
    pub fn visit<'w>(
        &'w self,
        root: &str,
        root_info: &EntryInfo,
        max_depth: Option<usize>,
        want_size: bool,
    ) -> Visit<'w, 'a> {
        let pending = root_info
            .kind
            .is_dir()
            .then(|| (root.to_string(), 0))
            .filter(|&(_, depth)| !at_max_depth(max_depth, depth));
        Visit {
            walker: self,
            stack: Vec::new(),
            pending,
            max_depth,
            want_size,
            done: false,
        }
    }
}

fn at_max_depth(max_depth: Option<usize>, depth: usize) -> bool {
    max_depth.is_some_and(|max| depth >= max)
}

/// One entry produced by [`TreeWalker::visit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Visited {
    pub path: String,
    pub info: EntryInfo,
    /// Depth below the root; immediate children are at depth 1.
    pub depth: usize,
    pub is_first: bool,
    pub is_last: bool,
}

struct Frame {
    path: String,
    depth: usize,
    index: usize,
    children: Peekable<vec::IntoIter<EntryInfo>>,
}

/// Lazy traversal state. Finite and not restartable; stops after the first
/// error.
pub struct Visit<'w, 'a> {
    walker: &'w TreeWalker<'a>,
    stack: Vec<Frame>,
    /// Directory to list before the next entry is produced.
    pending: Option<(String, usize)>,
    max_depth: Option<usize>,
    want_size: bool,
    done: bool,
}

impl Iterator for Visit<'_, '_> {
    type Item = Result<Visited>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if let Some((path, depth)) = self.pending.take() {
            match self.walker.scan(&path, self.want_size) {
                Ok(children) => self.stack.push(Frame {
                    path,
                    depth,
                    index: 0,
                    children: children.into_iter().peekable(),
                }),
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }

        loop {
            let Some(frame) = self.stack.last_mut() else {
                self.done = true;
                return None;
            };
            let Some(info) = frame.children.next() else {
                self.stack.pop();
                continue;
            };

            let is_first = frame.index == 0;
            frame.index += 1;
            let is_last = frame.children.peek().is_none();
            let depth = frame.depth + 1;
            let path = info.make_path(&frame.path);

            if info.kind.is_dir() && !at_max_depth(self.max_depth, depth) {
                self.pending = Some((path.clone(), depth));
            }

            return Some(Ok(Visited {
                path,
                info,
                depth,
                is_first,
                is_last,
            }));
        }
    }
}
