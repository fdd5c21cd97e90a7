//! Local disk backend

use std::fs::{self, File};
use std::io::Read;

use super::native::{decode_name, native_path};
use super::{Backend, EntryInfo, EntryKind, base_name};
use crate::error::{Error, Result};

/// Backend over the host filesystem.
///
/// Children are classified without following symlinks. The path handed to
/// [`Backend::get_info`] is followed, so a symlinked root behaves like the
/// directory it points at. Names that are not valid UTF-8 keep their raw
/// bytes, so every listed child can be opened again by its logical path.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFs;

impl LocalFs {
    pub fn new() -> Self {
        Self
    }
}

fn kind_of(file_type: fs::FileType) -> EntryKind {
    if file_type.is_symlink() {
        EntryKind::Link
    } else if file_type.is_dir() {
        EntryKind::Directory
    } else if file_type.is_file() {
        EntryKind::File
    } else {
        EntryKind::Special
    }
}

impl Backend for LocalFs {
    fn get_info(&self, path: &str) -> Result<EntryInfo> {
        let meta = fs::metadata(native_path(path)).map_err(|e| Error::io(path, e))?;
        let kind = kind_of(meta.file_type());
        let mut info = EntryInfo::new(base_name(path), kind);
        if !kind.is_dir() {
            info.size = Some(meta.len());
        }
        Ok(info)
    }

    fn list_children(&self, path: &str, want_size: bool) -> Result<Vec<EntryInfo>> {
        let entries = fs::read_dir(native_path(path)).map_err(|e| Error::io(path, e))?;

        let mut infos = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| Error::io(path, e))?;
            let name = decode_name(&entry.file_name());
            let child_path = super::join_path(path, &name);
            let file_type = entry.file_type().map_err(|e| Error::io(&child_path, e))?;
            let kind = kind_of(file_type);

            let mut info = EntryInfo::new(name, kind);
            if want_size && !kind.is_dir() {
                // symlink_metadata: a link's own size, not its target's
                let meta = fs::symlink_metadata(entry.path())
                    .map_err(|e| Error::io(&child_path, e))?;
                info.size = Some(meta.len());
            }
            infos.push(info);
        }
        Ok(infos)
    }

    fn open_for_read(&self, path: &str) -> Result<Box<dyn Read + '_>> {
        let file = File::open(native_path(path)).map_err(|e| Error::io(path, e))?;
        Ok(Box::new(file))
    }
}
