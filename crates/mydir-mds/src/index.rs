use hashbrown::HashMap;
use uuid::Uuid;

use crate::{directory::Directory, file::File, version::Version};

/// The global id tables owned by a root directory.
/// Holds every directory, file and version below the root. The root itself is not stored,
/// lookups for its id are answered by the root directly.
#[derive(Debug, Default)]
pub struct RootIndex {
    directories: HashMap<Uuid, Directory>,
    files: HashMap<Uuid, File>,
    versions: HashMap<Uuid, Version>,
}

/// Number of entries in each table of a root index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IndexCounts {
    pub directories: usize,
    pub files: usize,
    pub versions: usize,
}

impl RootIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn directory(&self, id: Uuid) -> Option<&Directory> {
        self.directories.get(&id)
    }

    pub fn file(&self, id: Uuid) -> Option<&File> {
        self.files.get(&id)
    }

    pub fn version(&self, id: Uuid) -> Option<&Version> {
        self.versions.get(&id)
    }

    pub(crate) fn insert_directory(&mut self, directory: Directory) {
        self.directories.insert(directory.id(), directory);
    }

    pub(crate) fn insert_file(&mut self, file: File) {
        self.files.insert(file.id(), file);
    }

    pub(crate) fn insert_version(&mut self, version: Version) {
        self.versions.insert(version.id(), version);
    }

    pub(crate) fn remove_directory(&mut self, id: Uuid) -> Option<Directory> {
        self.directories.remove(&id)
    }

    pub(crate) fn remove_file(&mut self, id: Uuid) -> Option<File> {
        self.files.remove(&id)
    }

    pub(crate) fn remove_version(&mut self, id: Uuid) -> Option<Version> {
        self.versions.remove(&id)
    }

    pub fn counts(&self) -> IndexCounts {
        IndexCounts {
            directories: self.directories.len(),
            files: self.files.len(),
            versions: self.versions.len(),
        }
    }
}
