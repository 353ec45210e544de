use std::{
    mem,
    sync::{Arc, RwLock, Weak},
};

use hashbrown::HashMap;
use mydir_atomics::ReadWriteLock;
use uuid::Uuid;

use crate::{
    directory::{Directory, DirectoryNode},
    error::Error,
    index::RootIndex,
    snapshot::FileSnapshot,
    version::Version,
    Entry,
};

/// A named file inside exactly one directory
#[derive(Clone)]
pub struct File {
    node: Arc<FileNode>,
}

pub(crate) struct FileNode {
    id: Uuid,
    name: RwLock<String>,
    directory: Weak<DirectoryNode>,
    state: RwLock<FileState>,
}

struct FileState {
    versions: HashMap<Uuid, Version>,
    // Sequence number handed to the next version
    next_sequence: u64,
    attached: bool,
}

impl File {
    /// Create a file in the directory.
    /// Fails if the directory already has an entry with the name.
    pub fn new(name: &str, directory: &Directory) -> Result<Self, Error> {
        let file = Self {
            node: Arc::new(FileNode {
                id: Uuid::new_v4(),
                name: RwLock::new(name.to_owned()),
                directory: directory.downgrade(),
                state: RwLock::new(FileState {
                    versions: HashMap::new(),
                    next_sequence: 1,
                    attached: true,
                }),
            }),
        };

        directory.with_index_mut(|index| {
            directory.register(name, Entry::File(file.clone()))?;
            index.insert_file(file.clone());
            Ok(())
        })?;

        log::debug!("Created file {} ({}) in {}", name, file.id(), directory.id());
        Ok(file)
    }

    /// Create a new version of this file
    pub fn new_version(&self) -> Result<Version, Error> {
        Version::new(self)
    }

    /// Delete the file.
    /// All versions are removed first, then the file leaves its directory.
    pub fn delete(&self) -> Result<(), Error> {
        let directory = self.directory().ok_or(Error::Detached(self.id()))?;

        directory.with_index_mut(|index| {
            let versions = {
                let mut state = self.node.state.write_lock();
                if !state.attached {
                    return Err(Error::Detached(self.id()));
                }
                mem::take(&mut state.versions)
            };
            detach_versions(versions, index);

            directory.deregister(&self.name(), self.id())?;
            index.remove_file(self.id());
            self.node.state.write_lock().attached = false;
            Ok(())
        })?;

        log::debug!("Deleted file {} ({})", self.name(), self.id());
        Ok(())
    }

    /// Get all versions, oldest first
    pub fn versions(&self) -> Vec<Version> {
        let mut versions = self
            .node
            .state
            .read_lock()
            .versions
            .values()
            .cloned()
            .collect::<Vec<_>>();
        versions.sort_by_key(Version::sequence);
        versions
    }
}

impl File {
    /// Get the id
    pub fn id(&self) -> Uuid {
        self.node.id
    }

    /// Get the name
    pub fn name(&self) -> String {
        self.node.name.read_lock().clone()
    }

    /// Get the directory containing the file
    pub fn directory(&self) -> Option<Directory> {
        self.node.directory.upgrade().map(Directory::from_node)
    }

    /// Get the root of the tree the file belongs to
    pub fn root(&self) -> Option<Directory> {
        self.directory()?.root()
    }

    /// Check if the file is still registered in a tree
    pub fn is_attached(&self) -> bool {
        self.node.state.read_lock().attached
    }

    /// Capture the file and its versions
    pub fn snapshot(&self) -> FileSnapshot {
        FileSnapshot::capture(self)
    }
}

impl File {
    pub(crate) fn downgrade(&self) -> Weak<FileNode> {
        Arc::downgrade(&self.node)
    }

    pub(crate) fn from_node(node: Arc<FileNode>) -> Self {
        Self { node }
    }

    pub(crate) fn set_name(&self, name: &str) {
        *self.node.name.write_lock() = name.to_owned();
    }

    /// Allocate and register a new version.
    /// Must be called with the root index locked.
    pub(crate) fn register_version(&self) -> Result<Version, Error> {
        let mut state = self.node.state.write_lock();
        if !state.attached {
            return Err(Error::Detached(self.id()));
        }

        let version = Version::attached_to(self, state.next_sequence);
        state.next_sequence += 1;
        state.versions.insert(version.id(), version.clone());
        Ok(version)
    }

    /// Remove a version from this file.
    /// Must be called with the root index locked.
    pub(crate) fn deregister_version(&self, id: Uuid) -> Result<(), Error> {
        let mut state = self.node.state.write_lock();
        if !state.attached {
            return Err(Error::Detached(self.id()));
        }
        state
            .versions
            .remove(&id)
            .map(|_| ())
            .ok_or(Error::Detached(id))
    }

    /// Drop the file and its versions from the index and mark them inert.
    /// Used when the containing directory is torn down.
    pub(crate) fn detach(&self, index: &mut RootIndex) {
        let versions = {
            let mut state = self.node.state.write_lock();
            state.attached = false;
            mem::take(&mut state.versions)
        };
        detach_versions(versions, index);
        index.remove_file(self.id());
    }
}

fn detach_versions(versions: HashMap<Uuid, Version>, index: &mut RootIndex) {
    for (id, version) in versions {
        index.remove_version(id);
        version.detach();
    }
}

impl PartialEq for File {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.node, &other.node)
    }
}

impl Eq for File {}

impl std::fmt::Debug for File {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("File")
            .field("id", &self.id())
            .field("name", &self.name())
            .finish()
    }
}
