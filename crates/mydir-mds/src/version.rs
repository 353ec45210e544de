use std::sync::{Arc, RwLock, Weak};

use mydir_atomics::ReadWriteLock;
use uuid::Uuid;

use crate::{
    error::Error,
    file::{File, FileNode},
};

/// One revision of a file.
/// A version only carries its identity and creation order, no content.
#[derive(Clone)]
pub struct Version {
    node: Arc<VersionNode>,
}

struct VersionNode {
    id: Uuid,
    sequence: u64,
    file: Weak<FileNode>,
    attached: RwLock<bool>,
}

impl Version {
    /// Create a version of the file
    pub fn new(file: &File) -> Result<Self, Error> {
        let directory = file.directory().ok_or(Error::Detached(file.id()))?;

        let version = directory.with_index_mut(|index| {
            let version = file.register_version()?;
            index.insert_version(version.clone());
            Ok(version)
        })?;

        log::debug!(
            "Created version {} ({}) of {}",
            version.sequence(),
            version.id(),
            file.id()
        );
        Ok(version)
    }

    /// Delete the version from its file
    pub fn delete(&self) -> Result<(), Error> {
        let file = self.file().ok_or(Error::Detached(self.id()))?;
        let directory = file.directory().ok_or(Error::Detached(self.id()))?;

        directory.with_index_mut(|index| {
            file.deregister_version(self.id())?;
            index.remove_version(self.id());
            self.detach();
            Ok(())
        })?;

        log::debug!("Deleted version {} of {}", self.id(), file.id());
        Ok(())
    }

    /// Get the id
    pub fn id(&self) -> Uuid {
        self.node.id
    }

    /// Get the position of this version in the creation order of its file, starting at 1
    pub fn sequence(&self) -> u64 {
        self.node.sequence
    }

    /// Get the file this is a version of
    pub fn file(&self) -> Option<File> {
        self.node.file.upgrade().map(File::from_node)
    }

    pub fn is_attached(&self) -> bool {
        *self.node.attached.read_lock()
    }

    pub(crate) fn attached_to(file: &File, sequence: u64) -> Self {
        Self {
            node: Arc::new(VersionNode {
                id: Uuid::new_v4(),
                sequence,
                file: file.downgrade(),
                attached: RwLock::new(true),
            }),
        }
    }

    pub(crate) fn detach(&self) {
        *self.node.attached.write_lock() = false;
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.node, &other.node)
    }
}

impl Eq for Version {}

impl std::fmt::Debug for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Version")
            .field("id", &self.id())
            .field("sequence", &self.sequence())
            .finish()
    }
}
