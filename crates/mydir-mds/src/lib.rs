//! An in-memory tree of directories, files and file versions.
//! Every node can be reached by name through its parent, or by id from any directory of
//! the tree through the index kept by the root.

use uuid::Uuid;

pub mod directory;
pub mod error;
pub mod file;
pub mod index;
pub mod snapshot;
pub mod version;


pub use directory::Directory;
pub use error::Error;
pub use file::File;
pub use index::IndexCounts;
pub use version::Version;

/// An entry registered under a name in a directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    Directory(Directory),
    File(File),
}

impl Entry {
    /// Get the id of the entry
    pub fn id(&self) -> Uuid {
        match self {
            Self::Directory(directory) => directory.id(),
            Self::File(file) => file.id(),
        }
    }

    /// Get the name of the entry
    pub fn name(&self) -> String {
        match self {
            Self::Directory(directory) => directory.name(),
            Self::File(file) => file.name(),
        }
    }

    pub fn as_directory(&self) -> Option<&Directory> {
        match self {
            Self::Directory(directory) => Some(directory),
            Self::File(_) => None,
        }
    }

    pub fn as_file(&self) -> Option<&File> {
        match self {
            Self::File(file) => Some(file),
            Self::Directory(_) => None,
        }
    }

    pub(crate) fn set_name(&self, name: &str) {
        match self {
            Self::Directory(directory) => directory.set_name(name),
            Self::File(file) => file.set_name(name),
        }
    }
}
