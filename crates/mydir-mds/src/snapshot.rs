use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{directory::Directory, file::File};

/// A point in time copy of a directory and everything below it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectorySnapshot {
    pub id: Uuid,
    pub name: String,
    pub directories: Vec<DirectorySnapshot>,
    pub files: Vec<FileSnapshot>,
}

/// A point in time copy of a file and its versions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSnapshot {
    pub id: Uuid,
    pub name: String,
    pub versions: Vec<VersionSnapshot>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionSnapshot {
    pub id: Uuid,
    pub sequence: u64,
}

impl DirectorySnapshot {
    /// Capture the directory.
    /// Children are sorted by name. Only one directory is locked at a time, so a tree that is
    /// mutated concurrently may be captured partway through a change.
    pub fn capture(directory: &Directory) -> Self {
        let mut directories = directory
            .directories()
            .iter()
            .map(Self::capture)
            .collect::<Vec<_>>();
        directories.sort_by(|a, b| a.name.cmp(&b.name));

        let mut files = directory
            .files()
            .iter()
            .map(FileSnapshot::capture)
            .collect::<Vec<_>>();
        files.sort_by(|a, b| a.name.cmp(&b.name));

        Self {
            id: directory.id(),
            name: directory.name(),
            directories,
            files,
        }
    }

    /// Serialize the snapshot as pretty printed json
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Count the directories, files and versions in the snapshot, including itself
    pub fn count(&self) -> (usize, usize, usize) {
        let mut counts = (1, 0, 0);
        let mut pending = vec![self];
        while let Some(directory) = pending.pop() {
            counts.1 += directory.files.len();
            counts.2 += directory
                .files
                .iter()
                .map(|file| file.versions.len())
                .sum::<usize>();
            counts.0 += directory.directories.len();
            pending.extend(directory.directories.iter());
        }
        counts
    }
}

impl FileSnapshot {
    pub fn capture(file: &File) -> Self {
        Self {
            id: file.id(),
            name: file.name(),
            versions: file
                .versions()
                .iter()
                .map(|version| VersionSnapshot {
                    id: version.id(),
                    sequence: version.sequence(),
                })
                .collect(),
        }
    }
}
