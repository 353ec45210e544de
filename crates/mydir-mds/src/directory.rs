use std::{
    mem,
    sync::{Arc, RwLock, Weak},
};

use hashbrown::HashMap;
use mydir_atomics::ReadWriteLock;
use uuid::Uuid;

use crate::{
    error::Error,
    file::File,
    index::{IndexCounts, RootIndex},
    snapshot::DirectorySnapshot,
    version::Version,
    Entry,
};

/// A directory in the tree.
/// The handle is cheap to clone and every clone refers to the same directory.
#[derive(Clone)]
pub struct Directory {
    node: Arc<DirectoryNode>,
}

pub(crate) struct DirectoryNode {
    id: Uuid,
    // Leaf lock, never held while acquiring another lock
    name: RwLock<String>,
    parent: Option<Weak<DirectoryNode>>,
    state: RwLock<DirectoryState>,
    // Only present on the root
    index: Option<RwLock<RootIndex>>,
}

struct DirectoryState {
    directories: HashMap<Uuid, Directory>,
    files: HashMap<Uuid, File>,
    entries: HashMap<String, Entry>,
    attached: bool,
}

impl DirectoryState {
    fn new() -> Self {
        Self {
            directories: HashMap::new(),
            files: HashMap::new(),
            entries: HashMap::new(),
            attached: true,
        }
    }

    fn has_children(&self) -> bool {
        !self.directories.is_empty() || !self.files.is_empty()
    }
}

impl Directory {
    /// Create a directory.
    /// Without a parent this creates the root of a new tree, otherwise the directory is
    /// registered in the parent before it is returned.
    pub fn new(name: &str, parent: Option<&Directory>) -> Result<Self, Error> {
        match parent {
            Some(parent) => parent.new_directory(name),
            None => Ok(Self::new_root(name)),
        }
    }

    /// Create the root of a new tree
    pub fn new_root(name: &str) -> Self {
        let directory = Self {
            node: Arc::new(DirectoryNode {
                id: Uuid::new_v4(),
                name: RwLock::new(name.to_owned()),
                parent: None,
                state: RwLock::new(DirectoryState::new()),
                index: Some(RwLock::new(RootIndex::new())),
            }),
        };
        log::debug!("Created root directory {} ({})", name, directory.id());
        directory
    }

    /// Create a directory inside this one
    pub fn new_directory(&self, name: &str) -> Result<Directory, Error> {
        let child = Directory {
            node: Arc::new(DirectoryNode {
                id: Uuid::new_v4(),
                name: RwLock::new(name.to_owned()),
                parent: Some(Arc::downgrade(&self.node)),
                state: RwLock::new(DirectoryState::new()),
                index: None,
            }),
        };

        self.with_index_mut(|index| {
            self.register(name, Entry::Directory(child.clone()))?;
            index.insert_directory(child.clone());
            Ok(())
        })?;

        log::debug!("Created directory {} ({}) in {}", name, child.id(), self.id());
        Ok(child)
    }

    /// Create a file inside this directory
    pub fn new_file(&self, name: &str) -> Result<File, Error> {
        File::new(name, self)
    }

    /// Get the directory or file registered under the name
    pub fn get_by_name(&self, name: &str) -> Result<Entry, Error> {
        self.node
            .state
            .read_lock()
            .entries
            .get(name)
            .cloned()
            .ok_or_else(|| Error::NotFound(name.to_owned()))
    }

    /// Get any directory of the tree by its id
    pub fn get_directory_by_uuid(&self, id: Uuid) -> Option<Directory> {
        let root = self.attached_root()?;
        if root.id == id {
            return Some(Directory { node: root });
        }
        let index = root.index.as_ref()?.read_lock();
        index.directory(id).cloned()
    }

    /// Get any file of the tree by its id
    pub fn get_file_by_uuid(&self, id: Uuid) -> Option<File> {
        self.lookup(|index| index.file(id).cloned())
    }

    /// Get any version of the tree by its id
    pub fn get_version_by_uuid(&self, id: Uuid) -> Option<Version> {
        self.lookup(|index| index.version(id).cloned())
    }

    /// Delete this directory.
    /// Without `delete_children` only an empty directory can be deleted. With it, every
    /// descendant is removed first, deepest directories first.
    pub fn delete(&self, delete_children: bool) -> Result<(), Error> {
        let Some(parent) = self.parent() else {
            if self.is_root() {
                return Err(Error::IsRoot(self.id()));
            }
            return Err(Error::Detached(self.id()));
        };

        self.with_index_mut(|index| {
            {
                let state = self.node.state.read_lock();
                if !state.attached {
                    return Err(Error::Detached(self.id()));
                }
                if !delete_children && state.has_children() {
                    return Err(Error::NotEmpty(self.id()));
                }
            }

            // Mutations are serialized by the index lock, so the checks above still hold
            parent.deregister(&self.name(), self.id())?;
            self.detach_descendants(index);
            self.detach(index);
            Ok(())
        })?;

        log::debug!("Deleted directory {} ({})", self.name(), self.id());
        Ok(())
    }

    /// Move the registration of a child from one name to another
    pub fn rename(&self, old_name: &str, new_name: &str) -> Result<(), Error> {
        self.with_index_mut(|_| {
            let mut state = self.node.state.write_lock();
            if !state.attached {
                return Err(Error::Detached(self.id()));
            }
            let entry = state
                .entries
                .get(old_name)
                .cloned()
                .ok_or_else(|| Error::NotFound(old_name.to_owned()))?;
            if old_name == new_name {
                return Ok(());
            }
            if state.entries.contains_key(new_name) {
                return Err(Error::NameConflict(new_name.to_owned()));
            }

            state.entries.remove(old_name);
            entry.set_name(new_name);
            state.entries.insert(new_name.to_owned(), entry);
            Ok(())
        })?;

        log::debug!("Renamed {} to {} in {}", old_name, new_name, self.id());
        Ok(())
    }

    /// Capture the subtree below this directory
    pub fn snapshot(&self) -> DirectorySnapshot {
        DirectorySnapshot::capture(self)
    }
}

impl Directory {
    /// Get the id
    pub fn id(&self) -> Uuid {
        self.node.id
    }

    /// Get the name
    pub fn name(&self) -> String {
        self.node.name.read_lock().clone()
    }

    /// Get the parent directory.
    /// `None` for a root, or when the parent no longer exists.
    pub fn parent(&self) -> Option<Directory> {
        let node = self.node.parent.as_ref()?.upgrade()?;
        Some(Directory { node })
    }

    /// Check if this directory is the root of its tree
    pub fn is_root(&self) -> bool {
        self.node.parent.is_none()
    }

    /// Get the root of the tree this directory belongs to
    pub fn root(&self) -> Option<Directory> {
        self.root_node().map(|node| Directory { node })
    }

    /// Check if the directory is still registered in a tree
    pub fn is_attached(&self) -> bool {
        self.node.state.read_lock().attached
    }

    /// Get all child directories
    pub fn directories(&self) -> Vec<Directory> {
        self.node
            .state
            .read_lock()
            .directories
            .values()
            .cloned()
            .collect()
    }

    /// Get all files
    pub fn files(&self) -> Vec<File> {
        self.node.state.read_lock().files.values().cloned().collect()
    }

    /// Get all entries, directories and files alike
    pub fn entries(&self) -> Vec<Entry> {
        self.node
            .state
            .read_lock()
            .entries
            .values()
            .cloned()
            .collect()
    }

    /// Check if the directory has no children
    pub fn is_empty(&self) -> bool {
        !self.node.state.read_lock().has_children()
    }

    /// Get the sizes of the root index of this tree
    pub fn index_counts(&self) -> Option<IndexCounts> {
        self.lookup(|index| Some(index.counts()))
    }
}

impl Directory {
    pub(crate) fn downgrade(&self) -> Weak<DirectoryNode> {
        Arc::downgrade(&self.node)
    }

    pub(crate) fn from_node(node: Arc<DirectoryNode>) -> Self {
        Self { node }
    }

    pub(crate) fn set_name(&self, name: &str) {
        *self.node.name.write_lock() = name.to_owned();
    }

    /// Run a structural mutation with the root index write locked.
    /// The index lock is always taken before any directory, file or version lock.
    pub(crate) fn with_index_mut<T>(
        &self,
        mutation: impl FnOnce(&mut RootIndex) -> Result<T, Error>,
    ) -> Result<T, Error> {
        let root = self.root_node().ok_or(Error::Detached(self.id()))?;
        let index = root.index.as_ref().ok_or(Error::Detached(self.id()))?;
        let mut index = index.write_lock();
        mutation(&mut index)
    }

    /// Register an entry under the name.
    /// Must be called with the root index locked.
    pub(crate) fn register(&self, name: &str, entry: Entry) -> Result<(), Error> {
        let mut state = self.node.state.write_lock();
        if !state.attached {
            return Err(Error::Detached(self.id()));
        }
        if state.entries.contains_key(name) {
            return Err(Error::NameConflict(name.to_owned()));
        }

        match &entry {
            Entry::Directory(directory) => {
                state.directories.insert(directory.id(), directory.clone());
            }
            Entry::File(file) => {
                state.files.insert(file.id(), file.clone());
            }
        }
        state.entries.insert(name.to_owned(), entry);
        Ok(())
    }

    /// Remove the entry registered under the name, if it is the one with the id.
    /// Must be called with the root index locked.
    pub(crate) fn deregister(&self, name: &str, id: Uuid) -> Result<(), Error> {
        let mut state = self.node.state.write_lock();
        if !state.attached {
            return Err(Error::Detached(self.id()));
        }
        match state.entries.get(name) {
            Some(entry) if entry.id() == id => {}
            _ => return Err(Error::NotFound(name.to_owned())),
        }

        state.entries.remove(name);
        state.directories.remove(&id);
        state.files.remove(&id);
        Ok(())
    }

    /// Walk the parent links up to the root
    fn root_node(&self) -> Option<Arc<DirectoryNode>> {
        let mut current = self.node.clone();
        while let Some(parent) = current.parent.as_ref() {
            let parent = parent.upgrade()?;
            current = parent;
        }
        Some(current)
    }

    /// The root, if this directory is still part of its tree
    fn attached_root(&self) -> Option<Arc<DirectoryNode>> {
        if !self.is_attached() {
            return None;
        }
        self.root_node()
    }

    fn lookup<T>(&self, query: impl FnOnce(&RootIndex) -> Option<T>) -> Option<T> {
        let root = self.attached_root()?;
        let index = root.index.as_ref()?.read_lock();
        query(&index)
    }

    /// Remove everything below this directory from the tree and the index.
    /// Directories are torn down children first, without recursing on the call stack.
    fn detach_descendants(&self, index: &mut RootIndex) {
        let mut pending = vec![self.clone()];
        let mut order = Vec::new();
        while let Some(directory) = pending.pop() {
            pending.extend(directory.directories());
            order.push(directory);
        }

        for directory in order.into_iter().rev() {
            let (directories, files) = {
                let mut state = directory.node.state.write_lock();
                state.entries.clear();
                (
                    mem::take(&mut state.directories),
                    mem::take(&mut state.files),
                )
            };
            for file in files.into_values() {
                file.detach(index);
            }
            for child in directories.into_values() {
                child.detach(index);
            }
        }
    }

    /// Drop this directory from the index and mark the handle inert
    fn detach(&self, index: &mut RootIndex) {
        index.remove_directory(self.id());
        self.node.state.write_lock().attached = false;
    }
}

impl PartialEq for Directory {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.node, &other.node)
    }
}

impl Eq for Directory {}

impl std::fmt::Debug for Directory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Directory")
            .field("id", &self.id())
            .field("name", &self.name())
            .finish()
    }
}
