use uuid::Uuid;

/// An error for mydir-mds
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    NameConflict(String),
    NotFound(String),
    NotEmpty(Uuid),
    IsRoot(Uuid),
    Detached(Uuid),
}

impl std::error::Error for Error {}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NameConflict(name) => write!(f, "An entry named {} already exists", name),
            Self::NotFound(name) => write!(f, "No such file or directory: {}", name),
            Self::NotEmpty(id) => write!(f, "Directory {} is not empty", id),
            Self::IsRoot(id) => write!(f, "Directory {} is a root and cannot be deleted", id),
            Self::Detached(id) => write!(f, "{} is no longer part of a tree", id),
        }
    }
}
