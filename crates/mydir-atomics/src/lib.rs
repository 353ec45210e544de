//! Lock helpers shared by the mydir crates

pub mod rwlock;

pub use rwlock::ReadWriteLock;
