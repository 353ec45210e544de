use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Blocking rwlock acquisition that recovers from poisoning.
/// A poisoned lock only means a thread panicked while holding the guard. Critical sections
/// guarded through this trait never panic mid-mutation, so the data behind a poisoned lock
/// is still consistent and the guard is handed out regardless.
pub trait ReadWriteLock {
    type Inner;

    /// Block until the read lock is available
    fn read_lock(&self) -> RwLockReadGuard<'_, Self::Inner>;
    /// Block until the write lock is available
    fn write_lock(&self) -> RwLockWriteGuard<'_, Self::Inner>;
}

impl<T> ReadWriteLock for RwLock<T> {
    type Inner = T;

    fn read_lock(&self) -> RwLockReadGuard<'_, Self::Inner> {
        self.read().unwrap_or_else(|error| {
            log::warn!(
                "Recovered poisoned read lock for: {}",
                std::any::type_name::<T>()
            );
            error.into_inner()
        })
    }

    fn write_lock(&self) -> RwLockWriteGuard<'_, Self::Inner> {
        self.write().unwrap_or_else(|error| {
            log::warn!(
                "Recovered poisoned write lock for: {}",
                std::any::type_name::<T>()
            );
            error.into_inner()
        })
    }
}

#[cfg(test)]
mod rwlock_tests {
    use std::{
        sync::{Arc, RwLock},
        thread,
    };

    use super::ReadWriteLock;

    #[test]
    fn recovers_poisoned_lock() {
        let lock = Arc::new(RwLock::new(7));

        let poisoner = lock.clone();
        let result = thread::spawn(move || {
            let _guard = poisoner.write().unwrap();
            panic!("poison the lock");
        })
        .join();
        assert!(result.is_err());
        assert!(lock.is_poisoned());

        assert_eq!(*lock.read_lock(), 7);
        *lock.write_lock() = 8;
        assert_eq!(*lock.read_lock(), 8);
    }

    #[test]
    fn readers_share_the_lock() {
        let lock = RwLock::new(String::from("shared"));
        let first = lock.read_lock();
        let second = lock.read_lock();
        assert_eq!(*first, *second);
    }
}
