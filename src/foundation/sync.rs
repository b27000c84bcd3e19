use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

// Cache maps only ever hold fully built values, so a poisoned lock still guards consistent data.

pub(crate) fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|e| e.into_inner())
}

pub(crate) fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|e| e.into_inner())
}
