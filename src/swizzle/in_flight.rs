//! Per-object serialization of swizzles.
//!
//! The isa swap and the prepare hook are separate steps. While one caller is
//! between them, other callers on the same object wait here, so nobody sees
//! the object as swizzled before its hook has finished. Swizzles of
//! different objects never wait on each other.

use std::thread::{self, ThreadId};

use parking_lot::{Condvar, Mutex};
use rustc_hash::FxHashMap;

use swizzle_core::ObjectHandle;

/// Objects with a swizzle in progress, and the thread running it.
#[derive(Debug, Default)]
pub struct InFlightSwizzles {
    owners: Mutex<FxHashMap<ObjectHandle, ThreadId>>,
    finished: Condvar,
}

impl InFlightSwizzles {
    /// Claim `object`, waiting while another thread holds it.
    ///
    /// Re-entrant: a thread that already holds the object (a prepare hook
    /// swizzling its own object again) gets a guard that releases nothing.
    pub fn claim(&self, object: ObjectHandle) -> InFlightGuard<'_> {
        let me = thread::current().id();
        let mut owners = self.owners.lock();
        loop {
            match owners.get(&object).copied() {
                None => {
                    owners.insert(object, me);
                    return InFlightGuard {
                        table: Some(self),
                        object,
                    };
                }
                Some(owner) if owner == me => {
                    return InFlightGuard { table: None, object };
                }
                Some(_) => self.finished.wait(&mut owners),
            }
        }
    }

    /// Number of objects currently claimed.
    pub fn len(&self) -> usize {
        self.owners.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Releases an object claim on drop.
#[derive(Debug)]
pub struct InFlightGuard<'a> {
    table: Option<&'a InFlightSwizzles>,
    object: ObjectHandle,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        if let Some(table) = self.table {
            table.owners.lock().remove(&self.object);
            table.finished.notify_all();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    #[test]
    fn claim_is_reentrant_on_same_thread() {
        let table = InFlightSwizzles::default();
        let object = ObjectHandle::new(0, 0);
        let outer = table.claim(object);
        {
            let _inner = table.claim(object);
            assert_eq!(table.len(), 1);
        }
        // Dropping the inner guard keeps the outer claim.
        assert_eq!(table.len(), 1);
        drop(outer);
        assert!(table.is_empty());
    }

    #[test]
    fn other_thread_waits_for_release() {
        let table = Arc::new(InFlightSwizzles::default());
        let object = ObjectHandle::new(0, 0);
        let acquired = Arc::new(AtomicBool::new(false));

        let guard = table.claim(object);
        let waiter = {
            let table = Arc::clone(&table);
            let acquired = Arc::clone(&acquired);
            thread::spawn(move || {
                let _guard = table.claim(object);
                acquired.store(true, Ordering::SeqCst);
            })
        };

        thread::sleep(Duration::from_millis(50));
        assert!(!acquired.load(Ordering::SeqCst));
        drop(guard);
        waiter.join().unwrap();
        assert!(acquired.load(Ordering::SeqCst));
        assert!(table.is_empty());
    }

    #[test]
    fn different_objects_do_not_wait() {
        let table = InFlightSwizzles::default();
        let _a = table.claim(ObjectHandle::new(0, 0));
        let _b = table.claim(ObjectHandle::new(1, 0));
        assert_eq!(table.len(), 2);
    }
}
