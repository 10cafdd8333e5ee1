//! Generational arena for reference-counted objects.
//!
//! Every object carries its isa (the `TypeHash` of its current class) in an
//! atomic slot next to a fixed-size field block. Changing an object's class
//! is a single compare-exchange on that slot; the field block is never
//! resized after allocation.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::{TypeHash, Value};

/// Handle to a heap-allocated object.
///
/// This is a safe, copyable reference to an object in the `ObjectHeap`.
/// The generational index prevents use-after-free bugs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectHandle {
    /// Index into ObjectHeap.slots
    pub index: u32,
    /// Generation for use-after-free detection
    pub generation: u32,
}

impl ObjectHandle {
    /// Create a new object handle.
    pub fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }
}

/// A live object: its class pointer and its stored fields.
pub struct HeapObject {
    isa: AtomicU64,
    fields: Box<[Value]>,
}

impl HeapObject {
    fn new(isa: TypeHash, fields: Vec<Value>) -> Self {
        Self {
            isa: AtomicU64::new(isa.0),
            fields: fields.into_boxed_slice(),
        }
    }

    /// The object's current class.
    #[inline]
    pub fn isa(&self) -> TypeHash {
        TypeHash(self.isa.load(Ordering::Acquire))
    }

    /// Replace the class pointer if it still equals `current`.
    ///
    /// On failure returns the class the object actually has.
    #[inline]
    pub fn compare_exchange_isa(&self, current: TypeHash, new: TypeHash) -> Result<TypeHash, TypeHash> {
        self.isa
            .compare_exchange(current.0, new.0, Ordering::AcqRel, Ordering::Acquire)
            .map(TypeHash)
            .map_err(TypeHash)
    }

    /// Stored fields, in instance-layout order.
    pub fn fields(&self) -> &[Value] {
        &self.fields
    }

    /// Mutable access to stored fields. The slice length is fixed.
    pub fn fields_mut(&mut self) -> &mut [Value] {
        &mut self.fields
    }
}

impl fmt::Debug for HeapObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeapObject")
            .field("isa", &self.isa())
            .field("fields", &self.fields)
            .finish()
    }
}

/// Heap storage for objects with generational indices.
///
/// Objects are stored in a Vec with generation tracking. When an object
/// is freed, its slot is reused but the generation is incremented. This
/// allows detecting stale handles at runtime.
pub struct ObjectHeap {
    slots: Vec<HeapSlot>,
    free_list: Vec<u32>,
}

struct HeapSlot {
    generation: u32,
    object: Option<HeapObject>,
    ref_count: u32,
}

impl ObjectHeap {
    /// Create a new empty object heap.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_list: Vec::new(),
        }
    }

    /// Allocate a new object of class `isa` with the given field block.
    pub fn allocate(&mut self, isa: TypeHash, fields: Vec<Value>) -> ObjectHandle {
        let object = HeapObject::new(isa, fields);

        if let Some(index) = self.free_list.pop() {
            let slot = &mut self.slots[index as usize];
            slot.object = Some(object);
            slot.ref_count = 1;
            ObjectHandle::new(index, slot.generation)
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(HeapSlot {
                generation: 0,
                object: Some(object),
                ref_count: 1,
            });
            ObjectHandle::new(index, 0)
        }
    }

    /// Get an object.
    ///
    /// Returns None if the handle is stale.
    pub fn get(&self, handle: ObjectHandle) -> Option<&HeapObject> {
        let slot = self.slots.get(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.object.as_ref()
    }

    /// Get mutable access to an object.
    ///
    /// Returns None if the handle is stale.
    pub fn get_mut(&mut self, handle: ObjectHandle) -> Option<&mut HeapObject> {
        let slot = self.slots.get_mut(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.object.as_mut()
    }

    /// Check whether a handle refers to a live object.
    pub fn contains(&self, handle: ObjectHandle) -> bool {
        self.get(handle).is_some()
    }

    /// Increment reference count.
    pub fn add_ref(&mut self, handle: ObjectHandle) -> bool {
        if let Some(slot) = self.slots.get_mut(handle.index as usize)
            && slot.generation == handle.generation
            && slot.object.is_some()
        {
            slot.ref_count = slot.ref_count.saturating_add(1);
            return true;
        }
        false
    }

    /// Decrement reference count, free if zero.
    ///
    /// Returns true if the object was freed.
    pub fn release(&mut self, handle: ObjectHandle) -> bool {
        if let Some(slot) = self.slots.get_mut(handle.index as usize)
            && slot.generation == handle.generation
            && slot.object.is_some()
        {
            slot.ref_count = slot.ref_count.saturating_sub(1);
            if slot.ref_count == 0 {
                slot.object = None;
                slot.generation = slot.generation.wrapping_add(1);
                self.free_list.push(handle.index);
                return true;
            }
        }
        false
    }

    /// Get the reference count for an object.
    pub fn ref_count(&self, handle: ObjectHandle) -> Option<u32> {
        let slot = self.slots.get(handle.index as usize)?;
        if slot.generation == handle.generation && slot.object.is_some() {
            Some(slot.ref_count)
        } else {
            None
        }
    }

    /// Number of live objects.
    pub fn live_count(&self) -> usize {
        self.slots.len() - self.free_list.len()
    }
}

impl Default for ObjectHeap {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ObjectHeap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectHeap")
            .field("slot_count", &self.slots.len())
            .field("free_count", &self.free_list.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> TypeHash {
        TypeHash::from_name("Base")
    }

    #[test]
    fn allocate_and_get() {
        let mut heap = ObjectHeap::new();
        let h = heap.allocate(base(), vec![Value::Int(7)]);
        let obj = heap.get(h).unwrap();
        assert_eq!(obj.isa(), base());
        assert_eq!(obj.fields(), &[Value::Int(7)]);
        assert_eq!(heap.live_count(), 1);
    }

    #[test]
    fn release_frees_and_invalidates() {
        let mut heap = ObjectHeap::new();
        let h = heap.allocate(base(), Vec::new());
        assert!(heap.add_ref(h));
        assert_eq!(heap.ref_count(h), Some(2));
        assert!(!heap.release(h));
        assert!(heap.release(h));
        assert!(heap.get(h).is_none());
        assert_eq!(heap.live_count(), 0);

        // Slot reuse bumps the generation, so the old handle stays dead.
        let h2 = heap.allocate(base(), Vec::new());
        assert_eq!(h2.index, h.index);
        assert_ne!(h2.generation, h.generation);
        assert!(heap.get(h).is_none());
        assert!(heap.contains(h2));
    }

    #[test]
    fn compare_exchange_isa() {
        let mut heap = ObjectHeap::new();
        let h = heap.allocate(base(), Vec::new());
        let other = TypeHash::from_name("Other");
        let obj = heap.get(h).unwrap();

        assert_eq!(obj.compare_exchange_isa(base(), other), Ok(base()));
        assert_eq!(obj.isa(), other);
        assert_eq!(obj.compare_exchange_isa(base(), base()), Err(other));
        assert_eq!(obj.isa(), other);
    }

    #[test]
    fn fields_are_mutable_in_place() {
        let mut heap = ObjectHeap::new();
        let h = heap.allocate(base(), vec![Value::Int(0), Value::Bool(false)]);
        heap.get_mut(h).unwrap().fields_mut()[1] = Value::Bool(true);
        assert_eq!(heap.get(h).unwrap().fields()[1], Value::Bool(true));
    }
}
