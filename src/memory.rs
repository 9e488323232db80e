//! # Memory
//!
//! Owns every heap allocation the interpreter makes. [`Heap`] bundles the string intern
//! table with the intrusive chain of every allocated [`Obj`], and frees the whole chain
//! when it is dropped — there is no garbage collector, only bulk teardown at the end of
//! a [`crate::vm::VM`]'s lifetime.
//!
//! This module also carries the small `rust_defined_types <-> obj_types` conversions the
//! rest of the crate leans on.

use std::ptr::NonNull;

use log::trace;

use crate::{
  object::{fnv1a_hash, Obj, ObjString, ObjTrait, ObjType},
  table::InternTable,
  utils::Init,
};

impl From<String> for ObjString {
  fn from(rust_string: String) -> Self {
    ObjString::new(rust_string)
  }
}

impl From<ObjString> for String {
  fn from(obj_string: ObjString) -> Self {
    obj_string.data.into()
  }
}

/// ## Heap
///
/// The allocator and string interner a [`crate::vm::VM`] owns. Replaces the process-wide
/// statics the source implementation keeps for the same purpose with one explicit value
/// threaded through compilation and execution.
pub struct Heap {
  strings: InternTable,
  objects: Option<NonNull<Obj>>,
}

impl Default for Heap {
  fn default() -> Self {
    Self {
      strings: InternTable::init(),
      objects: None,
    }
  }
}

impl Init for Heap {}

impl Heap {
  /// Intern `data`, returning the single canonical allocation for that content. A string
  /// is only ever allocated the first time a given piece of content is seen; every later
  /// intern of equal content returns the same pointer, so [`crate::value::Value`]
  /// equality on strings can compare pointers instead of bytes.
  pub fn intern_string(&mut self, data: &str) -> NonNull<ObjString> {
    let hash = fnv1a_hash(data.as_bytes());
    if let Some(existing) = self.strings.find_by_content(data, hash) {
      trace!("interned string hit for {} bytes", data.len());
      return existing;
    }
    let ptr = self.track(ObjString::new(data).cast_to_obj_ptr()).cast();
    self.strings.insert(ptr);
    trace!("allocated new interned string ({} bytes)", data.len());
    ptr
  }

  /// Link a freshly allocated object into the chain so [`Heap::drop`] can free it.
  fn track(&mut self, mut obj: NonNull<Obj>) -> NonNull<Obj> {
    unsafe {
      obj.as_mut().next = self.objects.take();
    }
    self.objects = Some(obj);
    obj
  }

  /// Number of live allocations, for tests and diagnostics.
  pub fn object_count(&self) -> usize {
    let mut count = 0;
    let mut current = self.objects;
    while let Some(obj) = current {
      count += 1;
      current = unsafe { obj.as_ref() }.next;
    }
    count
  }

  pub fn intern_table_len(&self) -> usize {
    self.strings.len()
  }
}

impl Drop for Heap {
  fn drop(&mut self) {
    let mut current = self.objects.take();
    let mut freed = 0usize;
    while let Some(obj) = current {
      let next = unsafe { obj.as_ref() }.next;
      match unsafe { obj.as_ref() }.obj_type {
        ObjType::String => drop(unsafe { Box::from_raw(obj.cast::<ObjString>().as_ptr()) }),
      }
      freed += 1;
      current = next;
    }
    trace!("heap teardown freed {freed} object(s)");
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn interning_equal_content_returns_same_pointer() {
    let mut heap = Heap::init();
    let a = heap.intern_string("hello");
    let b = heap.intern_string("hello");
    assert_eq!(a, b);
    assert_eq!(heap.object_count(), 1);
  }

  #[test]
  fn interning_distinct_content_allocates_twice() {
    let mut heap = Heap::init();
    heap.intern_string("hello");
    heap.intern_string("world");
    assert_eq!(heap.object_count(), 2);
    assert_eq!(heap.intern_table_len(), 2);
  }
}
