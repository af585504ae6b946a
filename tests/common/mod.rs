#![allow(dead_code)]

use std::sync::Arc;

use atomic::{Atomic, Ordering};
use gcscan::scanner::{CompressedSlot, ScanEnvironment, SimpleSlot, Slot};
use gcscan::util::options::Options;
use gcscan::util::{Address, ObjectReference};

pub const OBJECT_ALIGNMENT: usize = 8;

pub fn env() -> ScanEnvironment {
    let _ = gcscan::util::logger::try_init();
    ScanEnvironment::new(0, Arc::new(Options::builtin()))
}

/// The made-up address of the object held in element `index`. It is never dereferenced.
pub fn target(index: usize) -> Address {
    unsafe { Address::from_usize(0x10_0000 + (index + 1) * OBJECT_ALIGNMENT) }
}

/// An array of word-sized references, kept outside any heap. Element `i` refers to
/// `target(i)` unless it was nulled.
pub struct RefArray {
    header: Box<usize>,
    elements: Vec<Atomic<Address>>,
}

impl RefArray {
    pub fn new(length: usize) -> Self {
        Self {
            header: Box::new(0),
            elements: (0..length).map(|i| Atomic::new(target(i))).collect(),
        }
    }

    pub fn with_nulls(length: usize, is_null: impl Fn(usize) -> bool) -> Self {
        let array = Self::new(length);
        for (i, element) in array.elements.iter().enumerate() {
            if is_null(i) {
                element.store(Address::ZERO, Ordering::Relaxed);
            }
        }
        array
    }

    pub fn object(&self) -> ObjectReference {
        ObjectReference::from_raw_address(Address::from_ref(&*self.header)).unwrap()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn base(&self) -> Address {
        Address::from_ptr(self.elements.as_ptr())
    }

    pub fn element(&self, index: usize) -> Address {
        self.base() + index * SimpleSlot::BYTES_IN_SLOT
    }

    pub fn limit(&self) -> Address {
        self.element(self.len())
    }

    pub fn index_of(&self, slot: SimpleSlot) -> usize {
        (slot.as_address() - self.base()) / SimpleSlot::BYTES_IN_SLOT
    }
}

/// An array of 32-bit compressed references. Element `i` refers to `target(i)`.
pub struct CompressedRefArray {
    header: Box<usize>,
    elements: Vec<Atomic<u32>>,
}

impl CompressedRefArray {
    pub fn new(length: usize) -> Self {
        Self {
            header: Box::new(0),
            elements: (0..length)
                .map(|i| {
                    let object = ObjectReference::from_raw_address(target(i)).unwrap();
                    Atomic::new(CompressedSlot::compress(object))
                })
                .collect(),
        }
    }

    pub fn object(&self) -> ObjectReference {
        ObjectReference::from_raw_address(Address::from_ref(&*self.header)).unwrap()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn base(&self) -> Address {
        Address::from_ptr(self.elements.as_ptr())
    }

    pub fn limit(&self) -> Address {
        self.base() + self.len() * CompressedSlot::BYTES_IN_SLOT
    }

    pub fn index_of(&self, slot: CompressedSlot) -> usize {
        (slot.as_address() - self.base()) / CompressedSlot::BYTES_IN_SLOT
    }
}
