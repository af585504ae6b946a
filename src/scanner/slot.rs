//! Slots and the [`Slot`] trait.
//!
//! A slot is a memory location inside an object that may hold a reference. Scanners walk
//! slots, not bytes: every cursor a scanner keeps is an [`Address`], and distances between
//! cursors are counted in slots of the width declared by the slot type.

use std::fmt::Debug;
use std::hash::Hash;

use atomic::Atomic;

use crate::util::constants::{LOG_BYTES_IN_ADDRESS, LOG_BYTES_IN_COMPRESSED_SLOT};
use crate::util::{Address, ObjectReference};

/// `Slot` is how a scanner loads and updates the object reference held in one slot.
///
/// A `Slot` value *points to* a slot, and is not the slot itself. It can be copied, and the
/// copy points to the same slot.
///
/// The width of the slot (`LOG_BYTES_IN_SLOT`) decides how scanners step through an object:
/// bit `i` of a scan map describes the slot `i * BYTES_IN_SLOT` bytes past the scan pointer.
pub trait Slot: Copy + Send + Debug + PartialEq + Eq + Hash {
    /// log2 of the number of bytes in one slot.
    const LOG_BYTES_IN_SLOT: u8;
    /// The number of bytes in one slot.
    const BYTES_IN_SLOT: usize = 1 << Self::LOG_BYTES_IN_SLOT;

    /// Create a slot pointing at `address`.
    fn from_address(address: Address) -> Self;

    /// The address of the slot.
    fn as_address(&self) -> Address;

    /// Load object reference from the slot.
    ///
    /// Returns `None` if the slot holds null.
    fn load(&self) -> Option<ObjectReference>;

    /// Store the object reference `object` into the slot.
    fn store(&self, object: ObjectReference);
}

/// The number of `S` slots in `[from, to)`. `to` must not be lower than `from`.
#[inline(always)]
pub fn slots_between<S: Slot>(from: Address, to: Address) -> usize {
    (to - from) >> S::LOG_BYTES_IN_SLOT
}

/// The address `count` slots of type `S` past `addr`.
#[inline(always)]
pub fn slot_offset<S: Slot>(addr: Address, count: usize) -> Address {
    addr + (count << S::LOG_BYTES_IN_SLOT)
}

/// A word-sized slot which holds the raw address of an object, or 0 for null.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct SimpleSlot {
    slot_addr: *mut Atomic<Address>,
}

unsafe impl Send for SimpleSlot {}

impl Slot for SimpleSlot {
    const LOG_BYTES_IN_SLOT: u8 = LOG_BYTES_IN_ADDRESS;

    fn from_address(address: Address) -> Self {
        Self {
            slot_addr: address.to_mut_ptr(),
        }
    }

    fn as_address(&self) -> Address {
        Address::from_mut_ptr(self.slot_addr)
    }

    fn load(&self) -> Option<ObjectReference> {
        let addr = unsafe { (*self.slot_addr).load(atomic::Ordering::Relaxed) };
        ObjectReference::from_raw_address(addr)
    }

    fn store(&self, object: ObjectReference) {
        unsafe { (*self.slot_addr).store(object.to_raw_address(), atomic::Ordering::Relaxed) }
    }
}

/// A 32-bit slot holding a compressed reference: the object address shifted right by 3.
///
/// Heaps that use compressed references lay out reference arrays with 4-byte elements, so a
/// scan map bit covers 4 bytes instead of a word.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct CompressedSlot {
    slot_addr: *mut Atomic<u32>,
}

unsafe impl Send for CompressedSlot {}

impl CompressedSlot {
    const SHIFT: usize = 3;

    /// Compress an object address into its 32-bit slot encoding.
    pub fn compress(object: ObjectReference) -> u32 {
        let expanded = object.to_raw_address().as_usize();
        debug_assert!(
            expanded >> Self::SHIFT <= u32::MAX as usize,
            "{} is out of the compressed reference range",
            object
        );
        (expanded >> Self::SHIFT) as u32
    }
}

impl Slot for CompressedSlot {
    const LOG_BYTES_IN_SLOT: u8 = LOG_BYTES_IN_COMPRESSED_SLOT;

    fn from_address(address: Address) -> Self {
        Self {
            slot_addr: address.to_mut_ptr(),
        }
    }

    fn as_address(&self) -> Address {
        Address::from_mut_ptr(self.slot_addr)
    }

    fn load(&self) -> Option<ObjectReference> {
        let compressed = unsafe { (*self.slot_addr).load(atomic::Ordering::Relaxed) };
        let expanded = (compressed as usize) << Self::SHIFT;
        ObjectReference::from_raw_address(unsafe { Address::from_usize(expanded) })
    }

    fn store(&self, object: ObjectReference) {
        let compressed = Self::compress(object);
        unsafe { (*self.slot_addr).store(compressed, atomic::Ordering::Relaxed) }
    }
}
