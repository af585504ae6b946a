//! Scanner for fixed-layout objects whose reference fields are given by a type description.

use crate::scanner::env::ScanEnvironment;
use crate::scanner::object_scanner::{
    set_no_more_slots, ObjectScanner, ObjectScannerState, ScanSegment, ScannerFlags,
};
use crate::scanner::slot::{slot_offset, Slot};
use crate::util::constants::BITS_PER_SCAN_MAP;
use crate::util::{Address, ObjectReference};

/// Scans an object whose slots start at `fields_start` and whose reference slots are marked in
/// `description`: bit `j` of word `i` describes slot `i * W + j`.
pub struct MixedObjectScanner<'d, S: Slot> {
    state: ObjectScannerState<S>,
    map_ptr: Address,
    description: &'d [usize],
    next_word: usize,
}

impl<'d, S: Slot> MixedObjectScanner<'d, S> {
    pub fn new(
        env: &ScanEnvironment,
        object: ObjectReference,
        fields_start: Address,
        description: &'d [usize],
        flags: ScannerFlags,
    ) -> Self {
        assert!(
            !flags.contains(ScannerFlags::INDEXABLE_OBJECT),
            "{} is indexable and needs an indexable scanner",
            object
        );
        let first = description.first().copied().unwrap_or(0);
        let flags = set_no_more_slots(
            flags | ScannerFlags::HEAD_OBJECT_SCANNER,
            description.len() <= 1,
        );
        Self {
            state: ObjectScannerState::new(env, object, fields_start, first, flags),
            map_ptr: fields_start,
            description,
            next_word: 1,
        }
    }
}

impl<'d, S: Slot> ObjectScanner for MixedObjectScanner<'d, S> {
    type ScanSlot = S;

    fn state(&self) -> &ObjectScannerState<S> {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ObjectScannerState<S> {
        &mut self.state
    }

    fn next_slot_map(&mut self, _env: &mut ScanEnvironment) -> Option<ScanSegment> {
        let map = *self.description.get(self.next_word)?;
        self.map_ptr = slot_offset::<S>(self.map_ptr, BITS_PER_SCAN_MAP);
        self.next_word += 1;
        Some(ScanSegment {
            base: self.map_ptr,
            map,
            has_next: self.next_word < self.description.len(),
        })
    }
}
