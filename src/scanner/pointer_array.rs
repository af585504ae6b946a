//! Scanners for contiguous arrays of references.

use crate::scanner::env::ScanEnvironment;
use crate::scanner::indexable::{IndexableObjectScanner, IndexableScanState};
use crate::scanner::object_scanner::{ObjectScanner, ObjectScannerState, ScanSegment, ScannerFlags};
use crate::scanner::slot::{slot_offset, slots_between, CompressedSlot, SimpleSlot, Slot};
use crate::util::{Address, ObjectReference};

/// Scans an array whose elements are all reference slots of shape `S`, stored contiguously.
#[derive(Debug)]
pub struct PointerArrayScanner<S: Slot> {
    state: IndexableScanState<S>,
}

/// Scanner for arrays of word-sized references.
pub type ReferenceArrayScanner = PointerArrayScanner<SimpleSlot>;
/// Scanner for arrays of 32-bit compressed references.
pub type CompressedReferenceArrayScanner = PointerArrayScanner<CompressedSlot>;

impl<S: Slot> PointerArrayScanner<S> {
    /// Create a scanner for the elements `[scan_ptr, end_ptr)` of `array`, whose elements are
    /// `[base_ptr, limit_ptr)`. The scanner must be initialized before use.
    pub fn new(
        env: &ScanEnvironment,
        array: ObjectReference,
        base_ptr: Address,
        limit_ptr: Address,
        scan_ptr: Address,
        end_ptr: Address,
        flags: ScannerFlags,
    ) -> Self {
        Self {
            state: IndexableScanState::new(env, array, base_ptr, limit_ptr, scan_ptr, end_ptr, flags),
        }
    }

    /// Splitting constructor: a scanner for the `split_amount` elements that follow `source`.
    fn new_split(env: &ScanEnvironment, source: &Self, split_amount: usize) -> Self {
        Self {
            state: IndexableScanState::split_from(env, &source.state, split_amount),
        }
    }

    /// Construct and initialize, in `alloc_space`, a scanner for a fresh scan of `array`, whose
    /// `length` elements start at `base_ptr`.
    ///
    /// Scanning starts at `start_index`. The scanner claims at most `split_amount` elements and
    /// leaves the rest of the array for splitting, unless `flags` forbids splitting, in which
    /// case it claims everything to the end of the array.
    #[allow(clippy::too_many_arguments)]
    pub fn new_instance<'s>(
        env: &mut ScanEnvironment,
        array: ObjectReference,
        base_ptr: Address,
        length: usize,
        alloc_space: &'s mut Option<Self>,
        flags: ScannerFlags,
        split_amount: usize,
        start_index: usize,
    ) -> &'s mut Self {
        assert!(
            start_index <= length,
            "start index {} is out of bounds for {} of length {}",
            start_index,
            array,
            length
        );
        let limit_ptr = slot_offset::<S>(base_ptr, length);
        let scan_ptr = slot_offset::<S>(base_ptr, start_index);
        let end_ptr = if flags.contains(ScannerFlags::INDEXABLE_OBJECT_NO_SPLIT) {
            limit_ptr
        } else {
            slot_offset::<S>(scan_ptr, split_amount.min(length - start_index))
        };
        let scanner = alloc_space.insert(Self::new(
            env, array, base_ptr, limit_ptr, scan_ptr, end_ptr, flags,
        ));
        scanner.initialize(env);
        scanner
    }
}

impl<S: Slot> ObjectScanner for PointerArrayScanner<S> {
    type ScanSlot = S;

    fn state(&self) -> &ObjectScannerState<S> {
        self.state.base()
    }

    fn state_mut(&mut self) -> &mut ObjectScannerState<S> {
        self.state.base_mut()
    }

    fn initialize(&mut self, env: &mut ScanEnvironment) {
        self.state.initialize(env);
    }

    fn next_slot_map(&mut self, _env: &mut ScanEnvironment) -> Option<ScanSegment> {
        self.state.next_dense_segment()
    }
}

impl<S: Slot> IndexableObjectScanner for PointerArrayScanner<S> {
    fn indexable_state(&self) -> &IndexableScanState<S> {
        &self.state
    }

    fn indexable_state_mut(&mut self) -> &mut IndexableScanState<S> {
        &mut self.state
    }

    fn split_to<'s>(
        &self,
        env: &mut ScanEnvironment,
        alloc_space: &'s mut Option<Self>,
        split_amount: usize,
    ) -> Option<&'s mut Self> {
        assert!(
            !self.state.base().is_indexable_no_split(),
            "split requested for {}, which must be scanned by a single scanner",
            self.parent_object()
        );
        let end_ptr = self.state.end_ptr();
        let limit_ptr = self.state.limit_ptr();
        assert!(
            end_ptr <= limit_ptr,
            "end pointer {} is past limit pointer {}",
            end_ptr,
            limit_ptr
        );
        let remainder = slots_between::<S>(end_ptr, limit_ptr);
        if remainder == 0 {
            return None;
        }
        let split_amount = split_amount.min(remainder);
        debug!(
            "[{}] split {} elements [{}, {}) off {}",
            env.ordinal(),
            split_amount,
            slots_between::<S>(self.state.base_ptr(), end_ptr),
            slots_between::<S>(self.state.base_ptr(), end_ptr) + split_amount,
            self.parent_object()
        );
        let split_scanner = alloc_space.insert(Self::new_split(env, self, split_amount));
        split_scanner.initialize(env);
        let stats = env.stats_mut();
        stats.splits += 1;
        stats.elements_split += split_amount as u64;
        Some(split_scanner)
    }
}
