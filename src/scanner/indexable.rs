//! Scanning indexable (array-like) objects.
//!
//! An indexable scanner walks the elements `[scan_ptr, end_ptr)` of an array whose elements
//! live in `[base_ptr, limit_ptr)`. Every element in the scanned range is a reference slot, so
//! scan maps are always dense. The range `[end_ptr, limit_ptr)` is not claimed by the scanner:
//! it can be handed to another scanner with [`IndexableObjectScanner::split_to`], or absorbed
//! with [`IndexableObjectScanner::scan_to_limit`].
//!
//! All of these hold after construction and after every split:
//!
//! ```text
//! base_ptr <= scan_ptr <= end_ptr <= limit_ptr
//! ```

use crate::scanner::env::ScanEnvironment;
use crate::scanner::object_scanner::{
    dense_scan_map, set_no_more_slots, ObjectScanner, ObjectScannerState, ScanSegment,
    ScannerFlags,
};
use crate::scanner::slot::{slot_offset, slots_between, Slot};
use crate::util::constants::BITS_PER_SCAN_MAP;
use crate::util::{Address, ObjectReference};

/// State of an indexable scanner, on top of [`ObjectScannerState`].
#[derive(Debug)]
pub struct IndexableScanState<S: Slot> {
    base: ObjectScannerState<S>,
    /// First slot of the current segment.
    map_ptr: Address,
    /// End of the last array element in this scanner's range.
    end_ptr: Address,
    /// The first array element.
    base_ptr: Address,
    /// End of the last array element.
    limit_ptr: Address,
}

impl<S: Slot> IndexableScanState<S> {
    /// Create the state for scanning the elements `[scan_ptr, end_ptr)` of the array whose
    /// elements are `[base_ptr, limit_ptr)`.
    pub fn new(
        env: &ScanEnvironment,
        array: ObjectReference,
        base_ptr: Address,
        limit_ptr: Address,
        scan_ptr: Address,
        end_ptr: Address,
        flags: ScannerFlags,
    ) -> Self {
        assert!(
            scan_ptr <= end_ptr,
            "scan pointer {} is past end pointer {} for {}",
            scan_ptr,
            end_ptr,
            array
        );
        let segment_length = slots_between::<S>(scan_ptr, end_ptr);
        let flags = set_no_more_slots(
            flags | ScannerFlags::INDEXABLE_OBJECT,
            segment_length <= BITS_PER_SCAN_MAP,
        );
        Self {
            base: ObjectScannerState::new(
                env,
                array,
                scan_ptr,
                dense_scan_map(segment_length),
                flags,
            ),
            map_ptr: scan_ptr,
            end_ptr,
            base_ptr,
            limit_ptr,
        }
    }

    /// Create the state for the `split_amount` elements that follow `source`'s end pointer.
    ///
    /// `source` is not changed. The caller must make sure `source` does not go on to claim
    /// those elements itself.
    pub fn split_from(env: &ScanEnvironment, source: &Self, split_amount: usize) -> Self {
        assert!(
            0 <= split_amount as isize,
            "negative split amount {} for {}",
            split_amount as isize,
            source.base.parent_object()
        );
        let scan_ptr = source.end_ptr;
        // the split-off tail never starts at element 0
        let flags = set_no_more_slots(
            source.base.flags() - ScannerFlags::HEAD_OBJECT_SCANNER,
            split_amount <= BITS_PER_SCAN_MAP,
        );
        Self {
            base: ObjectScannerState::new(
                env,
                source.base.parent_object(),
                scan_ptr,
                dense_scan_map(split_amount),
                flags,
            ),
            map_ptr: scan_ptr,
            end_ptr: slot_offset::<S>(scan_ptr, split_amount),
            base_ptr: source.base_ptr,
            limit_ptr: source.limit_ptr,
        }
    }

    /// Check the pointer ordering, then set up the scanner.
    pub fn initialize(&mut self, env: &mut ScanEnvironment) {
        assert!(
            self.base_ptr <= self.base.scan_ptr(),
            "base pointer {} is past scan pointer {}",
            self.base_ptr,
            self.base.scan_ptr()
        );
        assert!(
            self.base.scan_ptr() <= self.end_ptr,
            "scan pointer {} is past end pointer {}",
            self.base.scan_ptr(),
            self.end_ptr
        );
        assert!(
            self.end_ptr <= self.limit_ptr,
            "end pointer {} is past limit pointer {}",
            self.end_ptr,
            self.limit_ptr
        );
        self.base.initialize(env);
    }

    pub fn base(&self) -> &ObjectScannerState<S> {
        &self.base
    }

    pub fn base_mut(&mut self) -> &mut ObjectScannerState<S> {
        &mut self.base
    }

    pub fn base_ptr(&self) -> Address {
        self.base_ptr
    }

    pub fn limit_ptr(&self) -> Address {
        self.limit_ptr
    }

    pub fn end_ptr(&self) -> Address {
        self.end_ptr
    }

    /// The number of elements in the whole array. Array indices are zero-based.
    pub fn indexable_range(&self) -> usize {
        slots_between::<S>(self.base_ptr, self.limit_ptr)
    }

    /// Zero-based index of the element at the scan pointer.
    pub fn scan_index(&self) -> usize {
        slots_between::<S>(self.base_ptr, self.base.scan_ptr())
    }

    /// Elements in `[scan_ptr, end_ptr)`, which this scanner has claimed but not consumed.
    pub fn remaining_elements(&self) -> usize {
        slots_between::<S>(self.base.scan_ptr(), self.end_ptr)
    }

    /// Elements in `[end_ptr, limit_ptr)`, which no scanner derived from this one has claimed.
    pub fn unclaimed_elements(&self) -> usize {
        slots_between::<S>(self.end_ptr, self.limit_ptr)
    }

    /// Extend the scan to the end of the array. This must be called if this scanner cannot be
    /// split to hive off the tail.
    pub fn scan_to_limit(&mut self) {
        self.set_end(self.limit_ptr);
    }

    /// Shrink the scan so that it ends at `end_ptr`. The elements past `end_ptr` are left to
    /// other scanners.
    pub fn truncate_to(&mut self, end_ptr: Address) {
        assert!(
            self.base.scan_ptr() <= end_ptr && end_ptr <= self.end_ptr,
            "cannot truncate [{}, {}) to end at {}",
            self.base.scan_ptr(),
            self.end_ptr,
            end_ptr
        );
        self.set_end(end_ptr);
    }

    // Changing the end pointer re-derives the current segment from the scan pointer, so the
    // current map and NO_MORE_SLOTS agree with the new range.
    fn set_end(&mut self, end_ptr: Address) {
        self.end_ptr = end_ptr;
        let scan_ptr = self.base.scan_ptr();
        let remaining = slots_between::<S>(scan_ptr, end_ptr);
        self.map_ptr = scan_ptr;
        self.base
            .reset_segment(scan_ptr, dense_scan_map(remaining), remaining <= BITS_PER_SCAN_MAP);
    }

    /// The dense segment that follows the current one.
    pub fn next_dense_segment(&mut self) -> Option<ScanSegment> {
        let next = slot_offset::<S>(self.map_ptr, BITS_PER_SCAN_MAP);
        if next >= self.end_ptr {
            return None;
        }
        let remaining = slots_between::<S>(next, self.end_ptr);
        self.map_ptr = next;
        let segment = ScanSegment {
            base: next,
            map: dense_scan_map(remaining),
            has_next: remaining > BITS_PER_SCAN_MAP,
        };
        #[cfg(feature = "extreme_assertions")]
        {
            let meaningful = remaining.min(BITS_PER_SCAN_MAP);
            assert_eq!(segment.map.count_ones() as usize, meaningful);
            assert_eq!(segment.map.trailing_ones() as usize, meaningful);
        }
        Some(segment)
    }
}

/// A scanner for an indexable object, which can be split to let several workers scan
/// disjoint parts of the same array.
///
/// Concrete scanners differ in how array elements map to slots.
pub trait IndexableObjectScanner: ObjectScanner + Sized {
    fn indexable_state(&self) -> &IndexableScanState<Self::ScanSlot>;

    fn indexable_state_mut(&mut self) -> &mut IndexableScanState<Self::ScanSlot>;

    /// Split this instance: construct, in `alloc_space`, a scanner for at most `split_amount`
    /// elements of the unclaimed tail that starts at this scanner's end pointer, and return it.
    ///
    /// Returns `None` if there is no unclaimed tail. This scanner's own range is unchanged.
    fn split_to<'s>(
        &self,
        env: &mut ScanEnvironment,
        alloc_space: &'s mut Option<Self>,
        split_amount: usize,
    ) -> Option<&'s mut Self>;

    /// The number of elements in the whole array.
    fn indexable_range(&self) -> usize {
        self.indexable_state().indexable_range()
    }

    /// Extend the scan to the end of the array.
    fn scan_to_limit(&mut self) {
        self.indexable_state_mut().scan_to_limit()
    }

    /// Shrink the scan to end at `end_ptr`.
    fn truncate_to(&mut self, end_ptr: Address) {
        self.indexable_state_mut().truncate_to(end_ptr)
    }

    fn base_ptr(&self) -> Address {
        self.indexable_state().base_ptr()
    }

    fn limit_ptr(&self) -> Address {
        self.indexable_state().limit_ptr()
    }

    fn end_ptr(&self) -> Address {
        self.indexable_state().end_ptr()
    }

    /// Zero-based index of the element at the scan pointer.
    fn scan_index(&self) -> usize {
        self.indexable_state().scan_index()
    }

    fn unclaimed_elements(&self) -> usize {
        self.indexable_state().unclaimed_elements()
    }

    fn remaining_elements(&self) -> usize {
        self.indexable_state().remaining_elements()
    }
}
