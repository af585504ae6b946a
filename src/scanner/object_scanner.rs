//! The segmented slot scanner.
//!
//! An object scanner reports the reference slots of one object a segment at a time. A
//! segment covers at most [`BITS_PER_SCAN_MAP`] consecutive slots starting at the scan
//! pointer, and is described by a scan map: bit `i` is set if slot `i` of the segment may hold
//! a reference. Bits above the segment's length are always zero.
//!
//! The shared state lives in [`ObjectScannerState`]. Each object layout provides
//! [`ObjectScanner::next_slot_map`] to describe the segment that follows the current one.

use std::marker::PhantomData;

use crate::scanner::env::ScanEnvironment;
use crate::scanner::slot::{slot_offset, Slot};
use crate::util::constants::{BITS_PER_SCAN_MAP, FULL_SCAN_MAP};
use crate::util::{Address, ObjectReference};

bitflags::bitflags! {
    /// Scanning context flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ScannerFlags: usize {
        /// The object is being scanned as a root.
        const SCAN_ROOTS = 1 << 0;
        /// The object is being scanned as part of the heap closure.
        const SCAN_HEAP = 1 << 1;
        /// The object is an indexable (array-like) object.
        const INDEXABLE_OBJECT = 1 << 2;
        /// The indexable object must be scanned by a single scanner.
        const INDEXABLE_OBJECT_NO_SPLIT = 1 << 3;
        /// The scanner covers the start of the object, so the object itself is processed with it.
        const HEAD_OBJECT_SCANNER = 1 << 4;
        /// The current segment is the last one.
        const NO_MORE_SLOTS = 1 << 5;
    }
}

/// Set or clear [`ScannerFlags::NO_MORE_SLOTS`] in `flags`.
#[inline(always)]
pub fn set_no_more_slots(flags: ScannerFlags, no_more_slots: bool) -> ScannerFlags {
    let mut flags = flags;
    flags.set(ScannerFlags::NO_MORE_SLOTS, no_more_slots);
    flags
}

/// The scan map for `slots` consecutive reference slots: the low `min(slots, W)` bits set.
#[inline(always)]
pub const fn dense_scan_map(slots: usize) -> usize {
    if slots < BITS_PER_SCAN_MAP {
        (1usize << slots) - 1
    } else {
        FULL_SCAN_MAP
    }
}

/// Where a scanner is in its lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanPhase {
    /// More segments follow the current one.
    Active,
    /// The current segment is the last one.
    LastSegment,
    /// Every slot has been consumed.
    Exhausted,
}

/// A segment handed out by [`ObjectScanner::next_slot_map`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanSegment {
    /// Address of the first slot of the segment.
    pub base: Address,
    /// One bit per slot from `base`.
    pub map: usize,
    /// Whether another segment follows this one.
    pub has_next: bool,
}

/// State shared by all object scanners.
#[derive(Debug)]
pub struct ObjectScannerState<S: Slot> {
    parent: ObjectReference,
    scan_ptr: Address,
    scan_map: usize,
    flags: ScannerFlags,
    exhausted: bool,
    _slot: PhantomData<S>,
}

impl<S: Slot> ObjectScannerState<S> {
    /// Create the state for scanning `parent`, with its first segment at `scan_ptr` described
    /// by `scan_map`. An empty last segment starts out exhausted.
    pub fn new(
        _env: &ScanEnvironment,
        parent: ObjectReference,
        scan_ptr: Address,
        scan_map: usize,
        flags: ScannerFlags,
    ) -> Self {
        Self {
            parent,
            scan_ptr,
            scan_map,
            flags,
            exhausted: scan_map == 0 && flags.contains(ScannerFlags::NO_MORE_SLOTS),
            _slot: PhantomData,
        }
    }

    /// First-use setup. Counts the scanner and its first segment.
    pub fn initialize(&mut self, env: &mut ScanEnvironment) {
        trace!(
            "[{}] scanner for {} at {} (map {:#x}, {:?})",
            env.ordinal(),
            self.parent,
            self.scan_ptr,
            self.scan_map,
            self.flags
        );
        let stats = env.stats_mut();
        stats.scanners_initialized += 1;
        stats.segments += 1;
    }

    pub fn parent_object(&self) -> ObjectReference {
        self.parent
    }

    /// Address of the first slot not yet processed.
    pub fn scan_ptr(&self) -> Address {
        self.scan_ptr
    }

    /// The unconsumed part of the current segment's map, aligned so that bit 0 describes the
    /// slot at [`Self::scan_ptr`].
    pub fn scan_map(&self) -> usize {
        self.scan_map
    }

    pub fn flags(&self) -> ScannerFlags {
        self.flags
    }

    pub fn has_more_segments(&self) -> bool {
        !self.flags.contains(ScannerFlags::NO_MORE_SLOTS)
    }

    pub fn is_indexable(&self) -> bool {
        self.flags.contains(ScannerFlags::INDEXABLE_OBJECT)
    }

    pub fn is_indexable_no_split(&self) -> bool {
        self.flags.contains(ScannerFlags::INDEXABLE_OBJECT_NO_SPLIT)
    }

    pub fn is_head_object_scanner(&self) -> bool {
        self.flags.contains(ScannerFlags::HEAD_OBJECT_SCANNER)
    }

    pub fn is_root_scan(&self) -> bool {
        self.flags.contains(ScannerFlags::SCAN_ROOTS)
    }

    pub fn is_heap_scan(&self) -> bool {
        self.flags.contains(ScannerFlags::SCAN_HEAP)
    }

    pub fn phase(&self) -> ScanPhase {
        if self.exhausted {
            ScanPhase::Exhausted
        } else if self.has_more_segments() {
            ScanPhase::Active
        } else {
            ScanPhase::LastSegment
        }
    }

    /// Replace the current segment. Used by layouts that re-derive their segment after their
    /// bounds change. A scanner given an empty last segment is exhausted.
    pub(crate) fn reset_segment(&mut self, scan_ptr: Address, scan_map: usize, no_more_slots: bool) {
        self.scan_ptr = scan_ptr;
        self.scan_map = scan_map;
        self.flags = set_no_more_slots(self.flags, no_more_slots);
        self.exhausted = scan_map == 0 && no_more_slots;
    }

    fn begin_segment(&mut self, env: &mut ScanEnvironment, segment: ScanSegment) {
        if env.options().trace_segments {
            trace!(
                "[{}] next segment of {} at {} (map {:#x}, has_next {})",
                env.ordinal(),
                self.parent,
                segment.base,
                segment.map,
                segment.has_next
            );
        }
        env.stats_mut().segments += 1;
        self.reset_segment(segment.base, segment.map, !segment.has_next);
    }

    /// Consume slots of the current map up to and including the next one that holds a
    /// reference.
    fn next_slot_in_map(&mut self) -> Option<S> {
        while self.scan_map != 0 {
            let slot = S::from_address(self.scan_ptr);
            let mapped = self.scan_map & 1 != 0;
            self.scan_ptr = slot_offset::<S>(self.scan_ptr, 1);
            self.scan_map >>= 1;
            if mapped && slot.load().is_some() {
                return Some(slot);
            }
        }
        None
    }
}

/// Callback trait of scanning functions that report slots.
pub trait SlotVisitor<SL: Slot> {
    /// Call this function for each slot.
    fn visit_slot(&mut self, slot: SL);
}

/// This lets us use closures as SlotVisitor.
impl<SL: Slot, F: FnMut(SL)> SlotVisitor<SL> for F {
    fn visit_slot(&mut self, slot: SL) {
        self(slot)
    }
}

/// An object scanner. Concrete scanners describe how their object's slots map to segments.
pub trait ObjectScanner {
    /// The shape of the slots this scanner reports.
    type ScanSlot: Slot;

    fn state(&self) -> &ObjectScannerState<Self::ScanSlot>;

    fn state_mut(&mut self) -> &mut ObjectScannerState<Self::ScanSlot>;

    /// Describe the segment following the current one, or return `None` if there is none.
    ///
    /// This is only called after the current segment's map is consumed and the scanner still
    /// has more segments.
    fn next_slot_map(&mut self, env: &mut ScanEnvironment) -> Option<ScanSegment>;

    /// Set up the scanner before its first use.
    fn initialize(&mut self, env: &mut ScanEnvironment) {
        self.state_mut().initialize(env);
    }

    fn parent_object(&self) -> ObjectReference {
        self.state().parent_object()
    }

    fn scan_ptr(&self) -> Address {
        self.state().scan_ptr()
    }

    fn scan_map(&self) -> usize {
        self.state().scan_map()
    }

    fn has_more_segments(&self) -> bool {
        self.state().has_more_segments()
    }

    fn flags(&self) -> ScannerFlags {
        self.state().flags()
    }

    fn phase(&self) -> ScanPhase {
        self.state().phase()
    }

    /// Return the next slot that holds a reference, fetching further segments as needed.
    /// Mapped slots that hold null are skipped. Returns `None` once the scanner is exhausted.
    fn next_slot(&mut self, env: &mut ScanEnvironment) -> Option<Self::ScanSlot> {
        loop {
            if self.state().exhausted {
                return None;
            }
            if let Some(slot) = self.state_mut().next_slot_in_map() {
                env.stats_mut().slots_reported += 1;
                return Some(slot);
            }
            let next = if self.state().has_more_segments() {
                self.next_slot_map(env)
            } else {
                None
            };
            match next {
                Some(segment) => self.state_mut().begin_segment(env, segment),
                None => self.state_mut().exhausted = true,
            }
        }
    }

    /// Report every remaining reference slot to `visitor`. Returns the number of slots reported.
    fn scan_slots<V: SlotVisitor<Self::ScanSlot>>(
        &mut self,
        env: &mut ScanEnvironment,
        visitor: &mut V,
    ) -> usize {
        let mut reported = 0;
        while let Some(slot) = self.next_slot(env) {
            visitor.visit_slot(slot);
            reported += 1;
        }
        reported
    }
}
