//! Object scanners.
//!
//! A collector worker traces an object by asking a scanner for the object's reference slots,
//! one bitmap-described segment at a time. [`PointerArrayScanner`]s can additionally be split,
//! so the elements of one large array are divided among several workers with every element
//! scanned exactly once.

pub mod env;
pub mod indexable;
pub mod mixed;
pub mod object_scanner;
pub mod pointer_array;
pub mod slot;

pub use self::env::{ScanEnvironment, ScanStats};
pub use self::indexable::{IndexableObjectScanner, IndexableScanState};
pub use self::mixed::MixedObjectScanner;
pub use self::object_scanner::{
    dense_scan_map, set_no_more_slots, ObjectScanner, ObjectScannerState, ScanPhase, ScanSegment,
    ScannerFlags, SlotVisitor,
};
pub use self::pointer_array::{
    CompressedReferenceArrayScanner, PointerArrayScanner, ReferenceArrayScanner,
};
pub use self::slot::{CompressedSlot, SimpleSlot, Slot};
