//! gcscan provides the object scanners a tracing garbage collector uses to find the
//! reference slots of heap objects.
//!
//! A scanner reports an object's slots in segments of at most one machine word's worth of
//! slots, each described by a bitmap ([`scanner::ObjectScanner`]). Scanners for arrays of
//! references ([`scanner::PointerArrayScanner`]) can also be split: the unclaimed tail of an
//! array is carved off into a new scanner, built in storage supplied by the caller, so several
//! workers can scan one array in parallel.
//!
//! Scanners never allocate, block or report recoverable errors. A violated contract, such as
//! a scan range outside its array, is a bug in the caller and panics.
//!
//! ```ignore
//! let mut env = ScanEnvironment::new(0, Arc::new(Options::default()));
//! let mut space = None;
//! let scanner = ReferenceArrayScanner::new_instance(
//!     &mut env, array, base, length, &mut space, ScannerFlags::SCAN_HEAP, 1024, 0,
//! );
//! let mut tail = None;
//! if let Some(split) = scanner.split_to(&mut env, &mut tail, 1024) {
//!     // hand `split` to another worker
//! } else {
//!     scanner.scan_to_limit();
//! }
//! scanner.scan_slots(&mut env, &mut |slot: SimpleSlot| trace(slot));
//! ```

#[cfg(test)]
#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate log;

pub mod scanner;
pub mod util;
