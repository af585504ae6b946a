//! Benchmarks for scanning and splitting reference arrays.

use atomic::Atomic;
use criterion::Criterion;
use gcscan::scanner::*;
use gcscan::util::options::Options;
use gcscan::util::{Address, ObjectReference};
use std::hint::black_box;
use std::sync::Arc;

const LENGTH: usize = 64 * 1024;
const SPLIT_AMOUNT: usize = 1024;

struct Array {
    header: Box<usize>,
    elements: Vec<Atomic<Address>>,
}

impl Array {
    /// With `Some(n)`, every `n`-th element is null.
    fn new(null_every: Option<usize>) -> Self {
        Self {
            header: Box::new(0),
            elements: (0..LENGTH)
                .map(|i| {
                    if null_every.is_some_and(|n| i % n == 0) {
                        Atomic::new(Address::ZERO)
                    } else {
                        Atomic::new(unsafe { Address::from_usize(0x10_0000 + i * 8) })
                    }
                })
                .collect(),
        }
    }

    fn object(&self) -> ObjectReference {
        ObjectReference::from_raw_address(Address::from_ref(&*self.header)).unwrap()
    }

    fn base(&self) -> Address {
        Address::from_ptr(self.elements.as_ptr())
    }

    fn scanner(&self, env: &mut ScanEnvironment, flags: ScannerFlags) -> ReferenceArrayScanner {
        let mut space = None;
        ReferenceArrayScanner::new_instance(
            env,
            self.object(),
            self.base(),
            LENGTH,
            &mut space,
            flags,
            SPLIT_AMOUNT,
            0,
        );
        space.take().unwrap()
    }
}

fn env() -> ScanEnvironment {
    ScanEnvironment::new(0, Arc::new(Options::builtin()))
}

pub fn bench(c: &mut Criterion) {
    c.bench_function("array_scan_whole", |b| {
        let array = Array::new(None);
        let mut env = env();
        let flags = ScannerFlags::SCAN_HEAP | ScannerFlags::INDEXABLE_OBJECT_NO_SPLIT;
        // no element may be null, or this measures the sparse case
        let reported = array
            .scanner(&mut env, flags)
            .scan_slots(&mut env, &mut |_: SimpleSlot| {});
        assert_eq!(reported, LENGTH);
        b.iter(|| {
            let mut scanner = array.scanner(&mut env, flags);
            let mut checksum = 0usize;
            scanner.scan_slots(&mut env, &mut |slot: SimpleSlot| {
                checksum ^= slot.as_address().as_usize();
            });
            black_box(checksum);
        });
    });

    c.bench_function("array_scan_sparse", |b| {
        let array = Array::new(Some(2));
        let mut env = env();
        b.iter(|| {
            let mut scanner = array.scanner(
                &mut env,
                ScannerFlags::SCAN_HEAP | ScannerFlags::INDEXABLE_OBJECT_NO_SPLIT,
            );
            black_box(scanner.scan_slots(&mut env, &mut |_: SimpleSlot| {}));
        });
    });

    c.bench_function("array_split_and_scan", |b| {
        let array = Array::new(None);
        let mut env = env();
        b.iter(|| {
            let mut scanner = array.scanner(
                &mut env,
                ScannerFlags::SCAN_HEAP | ScannerFlags::HEAD_OBJECT_SCANNER,
            );
            let mut reported = 0;
            loop {
                let mut next = None;
                scanner.split_to(&mut env, &mut next, SPLIT_AMOUNT);
                reported += scanner.scan_slots(&mut env, &mut |_: SimpleSlot| {});
                match next.take() {
                    Some(tail) => scanner = tail,
                    None => break,
                }
            }
            black_box(reported);
        });
    });
}
