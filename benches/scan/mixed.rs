//! Benchmarks for scanning fixed-layout objects from their type description.

use atomic::Atomic;
use criterion::Criterion;
use gcscan::scanner::*;
use gcscan::util::constants::BITS_PER_SCAN_MAP;
use gcscan::util::options::Options;
use gcscan::util::{Address, ObjectReference};
use std::hint::black_box;
use std::sync::Arc;

const FIELDS: usize = 4 * BITS_PER_SCAN_MAP;

pub fn bench(c: &mut Criterion) {
    c.bench_function("mixed_object_scan", |b| {
        let header = Box::new(0usize);
        let fields: Vec<Atomic<Address>> = (0..FIELDS)
            .map(|i| Atomic::new(unsafe { Address::from_usize(0x10_0000 + i * 8) }))
            .collect();
        // every third field holds a reference
        let description: Vec<usize> = (0..FIELDS / BITS_PER_SCAN_MAP)
            .map(|word| {
                (0..BITS_PER_SCAN_MAP)
                    .filter(|bit| (word * BITS_PER_SCAN_MAP + bit) % 3 == 0)
                    .fold(0usize, |map, bit| map | (1 << bit))
            })
            .collect();
        let object = ObjectReference::from_raw_address(Address::from_ref(&*header)).unwrap();
        let mut env = ScanEnvironment::new(0, Arc::new(Options::builtin()));

        b.iter(|| {
            let mut scanner = MixedObjectScanner::<SimpleSlot>::new(
                &env,
                object,
                Address::from_ptr(fields.as_ptr()),
                &description,
                ScannerFlags::SCAN_HEAP,
            );
            scanner.initialize(&mut env);
            black_box(scanner.scan_slots(&mut env, &mut |_: SimpleSlot| {}));
        });
    });
}
