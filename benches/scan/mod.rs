pub mod array;
pub mod mixed;

pub use criterion::Criterion;

pub fn bench(c: &mut Criterion) {
    array::bench(c);
    mixed::bench(c);
}
