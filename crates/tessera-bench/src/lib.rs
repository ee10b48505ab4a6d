//! Benchmark workloads for the tessera arena and stores.
//!
//! Provides deterministic inputs so runs are comparable across machines:
//!
//! - [`workload_keys`]: seeded hash-table keys with a controllable range
//! - [`workload_text`]: seeded ASCII text
//! - [`populated_table`]: a hash table pre-filled from [`workload_keys`]

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tessera_arena::Arena;
use tessera_core::{ArenaError, Ptr};
use tessera_store::HashTableStore;

/// Arena size used by every benchmark: 1 MiB.
pub const BENCH_CAPACITY: usize = 1 << 20;

/// `n` keys drawn uniformly from `[-range, range)`, seeded by `seed`.
pub fn workload_keys(n: usize, range: i32, seed: u64) -> Vec<i32> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..n).map(|_| rng.random_range(-range..range)).collect()
}

/// `len` printable ASCII characters, seeded by `seed`.
pub fn workload_text(len: usize, seed: u64) -> String {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..len).map(|_| char::from(rng.random_range(b' '..=b'~'))).collect()
}

/// A table of `buckets` buckets holding `keys`, each mapped to its index.
pub fn populated_table(arena: &mut Arena, buckets: usize, keys: &[i32]) -> Result<Ptr, ArenaError> {
    let mut tables = HashTableStore::new(arena);
    let table = tables.create_hash_table(buckets)?;
    for (i, &key) in keys.iter().enumerate() {
        tables.put(table, key, i as i32)?;
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_deterministic_and_in_range() {
        let a = workload_keys(100, 50, 42);
        let b = workload_keys(100, 50, 42);
        assert_eq!(a, b);
        assert!(a.iter().all(|k| (-50..50).contains(k)));
        assert_ne!(a, workload_keys(100, 50, 43));
    }

    #[test]
    fn text_is_printable_ascii() {
        let text = workload_text(64, 7);
        assert_eq!(text.len(), 64);
        assert!(text.bytes().all(|b| (b' '..=b'~').contains(&b)));
    }

    #[test]
    fn populated_table_fits_bench_arena() {
        let mut arena = Arena::new(BENCH_CAPACITY).unwrap();
        let keys = workload_keys(10_000, 1 << 20, 1);
        let table = populated_table(&mut arena, 1024, &keys).unwrap();
        let tables = HashTableStore::new(&mut arena);
        assert!(tables.get(table, keys[0]).unwrap().is_some());
    }
}
