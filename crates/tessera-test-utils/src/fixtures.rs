//! Builders that lay out populated structures in one call.
//!
//! Each fixture panics on failure, so a test reads as the structure it
//! wants rather than a chain of `unwrap`s.

use tessera_arena::Arena;
use tessera_core::Ptr;
use tessera_store::{ArrayStore, HashTableStore, NodeStore, VectorStore};

/// Build a list holding `values` in order. Returns the head, or
/// [`Ptr::NULL`] for an empty slice.
pub fn linked_list(arena: &mut Arena, values: &[i32]) -> Ptr {
    let mut nodes = NodeStore::new(arena);
    let mut head = Ptr::NULL;
    let mut tail = Ptr::NULL;
    for &value in values {
        let node = nodes.create_node(value).expect("list fixture out of memory");
        if tail.is_null() {
            head = node;
        } else {
            nodes.set_next(tail, node).expect("list fixture link rejected");
        }
        tail = node;
    }
    head
}

/// Build an array of 4-byte integers.
pub fn filled_array(arena: &mut Arena, values: &[i32]) -> Ptr {
    let mut arrays = ArrayStore::new(arena);
    let base = arrays
        .create_array(values.len(), 4)
        .expect("array fixture out of memory");
    for (i, &value) in values.iter().enumerate() {
        arrays.set_int(base, i, value).expect("array fixture write failed");
    }
    base
}

/// Build a vector with `initial_capacity` slots and append `values`.
pub fn filled_vector(arena: &mut Arena, initial_capacity: usize, values: &[i32]) -> Ptr {
    let mut vectors = VectorStore::new(arena);
    let vec = vectors
        .create_vector(initial_capacity)
        .expect("vector fixture out of memory");
    for &value in values {
        vectors.append(vec, value).expect("vector fixture append failed");
    }
    vec
}

/// Build a table with `bucket_count` buckets and insert `pairs` in order.
pub fn filled_table(arena: &mut Arena, bucket_count: usize, pairs: &[(i32, i32)]) -> Ptr {
    let mut tables = HashTableStore::new(arena);
    let table = tables
        .create_hash_table(bucket_count)
        .expect("table fixture out of memory");
    for &(key, value) in pairs {
        tables.put(table, key, value).expect("table fixture insert failed");
    }
    table
}
