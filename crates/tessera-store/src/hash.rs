//! Integer-keyed hash tables with separate chaining.
//!
//! A table is a bucket count followed by one head pointer per bucket.
//! Entries are 12-byte records allocated one at a time and pushed onto
//! the front of their bucket's chain. The bucket count is fixed for the
//! table's lifetime; there is no rehashing.

use smallvec::SmallVec;
use tessera_arena::Arena;
use tessera_core::{ArenaError, Ptr};
use tracing::{debug, trace};

use crate::layout::{self, hash, ChainGuard};

/// Key/value pairs of one bucket, in chain order.
pub type Chain = SmallVec<[(i32, i32); 4]>;

/// Where a key sits in its bucket chain.
struct Slot {
    /// Address of the bucket's head pointer.
    head: Ptr,
    /// Entry whose `next` points at the match, if the match is not first.
    prev: Option<Ptr>,
    /// The matching entry, if any.
    entry: Option<Ptr>,
}

/// Creates hash tables and performs map operations on them.
pub struct HashTableStore<'a> {
    arena: &'a mut Arena,
}

impl<'a> HashTableStore<'a> {
    /// Wrap `arena` for hash table operations.
    pub fn new(arena: &'a mut Arena) -> Self {
        Self { arena }
    }

    /// The underlying arena.
    pub fn arena(&self) -> &Arena {
        self.arena
    }

    /// Allocate a table with `bucket_count` empty buckets.
    pub fn create_hash_table(&mut self, bucket_count: usize) -> Result<Ptr, ArenaError> {
        if bucket_count == 0 {
            return Err(ArenaError::InvalidConfig {
                reason: "hash table needs at least one bucket".to_string(),
            });
        }
        let header = layout::header_count(bucket_count, "bucket count")?;
        let heads = bucket_count
            .checked_mul(Ptr::WIDTH as usize)
            .ok_or_else(|| ArenaError::InvalidConfig {
                reason: format!("{bucket_count} buckets overflow"),
            })?;
        let table = self.arena.alloc(heads.saturating_add(hash::BUCKETS as usize))?;
        self.arena.put_int(table, header)?;
        // Every head starts as Ptr::NULL, i.e. all bits set.
        self.arena.fill(layout::field(self.arena, table, hash::BUCKETS)?, heads, 0xFF)?;
        trace!(table = %table, bucket_count, "hash table created");
        Ok(table)
    }

    /// Number of buckets.
    pub fn bucket_count(&self, table: Ptr) -> Result<usize, ArenaError> {
        let count = layout::read_count(self.arena, table, hash::BUCKET_COUNT, hash::BUCKETS)?;
        if count == 0 {
            return Err(ArenaError::InvalidPointer {
                pointer: table,
                record_size: hash::BUCKETS,
            });
        }
        Ok(count)
    }

    /// Bucket that `key` hashes to: `key mod bucket_count`, never negative.
    pub fn bucket_index(&self, table: Ptr, key: i32) -> Result<usize, ArenaError> {
        let count = self.bucket_count(table)?;
        // `count` came from a non-negative i32 header.
        Ok(i64::from(key).rem_euclid(count as i64) as usize)
    }

    /// Insert `key`, or overwrite its value in place if present.
    pub fn put(&mut self, table: Ptr, key: i32, value: i32) -> Result<(), ArenaError> {
        let slot = self.locate(table, key)?;
        if let Some(entry) = slot.entry {
            return self.arena.put_int(layout::field(self.arena, entry, hash::VALUE)?, value);
        }
        let old_head = self.arena.get_ptr(slot.head)?;
        let entry = self.arena.alloc(hash::ENTRY_SIZE as usize)?;
        self.arena.put_int(layout::field(self.arena, entry, hash::KEY)?, key)?;
        self.arena.put_int(layout::field(self.arena, entry, hash::VALUE)?, value)?;
        self.arena.put_ptr(layout::field(self.arena, entry, hash::NEXT)?, old_head)?;
        self.arena.put_ptr(slot.head, entry)?;
        trace!(table = %table, key, %entry, "hash entry inserted");
        Ok(())
    }

    /// Value stored under `key`, or `None` if absent.
    pub fn get(&self, table: Ptr, key: i32) -> Result<Option<i32>, ArenaError> {
        match self.locate(table, key)?.entry {
            Some(entry) => self
                .arena
                .get_int(layout::field(self.arena, entry, hash::VALUE)?)
                .map(Some),
            None => Ok(None),
        }
    }

    /// Whether `key` is present.
    pub fn contains(&self, table: Ptr, key: i32) -> Result<bool, ArenaError> {
        Ok(self.locate(table, key)?.entry.is_some())
    }

    /// Unlink `key` from its chain. Returns whether it was present.
    ///
    /// The entry's bytes stay allocated.
    pub fn remove(&mut self, table: Ptr, key: i32) -> Result<bool, ArenaError> {
        let slot = self.locate(table, key)?;
        let Some(entry) = slot.entry else {
            return Ok(false);
        };
        let next = self.arena.get_ptr(layout::field(self.arena, entry, hash::NEXT)?)?;
        let link = match slot.prev {
            Some(prev) => layout::field(self.arena, prev, hash::NEXT)?,
            None => slot.head,
        };
        self.arena.put_ptr(link, next)?;
        debug!(table = %table, key, %entry, "hash entry removed");
        Ok(true)
    }

    /// Total number of entries across all buckets.
    pub fn len(&self, table: Ptr) -> Result<usize, ArenaError> {
        let mut total = 0;
        for bucket in 0..self.bucket_count(table)? {
            total += self.bucket_chain(table, bucket)?.len();
        }
        Ok(total)
    }

    /// Whether the table holds no entries.
    pub fn is_empty(&self, table: Ptr) -> Result<bool, ArenaError> {
        for bucket in 0..self.bucket_count(table)? {
            if !self.arena.get_ptr(self.head_addr(table, bucket)?)?.is_null() {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Key/value pairs of `bucket`, most recently inserted first.
    pub fn bucket_chain(&self, table: Ptr, bucket: usize) -> Result<Chain, ArenaError> {
        let length = self.bucket_count(table)?;
        if bucket >= length {
            return Err(ArenaError::IndexOutOfRange {
                index: bucket,
                length,
            });
        }
        let mut chain = Chain::new();
        let mut guard = ChainGuard::new(self.arena, hash::ENTRY_SIZE);
        let mut cursor = self.arena.get_ptr(self.head_addr(table, bucket)?)?;
        while !cursor.is_null() {
            guard.visit(self.arena, cursor)?;
            let (key, value, next) = self.read_entry(cursor)?;
            chain.push((key, value));
            cursor = next;
        }
        Ok(chain)
    }

    /// Every key/value pair, bucket by bucket.
    pub fn entries(&self, table: Ptr) -> Result<Vec<(i32, i32)>, ArenaError> {
        let mut out = Vec::new();
        for bucket in 0..self.bucket_count(table)? {
            out.extend(self.bucket_chain(table, bucket)?);
        }
        Ok(out)
    }

    fn head_addr(&self, table: Ptr, bucket: usize) -> Result<Ptr, ArenaError> {
        layout::element(self.arena, table, hash::BUCKETS, bucket, Ptr::WIDTH)
    }

    fn read_entry(&self, entry: Ptr) -> Result<(i32, i32, Ptr), ArenaError> {
        Ok((
            self.arena.get_int(layout::field(self.arena, entry, hash::KEY)?)?,
            self.arena.get_int(layout::field(self.arena, entry, hash::VALUE)?)?,
            self.arena.get_ptr(layout::field(self.arena, entry, hash::NEXT)?)?,
        ))
    }

    fn locate(&self, table: Ptr, key: i32) -> Result<Slot, ArenaError> {
        let head = self.head_addr(table, self.bucket_index(table, key)?)?;
        let mut guard = ChainGuard::new(self.arena, hash::ENTRY_SIZE);
        let mut prev = None;
        let mut cursor = self.arena.get_ptr(head)?;
        while !cursor.is_null() {
            guard.visit(self.arena, cursor)?;
            let (entry_key, _, next) = self.read_entry(cursor)?;
            if entry_key == key {
                return Ok(Slot {
                    head,
                    prev,
                    entry: Some(cursor),
                });
            }
            prev = Some(cursor);
            cursor = next;
        }
        Ok(Slot {
            head,
            prev,
            entry: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arena() -> Arena {
        Arena::new(1024).unwrap()
    }

    #[test]
    fn create_table_layout() {
        let mut a = arena();
        let mut tables = HashTableStore::new(&mut a);
        let t = tables.create_hash_table(2).unwrap();
        assert_eq!(tables.bucket_count(t).unwrap(), 2);
        assert!(tables.is_empty(t).unwrap());
        assert_eq!(
            tables.arena().bytes(),
            &[0, 0, 0, 2, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF]
        );
    }

    #[test]
    fn put_and_get() {
        let mut a = arena();
        let mut tables = HashTableStore::new(&mut a);
        let t = tables.create_hash_table(8).unwrap();
        tables.put(t, 1, 100).unwrap();
        tables.put(t, 2, 200).unwrap();
        assert_eq!(tables.get(t, 1).unwrap(), Some(100));
        assert_eq!(tables.get(t, 2).unwrap(), Some(200));
        assert_eq!(tables.get(t, 3).unwrap(), None);
        assert!(tables.contains(t, 1).unwrap());
        assert!(!tables.contains(t, 3).unwrap());
        assert_eq!(tables.len(t).unwrap(), 2);
    }

    #[test]
    fn colliding_keys_chain_lifo() {
        let mut a = arena();
        let mut tables = HashTableStore::new(&mut a);
        let t = tables.create_hash_table(8).unwrap();
        tables.put(t, 10, 1).unwrap();
        tables.put(t, 18, 2).unwrap();
        assert_eq!(tables.bucket_index(t, 10).unwrap(), 2);
        assert_eq!(tables.bucket_index(t, 18).unwrap(), 2);
        assert_eq!(tables.bucket_chain(t, 2).unwrap().as_slice(), &[(18, 2), (10, 1)]);
        assert_eq!(tables.get(t, 10).unwrap(), Some(1));
        assert_eq!(tables.get(t, 18).unwrap(), Some(2));
    }

    #[test]
    fn update_keeps_position_and_allocates_nothing() {
        let mut a = arena();
        let mut tables = HashTableStore::new(&mut a);
        let t = tables.create_hash_table(8).unwrap();
        tables.put(t, 10, 1).unwrap();
        tables.put(t, 18, 2).unwrap();
        let used = tables.arena().used();
        tables.put(t, 10, 99).unwrap();
        assert_eq!(tables.arena().used(), used);
        assert_eq!(tables.bucket_chain(t, 2).unwrap().as_slice(), &[(18, 2), (10, 99)]);
    }

    #[test]
    fn remove_head_middle_and_tail() {
        let mut a = arena();
        let mut tables = HashTableStore::new(&mut a);
        let t = tables.create_hash_table(8).unwrap();
        for key in [2, 10, 18, 26] {
            tables.put(t, key, key * 10).unwrap();
        }
        // Chain: 26, 18, 10, 2
        assert!(tables.remove(t, 18).unwrap());
        assert_eq!(
            tables.bucket_chain(t, 2).unwrap().as_slice(),
            &[(26, 260), (10, 100), (2, 20)]
        );
        assert!(tables.remove(t, 26).unwrap());
        assert!(tables.remove(t, 2).unwrap());
        assert_eq!(tables.bucket_chain(t, 2).unwrap().as_slice(), &[(10, 100)]);
        assert!(!tables.remove(t, 2).unwrap());
        assert_eq!(tables.get(t, 10).unwrap(), Some(100));
        assert!(tables.remove(t, 10).unwrap());
        assert!(tables.is_empty(t).unwrap());
    }

    #[test]
    fn negative_keys_hash_into_range() {
        let mut a = arena();
        let mut tables = HashTableStore::new(&mut a);
        let t = tables.create_hash_table(8).unwrap();
        assert_eq!(tables.bucket_index(t, -1).unwrap(), 7);
        assert_eq!(tables.bucket_index(t, i32::MIN).unwrap(), 0);
        tables.put(t, -1, 5).unwrap();
        tables.put(t, i32::MIN, 6).unwrap();
        assert_eq!(tables.get(t, -1).unwrap(), Some(5));
        assert_eq!(tables.get(t, i32::MIN).unwrap(), Some(6));
    }

    #[test]
    fn zero_buckets_rejected() {
        let mut a = arena();
        let mut tables = HashTableStore::new(&mut a);
        assert!(matches!(
            tables.create_hash_table(0),
            Err(ArenaError::InvalidConfig { .. })
        ));
        assert_eq!(tables.arena().used(), 0);
    }

    #[test]
    fn bucket_chain_index_checked() {
        let mut a = arena();
        let mut tables = HashTableStore::new(&mut a);
        let t = tables.create_hash_table(4).unwrap();
        assert_eq!(
            tables.bucket_chain(t, 4),
            Err(ArenaError::IndexOutOfRange {
                index: 4,
                length: 4
            })
        );
    }

    #[test]
    fn entries_in_bucket_order() {
        let mut a = arena();
        let mut tables = HashTableStore::new(&mut a);
        let t = tables.create_hash_table(4).unwrap();
        tables.put(t, 3, 30).unwrap();
        tables.put(t, 1, 10).unwrap();
        tables.put(t, 5, 50).unwrap();
        assert_eq!(tables.entries(t).unwrap(), [(5, 50), (1, 10), (3, 30)]);
    }

    #[test]
    fn failed_insert_leaves_table_unchanged() {
        // Header + 1 head + one 12-byte entry exactly.
        let mut a = Arena::new(20).unwrap();
        let mut tables = HashTableStore::new(&mut a);
        let t = tables.create_hash_table(1).unwrap();
        tables.put(t, 1, 1).unwrap();
        assert!(matches!(
            tables.put(t, 2, 2),
            Err(ArenaError::OutOfMemory { .. })
        ));
        assert_eq!(tables.entries(t).unwrap(), [(1, 1)]);
        // Updates need no space.
        tables.put(t, 1, 7).unwrap();
        assert_eq!(tables.get(t, 1).unwrap(), Some(7));
    }

    #[cfg(not(miri))]
    mod proptests {
        use super::*;
        use indexmap::IndexMap;
        use proptest::prelude::*;

        #[derive(Clone, Debug)]
        enum Op {
            Put(i32, i32),
            Remove(i32),
        }

        fn op() -> impl Strategy<Value = Op> {
            let key = -20i32..20;
            prop_oneof![
                (key.clone(), any::<i32>()).prop_map(|(k, v)| Op::Put(k, v)),
                key.prop_map(Op::Remove),
            ]
        }

        proptest! {
            #[test]
            fn behaves_like_a_map(
                buckets in 1usize..8,
                ops in prop::collection::vec(op(), 0..60),
            ) {
                let mut a = Arena::new(4096).unwrap();
                let mut tables = HashTableStore::new(&mut a);
                let t = tables.create_hash_table(buckets).unwrap();
                let mut model = IndexMap::new();
                for op in ops {
                    match op {
                        Op::Put(k, v) => {
                            tables.put(t, k, v).unwrap();
                            model.insert(k, v);
                        }
                        Op::Remove(k) => {
                            let removed = tables.remove(t, k).unwrap();
                            prop_assert_eq!(removed, model.shift_remove(&k).is_some());
                        }
                    }
                }
                prop_assert_eq!(tables.len(t).unwrap(), model.len());
                for k in -20..20 {
                    prop_assert_eq!(tables.get(t, k).unwrap(), model.get(&k).copied());
                }
            }
        }
    }
}
