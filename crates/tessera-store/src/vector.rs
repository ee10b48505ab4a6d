//! Growable integer vectors.
//!
//! A vector is a fixed 12-byte header pointing at a separately allocated
//! data block of exactly `capacity` 4-byte slots. Growing allocates a new
//! block and copies the live elements across; the old block stays behind
//! as unreachable arena space until the next reset.

use tessera_arena::Arena;
use tessera_core::{ArenaError, Ptr};
use tracing::{debug, trace};

use crate::layout::{self, vector};

/// Capacity after one growth step from `capacity`.
///
/// Grows by half, rounded down, and always by at least one slot:
/// `0 → 1 → 2 → 3 → 4 → 6 → 9 → 13`. Returns `None` on overflow.
pub fn next_capacity(capacity: usize) -> Option<usize> {
    let grown = capacity.checked_mul(3)? / 2;
    Some(grown.max(1).max(capacity.checked_add(1)?))
}

/// Creates vectors and performs appends with amortised growth.
pub struct VectorStore<'a> {
    arena: &'a mut Arena,
}

impl<'a> VectorStore<'a> {
    /// Wrap `arena` for vector operations.
    pub fn new(arena: &'a mut Arena) -> Self {
        Self { arena }
    }

    /// The underlying arena.
    pub fn arena(&self) -> &Arena {
        self.arena
    }

    /// Allocate an empty vector with room for `initial_capacity` elements.
    ///
    /// The header is allocated first, immediately followed by the block.
    pub fn create_vector(&mut self, initial_capacity: usize) -> Result<Ptr, ArenaError> {
        let capacity = layout::header_count(initial_capacity, "vector capacity")?;
        let block_size = block_bytes(initial_capacity)?;
        let total = block_size.saturating_add(vector::HEADER_SIZE as usize);
        if total > self.arena.remaining() {
            // Reject up front so a failed create does not strand a header.
            return Err(ArenaError::OutOfMemory {
                requested: total,
                remaining: self.arena.remaining(),
                capacity: self.arena.capacity(),
                offset: self.arena.used(),
            });
        }
        let header = self.arena.alloc(vector::HEADER_SIZE as usize)?;
        let data = self.arena.alloc(block_size)?;
        self.arena.put_int(layout::field(self.arena, header, vector::LENGTH)?, 0)?;
        self.arena.put_int(layout::field(self.arena, header, vector::CAPACITY)?, capacity)?;
        self.arena.put_ptr(layout::field(self.arena, header, vector::DATA)?, data)?;
        trace!(vector = %header, %data, capacity, "vector created");
        Ok(header)
    }

    /// Number of live elements.
    pub fn length(&self, vec: Ptr) -> Result<usize, ArenaError> {
        layout::check_record(self.arena, vec, vector::HEADER_SIZE)?;
        layout::read_count(self.arena, vec, vector::LENGTH, vector::HEADER_SIZE)
    }

    /// Number of slots in the current data block.
    pub fn capacity(&self, vec: Ptr) -> Result<usize, ArenaError> {
        layout::check_record(self.arena, vec, vector::HEADER_SIZE)?;
        layout::read_count(self.arena, vec, vector::CAPACITY, vector::HEADER_SIZE)
    }

    /// Address of the current data block.
    pub fn data_ptr(&self, vec: Ptr) -> Result<Ptr, ArenaError> {
        layout::check_record(self.arena, vec, vector::HEADER_SIZE)?;
        self.arena.get_ptr(layout::field(self.arena, vec, vector::DATA)?)
    }

    /// Push `value` onto the end, growing the block first when full.
    pub fn append(&mut self, vec: Ptr, value: i32) -> Result<(), ArenaError> {
        let length = self.length(vec)?;
        if length >= self.capacity(vec)? {
            self.grow(vec)?;
        }
        let slot = self.slot(vec, length)?;
        let new_length = layout::header_count(length + 1, "vector length")?;
        self.arena.put_int(slot, value)?;
        self.arena.put_int(layout::field(self.arena, vec, vector::LENGTH)?, new_length)
    }

    /// Move the elements into a block of [`next_capacity`] slots.
    ///
    /// The header is rewritten only once the new block is populated, so
    /// an allocation failure leaves the vector as it was.
    fn grow(&mut self, vec: Ptr) -> Result<(), ArenaError> {
        let length = self.length(vec)?;
        let old_capacity = self.capacity(vec)?;
        let old_data = self.data_ptr(vec)?;
        let new_capacity = next_capacity(old_capacity).ok_or_else(|| ArenaError::InvalidConfig {
            reason: format!("vector capacity {old_capacity} cannot grow"),
        })?;
        let header_capacity = layout::header_count(new_capacity, "vector capacity")?;

        let new_data = self.arena.alloc(block_bytes(new_capacity)?)?;
        if length > 0 {
            self.arena.copy_within(old_data, new_data, block_bytes(length)?)?;
        }
        self.arena.put_int(layout::field(self.arena, vec, vector::CAPACITY)?, header_capacity)?;
        self.arena.put_ptr(layout::field(self.arena, vec, vector::DATA)?, new_data)?;
        debug!(
            vector = %vec,
            old_capacity,
            new_capacity,
            %old_data,
            %new_data,
            "vector grown"
        );
        Ok(())
    }

    /// Element at `index`.
    pub fn get(&self, vec: Ptr, index: usize) -> Result<i32, ArenaError> {
        let length = self.length(vec)?;
        if index >= length {
            return Err(ArenaError::IndexOutOfRange { index, length });
        }
        self.arena.get_int(self.slot(vec, index)?)
    }

    /// Overwrite the element at `index`.
    pub fn set(&mut self, vec: Ptr, index: usize, value: i32) -> Result<(), ArenaError> {
        let length = self.length(vec)?;
        if index >= length {
            return Err(ArenaError::IndexOutOfRange { index, length });
        }
        let slot = self.slot(vec, index)?;
        self.arena.put_int(slot, value)
    }

    /// Live elements in order.
    pub fn to_vec(&self, vec: Ptr) -> Result<Vec<i32>, ArenaError> {
        let length = self.length(vec)?;
        let data = self.data_ptr(vec)?;
        let bytes = self.arena.read_bytes(data, block_bytes(length)?)?;
        Ok(bytes
            .chunks_exact(vector::ELEMENT_SIZE as usize)
            .map(|c| i32::from_be_bytes([c[0], c[1], c[2], c[3]]))
            .collect())
    }

    fn slot(&self, vec: Ptr, index: usize) -> Result<Ptr, ArenaError> {
        let data = self.data_ptr(vec)?;
        layout::element(self.arena, data, 0, index, vector::ELEMENT_SIZE)
    }
}

fn block_bytes(slots: usize) -> Result<usize, ArenaError> {
    slots
        .checked_mul(vector::ELEMENT_SIZE as usize)
        .ok_or_else(|| ArenaError::InvalidConfig {
            reason: format!("vector block of {slots} slots overflows"),
        })
}
