//! Byte layouts of every store record and shared address arithmetic.
//!
//! All fields are big-endian. Offsets are relative to the record's base
//! pointer.
//!
//! ```text
//! Node        [value:i32][next:ptr]                         8 bytes
//! Array       [length:i32][length × elementSize bytes]
//! Vector      [length:i32][capacity:i32][data:ptr]          12 bytes
//!   block     [capacity × i32]
//! String      [length:i32][length × u16 code units]
//! Hash table  [bucketCount:i32][bucketCount × head ptr]
//!   entry     [key:i32][value:i32][next:ptr]                12 bytes
//! ```

use tessera_arena::Arena;
use tessera_core::{ArenaError, Ptr};

/// Node record.
pub mod node {
    /// Offset of the 4-byte value.
    pub const VALUE: u32 = 0;
    /// Offset of the next pointer.
    pub const NEXT: u32 = 4;
    /// Record size.
    pub const SIZE: u32 = 8;
}

/// Array record.
pub mod array {
    /// Offset of the element count.
    pub const LENGTH: u32 = 0;
    /// Offset of the first element.
    pub const ELEMENTS: u32 = 4;
}

/// Vector header and data block.
pub mod vector {
    /// Offset of the element count.
    pub const LENGTH: u32 = 0;
    /// Offset of the block capacity.
    pub const CAPACITY: u32 = 4;
    /// Offset of the data block pointer.
    pub const DATA: u32 = 8;
    /// Header size.
    pub const HEADER_SIZE: u32 = 12;
    /// Width of one element in the data block.
    pub const ELEMENT_SIZE: u32 = 4;
}

/// String record.
pub mod string {
    /// Offset of the code-unit count.
    pub const LENGTH: u32 = 0;
    /// Offset of the first code unit.
    pub const UNITS: u32 = 4;
    /// Width of one UTF-16 code unit.
    pub const UNIT_SIZE: u32 = 2;
}

/// Hash table header and chained entries.
pub mod hash {
    /// Offset of the bucket count.
    pub const BUCKET_COUNT: u32 = 0;
    /// Offset of the first bucket head pointer.
    pub const BUCKETS: u32 = 4;
    /// Offset of an entry's key.
    pub const KEY: u32 = 0;
    /// Offset of an entry's value.
    pub const VALUE: u32 = 4;
    /// Offset of an entry's next pointer.
    pub const NEXT: u32 = 8;
    /// Entry size.
    pub const ENTRY_SIZE: u32 = 12;
}

/// Address of element `index` in a sequence starting `header` bytes past
/// `base` with `stride`-byte elements.
///
/// Fails with [`ArenaError::InvalidAddress`] if the address leaves the
/// pointer range; the arena's own check catches anything past the offset.
pub(crate) fn element(
    arena: &Arena,
    base: Ptr,
    header: u32,
    index: usize,
    stride: u32,
) -> Result<Ptr, ArenaError> {
    let addr = i64::try_from(index)
        .ok()
        .and_then(|i| i.checked_mul(i64::from(stride)))
        .and_then(|off| off.checked_add(i64::from(header)))
        .and_then(|off| off.checked_add(i64::from(base.get())));
    match addr.map(|a| (a, i32::try_from(a))) {
        Some((_, Ok(a))) => Ok(Ptr(a)),
        Some((a, Err(_))) => Err(invalid_address(arena, a, stride)),
        None => Err(invalid_address(arena, i64::MAX, stride)),
    }
}

/// Address of the fixed field `offset` bytes into the record at `base`.
pub(crate) fn field(arena: &Arena, base: Ptr, offset: u32) -> Result<Ptr, ArenaError> {
    element(arena, base, offset, 0, 0)
}

fn invalid_address(arena: &Arena, address: i64, bytes_needed: u32) -> ArenaError {
    ArenaError::InvalidAddress {
        address,
        bytes_needed: bytes_needed as usize,
        allocated: arena.used(),
        capacity: arena.capacity(),
    }
}

/// Require `ptr` to reference a complete `record_size`-byte record.
pub(crate) fn check_record(arena: &Arena, ptr: Ptr, record_size: u32) -> Result<(), ArenaError> {
    arena
        .check_addr(ptr, record_size as usize)
        .map(|_| ())
        .map_err(|_| ArenaError::InvalidPointer {
            pointer: ptr,
            record_size,
        })
}

/// Like [`check_record`], but also accepts [`Ptr::NULL`].
pub(crate) fn check_link(arena: &Arena, ptr: Ptr, record_size: u32) -> Result<(), ArenaError> {
    if ptr.is_null() {
        Ok(())
    } else {
        check_record(arena, ptr, record_size)
    }
}

/// Read a length or count header, rejecting negative values.
pub(crate) fn read_count(arena: &Arena, base: Ptr, offset: u32, record_size: u32) -> Result<usize, ArenaError> {
    let raw = arena.get_int(field(arena, base, offset)?)?;
    usize::try_from(raw).map_err(|_| ArenaError::InvalidPointer {
        pointer: base,
        record_size,
    })
}

/// Convert a caller-supplied length to the 4-byte header representation.
pub(crate) fn header_count(count: usize, what: &str) -> Result<i32, ArenaError> {
    i32::try_from(count).map_err(|_| ArenaError::InvalidConfig {
        reason: format!("{what} {count} does not fit a 4-byte header"),
    })
}

/// Hop budget for walking a linked chain without revisiting a record.
///
/// A chain of distinct `record_size`-byte records inside `[0, used)` can
/// have at most `used - record_size + 1` members, so exceeding that many
/// hops proves a cycle.
pub(crate) struct ChainGuard {
    remaining: usize,
    record_size: u32,
}

impl ChainGuard {
    pub(crate) fn new(arena: &Arena, record_size: u32) -> Self {
        Self {
            remaining: arena.used().saturating_sub(record_size as usize) + 1,
            record_size,
        }
    }

    /// Validate `ptr` as the next record in the chain.
    pub(crate) fn visit(&mut self, arena: &Arena, ptr: Ptr) -> Result<(), ArenaError> {
        if self.remaining == 0 {
            return Err(ArenaError::InvalidPointer {
                pointer: ptr,
                record_size: self.record_size,
            });
        }
        self.remaining -= 1;
        check_record(arena, ptr, self.record_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn element_address_arithmetic() {
        let arena = Arena::new(64).unwrap();
        assert_eq!(element(&arena, Ptr(8), 4, 3, 4).unwrap(), Ptr(24));
        assert_eq!(field(&arena, Ptr(8), 4).unwrap(), Ptr(12));
    }

    #[test]
    fn element_overflow_is_invalid_address() {
        let arena = Arena::new(64).unwrap();
        let err = element(&arena, Ptr(i32::MAX - 2), 4, 0, 4).unwrap_err();
        assert!(matches!(err, ArenaError::InvalidAddress { .. }));
    }

    #[test]
    fn links_accept_null_records_do_not() {
        let mut arena = Arena::new(64).unwrap();
        arena.alloc(8).unwrap();
        assert!(check_link(&arena, Ptr::NULL, 8).is_ok());
        assert!(check_record(&arena, Ptr::NULL, 8).is_err());
        assert!(check_record(&arena, Ptr(0), 8).is_ok());
        assert_eq!(
            check_record(&arena, Ptr(4), 8),
            Err(ArenaError::InvalidPointer {
                pointer: Ptr(4),
                record_size: 8
            })
        );
    }

    #[test]
    fn guard_budget_matches_distinct_slots() {
        let mut arena = Arena::new(64).unwrap();
        arena.alloc(16).unwrap();
        let mut guard = ChainGuard::new(&arena, 8);
        // Start addresses 0..=8 are the only complete 8-byte records.
        for addr in 0..=8 {
            guard.visit(&arena, Ptr(addr)).unwrap();
        }
        assert!(guard.visit(&arena, Ptr(0)).is_err());
    }
}
