//! The bump-allocated byte arena.
//!
//! An [`Arena`] is a fixed-capacity `Vec<u8>` with a cursor that advances
//! on each allocation. Individual allocations are never freed: the only
//! way to reclaim space is [`Arena::reset`], which invalidates every
//! previously issued [`Ptr`] at once.

use std::ops::Range;

use indexmap::IndexMap;
use tessera_core::{ArenaError, Ptr, Region, Scalar};
use tracing::{debug, trace, warn};

use crate::config::ArenaConfig;
use crate::regions::RegionTable;

/// A fixed-size byte buffer addressed by integer offsets.
///
/// Only bytes in `[0, used())` may be read or written; everything from the
/// cursor up to `capacity()` is available to future allocations. Fresh
/// allocations are zero-filled, including after a reset.
///
/// # Ownership
///
/// The arena owns its buffer outright. Stores borrow it mutably for their
/// lifetime, so no store can observe a reset, and the buffer is dropped
/// with the arena.
#[derive(Debug)]
pub struct Arena {
    /// Backing storage. Allocated to full capacity at creation.
    data: Vec<u8>,
    /// Bump pointer: first unallocated byte.
    cursor: usize,
    /// Bytes skipped by aligned allocations since the last reset.
    alignment_waste: usize,
    regions: RegionTable,
    /// Element stride of each array record, keyed by base pointer.
    strides: IndexMap<Ptr, u32>,
    /// Incremented on every reset.
    generation: u32,
    config: ArenaConfig,
}

impl Arena {
    /// Create an arena with `capacity` bytes and default settings.
    pub fn new(capacity: usize) -> Result<Self, ArenaError> {
        Self::with_config(ArenaConfig::new(capacity))
    }

    /// Create an arena from a validated configuration.
    pub fn with_config(config: ArenaConfig) -> Result<Self, ArenaError> {
        config.validate()?;
        debug!(arena = %config.name, capacity = config.capacity, "arena created");
        Ok(Self {
            data: vec![0; config.capacity],
            cursor: 0,
            alignment_waste: 0,
            regions: RegionTable::new(),
            strides: IndexMap::new(),
            generation: 0,
            config,
        })
    }

    /// The configuration this arena was built from.
    pub fn config(&self) -> &ArenaConfig {
        &self.config
    }

    // ── Allocation ──────────────────────────────────────────────

    /// Bump-allocate `size` bytes at the current offset.
    pub fn alloc(&mut self, size: usize) -> Result<Ptr, ArenaError> {
        self.bump(self.cursor, size)
    }

    /// Allocate `size` bytes starting at the next multiple of `alignment`.
    ///
    /// Skipped bytes are added to [`Arena::alignment_waste`]. On failure
    /// neither the offset nor the waste counter changes.
    pub fn alloc_aligned(&mut self, size: usize, alignment: usize) -> Result<Ptr, ArenaError> {
        let aligned = Self::align_to(self.cursor, alignment);
        let skipped = aligned - self.cursor;
        let ptr = self.bump(aligned, size)?;
        self.alignment_waste += skipped;
        Ok(ptr)
    }

    /// [`Arena::alloc_aligned`] with the configured default alignment.
    pub fn alloc_default_aligned(&mut self, size: usize) -> Result<Ptr, ArenaError> {
        self.alloc_aligned(size, self.config.default_alignment)
    }

    /// Smallest address `>= addr` that is a multiple of `alignment`.
    ///
    /// An `alignment` of zero leaves `addr` unchanged.
    pub fn align_to(addr: usize, alignment: usize) -> usize {
        if alignment == 0 {
            return addr;
        }
        match addr % alignment {
            0 => addr,
            rem => addr.saturating_add(alignment - rem),
        }
    }

    /// Move the cursor to `start + size`, zeroing everything it passes.
    fn bump(&mut self, start: usize, size: usize) -> Result<Ptr, ArenaError> {
        let end = match start.checked_add(size) {
            Some(end) if end <= self.data.len() => end,
            _ => return Err(self.out_of_memory(size)),
        };
        self.data[self.cursor..end].fill(0);
        self.cursor = end;
        trace!(arena = %self.config.name, offset = start, size, "alloc");
        Ok(ptr_at(start))
    }

    fn out_of_memory(&self, requested: usize) -> ArenaError {
        ArenaError::OutOfMemory {
            requested,
            remaining: self.remaining(),
            capacity: self.capacity(),
            offset: self.cursor,
        }
    }

    /// Reclaim the whole buffer.
    ///
    /// The offset and alignment waste return to zero, every region is
    /// dropped and all recorded strides are forgotten. All previously
    /// issued pointers dangle; the next allocation starts again at
    /// address 0.
    pub fn reset(&mut self) {
        debug!(
            arena = %self.config.name,
            used = self.cursor,
            generation = self.generation,
            "arena reset"
        );
        self.cursor = 0;
        self.alignment_waste = 0;
        self.regions.clear();
        self.strides.clear();
        self.generation = self.generation.wrapping_add(1);
    }

    /// Total buffer size in bytes.
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Bytes allocated so far (the current offset).
    pub fn used(&self) -> usize {
        self.cursor
    }

    /// Bytes still available.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.cursor
    }

    /// Bytes skipped for alignment since the last reset.
    pub fn alignment_waste(&self) -> usize {
        self.alignment_waste
    }

    /// Zero the alignment waste counter without touching allocations.
    pub fn reset_alignment_waste(&mut self) {
        self.alignment_waste = 0;
    }

    /// Number of resets performed on this arena.
    pub fn generation(&self) -> u32 {
        self.generation
    }

    // ── Bounds checking and raw access ──────────────────────────

    /// Validate that `[addr, addr + bytes_needed)` lies within the
    /// allocated prefix and return it as a buffer range.
    pub fn check_addr(&self, addr: Ptr, bytes_needed: usize) -> Result<Range<usize>, ArenaError> {
        let range = addr
            .as_usize()
            .and_then(|start| start.checked_add(bytes_needed).map(|end| start..end));
        match range {
            Some(range) if range.end <= self.cursor => Ok(range),
            _ => Err(ArenaError::InvalidAddress {
                address: i64::from(addr.get()),
                bytes_needed,
                allocated: self.cursor,
                capacity: self.capacity(),
            }),
        }
    }

    /// The allocated prefix `[0, used())` of the buffer.
    pub fn bytes(&self) -> &[u8] {
        &self.data[..self.cursor]
    }

    /// Borrow `len` allocated bytes starting at `addr`.
    pub fn read_bytes(&self, addr: Ptr, len: usize) -> Result<&[u8], ArenaError> {
        let range = self.check_addr(addr, len)?;
        Ok(&self.data[range])
    }

    /// Overwrite allocated bytes starting at `addr` with `src`.
    pub fn write_bytes(&mut self, addr: Ptr, src: &[u8]) -> Result<(), ArenaError> {
        let range = self.check_addr(addr, src.len())?;
        self.data[range].copy_from_slice(src);
        Ok(())
    }

    /// Set `len` allocated bytes starting at `addr` to `byte`.
    pub fn fill(&mut self, addr: Ptr, len: usize, byte: u8) -> Result<(), ArenaError> {
        let range = self.check_addr(addr, len)?;
        self.data[range].fill(byte);
        Ok(())
    }

    /// Copy `len` bytes from `src` to `dst`. The ranges may overlap.
    ///
    /// Both ranges are validated before anything is copied.
    pub fn copy_within(&mut self, src: Ptr, dst: Ptr, len: usize) -> Result<(), ArenaError> {
        let src = self.check_addr(src, len)?;
        let dst = self.check_addr(dst, len)?;
        self.data.copy_within(src, dst.start);
        Ok(())
    }

    // ── Typed accessors ─────────────────────────────────────────

    /// Store `value` big-endian at `addr`.
    pub fn put<T: Scalar>(&mut self, addr: Ptr, value: T) -> Result<(), ArenaError> {
        let range = self.check_addr(addr, T::WIDTH as usize)?;
        value.encode_be(&mut self.data[range]);
        Ok(())
    }

    /// Load a big-endian value from `addr`.
    pub fn get<T: Scalar>(&self, addr: Ptr) -> Result<T, ArenaError> {
        let range = self.check_addr(addr, T::WIDTH as usize)?;
        Ok(T::decode_be(&self.data[range]))
    }

    /// Store a signed byte.
    pub fn put_byte(&mut self, addr: Ptr, value: i8) -> Result<(), ArenaError> {
        self.put(addr, value)
    }

    /// Load a signed byte.
    pub fn get_byte(&self, addr: Ptr) -> Result<i8, ArenaError> {
        self.get(addr)
    }

    /// Store a 2-byte signed integer.
    pub fn put_short(&mut self, addr: Ptr, value: i16) -> Result<(), ArenaError> {
        self.put(addr, value)
    }

    /// Load a 2-byte signed integer.
    pub fn get_short(&self, addr: Ptr) -> Result<i16, ArenaError> {
        self.get(addr)
    }

    /// Store a 4-byte signed integer.
    pub fn put_int(&mut self, addr: Ptr, value: i32) -> Result<(), ArenaError> {
        self.put(addr, value)
    }

    /// Load a 4-byte signed integer.
    pub fn get_int(&self, addr: Ptr) -> Result<i32, ArenaError> {
        self.get(addr)
    }

    /// Store an 8-byte signed integer.
    pub fn put_long(&mut self, addr: Ptr, value: i64) -> Result<(), ArenaError> {
        self.put(addr, value)
    }

    /// Load an 8-byte signed integer.
    pub fn get_long(&self, addr: Ptr) -> Result<i64, ArenaError> {
        self.get(addr)
    }

    /// Store a UTF-16 code unit.
    pub fn put_char(&mut self, addr: Ptr, value: u16) -> Result<(), ArenaError> {
        self.put(addr, value)
    }

    /// Load a UTF-16 code unit.
    pub fn get_char(&self, addr: Ptr) -> Result<u16, ArenaError> {
        self.get(addr)
    }

    /// Store a boolean as a single `0`/`1` byte.
    pub fn put_boolean(&mut self, addr: Ptr, value: bool) -> Result<(), ArenaError> {
        self.put(addr, value)
    }

    /// Load a boolean; only the byte `1` reads as `true`.
    pub fn get_boolean(&self, addr: Ptr) -> Result<bool, ArenaError> {
        self.get(addr)
    }

    /// Store a pointer as a 4-byte integer.
    pub fn put_ptr(&mut self, addr: Ptr, value: Ptr) -> Result<(), ArenaError> {
        self.put(addr, value.get())
    }

    /// Load a pointer stored as a 4-byte integer.
    pub fn get_ptr(&self, addr: Ptr) -> Result<Ptr, ArenaError> {
        self.get::<i32>(addr).map(Ptr)
    }

    // ── Regions ─────────────────────────────────────────────────

    /// Register `[start, start + size)` as a named region.
    ///
    /// The range is checked against capacity, not the allocation offset:
    /// regions may describe space that has not been allocated yet.
    pub fn create_region(&mut self, start: Ptr, size: usize, name: &str) -> Result<Region, ArenaError> {
        let range = start
            .as_usize()
            .and_then(|s| s.checked_add(size).map(|e| s..e));
        let range = match range {
            Some(range) if range.end <= self.capacity() => range,
            _ => {
                return Err(ArenaError::InvalidAddress {
                    address: i64::from(start.get()),
                    bytes_needed: size,
                    allocated: self.cursor,
                    capacity: self.capacity(),
                })
            }
        };
        let region = Region::new(range.start, range.end, name)?;
        self.register(region)
    }

    /// Carve a region of `size` bytes at the current offset and allocate it.
    pub fn create_region_at_offset(&mut self, size: usize, name: &str) -> Result<Region, ArenaError> {
        let start = self.cursor;
        let end = start
            .checked_add(size)
            .filter(|&end| end <= self.data.len())
            .ok_or_else(|| self.out_of_memory(size))?;
        let region = Region::new(start, end, name)?;
        if let Some(existing) = self.regions.conflict(&region) {
            let err = ArenaError::RegionOverlap {
                conflicting: existing.clone(),
            };
            warn!(arena = %self.config.name, error = %err, "region rejected");
            return Err(err);
        }
        self.bump(start, size)?;
        self.register(region)
    }

    fn register(&mut self, region: Region) -> Result<Region, ArenaError> {
        match self.regions.insert(region) {
            Ok(region) => {
                debug!(arena = %self.config.name, region = %region, "region created");
                Ok(region.clone())
            }
            Err(err) => {
                warn!(arena = %self.config.name, error = %err, "region rejected");
                Err(err)
            }
        }
    }

    /// First region containing `addr`.
    pub fn find_region(&self, addr: Ptr) -> Option<&Region> {
        self.regions.find(addr.as_usize()?)
    }

    /// First region containing all of `[addr, addr + size)`.
    pub fn find_region_for_range(&self, addr: Ptr, size: usize) -> Option<&Region> {
        self.regions.find_range(addr.as_usize()?, size)
    }

    /// Whether `addr` falls in a region, and in the named one if `name`
    /// is given.
    pub fn validate_address_in_region(&self, addr: Ptr, name: Option<&str>) -> bool {
        match self.find_region(addr) {
            Some(region) => name.map_or(true, |name| region.name() == name),
            None => false,
        }
    }

    /// Copy of every region in creation order.
    pub fn all_regions(&self) -> Vec<Region> {
        self.regions.iter().cloned().collect()
    }

    /// The region table.
    pub fn regions(&self) -> &RegionTable {
        &self.regions
    }

    /// Drop every region without touching allocations.
    pub fn clear_regions(&mut self) {
        self.regions.clear();
    }

    // ── Record strides ──────────────────────────────────────────

    /// Remember that the record at `base` holds `stride`-byte elements.
    ///
    /// The stride lives as long as the allocation: until the next reset.
    pub fn record_stride(&mut self, base: Ptr, stride: u32) -> Result<(), ArenaError> {
        self.check_addr(base, 0)?;
        self.strides.insert(base, stride);
        Ok(())
    }

    /// Element stride recorded for the record at `base`, if any.
    pub fn stride(&self, base: Ptr) -> Option<u32> {
        self.strides.get(&base).copied()
    }
}

/// Offsets never exceed capacity, which `ArenaConfig::validate` caps at `i32::MAX`.
fn ptr_at(offset: usize) -> Ptr {
    Ptr(offset as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arena(capacity: usize) -> Arena {
        Arena::new(capacity).unwrap()
    }

    #[test]
    fn sequential_allocs_are_contiguous() {
        let mut a = arena(128);
        assert_eq!(a.alloc(4).unwrap(), Ptr(0));
        assert_eq!(a.alloc(4).unwrap(), Ptr(4));
        assert_eq!(a.alloc(4).unwrap(), Ptr(8));
        assert_eq!(a.used(), 12);
        assert_eq!(a.remaining(), 116);
        assert_eq!(a.capacity(), 128);
    }

    #[test]
    fn out_of_memory_carries_state() {
        let mut a = arena(10);
        a.alloc(5).unwrap();
        let err = a.alloc(6).unwrap_err();
        assert_eq!(
            err,
            ArenaError::OutOfMemory {
                requested: 6,
                remaining: 5,
                capacity: 10,
                offset: 5,
            }
        );
        assert_eq!(a.used(), 5);
    }

    #[test]
    fn exact_fit_succeeds() {
        let mut a = arena(16);
        assert!(a.alloc(16).is_ok());
        assert_eq!(a.remaining(), 0);
        assert!(a.alloc(1).is_err());
    }

    #[test]
    fn zero_sized_alloc_returns_cursor() {
        let mut a = arena(16);
        a.alloc(3).unwrap();
        assert_eq!(a.alloc(0).unwrap(), Ptr(3));
        assert_eq!(a.used(), 3);
    }

    #[test]
    fn align_to_table() {
        let cases = [(0, 4, 0), (1, 4, 4), (3, 4, 4), (4, 4, 4), (5, 4, 8), (7, 4, 8), (8, 4, 8)];
        for (addr, alignment, expected) in cases {
            assert_eq!(Arena::align_to(addr, alignment), expected, "align_to({addr}, {alignment})");
        }
        assert_eq!(Arena::align_to(7, 0), 7);
        assert_eq!(Arena::align_to(7, 1), 7);
        assert_eq!(Arena::align_to(7, 3), 9);
    }

    #[test]
    fn aligned_alloc_accrues_only_skipped_bytes() {
        let mut a = arena(128);
        a.alloc(3).unwrap();
        assert_eq!(a.alignment_waste(), 0);

        assert_eq!(a.alloc_aligned(4, 4).unwrap(), Ptr(4));
        assert_eq!(a.alignment_waste(), 1);
        assert_eq!(a.used(), 8);

        assert_eq!(a.alloc_aligned(4, 4).unwrap(), Ptr(8));
        assert_eq!(a.alignment_waste(), 1);
        assert_eq!(a.used(), 12);
    }

    #[test]
    fn failed_aligned_alloc_leaves_state() {
        let mut a = arena(10);
        a.alloc(3).unwrap();
        let err = a.alloc_aligned(8, 4).unwrap_err();
        assert!(matches!(err, ArenaError::OutOfMemory { requested: 8, offset: 3, .. }));
        assert_eq!(a.used(), 3);
        assert_eq!(a.alignment_waste(), 0);
    }

    #[test]
    fn default_alignment_from_config() {
        let mut a = Arena::with_config(ArenaConfig::new(64).with_default_alignment(8)).unwrap();
        a.alloc(1).unwrap();
        assert_eq!(a.alloc_default_aligned(4).unwrap(), Ptr(8));
        assert_eq!(a.alignment_waste(), 7);
    }

    #[test]
    fn reset_clears_everything() {
        let mut a = arena(128);
        a.alloc(3).unwrap();
        a.alloc_aligned(4, 4).unwrap();
        a.create_region_at_offset(16, "Stack").unwrap();
        a.reset();
        assert_eq!(a.used(), 0);
        assert_eq!(a.alignment_waste(), 0);
        assert!(a.all_regions().is_empty());
        assert_eq!(a.generation(), 1);
        assert_eq!(a.alloc(4).unwrap(), Ptr(0));
    }

    #[test]
    fn realloc_after_reset_is_zeroed() {
        let mut a = arena(16);
        let p = a.alloc(4).unwrap();
        a.put_int(p, -1).unwrap();
        a.reset();
        let q = a.alloc(4).unwrap();
        assert_eq!(a.get_int(q).unwrap(), 0);
    }

    #[test]
    fn int_is_stored_big_endian() {
        let mut a = arena(128);
        let p = a.alloc(4).unwrap();
        a.put_int(p, 0x1234_5678).unwrap();
        assert_eq!(a.bytes(), &[0x12, 0x34, 0x56, 0x78]);
        assert_eq!(a.get_int(p).unwrap(), 0x1234_5678);
    }

    #[test]
    fn long_boundaries_round_trip() {
        let mut a = arena(128);
        for v in [0x0123_4567_89AB_CDEF, i64::MAX, i64::MIN, 0, -1] {
            let p = a.alloc(8).unwrap();
            a.put_long(p, v).unwrap();
            assert_eq!(a.get_long(p).unwrap(), v);
        }
    }

    #[test]
    fn short_boundaries_round_trip() {
        let mut a = arena(128);
        for v in [0xABCDu16 as i16, i16::MAX, i16::MIN, 0, -1] {
            let p = a.alloc(2).unwrap();
            a.put_short(p, v).unwrap();
            assert_eq!(a.get_short(p).unwrap(), v);
        }
    }

    #[test]
    fn chars_round_trip() {
        let mut a = arena(128);
        for c in ['A', 'Z', '0', '9', ' ', '!', '中', '\u{03A9}'] {
            let p = a.alloc(2).unwrap();
            a.put_char(p, c as u16).unwrap();
            assert_eq!(a.get_char(p).unwrap(), c as u16);
        }
        assert_eq!(a.read_bytes(Ptr(0), 2).unwrap(), &[0x00, 0x41]);
    }

    #[test]
    fn boolean_bytes() {
        let mut a = arena(8);
        let t = a.alloc(1).unwrap();
        let f = a.alloc(1).unwrap();
        a.put_boolean(t, true).unwrap();
        a.put_boolean(f, false).unwrap();
        assert_eq!(a.bytes(), &[1, 0]);
        assert!(a.get_boolean(t).unwrap());
        assert!(!a.get_boolean(f).unwrap());

        a.put_byte(t, 2).unwrap();
        assert!(!a.get_boolean(t).unwrap());
    }

    #[test]
    fn read_past_offset_is_invalid_address() {
        let mut a = arena(20);
        a.alloc(10).unwrap();
        let err = a.get_int(Ptr(15)).unwrap_err();
        assert_eq!(
            err,
            ArenaError::InvalidAddress {
                address: 15,
                bytes_needed: 4,
                allocated: 10,
                capacity: 20,
            }
        );
    }

    #[test]
    fn straddling_offset_is_invalid() {
        let mut a = arena(20);
        a.alloc(10).unwrap();
        assert!(a.get_int(Ptr(7)).is_err());
        assert!(a.get_int(Ptr(6)).is_ok());
        assert!(a.put_long(Ptr(4), 1).is_err());
    }

    #[test]
    fn negative_addresses_always_fail() {
        let mut a = arena(20);
        a.alloc(10).unwrap();
        assert!(matches!(
            a.get_byte(Ptr(-1)),
            Err(ArenaError::InvalidAddress { address: -1, .. })
        ));
        assert!(a.put_int(Ptr(i32::MIN), 0).is_err());
    }

    #[test]
    fn failed_write_leaves_bytes_untouched() {
        let mut a = arena(8);
        a.alloc(6).unwrap();
        a.fill(Ptr(0), 6, 0xAA).unwrap();
        assert!(a.put_int(Ptr(4), 0).is_err());
        assert_eq!(a.bytes(), &[0xAA; 6]);
    }

    #[test]
    fn copy_within_validates_both_ranges() {
        let mut a = arena(16);
        a.alloc(8).unwrap();
        a.put_int(Ptr(0), 7).unwrap();
        a.copy_within(Ptr(0), Ptr(4), 4).unwrap();
        assert_eq!(a.get_int(Ptr(4)).unwrap(), 7);
        assert!(a.copy_within(Ptr(0), Ptr(6), 4).is_err());
        assert_eq!(a.get_int(Ptr(4)).unwrap(), 7);
    }

    #[test]
    fn pointer_round_trip() {
        let mut a = arena(8);
        let p = a.alloc(8).unwrap();
        a.put_ptr(p, Ptr::NULL).unwrap();
        assert_eq!(a.get_ptr(p).unwrap(), Ptr::NULL);
        assert_eq!(a.read_bytes(p, 4).unwrap(), &[0xFF; 4]);
    }

    #[test]
    fn region_layout() {
        let mut a = arena(256);
        let stack = a.create_region_at_offset(32, "Stack").unwrap();
        let heap = a.create_region_at_offset(64, "Heap").unwrap();
        let data = a.create_region(Ptr(128), 32, "Data").unwrap();
        assert_eq!((stack.start(), stack.end()), (0, 32));
        assert_eq!((heap.start(), heap.end()), (32, 96));
        assert_eq!((data.start(), data.end()), (128, 160));
        assert_eq!(a.used(), 96);

        assert_eq!(a.find_region(Ptr(10)).map(Region::name), Some("Stack"));
        assert_eq!(a.find_region(Ptr(50)).map(Region::name), Some("Heap"));
        assert_eq!(a.find_region(Ptr(140)).map(Region::name), Some("Data"));
        assert!(a.find_region(Ptr(200)).is_none());
        assert!(a.find_region(Ptr::NULL).is_none());

        assert_eq!(a.find_region_for_range(Ptr(0), 32).map(Region::name), Some("Stack"));
        assert_eq!(a.find_region_for_range(Ptr(32), 64).map(Region::name), Some("Heap"));

        assert!(a.validate_address_in_region(Ptr(10), Some("Stack")));
        assert!(!a.validate_address_in_region(Ptr(10), Some("Heap")));
        assert!(a.validate_address_in_region(Ptr(50), Some("Heap")));
        assert!(a.validate_address_in_region(Ptr(50), None));
        assert!(!a.validate_address_in_region(Ptr(200), None));

        let names: Vec<_> = a.all_regions().iter().map(|r| r.name().to_string()).collect();
        assert_eq!(names, ["Stack", "Heap", "Data"]);
    }

    #[test]
    fn overlapping_region_rejected() {
        let mut a = arena(256);
        a.create_region_at_offset(32, "Stack").unwrap();
        let heap = a.create_region_at_offset(64, "Heap").unwrap();
        let err = a.create_region(Ptr(30), 10, "Overlap").unwrap_err();
        // [30, 40) hits Stack first in creation order.
        assert!(matches!(err, ArenaError::RegionOverlap { ref conflicting } if conflicting.name() == "Stack"));

        let err = a.create_region(Ptr(40), 8, "Inner").unwrap_err();
        assert_eq!(err, ArenaError::RegionOverlap { conflicting: heap });
        assert_eq!(a.all_regions().len(), 2);
    }

    #[test]
    fn region_past_capacity_rejected() {
        let mut a = arena(64);
        assert!(matches!(
            a.create_region(Ptr(60), 8, "tail"),
            Err(ArenaError::InvalidAddress { .. })
        ));
        assert!(a.create_region(Ptr(-4), 8, "neg").is_err());
        assert!(matches!(
            a.create_region_at_offset(65, "big"),
            Err(ArenaError::OutOfMemory { requested: 65, .. })
        ));
        assert_eq!(a.used(), 0);
    }

    #[test]
    fn region_at_offset_checks_overlap_before_allocating() {
        let mut a = arena(64);
        a.create_region(Ptr(8), 8, "fixed").unwrap();
        assert!(matches!(
            a.create_region_at_offset(16, "carved"),
            Err(ArenaError::RegionOverlap { .. })
        ));
        assert_eq!(a.used(), 0);
    }

    #[test]
    fn reset_alignment_waste_keeps_allocations_and_regions() {
        let mut a = arena(64);
        a.create_region_at_offset(3, "Odd").unwrap();
        a.alloc_aligned(8, 8).unwrap();
        assert_eq!(a.alignment_waste(), 5);
        a.reset_alignment_waste();
        assert_eq!(a.alignment_waste(), 0);
        assert_eq!(a.used(), 16);
        assert_eq!(a.all_regions().len(), 1);
        assert_eq!(a.find_region(Ptr(0)).unwrap().name(), "Odd");
        assert_eq!(a.generation(), 0);
    }

    #[test]
    fn strides_survive_until_reset() {
        let mut a = arena(64);
        let base = a.alloc(12).unwrap();
        a.record_stride(base, 8).unwrap();
        assert_eq!(a.stride(base), Some(8));
        assert_eq!(a.stride(Ptr(4)), None);
        a.reset();
        assert_eq!(a.stride(base), None);
    }

    #[test]
    fn stride_needs_allocated_base() {
        let mut a = arena(64);
        assert!(matches!(
            a.record_stride(Ptr(4), 4),
            Err(ArenaError::InvalidAddress { .. })
        ));
        assert!(a.record_stride(Ptr::NULL, 4).is_err());
    }

    #[test]
    fn clear_regions_keeps_allocations() {
        let mut a = arena(64);
        a.create_region_at_offset(16, "a").unwrap();
        a.clear_regions();
        assert!(a.regions().is_empty());
        assert_eq!(a.used(), 16);
    }

    #[test]
    fn oversized_config_rejected() {
        assert!(matches!(
            Arena::new(ArenaConfig::MAX_CAPACITY + 1),
            Err(ArenaError::InvalidConfig { .. })
        ));
    }

    #[cfg(not(miri))]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn align_to_is_smallest_multiple(addr in 0usize..10_000, alignment in 1usize..64) {
                let aligned = Arena::align_to(addr, alignment);
                prop_assert!(aligned >= addr);
                prop_assert_eq!(aligned % alignment, 0);
                prop_assert!(aligned - addr < alignment);
            }

            #[test]
            fn waste_equals_sum_of_skips(
                ops in proptest::collection::vec((0usize..16, prop_oneof![Just(1usize), Just(2), Just(4), Just(8)]), 1..40),
            ) {
                let mut a = Arena::new(4096).unwrap();
                let mut expected = 0;
                for (size, alignment) in ops {
                    let before = a.used();
                    let p = a.alloc_aligned(size, alignment).unwrap();
                    let start = p.as_usize().unwrap();
                    prop_assert_eq!(start % alignment, 0);
                    expected += start - before;
                    prop_assert_eq!(a.alignment_waste(), expected);
                    prop_assert_eq!(a.used(), start + size);
                }
            }

            #[test]
            fn used_never_exceeds_capacity(sizes in proptest::collection::vec(0usize..64, 1..50)) {
                let mut a = Arena::new(512).unwrap();
                for size in sizes {
                    let _ = a.alloc(size);
                    prop_assert!(a.used() <= a.capacity());
                    prop_assert_eq!(a.used() + a.remaining(), a.capacity());
                }
            }

            #[test]
            fn long_round_trips_at_any_slot(v in any::<i64>(), pad in 0usize..16) {
                let mut a = Arena::new(64).unwrap();
                a.alloc(pad).unwrap();
                let p = a.alloc(8).unwrap();
                a.put_long(p, v).unwrap();
                prop_assert_eq!(a.get_long(p).unwrap(), v);
            }

            #[test]
            fn reads_at_or_past_offset_fail(used in 0usize..64, addr in 0i32..128) {
                let mut a = Arena::new(128).unwrap();
                a.alloc(used).unwrap();
                let result = a.get_byte(Ptr(addr));
                prop_assert_eq!(result.is_ok(), (addr as usize) < used);
            }
        }
    }
}
