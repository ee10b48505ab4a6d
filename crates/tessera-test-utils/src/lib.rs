//! Test fixtures for tessera development.
//!
//! Provides a [`TestArenaBuilder`] for arenas with pre-registered regions,
//! builders that lay out populated structures in one call, and
//! [`hex_dump`] for readable byte-level assertion failures.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

pub use fixtures::{filled_array, filled_table, filled_vector, linked_list};

use std::fmt::Write;

use tessera_arena::{Arena, ArenaConfig};

/// Capacity used when a test does not care.
pub const TEST_CAPACITY: usize = 1024;

/// Builder for arenas with preconfigured regions and alignment.
pub struct TestArenaBuilder {
    config: ArenaConfig,
    regions: Vec<(usize, String)>,
}

impl TestArenaBuilder {
    pub fn new() -> Self {
        Self {
            config: ArenaConfig::new(TEST_CAPACITY).with_name("test"),
            regions: Vec::new(),
        }
    }

    pub fn capacity(mut self, capacity: usize) -> Self {
        self.config.capacity = capacity;
        self
    }

    pub fn default_alignment(mut self, alignment: usize) -> Self {
        self.config.default_alignment = alignment;
        self
    }

    /// Carve a region of `size` bytes at the allocation offset on build.
    pub fn region(mut self, size: usize, name: impl Into<String>) -> Self {
        self.regions.push((size, name.into()));
        self
    }

    /// Build the arena.
    ///
    /// # Panics
    ///
    /// Panics if the configuration is invalid or the regions do not fit.
    pub fn build(self) -> Arena {
        let mut arena = Arena::with_config(self.config).expect("invalid test arena config");
        for (size, name) in &self.regions {
            arena
                .create_region_at_offset(*size, name)
                .expect("test region does not fit");
        }
        arena
    }
}

impl Default for TestArenaBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// An empty arena of `capacity` bytes.
///
/// # Panics
///
/// Panics if `capacity` exceeds the maximum arena size.
pub fn arena(capacity: usize) -> Arena {
    Arena::new(capacity).expect("invalid test arena capacity")
}

/// Render `bytes` as rows of 16 hex pairs prefixed by their offset.
pub fn hex_dump(bytes: &[u8]) -> String {
    let mut out = String::new();
    for (row, chunk) in bytes.chunks(16).enumerate() {
        let _ = write!(out, "{:04x}:", row * 16);
        for b in chunk {
            let _ = write!(out, " {b:02x}");
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_registers_regions_in_order() {
        let arena = TestArenaBuilder::new()
            .capacity(128)
            .region(32, "Stack")
            .region(64, "Heap")
            .build();
        let names: Vec<_> = arena.regions().iter().map(|r| r.name().to_string()).collect();
        assert_eq!(names, ["Stack", "Heap"]);
        assert_eq!(arena.used(), 96);
    }

    #[test]
    fn hex_dump_rows() {
        let dump = hex_dump(&[0xAB; 17]);
        let lines: Vec<_> = dump.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("0000: ab ab"));
        assert_eq!(lines[1], "0010: ab");
    }
}
