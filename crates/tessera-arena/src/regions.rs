//! Ordered table of named regions.
//!
//! [`RegionTable`] is the arena's region bookkeeping. Lookups scan in
//! registration order and return the first hit, so the table is a plain
//! `Vec`: region counts are small and insertion order is the query order.

use tessera_core::{ArenaError, Region};

/// Registered, pairwise non-overlapping regions in creation order.
#[derive(Clone, Debug, Default)]
pub struct RegionTable {
    regions: Vec<Region>,
}

impl RegionTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// The first registered region that intersects `candidate`, if any.
    pub fn conflict(&self, candidate: &Region) -> Option<&Region> {
        self.regions.iter().find(|r| r.overlaps(candidate))
    }

    /// Register `region` unless it overlaps an existing one.
    ///
    /// On conflict the table is unchanged and the error names the
    /// existing region.
    pub fn insert(&mut self, region: Region) -> Result<&Region, ArenaError> {
        if let Some(existing) = self.conflict(&region) {
            return Err(ArenaError::RegionOverlap {
                conflicting: existing.clone(),
            });
        }
        self.regions.push(region);
        let idx = self.regions.len() - 1;
        Ok(&self.regions[idx])
    }

    /// First region containing `addr`.
    pub fn find(&self, addr: usize) -> Option<&Region> {
        self.regions.iter().find(|r| r.contains(addr))
    }

    /// First region containing all of `[addr, addr + size)`.
    pub fn find_range(&self, addr: usize, size: usize) -> Option<&Region> {
        self.regions.iter().find(|r| r.contains_range(addr, size))
    }

    /// Iterate over regions in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &Region> {
        self.regions.iter()
    }

    /// Number of registered regions.
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// Whether no regions are registered.
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Drop every region.
    pub fn clear(&mut self) {
        self.regions.clear();
    }
}
