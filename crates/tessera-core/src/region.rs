//! Named, half-open address ranges.

use std::fmt;

use crate::error::ArenaError;

/// Fallback label for regions created with an empty name.
pub const UNNAMED: &str = "Unnamed";

/// An immutable, named byte range `[start, end)` of an arena.
///
/// Regions are advisory: they classify addresses for validation queries
/// but never gate allocation.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Region {
    start: usize,
    end: usize,
    name: String,
}

impl Region {
    /// Create a region over `[start, end)`.
    ///
    /// An empty `name` is replaced with [`UNNAMED`]. Fails with
    /// [`ArenaError::InvalidConfig`] if `end < start`.
    pub fn new(start: usize, end: usize, name: impl Into<String>) -> Result<Self, ArenaError> {
        if end < start {
            return Err(ArenaError::InvalidConfig {
                reason: format!("region end {end:#x} precedes start {start:#x}"),
            });
        }
        let mut name = name.into();
        if name.is_empty() {
            name = UNNAMED.to_string();
        }
        Ok(Self { start, end, name })
    }

    /// First address in the region.
    pub fn start(&self) -> usize {
        self.start
    }

    /// One past the last address in the region.
    pub fn end(&self) -> usize {
        self.end
    }

    /// Region length in bytes.
    pub fn size(&self) -> usize {
        self.end - self.start
    }

    /// Region label.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether `addr` lies inside `[start, end)`.
    pub fn contains(&self, addr: usize) -> bool {
        addr >= self.start && addr < self.end
    }

    /// Whether all of `[addr, addr + size)` lies inside the region.
    pub fn contains_range(&self, addr: usize, size: usize) -> bool {
        match addr.checked_add(size) {
            Some(end) => addr >= self.start && end <= self.end,
            None => false,
        }
    }

    /// Whether the two half-open ranges intersect.
    pub fn overlaps(&self, other: &Region) -> bool {
        !(self.end <= other.start || self.start >= other.end)
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: [{:#X} - {:#X}] ({} bytes)",
            self.name,
            self.start,
            self.end,
            self.size()
        )
    }
}
