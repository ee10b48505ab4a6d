//! Length-prefixed UTF-16 strings.
//!
//! Indexing is by code unit. A character outside the basic multilingual
//! plane occupies two slots, and each half of the surrogate pair can be
//! read or overwritten on its own.

use tessera_arena::Arena;
use tessera_core::{ArenaError, Ptr};
use tracing::trace;

use crate::layout::{self, string};

/// Creates strings and performs code-unit access.
pub struct StringStore<'a> {
    arena: &'a mut Arena,
}

impl<'a> StringStore<'a> {
    /// Wrap `arena` for string operations.
    pub fn new(arena: &'a mut Arena) -> Self {
        Self { arena }
    }

    /// The underlying arena.
    pub fn arena(&self) -> &Arena {
        self.arena
    }

    /// Allocate a string holding the UTF-16 encoding of `text`.
    pub fn create_string(&mut self, text: &str) -> Result<Ptr, ArenaError> {
        let units: Vec<u16> = text.encode_utf16().collect();
        let header = layout::header_count(units.len(), "string length")?;
        let mut record = Vec::with_capacity(string::UNITS as usize + units.len() * string::UNIT_SIZE as usize);
        record.extend_from_slice(&header.to_be_bytes());
        for unit in &units {
            record.extend_from_slice(&unit.to_be_bytes());
        }
        let base = self.arena.alloc(record.len())?;
        self.arena.write_bytes(base, &record)?;
        trace!(string = %base, units = units.len(), "string created");
        Ok(base)
    }

    /// Number of UTF-16 code units.
    pub fn length(&self, base: Ptr) -> Result<usize, ArenaError> {
        layout::read_count(self.arena, base, string::LENGTH, string::UNITS)
    }

    /// All code units in order.
    pub fn code_units(&self, base: Ptr) -> Result<Vec<u16>, ArenaError> {
        let length = self.length(base)?;
        let start = layout::field(self.arena, base, string::UNITS)?;
        let bytes = self
            .arena
            .read_bytes(start, length.saturating_mul(string::UNIT_SIZE as usize))?;
        Ok(bytes
            .chunks_exact(string::UNIT_SIZE as usize)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect())
    }

    /// Decode the string. Unpaired surrogates become U+FFFD.
    pub fn get_string(&self, base: Ptr) -> Result<String, ArenaError> {
        Ok(String::from_utf16_lossy(&self.code_units(base)?))
    }

    /// Code unit at `index`.
    pub fn char_at(&self, base: Ptr, index: usize) -> Result<u16, ArenaError> {
        let addr = self.unit_addr(base, index)?;
        self.arena.get_char(addr)
    }

    /// Overwrite the code unit at `index`.
    pub fn set_char_at(&mut self, base: Ptr, index: usize, unit: u16) -> Result<(), ArenaError> {
        let addr = self.unit_addr(base, index)?;
        self.arena.put_char(addr, unit)
    }

    fn unit_addr(&self, base: Ptr, index: usize) -> Result<Ptr, ArenaError> {
        let length = self.length(base)?;
        if index >= length {
            return Err(ArenaError::IndexOutOfRange { index, length });
        }
        layout::element(self.arena, base, string::UNITS, index, string::UNIT_SIZE)
    }
}
