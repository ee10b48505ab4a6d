//! Fixed-length arrays with a 4-byte length header.
//!
//! The element size is not part of the record. It is kept beside the
//! buffer through [`Arena::record_stride`], so every store over the same
//! arena agrees on where element `i` lives until the next reset. An
//! access at a base with no recorded size fails with
//! [`ArenaError::UntrackedArray`].

use tessera_arena::Arena;
use tessera_core::{ArenaError, Ptr, Scalar};
use tracing::trace;

use crate::layout::{self, array};

/// Creates fixed-length arrays and performs index-checked element access.
pub struct ArrayStore<'a> {
    arena: &'a mut Arena,
}

impl<'a> ArrayStore<'a> {
    /// Wrap `arena` for array operations.
    pub fn new(arena: &'a mut Arena) -> Self {
        Self { arena }
    }

    /// The underlying arena.
    pub fn arena(&self) -> &Arena {
        self.arena
    }

    /// Allocate an array of `length` zeroed elements of `element_size` bytes.
    pub fn create_array(&mut self, length: usize, element_size: u32) -> Result<Ptr, ArenaError> {
        if element_size == 0 {
            return Err(ArenaError::InvalidConfig {
                reason: "array element size must be non-zero".to_string(),
            });
        }
        let header = layout::header_count(length, "array length")?;
        let total = length
            .checked_mul(element_size as usize)
            .and_then(|bytes| bytes.checked_add(array::ELEMENTS as usize))
            .ok_or_else(|| ArenaError::InvalidConfig {
                reason: format!("array of {length} × {element_size} bytes overflows"),
            })?;
        let base = self.arena.alloc(total)?;
        self.arena.put_int(base, header)?;
        self.arena.record_stride(base, element_size)?;
        trace!(array = %base, length, element_size, "array created");
        Ok(base)
    }

    /// Number of elements, read from the header.
    pub fn length(&self, base: Ptr) -> Result<usize, ArenaError> {
        layout::read_count(self.arena, base, array::LENGTH, array::ELEMENTS)
    }

    /// Element size recorded when the array at `base` was created.
    pub fn element_size(&self, base: Ptr) -> Result<u32, ArenaError> {
        self.arena
            .stride(base)
            .ok_or(ArenaError::UntrackedArray { base })
    }

    /// Address of element `index` for a `T`-typed access.
    pub fn element_addr<T: Scalar>(&self, base: Ptr, index: usize) -> Result<Ptr, ArenaError> {
        let stride = self.element_size(base)?;
        let length = self.length(base)?;
        if index >= length {
            return Err(ArenaError::IndexOutOfRange { index, length });
        }
        if T::WIDTH > stride {
            return Err(ArenaError::ElementWidth {
                element_size: stride,
                width: T::WIDTH,
            });
        }
        layout::element(self.arena, base, array::ELEMENTS, index, stride)
    }

    /// Read element `index` as `T`.
    pub fn get<T: Scalar>(&self, base: Ptr, index: usize) -> Result<T, ArenaError> {
        let addr = self.element_addr::<T>(base, index)?;
        self.arena.get(addr)
    }

    /// Write element `index` as `T`.
    pub fn set<T: Scalar>(&mut self, base: Ptr, index: usize, value: T) -> Result<(), ArenaError> {
        let addr = self.element_addr::<T>(base, index)?;
        self.arena.put(addr, value)
    }

    /// Every element, read as `T`.
    pub fn to_vec<T: Scalar>(&self, base: Ptr) -> Result<Vec<T>, ArenaError> {
        (0..self.length(base)?).map(|i| self.get(base, i)).collect()
    }

    /// Read a 4-byte integer element.
    pub fn get_int(&self, base: Ptr, index: usize) -> Result<i32, ArenaError> {
        self.get(base, index)
    }

    /// Write a 4-byte integer element.
    pub fn set_int(&mut self, base: Ptr, index: usize, value: i32) -> Result<(), ArenaError> {
        self.set(base, index, value)
    }

    /// Read an 8-byte integer element.
    pub fn get_long(&self, base: Ptr, index: usize) -> Result<i64, ArenaError> {
        self.get(base, index)
    }

    /// Write an 8-byte integer element.
    pub fn set_long(&mut self, base: Ptr, index: usize, value: i64) -> Result<(), ArenaError> {
        self.set(base, index, value)
    }

    /// Read a 2-byte integer element.
    pub fn get_short(&self, base: Ptr, index: usize) -> Result<i16, ArenaError> {
        self.get(base, index)
    }

    /// Write a 2-byte integer element.
    pub fn set_short(&mut self, base: Ptr, index: usize, value: i16) -> Result<(), ArenaError> {
        self.set(base, index, value)
    }

    /// Read a byte element.
    pub fn get_byte(&self, base: Ptr, index: usize) -> Result<i8, ArenaError> {
        self.get(base, index)
    }

    /// Write a byte element.
    pub fn set_byte(&mut self, base: Ptr, index: usize, value: i8) -> Result<(), ArenaError> {
        self.set(base, index, value)
    }

    /// Read a UTF-16 code unit element.
    pub fn get_char(&self, base: Ptr, index: usize) -> Result<u16, ArenaError> {
        self.get(base, index)
    }

    /// Write a UTF-16 code unit element.
    pub fn set_char(&mut self, base: Ptr, index: usize, value: u16) -> Result<(), ArenaError> {
        self.set(base, index, value)
    }

    /// Read a boolean element.
    pub fn get_boolean(&self, base: Ptr, index: usize) -> Result<bool, ArenaError> {
        self.get(base, index)
    }

    /// Write a boolean element.
    pub fn set_boolean(&mut self, base: Ptr, index: usize, value: bool) -> Result<(), ArenaError> {
        self.set(base, index, value)
    }
}
