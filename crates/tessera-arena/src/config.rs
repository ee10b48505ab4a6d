//! Arena configuration parameters.

use tessera_core::ArenaError;

/// Configuration for an [`Arena`](crate::Arena).
///
/// Validated at construction; all values are immutable after creation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArenaConfig {
    /// Size of the backing buffer in bytes.
    ///
    /// Addresses are stored as 4-byte signed integers, so this must not
    /// exceed [`ArenaConfig::MAX_CAPACITY`].
    pub capacity: usize,

    /// Alignment used by [`Arena::alloc_default_aligned`](crate::Arena::alloc_default_aligned).
    ///
    /// Default: 4 (the width of an int, pointer and every record header).
    /// Must be a non-zero power of two.
    pub default_alignment: usize,

    /// Label attached to log events emitted by this arena.
    pub name: String,
}

impl ArenaConfig {
    /// Default buffer size: 4KiB.
    pub const DEFAULT_CAPACITY: usize = 4096;

    /// Default alignment for [`Arena::alloc_default_aligned`](crate::Arena::alloc_default_aligned).
    pub const DEFAULT_ALIGNMENT: usize = 4;

    /// Largest buffer addressable by a [`Ptr`](tessera_core::Ptr).
    pub const MAX_CAPACITY: usize = i32::MAX as usize;

    /// Default arena label.
    pub const DEFAULT_NAME: &'static str = "arena";

    /// Create a config for the given capacity with default values for all
    /// other parameters.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            default_alignment: Self::DEFAULT_ALIGNMENT,
            name: Self::DEFAULT_NAME.to_string(),
        }
    }

    /// Set the arena label.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the default alignment.
    pub fn with_default_alignment(mut self, alignment: usize) -> Self {
        self.default_alignment = alignment;
        self
    }

    /// Check structural invariants.
    pub fn validate(&self) -> Result<(), ArenaError> {
        if self.capacity > Self::MAX_CAPACITY {
            return Err(ArenaError::InvalidConfig {
                reason: format!(
                    "capacity {} exceeds the {}-byte pointer range",
                    self.capacity,
                    Self::MAX_CAPACITY
                ),
            });
        }
        if !self.default_alignment.is_power_of_two() {
            return Err(ArenaError::InvalidConfig {
                reason: format!(
                    "default_alignment {} is not a non-zero power of two",
                    self.default_alignment
                ),
            });
        }
        Ok(())
    }
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}
