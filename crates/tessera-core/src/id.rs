//! The [`Ptr`] offset handle.

use std::fmt;

/// A byte offset into an arena's buffer.
///
/// Pointers are stored in arena records as 4-byte big-endian signed
/// integers, so the handle wraps an `i32`. [`Ptr::NULL`] (`-1`) denotes
/// "no target". Any other negative value is never issued by an arena and
/// is rejected by every bounds check.
///
/// A `Ptr` carries no lifetime: it stays numerically valid after
/// `Arena::reset`, but then refers to whatever is allocated next at that
/// offset. Tracking that is the caller's responsibility.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ptr(pub i32);

impl Ptr {
    /// The null pointer sentinel.
    pub const NULL: Self = Self(-1);

    /// Width of a stored pointer in bytes.
    pub const WIDTH: u32 = 4;

    /// Whether this is the null sentinel.
    pub const fn is_null(self) -> bool {
        self.0 == Self::NULL.0
    }

    /// Raw offset value.
    pub const fn get(self) -> i32 {
        self.0
    }

    /// The offset as a buffer index, or `None` for negative values.
    pub fn as_usize(self) -> Option<usize> {
        usize::try_from(self.0).ok()
    }

    /// Pointer `bytes` past this one. `None` on `i32` overflow.
    pub fn offset(self, bytes: u32) -> Option<Ptr> {
        let bytes = i32::try_from(bytes).ok()?;
        self.0.checked_add(bytes).map(Ptr)
    }
}

impl fmt::Display for Ptr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            write!(f, "null")
        } else {
            write!(f, "{:#x}", self.0)
        }
    }
}

impl From<i32> for Ptr {
    fn from(v: i32) -> Self {
        Self(v)
    }
}

impl From<Ptr> for i32 {
    fn from(p: Ptr) -> Self {
        p.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_is_minus_one() {
        assert_eq!(Ptr::NULL.get(), -1);
        assert!(Ptr::NULL.is_null());
        assert!(!Ptr(0).is_null());
    }

    #[test]
    fn negative_has_no_index() {
        assert_eq!(Ptr::NULL.as_usize(), None);
        assert_eq!(Ptr(-7).as_usize(), None);
        assert_eq!(Ptr(12).as_usize(), Some(12));
    }

    #[test]
    fn offset_is_checked() {
        assert_eq!(Ptr(4).offset(8), Some(Ptr(12)));
        assert_eq!(Ptr(i32::MAX).offset(1), None);
        assert_eq!(Ptr(0).offset(u32::MAX), None);
    }

    #[test]
    fn display_formats() {
        assert_eq!(Ptr::NULL.to_string(), "null");
        assert_eq!(Ptr(255).to_string(), "0xff");
    }
}
