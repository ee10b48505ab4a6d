//! Big-endian encoding of fixed-width scalars.
//!
//! Every multi-byte value in an arena is stored most-significant byte
//! first. The widths are part of the record layouts and never change:
//!
//! | Type   | Rust  | Width |
//! |--------|-------|-------|
//! | byte   | `i8`  | 1     |
//! | short  | `i16` | 2     |
//! | char   | `u16` | 2 (UTF-16 code unit) |
//! | int    | `i32` | 4     |
//! | long   | `i64` | 8     |
//! | bool   | `bool`| 1 (`1` = true, anything else = false) |

/// A fixed-width value with a big-endian byte encoding.
///
/// `encode_be` and `decode_be` receive slices of exactly [`Scalar::WIDTH`]
/// bytes; the arena performs all bounds checks before calling them.
pub trait Scalar: Copy {
    /// Encoded size in bytes.
    const WIDTH: u32;

    /// Write `self` into `out` (length `WIDTH`).
    fn encode_be(self, out: &mut [u8]);

    /// Read a value from `bytes` (length `WIDTH`).
    fn decode_be(bytes: &[u8]) -> Self;
}

macro_rules! impl_scalar_int {
    ($($ty:ty => $width:expr),* $(,)?) => {
        $(
            impl Scalar for $ty {
                const WIDTH: u32 = $width;

                fn encode_be(self, out: &mut [u8]) {
                    out.copy_from_slice(&self.to_be_bytes());
                }

                fn decode_be(bytes: &[u8]) -> Self {
                    let mut buf = [0u8; $width];
                    buf.copy_from_slice(bytes);
                    <$ty>::from_be_bytes(buf)
                }
            }
        )*
    };
}

impl_scalar_int! {
    i8 => 1,
    i16 => 2,
    u16 => 2,
    i32 => 4,
    i64 => 8,
}

impl Scalar for bool {
    const WIDTH: u32 = 1;

    fn encode_be(self, out: &mut [u8]) {
        out[0] = u8::from(self);
    }

    fn decode_be(bytes: &[u8]) -> Self {
        bytes[0] == 1
    }
}
