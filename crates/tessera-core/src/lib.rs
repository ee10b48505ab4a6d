//! Core types for the Tessera arena framework.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! vocabulary shared by the arena and every store built on top of it:
//! the [`Ptr`] offset handle, the [`Region`] descriptor, the big-endian
//! [`Scalar`] codec, and the single [`ArenaError`] enum.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod id;
pub mod region;
pub mod scalar;

pub use error::ArenaError;
pub use id::Ptr;
pub use region::Region;
pub use scalar::Scalar;
