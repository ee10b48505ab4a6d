//! Data structures laid out inside a tessera [`Arena`](tessera_arena::Arena).
//!
//! Each store wraps `&mut Arena` and keeps no copy of the buffer. Records
//! are addressed by [`Ptr`](tessera_core::Ptr) offsets and every field
//! access goes through the arena's bounds-checked typed accessors, so a
//! corrupted offset surfaces as an [`ArenaError`](tessera_core::ArenaError)
//! rather than a stray read.
//!
//! | Store | Record |
//! |-------|--------|
//! | [`NodeStore`] | `[value][next]` singly linked nodes |
//! | [`ArrayStore`] | `[length][elements…]` fixed arrays |
//! | [`VectorStore`] | `[length][capacity][data]` header over a growable block |
//! | [`StringStore`] | `[length][u16…]` UTF-16 strings |
//! | [`HashTableStore`] | `[bucket count][heads…]` with chained entries |
//!
//! Byte layouts are listed in [`layout`].
//!
//! Because a store holds the arena's unique borrow, the arena cannot be
//! reset while a store is alive. Pointers obtained before a reset are
//! plain integers and must not be reused afterwards.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod array;
pub mod hash;
pub mod layout;
pub mod node;
pub mod string;
pub mod vector;

pub use array::ArrayStore;
pub use hash::HashTableStore;
pub use node::NodeStore;
pub use string::StringStore;
pub use vector::VectorStore;
