//! Tessera: manual memory management inside a fixed byte buffer.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all tessera sub-crates. For most users, adding `tessera` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use tessera::prelude::*;
//!
//! let mut arena = Arena::new(256).unwrap();
//!
//! // Raw typed access: big-endian, bounds-checked against the allocation offset.
//! let addr = arena.alloc(4).unwrap();
//! arena.put_int(addr, 0x1234_5678).unwrap();
//! assert_eq!(arena.read_bytes(addr, 4).unwrap(), &[0x12, 0x34, 0x56, 0x78]);
//!
//! // A linked list built from offsets.
//! let mut nodes = NodeStore::new(&mut arena);
//! let a = nodes.create_node(10).unwrap();
//! let b = nodes.create_node(20).unwrap();
//! nodes.set_next(a, b).unwrap();
//! assert_eq!(nodes.collect_values(a).unwrap(), [10, 20]);
//!
//! // Reset invalidates everything at once.
//! arena.reset();
//! assert_eq!(arena.used(), 0);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `tessera-core` | `Ptr`, `Region`, `Scalar`, `ArenaError` |
//! | [`arena`] | `tessera-arena` | `Arena`, `ArenaConfig`, region table |
//! | [`store`] | `tessera-store` | Node, array, vector, string and hash table stores |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Pointers, regions, scalar encoding and errors (`tessera-core`).
pub use tessera_core as types;

/// The bump arena and its configuration (`tessera-arena`).
///
/// [`arena::Arena`] is also available in the [`prelude`].
pub use tessera_arena as arena;

/// Data structures stored inside an arena (`tessera-store`).
///
/// Byte layouts of every record are documented in [`store::layout`].
pub use tessera_store as store;

/// Common imports for typical tessera usage.
///
/// ```rust
/// use tessera::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use tessera_core::{ArenaError, Ptr, Region, Scalar};

    // Arena
    pub use tessera_arena::{Arena, ArenaConfig};

    // Stores
    pub use tessera_store::{ArrayStore, HashTableStore, NodeStore, StringStore, VectorStore};
}
