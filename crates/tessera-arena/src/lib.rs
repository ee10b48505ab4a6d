//! Fixed-capacity bump-allocated byte arena.
//!
//! An [`Arena`] treats a `Vec<u8>` as an address space. Allocations hand
//! out [`Ptr`](tessera_core::Ptr) offsets, never references, and every
//! typed read or write is bounds-checked against the allocation offset.
//!
//! # Architecture
//!
//! ```text
//! Arena
//! ├── data: Vec<u8>        (capacity fixed at construction)
//! ├── cursor               (bump pointer, only moves forward until reset)
//! ├── alignment_waste      (bytes skipped by aligned allocations)
//! ├── RegionTable          (named, non-overlapping [start, end) ranges)
//! ├── strides              (element size of each array record)
//! └── generation           (reset counter)
//! ```
//!
//! # Limitations
//!
//! There is no free list. Space is reclaimed only by [`Arena::reset`],
//! which invalidates every pointer at once. Structures that grow (see the
//! vector store in `tessera-store`) abandon their old blocks, which stay
//! counted in [`Arena::used`].
//!
//! An arena is not synchronised. Callers that share one across threads
//! must provide their own exclusion.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod arena;
pub mod config;
pub mod regions;

// Public re-exports for the primary API surface.
pub use arena::Arena;
pub use config::ArenaConfig;
pub use regions::RegionTable;
