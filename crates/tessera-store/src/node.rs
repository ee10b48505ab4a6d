//! Singly linked nodes stored as fixed 8-byte records.
//!
//! A node is `[value:i32][next:ptr]`. Lists are built by pointing one
//! node's `next` at another; [`Ptr::NULL`] terminates the list.

use tessera_arena::Arena;
use tessera_core::{ArenaError, Ptr};
use tracing::trace;

use crate::layout::{self, node, ChainGuard};

/// Creates and links node records inside an arena.
pub struct NodeStore<'a> {
    arena: &'a mut Arena,
}

impl<'a> NodeStore<'a> {
    /// Wrap `arena` for node operations.
    pub fn new(arena: &'a mut Arena) -> Self {
        Self { arena }
    }

    /// The underlying arena.
    pub fn arena(&self) -> &Arena {
        self.arena
    }

    /// Size of a node record in bytes.
    pub const fn node_size() -> u32 {
        node::SIZE
    }

    /// Allocate a node holding `value` with a null `next`.
    pub fn create_node(&mut self, value: i32) -> Result<Ptr, ArenaError> {
        let ptr = self.arena.alloc(node::SIZE as usize)?;
        self.init(ptr, value)
    }

    /// [`NodeStore::create_node`], placed at the next multiple of `alignment`.
    pub fn create_node_aligned(&mut self, value: i32, alignment: usize) -> Result<Ptr, ArenaError> {
        let ptr = self.arena.alloc_aligned(node::SIZE as usize, alignment)?;
        self.init(ptr, value)
    }

    fn init(&mut self, ptr: Ptr, value: i32) -> Result<Ptr, ArenaError> {
        self.arena.put_int(layout::field(self.arena, ptr, node::VALUE)?, value)?;
        self.arena.put_ptr(layout::field(self.arena, ptr, node::NEXT)?, Ptr::NULL)?;
        trace!(node = %ptr, value, "node created");
        Ok(ptr)
    }

    /// The value stored in `node`.
    pub fn value(&self, node: Ptr) -> Result<i32, ArenaError> {
        layout::check_record(self.arena, node, node::SIZE)?;
        self.arena.get_int(layout::field(self.arena, node, node::VALUE)?)
    }

    /// Overwrite the value stored in `node`.
    pub fn set_value(&mut self, node: Ptr, value: i32) -> Result<(), ArenaError> {
        layout::check_record(self.arena, node, node::SIZE)?;
        self.arena.put_int(layout::field(self.arena, node, node::VALUE)?, value)
    }

    /// The successor of `node`, or [`Ptr::NULL`].
    pub fn next(&self, node: Ptr) -> Result<Ptr, ArenaError> {
        layout::check_record(self.arena, node, node::SIZE)?;
        self.arena.get_ptr(layout::field(self.arena, node, node::NEXT)?)
    }

    /// Point `node` at `next`.
    ///
    /// `next` must be null or reference a complete node inside the
    /// allocated prefix; otherwise [`ArenaError::InvalidPointer`] is
    /// returned and `node` is unchanged.
    pub fn set_next(&mut self, node: Ptr, next: Ptr) -> Result<(), ArenaError> {
        layout::check_record(self.arena, node, node::SIZE)?;
        layout::check_link(self.arena, next, node::SIZE)?;
        self.arena.put_ptr(layout::field(self.arena, node, node::NEXT)?, next)
    }

    /// Whether `ptr` is a valid link target: null, or a complete node.
    pub fn is_valid_link(&self, ptr: Ptr) -> bool {
        layout::check_link(self.arena, ptr, node::SIZE).is_ok()
    }

    /// Walk the list starting at `head`.
    ///
    /// Yields `(address, value)` pairs. Every hop is validated; an invalid
    /// link or a cycle yields one [`ArenaError::InvalidPointer`] and ends
    /// the iteration.
    pub fn iter(&self, head: Ptr) -> Iter<'_> {
        Iter {
            arena: self.arena,
            cursor: head,
            guard: ChainGuard::new(self.arena, node::SIZE),
            done: false,
        }
    }

    /// Values of the list starting at `head`, in link order.
    pub fn collect_values(&self, head: Ptr) -> Result<Vec<i32>, ArenaError> {
        self.iter(head).map(|item| item.map(|(_, value)| value)).collect()
    }

    /// Number of nodes reachable from `head`.
    pub fn list_len(&self, head: Ptr) -> Result<usize, ArenaError> {
        self.iter(head).try_fold(0, |n, item| item.map(|_| n + 1))
    }
}

/// Iterator over a node list. See [`NodeStore::iter`].
pub struct Iter<'s> {
    arena: &'s Arena,
    cursor: Ptr,
    guard: ChainGuard,
    done: bool,
}

impl Iter<'_> {
    fn step(&mut self) -> Result<(Ptr, i32), ArenaError> {
        let current = self.cursor;
        self.guard.visit(self.arena, current)?;
        let value = self.arena.get_int(layout::field(self.arena, current, node::VALUE)?)?;
        self.cursor = self.arena.get_ptr(layout::field(self.arena, current, node::NEXT)?)?;
        Ok((current, value))
    }
}

impl Iterator for Iter<'_> {
    type Item = Result<(Ptr, i32), ArenaError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.cursor.is_null() {
            return None;
        }
        let item = self.step();
        self.done = item.is_err();
        Some(item)
    }
}
