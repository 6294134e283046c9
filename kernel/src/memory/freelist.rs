//! Intrusive list of free page frames.
//!
//! A free frame has no owner, so its first bytes hold the link to the next
//! free frame. The list itself is just a head pointer and a length.

use core::ptr::NonNull;

#[derive(Debug)]
pub struct FreeList {
    head: Option<NonNull<FreeNode>>,
    len: usize,
}

// The list only ever points into frames that nobody else owns.
unsafe impl Send for FreeList {}

impl Default for FreeList {
    fn default() -> Self {
        FreeList::new()
    }
}

impl FreeList {
    /// Creates a new empty free list.
    pub const fn new() -> Self {
        FreeList { head: None, len: 0 }
    }

    /// Pushes a frame onto the head of the list.
    ///
    /// # Safety
    ///
    /// `frame` must point to writable, suitably aligned storage of at least
    /// one [`FreeNode`] that stays unused by anyone else until it is popped.
    /// It must not already be on this list.
    pub const unsafe fn push(&mut self, frame: NonNull<u8>) {
        let node = frame.cast::<FreeNode>();
        unsafe {
            node.write(FreeNode { next: self.head });
        }
        self.head = Some(node);
        self.len += 1;
    }

    /// Pops the most recently pushed frame.
    pub const fn pop(&mut self) -> Option<NonNull<u8>> {
        if let Some(node) = self.head {
            self.head = unsafe { node.as_ref().next };
            self.len -= 1;
            Some(node.cast())
        } else {
            None
        }
    }

    /// Checks whether `frame` is linked into the list.
    ///
    /// This walks the whole list and takes O(n) time.
    pub fn contains(&self, frame: NonNull<u8>) -> bool {
        let target = frame.cast::<FreeNode>();
        let mut current = self.head;
        while let Some(node) = current {
            if node == target {
                return true;
            }

            current = unsafe { node.as_ref().next };
        }
        false
    }

    pub const fn len(&self) -> usize {
        self.len
    }

    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Link stored at the start of every free frame.
#[derive(Clone, Copy, Debug)]
pub struct FreeNode {
    next: Option<NonNull<FreeNode>>,
}
