//! Per-frame owner counts.

use x86_64::PhysAddr;

use super::layout::PAGE_SIZE;

/// Fixed-size table of reference counts, one slot per managed frame.
///
/// Slot `i` belongs to the frame at `base + i * PAGE_SIZE`. A count of zero
/// means the frame is free (or was never handed out); anything above zero is
/// the number of owners still holding it.
pub struct RefTable<const N: usize> {
    base: u64,
    counts: [u32; N],
}

impl<const N: usize> RefTable<N> {
    pub const fn new() -> Self {
        RefTable {
            base: 0,
            counts: [0; N],
        }
    }

    /// Anchors slot 0 at `base` and clears every count.
    pub fn reset(&mut self, base: PhysAddr) {
        self.base = base.as_u64();
        self.counts.fill(0);
    }

    /// Table slot of the frame starting at `pa`.
    ///
    /// Panics if `pa` falls outside the frames this table covers.
    fn slot(&self, pa: PhysAddr) -> usize {
        let pa = pa.as_u64();
        let index = pa
            .checked_sub(self.base)
            .map(|offset| (offset / PAGE_SIZE as u64) as usize)
            .filter(|&index| index < N);
        match index {
            Some(index) => index,
            None => panic!("refcount: frame {:#x} outside the reference table", pa),
        }
    }

    pub fn get(&self, pa: PhysAddr) -> u32 {
        self.counts[self.slot(pa)]
    }

    pub fn set(&mut self, pa: PhysAddr, count: u32) {
        let slot = self.slot(pa);
        self.counts[slot] = count;
    }

    /// Adds an owner and returns the new count.
    pub fn increment(&mut self, pa: PhysAddr) -> u32 {
        let slot = self.slot(pa);
        self.counts[slot] += 1;
        self.counts[slot]
    }

    /// Drops one owner, if any, and returns what is left.
    pub fn decrement(&mut self, pa: PhysAddr) -> u32 {
        let slot = self.slot(pa);
        self.counts[slot] = self.counts[slot].saturating_sub(1);
        self.counts[slot]
    }
}

impl<const N: usize> Default for RefTable<N> {
    fn default() -> Self {
        Self::new()
    }
}
