/*
Copyright © 2024–2025 Mako and JayAndJef

This file is part of locOS.

locOS is free software: you can redistribute it and/or modify it under the terms of the GNU General
Public License as published by the Free Software Foundation, either version 3 of the License, or (at
your option) any later version.

locOS is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the
implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the GNU General Public
License for more details.

You should have received a copy of the GNU General Public License along with locOS. If not, see
<https://www.gnu.org/licenses/>.
*/

//! Reference-counted physical page allocator.
//!
//! Pages come from one contiguous physical range that is carved into 4 KiB
//! frames at boot. Free frames sit on an intrusive LIFO list; every frame
//! also has an owner count so a page can be shared (copy-on-write mappings)
//! and only goes back on the list once its last owner frees it.
//!
//! A single spin lock guards the list and the counts together. The full-page
//! junk fills run outside of it: a frame being filled has just been popped,
//! or has just dropped to zero owners, so no other context can reach it.

use core::ptr::NonNull;

use conquer_once::spin::OnceCell;
use spin::Mutex;
use x86_64::{
    PhysAddr,
    structures::paging::{FrameAllocator, FrameDeallocator, PhysFrame, Size4KiB},
};

use super::{
    freelist::FreeList,
    layout::{ALLOC_JUNK, FREE_JUNK, PAGE_SIZE, page_round_down, page_round_up},
    refcount::RefTable,
};
use crate::{debug, info, trace};

/// Bounds of the managed memory, fixed once the allocator is initialized.
#[derive(Clone, Copy, Debug)]
struct Region {
    /// First managed frame.
    base: PhysAddr,
    /// First address past the last managed frame.
    top: PhysAddr,
    /// Virtual address at which physical address 0 is mapped.
    phys_offset: u64,
}

impl Region {
    fn frames(&self) -> usize {
        ((self.top.as_u64() - self.base.as_u64()) / PAGE_SIZE as u64) as usize
    }

    fn contains(&self, pa: PhysAddr) -> bool {
        pa >= self.base && pa < self.top
    }

    fn virt_of(&self, pa: PhysAddr) -> NonNull<u8> {
        let va = pa.as_u64() + self.phys_offset;
        match NonNull::new(va as *mut u8) {
            Some(ptr) => ptr,
            None => panic!("page allocator: frame {:#x} maps to a null pointer", pa.as_u64()),
        }
    }

    fn phys_of(&self, page: NonNull<u8>) -> PhysAddr {
        PhysAddr::new(page.as_ptr() as u64 - self.phys_offset)
    }
}

/// Everything the lock protects.
struct Kmem<const N: usize> {
    free_list: FreeList,
    refs: RefTable<N>,
}

/// Physical page allocator with per-frame reference counts.
///
/// `N` is the number of frames the reference table can describe; the range
/// passed to [`PageAllocator::init`] must not be larger than that.
pub struct PageAllocator<const N: usize> {
    region: OnceCell<Region>,
    kmem: Mutex<Kmem<N>>,
}

impl<const N: usize> Default for PageAllocator<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> PageAllocator<N> {
    /// Creates an allocator with no memory. Nothing can be allocated until
    /// [`PageAllocator::init`] runs.
    pub const fn new() -> Self {
        PageAllocator {
            region: OnceCell::uninit(),
            kmem: Mutex::new(Kmem {
                free_list: FreeList::new(),
                refs: RefTable::new(),
            }),
        }
    }

    /// Hands every whole page in `[range_start, range_end)` to the allocator.
    ///
    /// Each frame starts with a count of zero and is pushed through
    /// [`PageAllocator::free`], so the lowest frame ends up deepest in the
    /// free list and the highest frame is allocated first.
    ///
    /// # Safety
    ///
    /// The range must be real, writable memory mapped at `phys_offset` and
    /// used by nothing else. This must run before any other context uses
    /// the allocator.
    pub unsafe fn init(&self, range_start: PhysAddr, range_end: PhysAddr, phys_offset: u64) {
        let base = page_round_up(range_start.as_u64());
        let top = page_round_down(range_end.as_u64()).max(base);
        let region = Region {
            base: PhysAddr::new(base),
            top: PhysAddr::new(top),
            phys_offset,
        };

        if region.frames() > N {
            panic!(
                "page allocator: {} frames do not fit in a table of {}",
                region.frames(),
                N
            );
        }
        if self.region.try_init_once(|| region).is_err() {
            panic!("page allocator already initialized");
        }

        debug!(
            "page allocator: managing {:#x}..{:#x} ({} frames)",
            base,
            top,
            region.frames()
        );

        self.kmem.lock().refs.reset(region.base);
        for pa in (base..top).step_by(PAGE_SIZE) {
            self.free(PhysAddr::new(pa));
        }

        info!("page allocator initialized");
    }

    fn region(&self) -> &Region {
        match self.region.get() {
            Some(region) => region,
            None => panic!("page allocator used before initialization"),
        }
    }

    /// Takes one frame off the free list.
    ///
    /// The frame comes back with a reference count of one and its contents
    /// overwritten with junk. Returns `None` when memory is exhausted.
    pub fn allocate(&self) -> Option<PhysFrame> {
        let region = self.region.get()?;

        let page = {
            let mut kmem = self.kmem.lock();
            let page = kmem.free_list.pop();
            if let Some(page) = page {
                kmem.refs.set(region.phys_of(page), 1);
            }
            page
        };

        let Some(page) = page else {
            debug!("page allocator: out of memory");
            return None;
        };

        junk_fill(page, ALLOC_JUNK);
        Some(PhysFrame::containing_address(region.phys_of(page)))
    }

    /// Releases one ownership of the frame at `pa`.
    ///
    /// The frame goes back on the free list only when this was its last
    /// owner. Panics if `pa` is not the start of a managed frame.
    pub fn free(&self, pa: PhysAddr) {
        let region = self.region();
        if pa.as_u64() % PAGE_SIZE as u64 != 0 || !region.contains(pa) {
            panic!("free: bad frame {:#x}", pa.as_u64());
        }

        let remaining = self.kmem.lock().refs.decrement(pa);
        if remaining > 0 {
            trace!("free: {:#x} still has {} owners", pa.as_u64(), remaining);
            return;
        }

        let page = region.virt_of(pa);
        junk_fill(page, FREE_JUNK);

        // SAFETY: the count just hit zero, so this context holds the only
        // handle to the frame and it is not on the list yet.
        unsafe { self.kmem.lock().free_list.push(page) };
        trace!("free: reclaimed {:#x}", pa.as_u64());
    }

    /// Registers one more owner of an already allocated frame.
    ///
    /// Panics if `pa` lies outside managed memory or the frame currently has
    /// no owner, which means a use-after-free somewhere.
    pub fn increase_reference(&self, pa: PhysAddr) {
        let region = self.region();
        let mut kmem = self.kmem.lock();
        if !region.contains(pa) || kmem.refs.get(pa) < 1 {
            panic!("increase_reference: frame {:#x} has no owner", pa.as_u64());
        }
        let count = kmem.refs.increment(pa);
        drop(kmem);

        trace!("increase_reference: {:#x} now has {} owners", pa.as_u64(), count);
    }

    /// Current owner count of the frame containing `pa`.
    pub fn reference_count(&self, pa: PhysAddr) -> u32 {
        let region = self.region();
        if !region.contains(pa) {
            panic!("reference_count: frame {:#x} not managed", pa.as_u64());
        }
        self.kmem.lock().refs.get(pa)
    }

    /// Checks whether the frame at `pa` is linked on the free list.
    ///
    /// Walks the whole list; meant for diagnostics, not hot paths.
    pub fn is_free(&self, pa: PhysAddr) -> bool {
        let Some(region) = self.region.get() else {
            return false;
        };
        if !region.contains(pa) {
            return false;
        }
        self.kmem.lock().free_list.contains(region.virt_of(pa))
    }

    /// Number of frames on the free list.
    pub fn free_frames(&self) -> usize {
        self.kmem.lock().free_list.len()
    }

    /// Number of frames under management, free or not.
    pub fn total_frames(&self) -> usize {
        self.region.get().map_or(0, Region::frames)
    }

    /// Pointer through which the kernel can touch the contents of `frame`.
    pub fn page_ptr(&self, frame: PhysFrame) -> *mut u8 {
        self.region().virt_of(frame.start_address()).as_ptr()
    }
}

/// Overwrites a whole page with `byte`.
///
/// The caller must be the only one able to reach `page`.
fn junk_fill(page: NonNull<u8>, byte: u8) {
    if cfg!(feature = "junk-fill") {
        unsafe { page.as_ptr().write_bytes(byte, PAGE_SIZE) };
    }
}

unsafe impl<const N: usize> FrameAllocator<Size4KiB> for &PageAllocator<N> {
    fn allocate_frame(&mut self) -> Option<PhysFrame> {
        self.allocate()
    }
}

impl<const N: usize> FrameDeallocator<Size4KiB> for &PageAllocator<N> {
    unsafe fn deallocate_frame(&mut self, frame: PhysFrame) {
        self.free(frame.start_address());
    }
}
