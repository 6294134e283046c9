//! Physical memory management.
//!
//! This module provides:
//! - The kernel's one page allocator, [`PAGE_ALLOCATOR`]
//! - Per-page reference counts for shared (copy-on-write) pages
//! - The layout constants that bound managed memory

pub mod freelist;
pub mod layout;
pub mod page_alloc;
pub mod refcount;

use x86_64::{PhysAddr, structures::paging::PhysFrame};

pub use layout::{MAX_FRAMES, PAGE_SIZE, PHYS_TOP};
pub use page_alloc::PageAllocator;

/// Allocator for every physical page between the end of the kernel image
/// and [`PHYS_TOP`].
pub static PAGE_ALLOCATOR: PageAllocator<MAX_FRAMES> = PageAllocator::new();

/// Initializes [`PAGE_ALLOCATOR`] with the memory from `end_of_kernel` up to
/// [`PHYS_TOP`].
///
/// # Safety
/// The caller must ensure that `[end_of_kernel, PHYS_TOP)` is unused RAM
/// mapped at `phys_offset`, and that no other CPU is running yet.
/// This function must only be called once.
pub unsafe fn init_page_allocator(end_of_kernel: PhysAddr, phys_offset: u64) {
    unsafe { PAGE_ALLOCATOR.init(end_of_kernel, PhysAddr::new(PHYS_TOP), phys_offset) };
}

/// Allocates one page with a single owner, or `None` if memory ran out.
pub fn alloc_page() -> Option<PhysFrame> {
    PAGE_ALLOCATOR.allocate()
}

/// Drops one owner of the page at `pa`, reclaiming it once nobody is left.
pub fn free_page(pa: PhysAddr) {
    PAGE_ALLOCATOR.free(pa);
}

/// Adds an owner to the allocated page at `pa`.
pub fn increase_reference(pa: PhysAddr) {
    PAGE_ALLOCATOR.increase_reference(pa);
}

/// Number of owners the page at `pa` currently has.
pub fn page_reference_count(pa: PhysAddr) -> u32 {
    PAGE_ALLOCATOR.reference_count(pa)
}
