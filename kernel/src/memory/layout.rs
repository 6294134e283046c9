//! Physical memory layout constants.

use x86_64::structures::paging::{PageSize, Size4KiB};

/// Size of one physical page frame in bytes.
pub const PAGE_SIZE: usize = Size4KiB::SIZE as usize;

/// First physical address past the memory the page allocator manages.
pub const PHYS_TOP: u64 = 128 * 1024 * 1024;

/// Number of reference-count slots needed to cover `0..PHYS_TOP`.
pub const MAX_FRAMES: usize = PHYS_TOP as usize / PAGE_SIZE;

/// Byte written over a page when it is handed out.
pub const ALLOC_JUNK: u8 = 0x05;

/// Byte written over a page when its last owner lets go of it.
pub const FREE_JUNK: u8 = 0x01;

/// Rounds `addr` up to the next page boundary.
pub const fn page_round_up(addr: u64) -> u64 {
    (addr + PAGE_SIZE as u64 - 1) & !(PAGE_SIZE as u64 - 1)
}

/// Rounds `addr` down to the page boundary at or below it.
pub const fn page_round_down(addr: u64) -> u64 {
    addr & !(PAGE_SIZE as u64 - 1)
}
