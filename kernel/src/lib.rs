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

//! Physical page allocator for the locOS kernel.
//!
//! The kernel links this crate and calls [`memory::init_page_allocator`]
//! once at boot; after that any CPU may allocate, share and free pages.

#![cfg_attr(not(test), no_std)]

pub mod memory;
pub mod output;
pub mod serial;
