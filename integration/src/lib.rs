#![no_std]

pub mod board;
pub mod global_allocator;
