/// Utility module - small allocation helpers

pub mod slot_allocator;

pub use slot_allocator::*;
