//! Background Tasks Module
//!
//! - TTL cleanup: purges expired entries from the in-memory cache backend

mod cleanup;

pub use cleanup::spawn_cleanup_task;
