/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 19/10/26
******************************************************************************/

//! Request id allocation.
//!
//! Each user request carries a `UserReqID` the venue echoes back.

use std::sync::atomic::{AtomicI64, Ordering};

/// Hands out request ids for a session.
///
/// Uses atomic operations for thread-safe access without locks.
#[derive(Debug)]
pub struct RequestIdGenerator {
    /// Id returned by the next allocation.
    next_id: AtomicI64,
}

impl RequestIdGenerator {
    /// Creates a generator starting at 1.
    #[must_use]
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    /// Creates a generator starting at the given id.
    ///
    /// # Arguments
    /// * `initial` - First id to hand out
    #[must_use]
    pub fn starting_at(initial: i64) -> Self {
        Self {
            next_id: AtomicI64::new(initial),
        }
    }

    /// Allocates and returns the next id.
    ///
    /// Wraps around on overflow.
    #[inline]
    pub fn allocate(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }
}

impl Default for RequestIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}
