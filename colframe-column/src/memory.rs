//! Memory accounting for buffers owned by colframe columns.
//!
//! Arrow allocates and reference-counts its own buffers. The [`Allocator`]
//! hook tracks how many bytes the columns built through it still hold, so a
//! test can assert that every DataFrame released every column it owned. A
//! [`Reservation`] is taken when a column is built and returned to the
//! allocator when the last clone of that column drops.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Accounting hook injected at DataFrame construction.
///
/// Every DataFrame derived from another (through slicing, selection, joins)
/// inherits its parent's allocator, so all descendants report to the same
/// counter.
pub trait Allocator: Send + Sync + fmt::Debug {
    /// Record `bytes` as newly held.
    fn allocate(&self, bytes: usize);
    /// Record `bytes` as released. Freeing more than was allocated is a bug
    /// in the caller and may panic.
    fn free(&self, bytes: usize);
    /// Bytes currently outstanding.
    fn allocated(&self) -> usize;
}

pub type AllocatorRef = Arc<dyn Allocator>;

/// Allocator that records nothing. Used when the caller does not inject one.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnaccountedAllocator;

impl Allocator for UnaccountedAllocator {
    fn allocate(&self, _bytes: usize) {}
    fn free(&self, _bytes: usize) {}
    fn allocated(&self) -> usize {
        0
    }
}

/// Allocator that counts outstanding bytes and fails fast on over-release.
#[derive(Debug, Default)]
pub struct CheckedAllocator {
    allocated: AtomicUsize,
    reservations: AtomicUsize,
}

impl CheckedAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of reservations that have not been returned yet.
    pub fn outstanding_reservations(&self) -> usize {
        self.reservations.load(Ordering::Acquire)
    }

    /// Panics unless exactly `expected` bytes are outstanding.
    #[track_caller]
    pub fn assert_size(&self, expected: usize) {
        let got = self.allocated();
        assert_eq!(
            got,
            expected,
            "invalid memory size exp={expected}, got={got} ({} reservations outstanding)",
            self.outstanding_reservations()
        );
    }
}

impl Allocator for CheckedAllocator {
    fn allocate(&self, bytes: usize) {
        self.allocated.fetch_add(bytes, Ordering::AcqRel);
        self.reservations.fetch_add(1, Ordering::AcqRel);
    }

    fn free(&self, bytes: usize) {
        let previous = self
            .allocated
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |current| {
                current.checked_sub(bytes)
            });
        assert!(
            previous.is_ok(),
            "too many releases: freeing {bytes} bytes with only {} outstanding",
            self.allocated()
        );
        let reservations = self
            .reservations
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |current| {
                current.checked_sub(1)
            });
        assert!(reservations.is_ok(), "too many releases: no reservation outstanding");
    }

    fn allocated(&self) -> usize {
        self.allocated.load(Ordering::Acquire)
    }
}

/// Bytes held against an allocator; returned when dropped.
pub struct Reservation {
    allocator: AllocatorRef,
    bytes: usize,
}

impl Reservation {
    pub fn new(allocator: &AllocatorRef, bytes: usize) -> Arc<Self> {
        allocator.allocate(bytes);
        Arc::new(Self {
            allocator: Arc::clone(allocator),
            bytes,
        })
    }

    pub fn bytes(&self) -> usize {
        self.bytes
    }
}

impl fmt::Debug for Reservation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reservation")
            .field("bytes", &self.bytes)
            .finish()
    }
}

impl Drop for Reservation {
    fn drop(&mut self) {
        self.allocator.free(self.bytes);
    }
}

/// The allocator used when none is supplied.
pub fn default_allocator() -> AllocatorRef {
    Arc::new(UnaccountedAllocator)
}
