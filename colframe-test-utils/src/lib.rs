use std::sync::{Arc, Once};

use colframe_column::{AllocatorRef, CheckedAllocator};

static INIT: Once = Once::new();

/// Initialize tracing for test binaries. Safe to call multiple times.
///
/// Honors `RUST_LOG`; falls back to `info` when unset or unparsable.
pub fn init_tracing_for_tests() {
    INIT.call_once(|| {
        use tracing_subscriber::filter::EnvFilter;
        use tracing_subscriber::fmt;
        let filter = match std::env::var("RUST_LOG") {
            Ok(_) => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            Err(_) => EnvFilter::new("info"),
        };
        let _ = fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_test_writer()
            .try_init();
    });
}

/// A checked allocator plus the type-erased handle DataFrames take.
///
/// Keep the first value to assert on outstanding bytes once every frame
/// built from the second has been dropped.
pub fn checked_allocator() -> (Arc<CheckedAllocator>, AllocatorRef) {
    let checked = Arc::new(CheckedAllocator::new());
    let allocator: AllocatorRef = checked.clone();
    (checked, allocator)
}

#[cfg(feature = "auto-init")]
mod auto {
    // Use ctor to run at binary init time to avoid having to call init in every test.
    use ctor::ctor;

    #[ctor]
    fn init() {
        super::init_tracing_for_tests();
    }
}
