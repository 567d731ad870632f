//! Shared infrastructure utilities for stage navigation.
//!
//! Kept out of `stage-types` so the domain crate stays free of IO:
//!
//! - **`atomic_write`**: Crash-safe file persistence (temp + rename)

pub mod atomic_write;

pub use atomic_write::{
    AtomicWriteOptions, FileSyncPolicy, ParentDirSyncPolicy, atomic_write,
    atomic_write_with_options, recover_bak_file,
};
