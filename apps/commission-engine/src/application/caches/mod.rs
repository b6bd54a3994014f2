//! Reference Caches
//!
//! Read-mostly snapshots of reference data. Readers clone an `Arc` to the
//! current generation and never block on a rebuild; a rebuild constructs the
//! next generation off-lock and swaps the pointer.

mod reference_caches;
mod snapshot;

pub use reference_caches::ReferenceCaches;
pub use snapshot::{KeyedCache, SnapshotCache};
