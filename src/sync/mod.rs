//! Background synchronisation of the local catalog mirror.
//!
//! ```text
//! bootstrap source ─┐
//!                   ├─> SyncManager ─> CatalogStore (merge + vocabulary rebuild)
//! sync source ──────┘        │
//!                            └─ sleep(jittered delay) ─> repeat
//! ```

pub mod manager;
pub mod schedule;

pub use manager::{SyncError, SyncHandle, SyncManager, SyncReport, DEFAULT_FETCH_TIMEOUT};
pub use schedule::{SyncSchedule, DEFAULT_MAX_DELAY, DEFAULT_MIN_DELAY};
