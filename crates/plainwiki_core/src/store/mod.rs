//! Page persistence.
//!
//! # Responsibility
//! - Define the load/save contract the workflow depends on.
//! - Keep file naming and permission details inside the storage boundary.
//!
//! # Invariants
//! - Every backing read failure surfaces as `NotFoundOnLoad`.
//! - No locking: concurrent saves to one title race and the last rename wins.

pub mod page_store;
