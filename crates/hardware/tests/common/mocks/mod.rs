//! Mock collaborators.

/// Mock backing store.
pub mod storage;
