//! Backing store and swap tests.

/// Behaviour shared by every backing store.
pub mod contract;

/// Host directory store.
pub mod host;

/// Swap files over a store.
pub mod swap;
