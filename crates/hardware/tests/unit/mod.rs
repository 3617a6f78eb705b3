//! # Unit Components
//!
//! This module serves as the central hub for the unit tests of the simulator. It
//! organizes them the same way the library is organized: processor core, ISA
//! definitions, kernel, storage and SoC integration.







/// Unit tests for backing stores and swap space.
pub mod storage;
