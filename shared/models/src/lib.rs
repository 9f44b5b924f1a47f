//! # PQLens Core Domain Models
//!
//! This crate contains the core domain models for the PQLens power-quality
//! report extraction system. All models implement serialization and
//! deserialization with serde.
//!
//! ## Key Models
//!
//! - **Report**: Identity and time-window metadata extracted from a report's
//!   first page and filename
//! - **TableKind**: The four harmonic table sections a report can contain
//! - **RawRow** / **HarmonicRow**: One harmonic-index observation, before and
//!   after numeric normalization
//! - **SplitTable**: A validated table partitioned by time-limit percentile
//!   and harmonic parity
//! - **Violation**: One measured phase value exceeding its regulatory maximum
//! - **Weekly summary records**: Daily THD/TDD readings, power-quality events
//!   and the generating-hours time table for 7-day summary reports
//!
//! ## Invariants
//!
//! Harmonic indices are integers in [2, 50]; index 1 (the fundamental) and
//! anything year-like is extraction noise and never enters a model. Within a
//! table, (harmonic index, percentile) is unique with first-seen precedence.

pub mod report;
pub mod row;
pub mod split;
pub mod summary;
pub mod table;
pub mod violation;


pub use report::*;
pub use row::*;
pub use split::*;
pub use summary::*;
pub use table::*;
pub use violation::*;
