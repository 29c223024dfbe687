//! Concurrent birth-date discovery
//!
//! The search is organized in three layers:
//!
//! - [`calendar`] - ordered candidate enumeration for a year
//! - [`probe`] - one classified authentication attempt per candidate
//! - [`coordinator`] - bounded worker pool with first-success-wins semantics

pub mod calendar;
pub mod coordinator;
pub mod probe;

pub use calendar::candidates_for_year;
pub use coordinator::BirthDateSearch;
pub use probe::ProbeClient;
