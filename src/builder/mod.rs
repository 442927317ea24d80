//! Builder API for ergonomic automaton construction.
//!
//! This module provides a fluent builder that names states instead of
//! juggling ids, then validates the finished automaton.
//!
//! # Example
//!
//! ```
//! use automata_engine::builder::{AutomatonBuilder, BuildError};
//!
//! let result = AutomatonBuilder::dfa()
//!     .state("q0")
//!     .accepting("q1")
//!     .transition("q0", "q1", ["a"])
//!     .build();
//!
//! assert!(matches!(result, Err(BuildError::MissingStartState)));
//! ```

pub mod error;
pub mod machine;

pub use error::BuildError;
pub use machine::AutomatonBuilder;
