//! Validation utilities
//!
//! Checks that the name index and the stored playlist records agree.

mod consistency;

pub use consistency::{check_consistency, repair, ConsistencyReport};
