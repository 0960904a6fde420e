//! Command implementations.
//!
//! Each mode of the tool is implemented in its own module.

pub(crate) mod list;
pub(crate) mod send;
