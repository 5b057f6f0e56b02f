//! Small shared utilities.

pub mod timing;
