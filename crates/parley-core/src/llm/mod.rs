//! Completion provider abstraction.

pub mod gateway;
