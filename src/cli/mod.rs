//! Command workflows behind the binary

pub mod orchestration;
