//! Sample applications built on the runtime.

pub mod clicker;
