// src/header/mod.rs
mod file_header;
mod variables;

pub use file_header::FileHeader;
pub use variables::{is_signal_internal, read_variables, VariableDescriptor};
