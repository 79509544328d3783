pub mod commands;
pub mod escape;
