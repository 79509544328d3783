#![allow(clippy::collapsible_if)]

pub mod diagnostics;
pub mod language;
pub mod runtime;
pub mod search;
pub mod tools;

#[cfg(test)]
mod tests;
