pub mod error;
pub mod interpreter;
pub mod io;
pub mod machine;
pub mod memory;
pub mod replay;

pub use interpreter::{Interpreter, RunState};
pub use replay::Replay;
