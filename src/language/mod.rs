pub mod compiler;
pub mod geometry;
pub mod grid;
pub mod opcode;
