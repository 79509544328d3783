use miette::Diagnostic;
use thiserror::Error;

pub type RuntimeResult<T> = Result<T, RuntimeError>;

#[derive(Debug, Error, Diagnostic, Clone, PartialEq, Eq)]
pub enum RuntimeError {
    #[error("No fill character supplied for slot {slot}")]
    #[diagnostic(
        code(runtime::missing_fill),
        help("supply one character per `?` placeholder, in slot order")
    )]
    MissingFill { slot: usize },
    #[error("Slot {slot} cannot hold `{opcode}`: control flow is fixed once compiled")]
    #[diagnostic(
        code(runtime::unsupported_command),
        help("mirrors, `$` and IP switches must be written into the grid before compiling")
    )]
    UnsupportedCommand { slot: usize, opcode: char },
}
