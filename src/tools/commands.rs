use crate::diagnostics::CliError;
use crate::language::compiler::compile;
use crate::language::grid::Grid;
use crate::runtime::io::{OutputSink, WriterSink};
use crate::runtime::{Interpreter, Replay, RunState};
use crate::search::{search, SearchConfig, SearchReport};
use log::debug;
use std::fmt;
use std::fs::{self, File};
use std::io::{self, BufReader, Read, Write};
use std::path::{Path, PathBuf};

/// Where the `,` and `?` commands read from.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum InputSource {
    #[default]
    Stdin,
    File(PathBuf),
    Empty,
}

impl InputSource {
    fn open(&self) -> Result<Box<dyn Read>, CliError> {
        Ok(match self {
            InputSource::Stdin => Box::new(io::stdin()),
            InputSource::File(path) => {
                let file = File::open(path).map_err(|source| CliError::io(path, source))?;
                Box::new(BufReader::new(file))
            }
            InputSource::Empty => Box::new(io::empty()),
        })
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunOptions {
    pub max_ticks: Option<u64>,
    pub target: Option<String>,
    pub input: InputSource,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunSummary {
    pub ticks: u64,
    pub output_length: usize,
    pub success: bool,
    pub state: RunState,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ticks: {}, output: {} chars, success: {}, timed out: {}",
            self.ticks,
            self.output_length,
            self.success,
            self.state == RunState::TimedOut
        )
    }
}

pub fn read_source(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::io(path, source))
}

/// Interprets the program in `path`. Without a target, output goes to `sink`.
pub fn run_file<S: OutputSink>(
    path: &Path,
    options: &RunOptions,
    sink: S,
) -> Result<(RunSummary, S), CliError> {
    let source = read_source(path)?;
    let input = options.input.open()?;
    let mut interpreter = Interpreter::new(&source, input, sink);
    interpreter.set_max_ticks(options.max_ticks);
    interpreter.set_target(options.target.as_deref());
    let state = interpreter.run();
    debug!("{} finished as {:?}\n{}", path.display(), state, interpreter.memory());

    let summary = RunSummary {
        ticks: interpreter.tick(),
        output_length: interpreter.output_length(),
        success: interpreter.success(),
        state,
    };
    Ok((summary, interpreter.into_sink()))
}

/// Flushes a writer sink after a run and reports output lost to write errors.
pub fn finish_output<W: Write>(sink: &mut WriterSink<W>) -> Result<(), CliError> {
    if sink.failed() {
        return Err(CliError::Output);
    }
    sink.flush()
        .map_err(|source| CliError::io(Path::new("<stdout>"), source))
}

pub fn grid_file(path: &Path) -> Result<String, CliError> {
    Ok(Grid::parse(&read_source(path)?).debug_string())
}

pub fn scaffold_file(path: &Path) -> Result<String, CliError> {
    Ok(compile(&read_source(path)?).to_string())
}

/// Compiles the program in `path` and replays the scaffold with `fills` in
/// its placeholders. The tick budget counts replay steps.
pub fn replay_file<S: OutputSink>(
    path: &Path,
    fills: &[char],
    options: &RunOptions,
    sink: S,
) -> Result<(RunSummary, S), CliError> {
    let scaffold = compile(&read_source(path)?);
    let input = options.input.open()?;
    let mut replay = Replay::new(&scaffold, fills, input, sink)?;
    replay.set_max_steps(options.max_ticks);
    replay.set_target(options.target.as_deref());
    let state = replay.run();

    let summary = RunSummary {
        ticks: replay.steps(),
        output_length: replay.output_length(),
        success: replay.success(),
        state,
    };
    Ok((summary, replay.into_sink()))
}

pub fn search_programs(config: &SearchConfig) -> Result<SearchReport, CliError> {
    Ok(search(config)?)
}
