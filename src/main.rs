use clap::{Parser, Subcommand};
use env_logger::{Builder, Env};
use hexsearch::{
    runtime::io::StdoutSink,
    search::{SearchConfig, ThreadMode},
    tools::{
        commands::{self, InputSource, RunOptions},
        escape::unescape,
    },
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "hexsearch")]
#[command(about = "Hexagony interpreter, scaffold compiler and program search")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Interpret a program.
    Run {
        file: PathBuf,
        /// Read program input from a file instead of stdin.
        #[arg(long)]
        input: Option<PathBuf>,
        #[arg(long)]
        max_ticks: Option<u64>,
        /// Check output against this string instead of printing it.
        #[arg(long)]
        target: Option<String>,
    },
    /// Print the hexagonal layout with row coordinates.
    Grid { file: PathBuf },
    /// Compile a program with `?` placeholders into its scaffold.
    Scaffold {
        file: PathBuf,
        /// Replay the scaffold with these characters in the placeholders.
        #[arg(long)]
        fill: Option<String>,
        #[arg(long)]
        input: Option<PathBuf>,
        #[arg(long)]
        max_ticks: Option<u64>,
        #[arg(long)]
        target: Option<String>,
    },
    /// Search for programs that print a target string.
    Search {
        /// Program with `.` in every cell the search may fill.
        #[arg(long)]
        template: String,
        /// Characters that must appear exactly once among the free cells.
        #[arg(long, default_value = "")]
        required: String,
        /// Alphabet for the remaining free cells.
        #[arg(long)]
        available: String,
        #[arg(long)]
        target: String,
        /// Worker threads; falls back to HEXSEARCH_THREADS, then to every core.
        #[arg(long)]
        threads: Option<usize>,
        #[arg(long, default_value_t = 3)]
        prefix_ticks: u64,
        #[arg(long, default_value_t = 15)]
        probe_ticks: u64,
        #[arg(long, default_value_t = 10_000)]
        max_ticks: u64,
    },
}

fn run_options(
    input: Option<PathBuf>,
    max_ticks: Option<u64>,
    target: Option<String>,
) -> miette::Result<RunOptions> {
    let target = match target {
        Some(target) => Some(unescape(&target)?),
        None => None,
    };
    Ok(RunOptions {
        max_ticks,
        target,
        input: input.map(InputSource::File).unwrap_or_default(),
    })
}

fn main() -> miette::Result<()> {
    Builder::from_env(Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            file,
            input,
            max_ticks,
            target,
        } => {
            let options = run_options(input, max_ticks, target)?;
            let (summary, mut sink) =
                commands::run_file(&file, &options, StdoutSink::stdout())?;
            commands::finish_output(&mut sink)?;
            eprintln!("{summary}");
        }
        Commands::Grid { file } => {
            println!("{}", commands::grid_file(&file)?);
        }
        Commands::Scaffold {
            file,
            fill,
            input,
            max_ticks,
            target,
        } => {
            println!("{}", commands::scaffold_file(&file)?);
            if let Some(fill) = fill {
                let fills: Vec<char> = unescape(&fill)?.chars().collect();
                let options = run_options(input, max_ticks, target)?;
                let (summary, mut sink) =
                    commands::replay_file(&file, &fills, &options, StdoutSink::stdout())?;
                commands::finish_output(&mut sink)?;
                eprintln!("{summary}");
            }
        }
        Commands::Search {
            template,
            required,
            available,
            target,
            threads,
            prefix_ticks,
            probe_ticks,
            max_ticks,
        } => {
            let config = SearchConfig::new(unescape(&template)?, unescape(&target)?)
                .with_required(&unescape(&required)?)
                .with_available(&unescape(&available)?)
                .with_threads(ThreadMode::from_flag_or_env(threads))
                .with_prefix_ticks(prefix_ticks)
                .with_probe_ticks(probe_ticks)
                .with_max_ticks(max_ticks);
            let report = commands::search_programs(&config)?;
            for solution in &report.solutions {
                println!("{solution}");
            }
        }
    }
    Ok(())
}
