//! retrograde CLI - solve one of the bundled games from the command line.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;

use retrograde::games::{ConnectN, Nim, TicTacToe};
use retrograde::{
    audit, MemoryStore, MemoryStoreConfig, Outcome, RulesEngine, RunStatus, SolveError, SolveStats,
    Solver, SolverConfig, StopSignal, Storage, ViolationPolicy,
};

/// Exhaustive two-player game solver
#[derive(Parser, Debug)]
#[command(name = "retrograde")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    game: Game,

    /// Response to solve-time diagnostics
    #[arg(long, global = true, value_enum, default_value = "abort")]
    policy: PolicyArg,

    /// Maximum supported game depth
    #[arg(long, global = true, default_value = "4096")]
    max_depth: u32,

    /// Log progress every N states (0 = off)
    #[arg(long, global = true, default_value = "0")]
    progress: u64,

    /// Pause after processing N states (0 = no limit); combine with --save
    #[arg(long, global = true, default_value = "0")]
    max_states: u64,

    /// Shuffle each layer with this seed
    #[arg(long, global = true)]
    shuffle_seed: Option<u64>,

    /// Log every storage mutation at trace level
    #[arg(long, global = true)]
    trace: bool,

    /// Write a snapshot of the store when the run ends
    #[arg(long, global = true)]
    save: Option<PathBuf>,

    /// Resume from a snapshot instead of starting fresh
    #[arg(long, global = true)]
    resume: Option<PathBuf>,

    /// Verify every reachable verdict after solving
    #[arg(long, global = true)]
    audit: bool,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value = "text")]
    format: OutputFormat,
}

/// Available games
#[derive(Subcommand, Debug)]
enum Game {
    /// Single-heap subtraction game
    Nim {
        /// Starting heap size
        #[arg(long, default_value = "21")]
        start: u8,

        /// Most objects a move may take
        #[arg(long, default_value = "3")]
        max_take: u8,
    },

    /// 3x3 tic-tac-toe
    #[command(name = "tictactoe")]
    TicTacToe,

    /// Gravity connect-N on a small board
    Connect {
        /// Board width (1-8)
        #[arg(long, default_value = "4")]
        width: usize,

        /// Board height (1-8)
        #[arg(long, default_value = "4")]
        height: usize,

        /// Pieces in a row needed to win
        #[arg(long, default_value = "3")]
        connect: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum PolicyArg {
    /// Stop at the first diagnostic.
    Abort,
    /// Record diagnostics and keep going.
    Collect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Summary printed at the end of a run.
#[derive(Serialize)]
struct Report {
    game: String,
    variant: String,
    completed: bool,
    root_outcome: String,
    root_distance: u32,
    states: usize,
    diagnosed: usize,
    audit_clean: Option<bool>,
    stats: SolveStats,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let result = match &args.game {
        &Game::Nim { start, max_take } => {
            if max_take == 0 {
                eprintln!("Error: --max-take must be at least 1");
                return ExitCode::FAILURE;
            }
            solve(Nim::new(start, max_take), &args)
        }
        Game::TicTacToe => solve(TicTacToe::new(), &args),
        &Game::Connect {
            width,
            height,
            connect,
        } => {
            if !(1..=8).contains(&width) || !(1..=8).contains(&height) || connect < 2 {
                eprintln!("Error: board must be 1-8 by 1-8 and connect at least 2");
                return ExitCode::FAILURE;
            }
            solve(ConnectN::new(width, height, connect), &args)
        }
    };

    match result {
        Ok(report) => {
            print_report(&report, args.format);
            if args.policy == PolicyArg::Abort && report.diagnosed > 0 {
                // Left over from an aborted run this one resumed.
                eprintln!("Error: {} states carry diagnostics", report.diagnosed);
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(err) => {
            eprintln!("Error: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn store_config(args: &Args) -> MemoryStoreConfig {
    let policy = match args.policy {
        PolicyArg::Abort => ViolationPolicy::Abort,
        PolicyArg::Collect => ViolationPolicy::Collect,
    };
    let mut config = MemoryStoreConfig::default()
        .with_policy(policy)
        .with_trace_mutations(args.trace);
    if let Some(seed) = args.shuffle_seed {
        config = config.with_shuffle_seed(seed);
    }
    config
}

fn solve<E: RulesEngine>(rules: E, args: &Args) -> Result<Report, SolveError> {
    let config = SolverConfig::default()
        .with_max_depth(args.max_depth)
        .with_progress_interval(args.progress)
        .with_state_budget(args.max_states);

    let mut store = match &args.resume {
        Some(path) => {
            let file = File::open(path)?;
            MemoryStore::load_snapshot(BufReader::new(file), store_config(args), &rules)?
        }
        None => MemoryStore::with_config(store_config(args)),
    };

    let mut solver = Solver::new(rules, config);
    let root = solver.prepare(&mut store)?;
    let status = solver.run(&mut store, &StopSignal::new());

    // Keep whatever was solved so far, even if the run failed.
    if let Some(path) = &args.save {
        let file = File::create(path)?;
        store.save_snapshot(BufWriter::new(file), solver.rules())?;
    }
    let status = status?;

    let (root_distance, root_outcome) = store.distance_and_outcome(&root)?;
    let audit_clean = if args.audit && status == RunStatus::Completed {
        Some(audit(solver.rules(), &store)?.is_clean())
    } else {
        None
    };

    Ok(Report {
        game: solver.rules().name().to_string(),
        variant: solver.rules().variant(),
        completed: status == RunStatus::Completed,
        root_outcome: describe(root_outcome),
        root_distance: root_distance.get(),
        states: store.len(),
        diagnosed: store.diagnosed().len(),
        audit_clean,
        stats: solver.stats().clone(),
    })
}

fn describe(outcome: Outcome) -> String {
    match outcome {
        Outcome::Both => "draw".to_string(),
        Outcome::None => "unsolved".to_string(),
        winner => format!("win for {}", winner),
    }
}

fn print_report(report: &Report, format: OutputFormat) {
    match format {
        OutputFormat::Text => {
            println!("{} ({})", report.game, report.variant);
            if !report.completed {
                println!("  status:     paused");
            }
            println!("  root:       {}", report.root_outcome);
            println!("  states:     {}", report.states);
            println!("  deepest:    {}", report.stats.deepest_layer);
            println!("  diagnosed:  {}", report.diagnosed);
            if let Some(clean) = report.audit_clean {
                println!("  audit:      {}", if clean { "clean" } else { "FAILED" });
            }
            println!(
                "  time:       {:.3}s ({:.0} states/s)",
                report.stats.time_us as f64 / 1_000_000.0,
                report.stats.states_per_second()
            );
        }
        OutputFormat::Json => match serde_json::to_string_pretty(report) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("Error: failed to encode report: {}", e),
        },
    }
}
