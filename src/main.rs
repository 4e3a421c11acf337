//! Wrigglers Puzzle Solver
//!
//! Reads a wriggler puzzle, searches for a sequence of moves that brings the
//! blue wriggler's head or tail to the lower right corner, and writes the
//! moves, the final board, the elapsed time and the path cost to a solution
//! file.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use anyhow::bail;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use wrigglers::persistence::{self, Puzzle};
use wrigglers::solver::{self, DEFAULT_MAX_EXPANSIONS};
use wrigglers::{BestFirst, BreadthFirst, IterativeDeepening, Outcome, Search, SearchLimits};

/// Solves wriggler sliding puzzles with uninformed and informed search.
#[derive(Parser)]
#[command(name = "wrigglers")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Search for a solution and write it next to the puzzle.
    Solve {
        /// Puzzle file to solve.
        puzzle: PathBuf,
        /// Search algorithm to run.
        #[arg(short, long, value_enum, default_value_t = Algorithm::Astar)]
        algorithm: Algorithm,
        /// Stop after expanding this many nodes.
        #[arg(long, default_value_t = DEFAULT_MAX_EXPANSIONS)]
        max_expansions: usize,
        /// Skip layouts breadth-first search has already expanded.
        #[arg(long)]
        prune: bool,
        /// Solution file to write [default: <PUZZLE>.sln].
        #[arg(short, long, conflicts_with = "stdout")]
        output: Option<PathBuf>,
        /// Print the solution instead of writing a file.
        #[arg(long)]
        stdout: bool,
    },
    /// Show the parsed board, its wrigglers and the legal opening moves.
    Inspect {
        /// Puzzle file to inspect.
        puzzle: PathBuf,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Algorithm {
    /// Breadth-first tree search.
    Bfs,
    /// Iterative-deepening depth-first search.
    Iddfs,
    /// Best-first search ordered by the heuristic.
    Greedy,
    /// Best-first search ordered by path cost plus heuristic.
    Astar,
}

impl Algorithm {
    fn build(self, prune: bool) -> Box<dyn Search> {
        match self {
            Algorithm::Bfs => Box::new(BreadthFirst {
                prune_duplicates: prune,
            }),
            Algorithm::Iddfs => Box::new(IterativeDeepening),
            Algorithm::Greedy => Box::new(BestFirst::greedy()),
            Algorithm::Astar => Box::new(BestFirst::a_star()),
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::Solve {
            puzzle,
            algorithm,
            max_expansions,
            prune,
            output,
            stdout,
        } => {
            let limits = SearchLimits { max_expansions };
            let search = algorithm.build(prune);
            let target = (!stdout)
                .then(|| output.unwrap_or_else(|| persistence::solution_path(&puzzle)));
            run_solve(&puzzle, search.as_ref(), &limits, target.as_deref())
        }
        Command::Inspect { puzzle } => run_inspect(&puzzle),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Solves one puzzle, writing the solution to `target` or stdout.
fn run_solve(
    puzzle_path: &Path,
    search: &dyn Search,
    limits: &SearchLimits,
    target: Option<&Path>,
) -> anyhow::Result<()> {
    let root = persistence::read_puzzle(puzzle_path)?.initial_state()?;

    let start = Instant::now();
    let report = solver::run(search, root, limits)?;
    let elapsed = start.elapsed();

    let solution = match report.outcome {
        Outcome::Found(solution) => solution,
        Outcome::Exhausted => bail!("no solution exists"),
        Outcome::LimitReached => bail!("gave up after {} expansions", report.stats.expanded),
    };

    match target {
        Some(path) => {
            persistence::save(path, &solution, elapsed)?;
            info!(
                path = %path.display(),
                moves = solution.path_cost,
                seconds = elapsed.as_secs_f64(),
                "wrote solution"
            );
        }
        None => print!("{}", persistence::format_solution(&solution, elapsed)),
    }
    Ok(())
}

/// Prints the board, each wriggler, the heuristic and the legal moves.
fn run_inspect(puzzle_path: &Path) -> anyhow::Result<()> {
    let puzzle: Puzzle = persistence::read_puzzle(puzzle_path)?;
    let state = puzzle.initial_state()?;

    println!("{}", state.grid());
    println!();
    for wriggler in state.wrigglers() {
        println!("{wriggler}");
    }
    println!();
    println!("heuristic: {}", state.heuristic());
    println!("goal reached: {}", state.blue_in_goal_corner());
    println!("legal moves:");
    for mv in state.actions() {
        println!("{mv}");
    }
    Ok(())
}
