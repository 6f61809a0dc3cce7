//! Shape Dissection Solver
//!
//! Works out how to turn three composite shapes into the targets chosen by
//! their selected primitives, one exchange of pieces at a time. Inputs come
//! from command-line flags or a TOML puzzle file.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};

use dissector::balance::{count_primitives, BALANCED_COUNT};
use dissector::{logging, persistence, survey, Composite, Position, Primitive, Puzzle};

/// Solves three-position shape dissection puzzles.
#[derive(Parser)]
#[command(name = "dissector")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Solve a puzzle and print the step log and final shapes.
    Solve {
        #[command(flatten)]
        puzzle: PuzzleArgs,
        /// Also write the report to this file.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Count the primitives in the starting shapes and check their balance.
    Check {
        #[command(flatten)]
        puzzle: PuzzleArgs,
    },
    /// Show which pieces each position must give up.
    Plan {
        #[command(flatten)]
        puzzle: PuzzleArgs,
    },
    /// Solve every possible puzzle and summarize the outcomes.
    Survey,
}

#[derive(Args)]
struct PuzzleArgs {
    /// TOML puzzle file with [left], [middle] and [right] tables.
    #[arg(long, conflicts_with_all = ["outside", "inside"])]
    puzzle: Option<PathBuf>,
    /// Starting composites in Left,Middle,Right order (e.g. sphere,pyramid,cube).
    #[arg(long, value_delimiter = ',')]
    outside: Vec<Composite>,
    /// Selected primitives in Left,Middle,Right order (e.g. circle,square,triangle).
    #[arg(long, value_delimiter = ',')]
    inside: Vec<Primitive>,
}

impl PuzzleArgs {
    fn load(&self) -> Result<Puzzle, String> {
        if let Some(path) = &self.puzzle {
            return persistence::load_puzzle(path)
                .map_err(|e| format!("Failed to load {}: {}", path.display(), e));
        }
        Ok(Puzzle {
            starting: by_position(&self.outside, "--outside")?,
            selections: by_position(&self.inside, "--inside")?,
        })
    }
}

/// Assigns values to Left, Middle, Right; missing trailing values stay absent.
fn by_position<T: Copy>(values: &[T], flag: &str) -> Result<[Option<T>; 3], String> {
    if values.len() > Position::ALL.len() {
        return Err(format!("{flag} takes at most 3 values, got {}", values.len()));
    }
    Ok(Position::ALL.map(|position| values.get(position.index()).copied()))
}

fn main() -> ExitCode {
    logging::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Solve { puzzle, output } => puzzle.load().and_then(|p| run_solve(&p, output)),
        Command::Check { puzzle } => puzzle.load().map(|p| run_check(&p)),
        Command::Plan { puzzle } => puzzle.load().map(|p| run_plan(&p)),
        Command::Survey => run_survey(),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}

/// Solves the puzzle, prints the report and optionally saves it.
fn run_solve(puzzle: &Puzzle, output: Option<PathBuf>) -> Result<(), String> {
    let solution = puzzle.solve().map_err(|e| format!("Solver failed: {e}"))?;
    print!("{}", solution.format_report());

    if let Some(path) = output {
        persistence::save_report(&path, &solution)
            .map_err(|e| format!("Failed to save report: {e}"))?;
        println!("Wrote {}", path.display());
    }
    Ok(())
}

/// Prints primitive counts across the starting shapes.
fn run_check(puzzle: &Puzzle) {
    let compositions: Vec<_> = puzzle
        .starting
        .iter()
        .flatten()
        .map(|shape| shape.composition())
        .collect();
    let counts = count_primitives(&compositions);

    let listed: Vec<String> = Primitive::ALL
        .iter()
        .map(|primitive| format!("{}: {}", primitive, counts[primitive.index()]))
        .collect();
    println!("{}", listed.join(", "));

    for position in Position::ALL {
        if puzzle.starting[position.index()].is_none() {
            println!("{position} has no starting shape");
        }
    }
    if counts == [BALANCED_COUNT; 3] {
        println!("Balanced");
    } else {
        println!("Unbalanced");
    }
}

/// Prints the pieces each position must give up.
fn run_plan(puzzle: &Puzzle) {
    let Some(plan) = puzzle.dissection_plan() else {
        println!("Every position needs a starting shape and a selection");
        return;
    };

    let targets = puzzle.targets();
    for position in Position::ALL {
        let target = targets[position.index()].map_or("-", Composite::name);
        let pieces = &plan[position.index()];
        if pieces.is_empty() {
            println!("{position} -> {target}: keep both pieces");
        } else {
            let names: Vec<&str> = pieces.iter().map(|p| p.name()).collect();
            println!("{position} -> {target}: dissect {}", names.join(", "));
        }
    }
}

/// Solves every puzzle and prints a summary.
fn run_survey() -> Result<(), String> {
    let report = survey::survey().map_err(|e| format!("Survey failed: {e}"))?;
    print!("{}", report.format_summary());
    Ok(())
}
