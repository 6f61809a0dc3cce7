//! Exhaustive survey over every puzzle configuration.
//!
//! Runs the solver on all 6^3 starting triples crossed with all 3^3
//! selections and tallies how each run ended.

use rustc_hash::FxHashMap;
use tracing::info;

use crate::error::Result;
use crate::shapes::{Composite, Primitive};
use crate::solver::{Outcome, Puzzle, Solution};

/// Total number of fully specified puzzles.
pub const PUZZLE_COUNT: usize = 6 * 6 * 6 * 3 * 3 * 3;

/// Aggregate results of running every puzzle.
#[derive(Debug, Default)]
pub struct SurveyReport {
    /// Number of runs per outcome.
    pub outcomes: FxHashMap<Outcome, usize>,
    /// Puzzles that passed the balance gate but left a position unsolved.
    pub partial: Vec<Puzzle>,
    /// A puzzle with the most exchanges, with its solution.
    pub longest: Option<(Puzzle, Solution)>,
}

impl SurveyReport {
    pub fn count(&self, outcome: Outcome) -> usize {
        self.outcomes.get(&outcome).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.outcomes.values().sum()
    }

    /// Formats the tallies as a human-readable summary.
    pub fn format_summary(&self) -> String {
        let mut output = format!("Surveyed {} puzzles:\n", self.total());
        for (label, outcome) in [
            ("solved", Outcome::Solved),
            ("partially resolved", Outcome::Partial),
            ("unbalanced", Outcome::Unbalanced),
        ] {
            output.push_str(&format!("  {:<19}{}\n", label, self.count(outcome)));
        }

        if let Some((puzzle, solution)) = &self.longest {
            output.push_str(&format!(
                "Most exchanges: {} ({})\n",
                solution.exchange_count(),
                describe(puzzle)
            ));
        }

        if !self.partial.is_empty() {
            output.push_str("Partially resolved:\n");
            for puzzle in &self.partial {
                output.push_str(&format!("  {}\n", describe(puzzle)));
            }
        }

        output
    }
}

/// Every fully specified puzzle, in catalog order.
pub fn all_puzzles() -> impl Iterator<Item = Puzzle> {
    Composite::ALL.into_iter().flat_map(|left| {
        Composite::ALL.into_iter().flat_map(move |middle| {
            Composite::ALL.into_iter().flat_map(move |right| {
                all_selections().map(move |selections| Puzzle::new([left, middle, right], selections))
            })
        })
    })
}

fn all_selections() -> impl Iterator<Item = [Primitive; 3]> {
    Primitive::ALL.into_iter().flat_map(|left| {
        Primitive::ALL.into_iter().flat_map(move |middle| {
            Primitive::ALL
                .into_iter()
                .map(move |right| [left, middle, right])
        })
    })
}

/// Solves every puzzle and tallies the outcomes.
pub fn survey() -> Result<SurveyReport> {
    let mut report = SurveyReport::default();

    for puzzle in all_puzzles() {
        let solution = puzzle.solve()?;
        *report.outcomes.entry(solution.outcome).or_insert(0) += 1;

        if solution.outcome == Outcome::Partial {
            report.partial.push(puzzle);
        }

        let longest = report
            .longest
            .as_ref()
            .map_or(0, |(_, best)| best.exchange_count());
        if solution.solvable() && solution.exchange_count() > longest {
            report.longest = Some((puzzle, solution));
        }
    }

    info!(
        event = "survey_end",
        puzzles = report.total(),
        solved = report.count(Outcome::Solved),
        partial = report.count(Outcome::Partial),
        unbalanced = report.count(Outcome::Unbalanced),
    );
    Ok(report)
}

/// One-line description: starting composites, then selections.
pub fn describe(puzzle: &Puzzle) -> String {
    let name = |value: Option<&'static str>| value.unwrap_or("-");
    let starting: Vec<&str> = puzzle
        .starting
        .iter()
        .map(|shape| name(shape.map(Composite::name)))
        .collect();
    let selections: Vec<&str> = puzzle
        .selections
        .iter()
        .map(|primitive| name(primitive.map(Primitive::name)))
        .collect();
    format!("{} / {}", starting.join(", "), selections.join(", "))
}
