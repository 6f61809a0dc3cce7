//! Greedy dissect-and-swap sequencer.
//!
//! Positions are resolved in order (Left, Middle, Right). Each unsolved
//! position classifies its pieces into keepable and dissectable, works out
//! which target pieces it still needs, and exchanges one dissectable piece
//! for each needed piece with the first unsolved donor that holds it.
//!
//! The search is single-pass and never backtracks. A need with no donor is
//! left unsatisfied and reported through `Outcome::Partial`.

use std::fmt;

use tracing::{debug, info, trace, warn};

use crate::balance::{count_primitives, is_balanced};
use crate::error::Result;
use crate::shapes::{target_for, Composite, Pair, Position, Primitive};
use crate::slot::Slot;

/// Final composition of every position, sorted for display.
pub type Compositions = [Pair; 3];

/// Starting composites and primitive selections for the three positions.
///
/// Absent entries model a collaborator that has not finished choosing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Puzzle {
    pub starting: [Option<Composite>; 3],
    pub selections: [Option<Primitive>; 3],
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// A position had no starting composite or no selection.
    IncompleteSelection,
    /// The starting composites do not hold two of each primitive.
    Unbalanced,
    /// Every position reached its target.
    Solved,
    /// Balanced, but some need found no donor.
    Partial,
}

impl Outcome {
    /// Whether the puzzle passed the solvability gate and was run.
    pub const fn solvable(self) -> bool {
        matches!(self, Outcome::Solved | Outcome::Partial)
    }
}

/// One entry in the step log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// A piece was cut out of a position as half of an exchange.
    Dissect { primitive: Primitive, from: Position },
    /// A position reached its target.
    Complete(Position),
}

/// Result of a single run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    pub outcome: Outcome,
    /// Steps in emission order; empty when not solvable.
    pub steps: Vec<Step>,
    /// `None` when not solvable.
    pub final_compositions: Option<Compositions>,
    /// Positions that never reached their target.
    pub unsolved: Vec<Position>,
}

impl Puzzle {
    /// Creates a fully specified puzzle.
    pub const fn new(starting: [Composite; 3], selections: [Primitive; 3]) -> Self {
        Self {
            starting: [Some(starting[0]), Some(starting[1]), Some(starting[2])],
            selections: [Some(selections[0]), Some(selections[1]), Some(selections[2])],
        }
    }

    /// Target composite of each position.
    pub fn targets(&self) -> [Option<Composite>; 3] {
        self.selections.map(target_for)
    }

    /// Runs the solver on fresh slot state.
    ///
    /// Gate failures are reported as data on the returned `Solution`. An error
    /// means an exchange touched a piece its slot did not hold.
    pub fn solve(&self) -> Result<Solution> {
        let (Some(starting), Some(targets)) = (all_present(self.starting), all_present(self.targets()))
        else {
            warn!(event = "incomplete_selection", puzzle = ?self);
            return Ok(Solution::unsolvable(Outcome::IncompleteSelection));
        };

        let compositions = starting.map(Composite::composition);
        if !is_balanced(&compositions) {
            info!(
                event = "unbalanced",
                counts = ?count_primitives(&compositions),
            );
            return Ok(Solution::unsolvable(Outcome::Unbalanced));
        }

        info!(event = "run_start", starting = ?starting, targets = ?targets);
        let mut run = Run::new(starting, targets);
        run.resolve()?;
        let solution = run.finish();
        info!(
            event = "run_end",
            outcome = ?solution.outcome,
            steps = solution.steps.len(),
        );
        Ok(solution)
    }

    /// Pieces each position must give up to reach its target, ignoring balance.
    ///
    /// Returns `None` when any position lacks a starting composite or selection.
    pub fn dissection_plan(&self) -> Option<[Vec<Primitive>; 3]> {
        let starting = all_present(self.starting)?;
        let targets = all_present(self.targets())?;
        Some(Position::ALL.map(|position| {
            let slot = Slot::new(position, starting[position.index()], targets[position.index()]);
            classify(&slot).dissectable
        }))
    }
}

impl Solution {
    fn unsolvable(outcome: Outcome) -> Self {
        Self {
            outcome,
            steps: Vec::new(),
            final_compositions: None,
            unsolved: Vec::new(),
        }
    }

    #[inline]
    pub fn solvable(&self) -> bool {
        self.outcome.solvable()
    }

    /// True only when every position reached its target.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.outcome == Outcome::Solved
    }

    /// The step log as human-readable lines.
    pub fn step_log(&self) -> Vec<String> {
        self.steps.iter().map(Step::to_string).collect()
    }

    /// Number of exchanges performed.
    pub fn exchange_count(&self) -> usize {
        let dissections = self
            .steps
            .iter()
            .filter(|step| matches!(step, Step::Dissect { .. }))
            .count();
        dissections / 2
    }

    pub fn final_composition(&self, position: Position) -> Option<Pair> {
        self.final_compositions
            .map(|compositions| compositions[position.index()])
    }

    /// Formats the outcome, step log and final compositions as text.
    pub fn format_report(&self) -> String {
        let mut output = String::new();

        match self.outcome {
            Outcome::IncompleteSelection => {
                output.push_str("Solvable: no (a position has no starting shape or selection)\n");
                return output;
            }
            Outcome::Unbalanced => {
                output.push_str("Solvable: no (starting shapes do not hold two of each primitive)\n");
                return output;
            }
            Outcome::Solved => output.push_str("Solvable: yes\n"),
            Outcome::Partial => output.push_str("Solvable: yes (partially resolved)\n"),
        }

        output.push_str("Steps:\n");
        for (i, step) in self.steps.iter().enumerate() {
            output.push_str(&format!("  {}. {}\n", i + 1, step));
        }

        if let Some(compositions) = self.final_compositions {
            output.push_str("Final:\n");
            for position in Position::ALL {
                let pair = compositions[position.index()];
                output.push_str(&format!(
                    "  {}: {}, {} ({})\n",
                    position,
                    pair[0],
                    pair[1],
                    Composite::from_pair(pair)
                ));
            }
        }

        if !self.unsolved.is_empty() {
            let names: Vec<&str> = self.unsolved.iter().map(|p| p.name()).collect();
            output.push_str(&format!("Unsolved: {}\n", names.join(", ")));
        }

        output
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Dissect { primitive, from } => write!(f, "Dissect {primitive} from {from}"),
            Step::Complete(position) => write!(f, "{position} Complete!"),
        }
    }
}

/// Splits a position's pieces against its target.
struct Classification {
    /// Held pieces that must leave, in held order.
    dissectable: Vec<Primitive>,
    /// Target pieces not covered by a kept piece, in target order.
    needed: Vec<Primitive>,
}

/// Matches each held piece against a still-unmatched target piece.
///
/// A held piece equal to an already matched target piece is dissectable, so
/// a duplicate is kept at most as often as the target contains it.
fn classify(slot: &Slot) -> Classification {
    let mut unmatched = slot.target().composition().to_vec();
    let mut dissectable = Vec::new();

    for &piece in slot.current() {
        match unmatched.iter().position(|&wanted| wanted == piece) {
            Some(index) => {
                unmatched.remove(index);
            }
            None => dissectable.push(piece),
        }
    }

    Classification {
        dissectable,
        needed: unmatched,
    }
}

/// Working state of one solve invocation.
struct Run {
    slots: [Slot; 3],
    steps: Vec<Step>,
}

impl Run {
    fn new(starting: [Composite; 3], targets: [Composite; 3]) -> Self {
        Self {
            slots: Position::ALL
                .map(|position| Slot::new(position, starting[position.index()], targets[position.index()])),
            steps: Vec::new(),
        }
    }

    #[inline]
    fn slot(&self, position: Position) -> &Slot {
        &self.slots[position.index()]
    }

    #[inline]
    fn slot_mut(&mut self, position: Position) -> &mut Slot {
        &mut self.slots[position.index()]
    }

    /// Resolves each position once, in order, marking it complete if solved.
    fn resolve(&mut self) -> Result<()> {
        for position in Position::ALL {
            debug!(event = "resolve_position", position = %position);
            self.resolve_position(position)?;
            if self.slot(position).is_solved() {
                self.steps.push(Step::Complete(position));
            }
        }
        Ok(())
    }

    fn resolve_position(&mut self, position: Position) -> Result<()> {
        if self.slot(position).is_solved() {
            return Ok(());
        }

        let Classification {
            dissectable,
            needed,
        } = classify(self.slot(position));
        let mut dissectable = dissectable.into_iter();

        for wanted in needed {
            if self.slot(position).is_solved() {
                break;
            }

            let Some(donor) = self.find_donor(position, wanted) else {
                debug!(event = "unsatisfied_need", position = %position, needed = %wanted);
                continue;
            };
            // needs and dissectable pieces pair up one-for-one
            let Some(dissected) = dissectable.next() else {
                break;
            };

            self.exchange(position, dissected, donor, wanted)?;
        }

        Ok(())
    }

    /// First unsolved donor, in the position's priority order, holding the piece.
    fn find_donor(&self, position: Position, wanted: Primitive) -> Option<Position> {
        position.donors().iter().copied().find(|&donor| {
            let slot = self.slot(donor);
            !slot.is_solved() && slot.contains(wanted)
        })
    }

    /// Swaps one dissected piece of `position` for the donor's `wanted` piece.
    fn exchange(
        &mut self,
        position: Position,
        dissected: Primitive,
        donor: Position,
        wanted: Primitive,
    ) -> Result<()> {
        self.slot_mut(donor).remove(wanted)?;
        self.slot_mut(position).remove(dissected)?;
        self.slot_mut(position).add(wanted);
        self.slot_mut(donor).add(dissected);

        trace!(
            event = "exchange",
            position = %position,
            dissected = %dissected,
            donor = %donor,
            received = %wanted,
        );
        self.steps.push(Step::Dissect {
            primitive: dissected,
            from: position,
        });
        self.steps.push(Step::Dissect {
            primitive: wanted,
            from: donor,
        });
        Ok(())
    }

    fn finish(self) -> Solution {
        let unsolved: Vec<Position> = self
            .slots
            .iter()
            .filter(|slot| !slot.is_solved())
            .map(Slot::position)
            .collect();
        let outcome = if unsolved.is_empty() {
            Outcome::Solved
        } else {
            Outcome::Partial
        };

        Solution {
            outcome,
            steps: self.steps,
            final_compositions: Some(self.slots.each_ref().map(Slot::sorted_pair)),
            unsolved,
        }
    }
}

/// Collects three optional values, or `None` if any is absent.
fn all_present<T: Copy>(values: [Option<T>; 3]) -> Option<[T; 3]> {
    let [a, b, c] = values;
    Some([a?, b?, c?])
}

#[cfg(test)]
mod tests {
    use super::*;
    use Composite::{Cone, Cube, Cylinder, Prism, Pyramid, Sphere};
    use Primitive::{Circle, Square, Triangle};

    /// Replays the dissection pairs of a step log against starting compositions.
    fn replay(puzzle: &Puzzle, steps: &[Step]) -> Vec<Vec<Primitive>> {
        let mut held: Vec<Vec<Primitive>> = puzzle
            .starting
            .iter()
            .map(|shape| shape.unwrap().composition().to_vec())
            .collect();
        let dissections: Vec<(Primitive, Position)> = steps
            .iter()
            .filter_map(|step| match *step {
                Step::Dissect { primitive, from } => Some((primitive, from)),
                Step::Complete(_) => None,
            })
            .collect();

        for exchange in dissections.chunks(2) {
            let (given, initiator) = exchange[0];
            let (received, donor) = exchange[1];
            let before = count_primitives(&held);

            let at = held[initiator.index()].iter().position(|&p| p == given).unwrap();
            held[initiator.index()].remove(at);
            let at = held[donor.index()].iter().position(|&p| p == received).unwrap();
            held[donor.index()].remove(at);
            held[initiator.index()].push(received);
            held[donor.index()].push(given);

            assert_eq!(count_primitives(&held), before, "exchange changed the pool");
        }
        held
    }

    #[test]
    fn test_scenario_a_resolves_every_position() {
        let puzzle = Puzzle::new([Sphere, Pyramid, Cube], [Circle, Square, Triangle]);
        assert_eq!(puzzle.targets(), [Some(Prism), Some(Cone), Some(Cylinder)]);

        let solution = puzzle.solve().unwrap();
        assert!(solution.solvable());
        assert!(solution.is_complete());
        assert!(solution.unsolved.is_empty());
        assert_eq!(solution.exchange_count(), 2);
        assert_eq!(
            solution.final_compositions,
            Some([[Square, Triangle], [Circle, Triangle], [Circle, Square]])
        );

        insta::assert_snapshot!(solution.step_log().join("\n"), @r"
        Dissect Circle from Left
        Dissect Square from Right
        Dissect Circle from Left
        Dissect Triangle from Middle
        Left Complete!
        Middle Complete!
        Right Complete!
        ");
    }

    #[test]
    fn test_scenario_a_report() {
        let puzzle = Puzzle::new([Sphere, Pyramid, Cube], [Circle, Square, Triangle]);
        let solution = puzzle.solve().unwrap();

        insta::assert_snapshot!(solution.format_report(), @r"
        Solvable: yes
        Steps:
          1. Dissect Circle from Left
          2. Dissect Square from Right
          3. Dissect Circle from Left
          4. Dissect Triangle from Middle
          5. Left Complete!
          6. Middle Complete!
          7. Right Complete!
        Final:
          Left: Square, Triangle (Prism)
          Middle: Circle, Triangle (Cone)
          Right: Circle, Square (Cylinder)
        ");
    }

    #[test]
    fn test_scenario_b_already_solved_left_needs_no_dissection() {
        let puzzle = Puzzle::new([Prism, Cone, Cylinder], [Circle, Square, Triangle]);
        let solution = puzzle.solve().unwrap();

        assert!(solution.is_complete());
        assert_eq!(
            solution.steps,
            vec![
                Step::Complete(Position::Left),
                Step::Complete(Position::Middle),
                Step::Complete(Position::Right),
            ]
        );
    }

    #[test]
    fn test_left_solved_while_others_exchange() {
        // Left already Prism; Middle (Cylinder) and Right (Cone) must swap
        let puzzle = Puzzle::new([Prism, Cylinder, Cone], [Circle, Square, Triangle]);
        let solution = puzzle.solve().unwrap();

        assert!(solution.is_complete());
        assert_eq!(solution.steps[0], Step::Complete(Position::Left));
        assert!(!solution.steps[1..]
            .iter()
            .any(|step| matches!(step, Step::Dissect { from: Position::Left, .. })));
        assert_eq!(
            solution.step_log(),
            vec![
                "Left Complete!",
                "Dissect Square from Middle",
                "Dissect Triangle from Right",
                "Middle Complete!",
                "Right Complete!",
            ]
        );
    }

    #[test]
    fn test_scenario_c_unbalanced_is_not_solvable() {
        let puzzle = Puzzle::new([Sphere, Sphere, Cube], [Circle, Square, Triangle]);
        let solution = puzzle.solve().unwrap();

        assert_eq!(solution.outcome, Outcome::Unbalanced);
        assert!(!solution.solvable());
        assert!(solution.steps.is_empty());
        assert_eq!(solution.final_compositions, None);
        assert_eq!(solution.final_composition(Position::Left), None);
    }

    #[test]
    fn test_scenario_d_missing_donor_is_reported() {
        // Left needs a Triangle but both Triangles sit in already solved Cones
        let puzzle = Puzzle::new([Cube, Cone, Cone], [Circle, Square, Square]);
        let solution = puzzle.solve().unwrap();

        assert!(solution.solvable());
        assert!(!solution.is_complete());
        assert_eq!(solution.outcome, Outcome::Partial);
        assert_eq!(solution.unsolved, vec![Position::Left]);
        assert_eq!(
            solution.steps,
            vec![
                Step::Complete(Position::Middle),
                Step::Complete(Position::Right),
            ]
        );
        assert_eq!(solution.final_composition(Position::Left), Some([Square, Square]));

        insta::assert_snapshot!(solution.format_report(), @r"
        Solvable: yes (partially resolved)
        Steps:
          1. Middle Complete!
          2. Right Complete!
        Final:
          Left: Square, Square (Cube)
          Middle: Circle, Triangle (Cone)
          Right: Circle, Triangle (Cone)
        Unsolved: Left
        ");
    }

    #[test]
    fn test_incomplete_selection_is_not_solvable() {
        let mut puzzle = Puzzle::new([Sphere, Pyramid, Cube], [Circle, Square, Triangle]);
        puzzle.selections[1] = None;
        let solution = puzzle.solve().unwrap();
        assert_eq!(solution.outcome, Outcome::IncompleteSelection);
        assert!(solution.steps.is_empty());
        assert_eq!(solution.final_compositions, None);
        assert_eq!(puzzle.dissection_plan(), None);

        let mut puzzle = Puzzle::new([Sphere, Pyramid, Cube], [Circle, Square, Triangle]);
        puzzle.starting[2] = None;
        assert_eq!(puzzle.solve().unwrap().outcome, Outcome::IncompleteSelection);
    }

    #[test]
    fn test_classify_keeps_one_copy_of_a_duplicate() {
        let slot = Slot::new(Position::Left, Cube, Prism);
        let classification = classify(&slot);
        assert_eq!(classification.dissectable, vec![Square]);
        assert_eq!(classification.needed, vec![Triangle]);

        let slot = Slot::new(Position::Left, Sphere, Prism);
        let classification = classify(&slot);
        assert_eq!(classification.dissectable, vec![Circle, Circle]);
        assert_eq!(classification.needed, vec![Square, Triangle]);
    }

    #[test]
    fn test_dissection_plan() {
        let puzzle = Puzzle::new([Sphere, Cone, Cube], [Circle, Square, Triangle]);
        assert_eq!(
            puzzle.dissection_plan(),
            Some([vec![Circle, Circle], vec![], vec![Square]])
        );
    }

    #[test]
    fn test_runs_are_deterministic_and_independent() {
        let puzzle = Puzzle::new([Cone, Sphere, Pyramid], [Triangle, Circle, Square]);
        let first = puzzle.solve().unwrap();
        let second = puzzle.solve().unwrap();
        assert_eq!(first, second);
        // the puzzle itself is never mutated by a run
        assert_eq!(puzzle, Puzzle::new([Cone, Sphere, Pyramid], [Triangle, Circle, Square]));
    }

    #[test]
    fn test_every_balanced_puzzle_conserves_pieces_and_completes_once() {
        for a in Composite::ALL {
            for b in Composite::ALL {
                for c in Composite::ALL {
                    for x in Primitive::ALL {
                        for y in Primitive::ALL {
                            for z in Primitive::ALL {
                                let puzzle = Puzzle::new([a, b, c], [x, y, z]);
                                let solution = puzzle.solve().unwrap();
                                if !solution.solvable() {
                                    assert!(solution.steps.is_empty());
                                    continue;
                                }

                                let held = replay(&puzzle, &solution.steps);
                                assert_eq!(count_primitives(&held), [2, 2, 2]);
                                for position in Position::ALL {
                                    let mut pieces = held[position.index()].clone();
                                    pieces.sort_unstable();
                                    assert_eq!(
                                        solution.final_composition(position).map(|p| p.to_vec()),
                                        Some(pieces)
                                    );

                                    let markers = solution
                                        .steps
                                        .iter()
                                        .filter(|&&step| step == Step::Complete(position))
                                        .count();
                                    let solved = !solution.unsolved.contains(&position);
                                    assert_eq!(markers, usize::from(solved), "{puzzle:?}");
                                }
                            }
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_completed_positions_are_never_dissected_again() {
        for a in Composite::ALL {
            for b in Composite::ALL {
                for c in Composite::ALL {
                    let puzzle = Puzzle::new([a, b, c], [Triangle, Square, Circle]);
                    let solution = puzzle.solve().unwrap();
                    let mut completed = Vec::new();
                    for step in &solution.steps {
                        match *step {
                            Step::Complete(position) => completed.push(position),
                            Step::Dissect { from, .. } => {
                                assert!(!completed.contains(&from), "{puzzle:?}")
                            }
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_distinct_selections_always_resolve_balanced_puzzles() {
        let orders = [
            [Circle, Square, Triangle],
            [Circle, Triangle, Square],
            [Square, Circle, Triangle],
            [Square, Triangle, Circle],
            [Triangle, Circle, Square],
            [Triangle, Square, Circle],
        ];
        for a in Composite::ALL {
            for b in Composite::ALL {
                for c in Composite::ALL {
                    for selections in orders {
                        let solution = Puzzle::new([a, b, c], selections).solve().unwrap();
                        if solution.solvable() {
                            assert!(solution.is_complete(), "{a} {b} {c} {selections:?}");
                        }
                    }
                }
            }
        }
    }
}
