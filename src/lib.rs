//! Shape Dissection Solver Library
//!
//! Three positions each hold a composite shape made of two primitives. Every
//! position is assigned a target composite derived from a selected primitive,
//! and the solver exchanges primitives between positions until each holds
//! its target, recording every exchange as a step.

pub mod balance;
pub mod error;
pub mod logging;
pub mod persistence;
pub mod shapes;
pub mod slot;
pub mod solver;
pub mod survey;

pub use error::{DissectionError, Result};
pub use shapes::{Composite, Pair, Position, Primitive};
pub use solver::{Outcome, Puzzle, Solution, Step};
