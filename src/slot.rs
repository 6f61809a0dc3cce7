//! Per-position working state mutated during a run.
//!
//! The current composition is stored positionally because exchanges act on
//! individual pieces, but solved status compares multisets only.

use crate::error::{DissectionError, Result};
use crate::shapes::{sorted, Composite, Pair, Position, Primitive};

/// Pieces currently held by one position, and the composite it must become.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    position: Position,
    current: Vec<Primitive>,
    target: Composite,
}

impl Slot {
    /// Creates a slot holding its own copy of the starting composite's pieces.
    pub fn new(position: Position, starting: Composite, target: Composite) -> Self {
        Self {
            position,
            current: starting.composition().to_vec(),
            target,
        }
    }

    #[inline]
    pub fn position(&self) -> Position {
        self.position
    }

    #[inline]
    pub fn current(&self) -> &[Primitive] {
        &self.current
    }

    #[inline]
    pub fn target(&self) -> Composite {
        self.target
    }

    #[inline]
    pub fn contains(&self, primitive: Primitive) -> bool {
        self.current.contains(&primitive)
    }

    /// Removes the first occurrence of a piece.
    pub fn remove(&mut self, primitive: Primitive) -> Result<()> {
        let index = self
            .current
            .iter()
            .position(|&held| held == primitive)
            .ok_or(DissectionError::PrimitiveNotPresent {
                position: self.position,
                primitive,
            })?;
        self.current.remove(index);
        Ok(())
    }

    /// Appends a piece. The slot may briefly hold three pieces mid-exchange.
    pub fn add(&mut self, primitive: Primitive) {
        self.current.push(primitive);
    }

    /// True iff the held pieces equal the target's pieces as multisets.
    pub fn is_solved(&self) -> bool {
        let mut held = self.current.clone();
        held.sort_unstable();
        held == sorted(self.target.composition())
    }

    /// The held pair in display order.
    ///
    /// Only meaningful between exchanges, when exactly two pieces are held.
    pub fn sorted_pair(&self) -> Pair {
        debug_assert_eq!(self.current.len(), 2, "{} holds {:?}", self.position, self.current);
        sorted([self.current[0], self.current[1]])
    }
}
