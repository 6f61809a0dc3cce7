//! Global balance check gating every run.
//!
//! A puzzle can only be dissected into its targets when the three starting
//! composites together hold exactly two of each primitive.

use crate::shapes::{Pair, Primitive};

/// Number of each primitive a balanced puzzle holds.
pub const BALANCED_COUNT: usize = 2;

/// Occurrences of each primitive, indexed by `Primitive::index`.
pub type PrimitiveCounts = [usize; 3];

/// Counts every primitive across a set of compositions.
pub fn count_primitives<I, S>(compositions: I) -> PrimitiveCounts
where
    I: IntoIterator<Item = S>,
    S: AsRef<[Primitive]>,
{
    let mut counts = [0; 3];
    for composition in compositions {
        for primitive in composition.as_ref() {
            counts[primitive.index()] += 1;
        }
    }
    counts
}

/// Returns true iff the compositions hold exactly two circles, two squares
/// and two triangles.
pub fn is_balanced(compositions: &[Pair; 3]) -> bool {
    count_primitives(compositions) == [BALANCED_COUNT; 3]
}
