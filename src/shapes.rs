//! Shape catalog: primitives, composites, positions and the fixed tables
//! relating them.
//!
//! Every composite is an unordered pair of primitives. A position's target
//! composite is derived from the primitive selected for that position.

use std::fmt;
use std::str::FromStr;

use crate::error::DissectionError;

/// Two primitives making up a composite.
pub type Pair = [Primitive; 2];

/// An atomic shape piece.
///
/// Declaration order is the display order used for sorted compositions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Primitive {
    Circle,
    Square,
    Triangle,
}

impl Primitive {
    /// All primitives in declaration order.
    pub const ALL: [Primitive; 3] = [Primitive::Circle, Primitive::Square, Primitive::Triangle];

    /// Index into per-primitive count arrays.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn name(self) -> &'static str {
        match self {
            Primitive::Circle => "Circle",
            Primitive::Square => "Square",
            Primitive::Triangle => "Triangle",
        }
    }

    /// The composite a position must end up as when this primitive is selected.
    pub const fn target(self) -> Composite {
        SELECTION_RULE[self.index()].1
    }
}

/// A named shape built from two primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Composite {
    Sphere,
    Pyramid,
    Cube,
    Cone,
    Prism,
    Cylinder,
}

impl Composite {
    /// All composites in catalog order.
    pub const ALL: [Composite; 6] = [
        Composite::Sphere,
        Composite::Pyramid,
        Composite::Cube,
        Composite::Cone,
        Composite::Prism,
        Composite::Cylinder,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Composite::Sphere => "Sphere",
            Composite::Pyramid => "Pyramid",
            Composite::Cube => "Cube",
            Composite::Cone => "Cone",
            Composite::Prism => "Prism",
            Composite::Cylinder => "Cylinder",
        }
    }

    /// The two primitives this composite is made of.
    #[inline]
    pub const fn composition(self) -> Pair {
        COMPOSITIONS[self as usize].1
    }

    /// Identifies the composite formed by two primitives, in either order.
    pub const fn from_pair(pair: Pair) -> Composite {
        use Primitive::{Circle, Square, Triangle};

        match (pair[0], pair[1]) {
            (Circle, Circle) => Composite::Sphere,
            (Triangle, Triangle) => Composite::Pyramid,
            (Square, Square) => Composite::Cube,
            (Circle, Triangle) | (Triangle, Circle) => Composite::Cone,
            (Square, Triangle) | (Triangle, Square) => Composite::Prism,
            (Circle, Square) | (Square, Circle) => Composite::Cylinder,
        }
    }
}

/// One of the three puzzle positions.
///
/// Declaration order is resolution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Position {
    Left,
    Middle,
    Right,
}

impl Position {
    /// Positions in resolution order.
    pub const ALL: [Position; 3] = [Position::Left, Position::Middle, Position::Right];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn name(self) -> &'static str {
        match self {
            Position::Left => "Left",
            Position::Middle => "Middle",
            Position::Right => "Right",
        }
    }

    /// Positions searched, in order, for a piece this position needs.
    #[inline]
    pub const fn donors(self) -> &'static [Position] {
        DONOR_PRIORITY[self.index()]
    }
}

/// Composition of every composite.
///
/// Ordering note: rows must follow the `Composite` declaration order, since
/// `Composite::composition` indexes by discriminant.
pub const COMPOSITIONS: [(Composite, Pair); 6] = [
    (Composite::Sphere, [Primitive::Circle, Primitive::Circle]),
    (Composite::Pyramid, [Primitive::Triangle, Primitive::Triangle]),
    (Composite::Cube, [Primitive::Square, Primitive::Square]),
    (Composite::Cone, [Primitive::Circle, Primitive::Triangle]),
    (Composite::Prism, [Primitive::Square, Primitive::Triangle]),
    (Composite::Cylinder, [Primitive::Circle, Primitive::Square]),
];

/// Target composite for each selected primitive, in `Primitive` order.
pub const SELECTION_RULE: [(Primitive, Composite); 3] = [
    (Primitive::Circle, Composite::Prism),
    (Primitive::Square, Composite::Cone),
    (Primitive::Triangle, Composite::Cylinder),
];

/// Donor search order for each position, in `Position` order.
///
/// Right is the residual position and never searches.
pub const DONOR_PRIORITY: [&[Position]; 3] = [
    &[Position::Middle, Position::Right],
    &[Position::Right],
    &[],
];

/// Resolves a position's selection to its target; an absent selection has none.
#[inline]
pub fn target_for(selection: Option<Primitive>) -> Option<Composite> {
    selection.map(Primitive::target)
}

/// Looks up a composite's composition by name.
pub fn composition_of(name: &str) -> Result<Pair, DissectionError> {
    name.parse::<Composite>().map(Composite::composition)
}

/// Sorts a pair into display order.
#[inline]
pub fn sorted(mut pair: Pair) -> Pair {
    pair.sort_unstable();
    pair
}

impl FromStr for Primitive {
    type Err = DissectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Primitive::ALL
            .into_iter()
            .find(|primitive| primitive.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| DissectionError::InvalidShape(s.to_string()))
    }
}

impl FromStr for Composite {
    type Err = DissectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Composite::ALL
            .into_iter()
            .find(|composite| composite.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| DissectionError::InvalidShape(s.to_string()))
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for Composite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
