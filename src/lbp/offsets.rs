//! Face-neighbour offsets and their bit positions
//!
//! Bit `j` of a pattern code belongs to `NEIGHBOR_OFFSETS[j]`. Canonical
//! tables are authored against this order, so reordering the list silently
//! invalidates every existing table.

use std::str::FromStr;

use crate::error::LbpError;

/// Axis-aligned unit offset `(dx, dy, dz)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Offset {
    pub dx: i8,
    pub dy: i8,
    pub dz: i8,
}

impl Offset {
    pub const fn new(dx: i8, dy: i8, dz: i8) -> Self {
        Self { dx, dy, dz }
    }
}

/// Number of neighbours (P) and therefore bits per pattern code
pub const NUM_NEIGHBORS: usize = 6;

/// Number of distinct raw pattern codes (2^P)
pub const NUM_CODES: usize = 1 << NUM_NEIGHBORS;

/// The six face neighbours in bit order.
///
/// This is the order in which the cartesian product of `{-1, 1, 0}` over
/// (x, y, z) yields the vectors with exactly one non-zero component.
pub const NEIGHBOR_OFFSETS: [Offset; NUM_NEIGHBORS] = [
    Offset::new(-1, 0, 0),
    Offset::new(1, 0, 0),
    Offset::new(0, -1, 0),
    Offset::new(0, 1, 0),
    Offset::new(0, 0, -1),
    Offset::new(0, 0, 1),
];

/// How an offset is turned into the voxel displacement that is read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NeighborConvention {
    /// Read `(x + dy, y - dx, z - dz)`.
    ///
    /// Matches the axis coupling that existing rotation-invariant tables
    /// were generated with.
    #[default]
    Legacy,
    /// Read `(x + dx, y + dy, z + dz)`.
    AxisAligned,
}

impl NeighborConvention {
    /// Voxel displacement `(ddx, ddy, ddz)` read for `offset`
    pub fn displacement(self, offset: Offset) -> (isize, isize, isize) {
        let (dx, dy, dz) = (offset.dx as isize, offset.dy as isize, offset.dz as isize);
        match self {
            NeighborConvention::Legacy => (dy, -dx, -dz),
            NeighborConvention::AxisAligned => (dx, dy, dz),
        }
    }
}

impl FromStr for NeighborConvention {
    type Err = LbpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "legacy" => Ok(NeighborConvention::Legacy),
            "axis_aligned" | "axis-aligned" | "axisaligned" => Ok(NeighborConvention::AxisAligned),
            _ => Err(LbpError::UnknownConvention(s.to_string())),
        }
    }
}
