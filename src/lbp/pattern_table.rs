//! Rotation-invariant pattern table
//!
//! Maps each of the 64 raw codes to the canonical code of its rotation
//! class and to the class label. Tables are usually read from a
//! tab-separated resource with the columns `original`, `minvalue` and
//! `rotation_invariant`; [`CanonicalTable::rotation_invariant`] builds the
//! same table from the rotation group of the cube.
//!
//! A table is only constructed if it is complete: every raw code has
//! exactly one row, every canonical code is itself a raw code, and that
//! code's own row maps to itself. The label of a canonical code `c` is the
//! label stored on row `c`.

use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{LbpError, Result};
use super::offsets::{NeighborConvention, NEIGHBOR_OFFSETS, NUM_CODES, NUM_NEIGHBORS};

const COL_ORIGINAL: &str = "original";
const COL_MINVALUE: &str = "minvalue";
const COL_LABEL: &str = "rotation_invariant";

/// Canonical code and label of one rotation class
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternClass {
    pub code: u8,
    pub label: String,
}

/// Complete raw code -> rotation class lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalTable {
    /// Indexed by raw code, always NUM_CODES long
    rows: Vec<PatternClass>,
}

impl CanonicalTable {
    /// Build a table from `(original, canonical, label)` rows
    pub fn from_rows<I, S>(rows: I) -> Result<Self>
    where
        I: IntoIterator<Item = (u8, u8, S)>,
        S: Into<String>,
    {
        let mut slots: Vec<Option<PatternClass>> = vec![None; NUM_CODES];

        for (original, canonical, label) in rows {
            let slot = slots.get_mut(original as usize)
                .ok_or(LbpError::PatternCodeOutOfRange { code: original })?;
            if slot.is_some() {
                return Err(LbpError::DuplicateTableEntry { code: original });
            }
            if canonical as usize >= NUM_CODES {
                return Err(LbpError::InvalidCanonicalCode {
                    original,
                    canonical: canonical as i64,
                });
            }
            *slot = Some(PatternClass { code: canonical, label: label.into() });
        }

        let mut table = Vec::with_capacity(NUM_CODES);
        for (code, slot) in slots.into_iter().enumerate() {
            let row = slot.ok_or(LbpError::IncompleteCanonicalTable { code: code as u8 })?;
            table.push(row);
        }

        // Class representatives must map to themselves
        for (original, row) in table.iter().enumerate() {
            let representative = &table[row.code as usize];
            if representative.code != row.code {
                return Err(LbpError::InvalidCanonicalCode {
                    original: original as u8,
                    canonical: row.code as i64,
                });
            }
        }

        Ok(Self { rows: table })
    }

    /// Parse a tab-separated table
    ///
    /// The first non-empty line is the header. Columns are located by name
    /// and any extra columns are ignored. Integer fields may carry
    /// surrounding whitespace; labels are kept verbatim.
    pub fn parse(text: &str) -> Result<Self> {
        let mut lines = text.lines()
            .enumerate()
            .map(|(i, l)| (i + 1, l.trim_end_matches('\r')))
            .filter(|(_, l)| !l.trim().is_empty());

        let (_, header) = lines.next().ok_or(LbpError::MissingTableColumn(COL_ORIGINAL))?;
        let columns: Vec<&str> = header.split('\t').map(str::trim).collect();
        let find = |name: &'static str| {
            columns.iter()
                .position(|&c| c == name)
                .ok_or(LbpError::MissingTableColumn(name))
        };
        let original_col = find(COL_ORIGINAL)?;
        let minvalue_col = find(COL_MINVALUE)?;
        let label_col = find(COL_LABEL)?;

        let mut rows = Vec::with_capacity(NUM_CODES);
        for (line, text) in lines {
            let fields: Vec<&str> = text.split('\t').collect();
            let field = |col: usize, name: &str| {
                fields.get(col).copied().ok_or_else(|| LbpError::TableParse {
                    line,
                    message: format!("missing '{}' field", name),
                })
            };

            let original = parse_code(field(original_col, COL_ORIGINAL)?, line)?;
            let original = u8::try_from(original)
                .ok()
                .filter(|&c| (c as usize) < NUM_CODES)
                .ok_or_else(|| LbpError::TableParse {
                    line,
                    message: format!("pattern code {} is outside 0..{}", original, NUM_CODES),
                })?;

            let canonical = parse_code(field(minvalue_col, COL_MINVALUE)?, line)?;
            let canonical = u8::try_from(canonical)
                .map_err(|_| LbpError::InvalidCanonicalCode { original, canonical })?;

            let label = field(label_col, COL_LABEL)?.to_string();
            rows.push((original, canonical, label));
        }

        Self::from_rows(rows)
    }

    /// Read and parse a table file
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| LbpError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    /// Generate the table from the 24 proper rotations of the cube
    ///
    /// The canonical code of a class is its smallest member and the label is
    /// that code written as six binary digits (bit 5 first). The convention
    /// decides which neighbour each bit reads, and so which bits rotate into
    /// each other.
    pub fn rotation_invariant(convention: NeighborConvention) -> Self {
        let permutations = rotation_bit_permutations(convention);

        let rows = (0..NUM_CODES as u8)
            .map(|code| {
                let canonical = permutations.iter()
                    .map(|perm| permute_bits(code, perm))
                    .min()
                    .unwrap_or(code);
                (code, canonical, format!("{:06b}", canonical))
            })
            .collect::<Vec<_>>();

        // Rotation orbits are closed and contain their minimum
        Self::from_rows(rows).unwrap_or_else(|e| unreachable!("generated table is invalid: {}", e))
    }

    /// Rotation class of a raw code
    pub fn lookup(&self, code: u8) -> Result<&PatternClass> {
        self.rows.get(code as usize).ok_or(LbpError::IncompleteCanonicalTable { code })
    }

    /// Label reported for a canonical code
    pub fn label_for(&self, canonical: u8) -> Result<&str> {
        self.lookup(canonical).map(|row| row.label.as_str())
    }

    /// Distinct canonical codes with their labels, in code order
    pub fn classes(&self) -> BTreeMap<u8, &str> {
        self.rows.iter()
            .map(|row| (row.code, self.rows[row.code as usize].label.as_str()))
            .collect()
    }

    /// Number of rotation classes
    pub fn num_classes(&self) -> usize {
        self.classes().len()
    }
}

fn parse_code(field: &str, line: usize) -> Result<i64> {
    field.trim().parse::<i64>().map_err(|_| LbpError::TableParse {
        line,
        message: format!("'{}' is not an integer", field),
    })
}

/// Bit permutations induced by the proper rotations of the cube
///
/// Entry `perm[j]` is the bit that neighbour `j` moves to.
fn rotation_bit_permutations(convention: NeighborConvention) -> Vec<[usize; NUM_NEIGHBORS]> {
    let directions: [[isize; 3]; NUM_NEIGHBORS] = std::array::from_fn(|j| {
        let (x, y, z) = convention.displacement(NEIGHBOR_OFFSETS[j]);
        [x, y, z]
    });

    const AXIS_ORDERS: [[usize; 3]; 6] = [
        [0, 1, 2], [0, 2, 1], [1, 0, 2], [1, 2, 0], [2, 0, 1], [2, 1, 0],
    ];
    const ORDER_PARITY: [isize; 6] = [1, -1, -1, 1, 1, -1];

    let mut permutations = Vec::with_capacity(24);
    for (order, parity) in AXIS_ORDERS.iter().zip(ORDER_PARITY) {
        for signs in 0..8u8 {
            let s = [
                if signs & 1 != 0 { -1 } else { 1 },
                if signs & 2 != 0 { -1 } else { 1 },
                if signs & 4 != 0 { -1 } else { 1 },
            ];
            if parity * s[0] * s[1] * s[2] != 1 {
                continue;
            }

            let mut perm = [0usize; NUM_NEIGHBORS];
            for (j, d) in directions.iter().enumerate() {
                let rotated = [s[0] * d[order[0]], s[1] * d[order[1]], s[2] * d[order[2]]];
                // Rotations map face directions onto face directions
                perm[j] = directions.iter().position(|&e| e == rotated).unwrap_or(j);
            }
            permutations.push(perm);
        }
    }
    permutations
}

fn permute_bits(code: u8, perm: &[usize; NUM_NEIGHBORS]) -> u8 {
    perm.iter()
        .enumerate()
        .filter(|&(j, _)| code & (1 << j) != 0)
        .fold(0u8, |acc, (_, &target)| acc | (1 << target))
}
