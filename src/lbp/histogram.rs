//! Normalized histogram of canonical pattern labels

use std::collections::BTreeMap;

use crate::error::{check_len, Result};
use super::pattern_table::CanonicalTable;

/// Relative frequency of each observed pattern label
///
/// Values lie in [0, 1] and sum to 1 for a non-empty mask. An empty mask
/// gives an empty vector.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrequencyVector {
    frequencies: BTreeMap<String, f64>,
}

impl FrequencyVector {
    pub fn get(&self, label: &str) -> Option<f64> {
        self.frequencies.get(label).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.frequencies.iter().map(|(label, &f)| (label.as_str(), f))
    }

    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }

    /// Sum of all frequencies (1 for a non-empty mask, 0 otherwise)
    pub fn total(&self) -> f64 {
        self.frequencies.values().sum()
    }

    pub fn into_inner(self) -> BTreeMap<String, f64> {
        self.frequencies
    }

    /// One entry per class of `table` in canonical code order, 0 for
    /// classes that were not observed
    ///
    /// Gives every subject the same feature layout.
    pub fn dense(&self, table: &CanonicalTable) -> Vec<(String, f64)> {
        let mut seen = std::collections::BTreeSet::new();
        table.classes()
            .into_values()
            .filter(|label| seen.insert(*label))
            .map(|label| (label.to_string(), self.get(label).unwrap_or(0.0)))
            .collect()
    }
}

/// Build the label frequency vector of the masked result volume
///
/// # Arguments
/// * `result` - Canonical codes (nx * ny * nz)
/// * `mask` - Binary mask (nx * ny * nz)
/// * `table` - Table used to resolve labels
pub fn build_histogram(result: &[u8], mask: &[u8], table: &CanonicalTable) -> Result<FrequencyVector> {
    check_len("mask", result.len(), mask.len())?;

    let mut counts: BTreeMap<u8, usize> = BTreeMap::new();
    for (&code, &m) in result.iter().zip(mask) {
        if m == 1 {
            *counts.entry(code).or_insert(0) += 1;
        }
    }

    let total: usize = counts.values().sum();
    let mut frequencies = BTreeMap::new();
    if total == 0 {
        return Ok(FrequencyVector { frequencies });
    }

    for (code, count) in counts {
        let label = table.label_for(code)?;
        // Codes sharing a label are one class
        *frequencies.entry(label.to_string()).or_insert(0.0) += count as f64 / total as f64;
    }

    Ok(FrequencyVector { frequencies })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LbpError;
    use crate::lbp::offsets::NeighborConvention;

    fn table() -> CanonicalTable {
        CanonicalTable::rotation_invariant(NeighborConvention::Legacy)
    }

    #[test]
    fn test_histogram_two_thirds() {
        let table = table();
        let five = table.lookup(5).unwrap().code;
        let result = [0, five, 0, 9];
        let mask = [1, 1, 1, 0];

        let freq = build_histogram(&result, &mask, &table).unwrap();
        assert_eq!(freq.len(), 2);
        assert!((freq.get(table.label_for(0).unwrap()).unwrap() - 2.0 / 3.0).abs() < 1e-12);
        assert!((freq.get(table.label_for(five).unwrap()).unwrap() - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_histogram_empty_mask() {
        let freq = build_histogram(&[1, 3, 7], &[0, 0, 0], &table()).unwrap();
        assert!(freq.is_empty());
        assert_eq!(freq.total(), 0.0);
    }

    #[test]
    fn test_histogram_mask_length_checked() {
        let table = table();
        // A longer mask would otherwise be silently truncated
        let result = build_histogram(&[0, 0], &[1, 1, 1], &table);
        assert!(matches!(
            result,
            Err(LbpError::LengthMismatch { what: "mask", expected: 2, actual: 3 })
        ));
    }

    #[test]
    fn test_histogram_sums_to_one() {
        let table = table();
        let result: Vec<u8> = (0..1000).map(|i| table.lookup((i % 64) as u8).unwrap().code).collect();
        let mask: Vec<u8> = (0..1000).map(|i| (i % 3 != 0) as u8).collect();
        let freq = build_histogram(&result, &mask, &table).unwrap();
        assert!((freq.total() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_histogram_merges_shared_labels() {
        let rows = (0..64u8).map(|c| {
            let label = if c < 32 { "low" } else { "high" };
            (c, c, label)
        });
        let table = CanonicalTable::from_rows(rows).unwrap();
        let freq = build_histogram(&[1, 2, 40, 41], &[1, 1, 1, 1], &table).unwrap();
        assert_eq!(freq.get("low"), Some(0.5));
        assert_eq!(freq.get("high"), Some(0.5));
    }

    #[test]
    fn test_dense_layout() {
        let table = table();
        let freq = build_histogram(&[0, 0], &[1, 1], &table).unwrap();
        let dense = freq.dense(&table);
        assert_eq!(dense.len(), 10);
        assert_eq!(dense[0], ("000000".to_string(), 1.0));
        assert!(dense[1..].iter().all(|(_, f)| *f == 0.0));
    }
}
