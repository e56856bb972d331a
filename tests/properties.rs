//! Property tests for the LBP pipeline

mod common;

use lbp3d_core::lbp::{lbp_feature_vector, CanonicalTable, LbpParams, NeighborConvention};
use proptest::prelude::*;

fn conventions() -> impl Strategy<Value = NeighborConvention> {
    prop_oneof![Just(NeighborConvention::Legacy), Just(NeighborConvention::AxisAligned)]
}

proptest! {
    #[test]
    fn frequencies_are_normalized(
        values in prop::collection::vec(-4i8..4, 4 * 3 * 2),
        mask in prop::collection::vec(0u8..2, 4 * 3 * 2),
        convention in conventions(),
    ) {
        let volume: Vec<f64> = values.iter().map(|&v| v as f64).collect();
        let table = CanonicalTable::rotation_invariant(convention);
        let params = LbpParams { convention };
        let features = lbp_feature_vector(&volume, &mask, 4, 3, 2, &table, &params).unwrap();

        let selected = mask.iter().filter(|&&m| m == 1).count();
        prop_assert_eq!(features.voxel_count, selected);
        if selected == 0 {
            prop_assert!(features.frequencies.is_empty());
        } else {
            prop_assert!((features.frequencies.total() - 1.0).abs() < 1e-9);
            for (_, f) in features.frequencies.iter() {
                prop_assert!(f > 0.0 && f <= 1.0);
            }
        }
    }

    #[test]
    fn codes_only_inside_mask(
        values in prop::collection::vec(0u8..6, 27),
        mask in prop::collection::vec(0u8..2, 27),
    ) {
        let volume: Vec<f64> = values.iter().map(|&v| v as f64).collect();
        let table = CanonicalTable::rotation_invariant(NeighborConvention::Legacy);
        let features = lbp_feature_vector(&volume, &mask, 3, 3, 3, &table, &LbpParams::default()).unwrap();

        for (i, (&code, &m)) in features.codes.iter().zip(&mask).enumerate() {
            if m == 0 {
                prop_assert_eq!(code, 0, "voxel {} outside the mask has code {}", i, code);
            } else {
                // Every written code is a class representative
                prop_assert_eq!(table.lookup(code).unwrap().code, code);
            }
        }
    }

    #[test]
    fn translation_of_interior_voxel_preserves_code(
        values in prop::collection::vec(0u8..10, 7),
    ) {
        // Same 7-voxel neighbourhood placed at two interior positions of a 5^3 volume
        let dims = (5, 5, 5);
        let table = CanonicalTable::rotation_invariant(NeighborConvention::Legacy);
        let mut labels = Vec::new();
        for center in [(1, 1, 1), (3, 2, 3)] {
            let mut volume = vec![0.0; 125];
            volume[common::idx(dims, center.0, center.1, center.2)] = values[0] as f64;
            let neighbors = std::array::from_fn(|j| values[j + 1] as f64);
            common::place_neighbors(&mut volume, dims, center, neighbors, NeighborConvention::Legacy);
            let mask = common::single_voxel_mask(dims, center.0, center.1, center.2);
            let features = lbp_feature_vector(&volume, &mask, 5, 5, 5, &table, &LbpParams::default()).unwrap();
            labels.push(features.frequencies.into_inner());
        }
        prop_assert_eq!(&labels[0], &labels[1]);
    }
}
