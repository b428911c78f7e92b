//! Randomized relation-equivalence properties: a built (and reduced) MDD
//! must accept exactly the tuple set it was compiled from.

use std::collections::HashSet;

use proptest::collection::vec;
use proptest::prelude::*;

use mdd_table::prelude::*;

const ARITY: usize = 3;
const DOMAIN: i32 = 4;

fn vars() -> Vec<SimpleVar> {
    (0..ARITY).map(|_| SimpleVar::new(0..DOMAIN)).collect()
}

fn tuples() -> impl Strategy<Value = Vec<Vec<i32>>> {
    vec(vec(0..DOMAIN, ARITY), 0..40)
}

proptest! {
    #[test]
    fn mdd_accepts_exactly_the_table(table in tuples()) {
        let relation: HashSet<Vec<i32>> = table.iter().cloned().collect();
        let mut mdd = Mdd::from_table(vars(), &table, None).unwrap();
        mdd.reduce().unwrap();
        for x in 0..DOMAIN {
            for y in 0..DOMAIN {
                for z in 0..DOMAIN {
                    let t = vec![x, y, z];
                    prop_assert_eq!(mdd.check_tuple(&t), relation.contains(&t));
                }
            }
        }
        mdd.validate_invariants().unwrap();
    }

    #[test]
    fn reduce_never_changes_an_answer(table in tuples()) {
        let unreduced = Mdd::from_table(vars(), &table, None).unwrap();
        let mut reduced = unreduced.clone();
        reduced.reduce().unwrap();
        for x in 0..DOMAIN {
            for y in 0..DOMAIN {
                for z in 0..DOMAIN {
                    let t = vec![x, y, z];
                    prop_assert_eq!(unreduced.check_tuple(&t), reduced.check_tuple(&t));
                }
            }
        }
        prop_assert!(reduced.diagram_len() <= unreduced.diagram_len());
    }

    #[test]
    fn incremental_build_is_equivalent(table in tuples()) {
        let mut batch = Mdd::from_table(vars(), &table, None).unwrap();
        let mut incremental = Mdd::new(vars(), None).unwrap();
        for tuple in &table {
            incremental.add_tuple(tuple).unwrap();
        }
        batch.reduce().unwrap();
        incremental.reduce().unwrap();
        prop_assert_eq!(batch.diagram_len(), incremental.diagram_len());
        for x in 0..DOMAIN {
            for y in 0..DOMAIN {
                for z in 0..DOMAIN {
                    let t = vec![x, y, z];
                    prop_assert_eq!(batch.check_tuple(&t), incremental.check_tuple(&t));
                }
            }
        }
    }

    #[test]
    fn codec_round_trip_preserves_the_relation(table in tuples()) {
        let mut mdd = Mdd::from_table(vars(), &table, None).unwrap();
        mdd.reduce().unwrap();
        let decoded = Mdd::decode(&mdd.encode(), vars()).unwrap();
        for x in 0..DOMAIN {
            for y in 0..DOMAIN {
                for z in 0..DOMAIN {
                    let t = vec![x, y, z];
                    prop_assert_eq!(mdd.check_tuple(&t), decoded.check_tuple(&t));
                }
            }
        }
    }
}
