mod util;

use cubical_potts::DebugInvariants;
use cubical_potts::topology::CubicalComplex;
use proptest::prelude::*;

fn field_order() -> impl Strategy<Value = u32> {
    prop::sample::select(vec![2u32, 3, 4, 5, 7, 8, 9])
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn boundary_of_boundary_vanishes(
        corners in prop::collection::vec(2usize..5, 1..=3),
        q in field_order(),
        periodic in any::<bool>(),
    ) {
        let c = CubicalComplex::build(&corners, q, None, periodic).unwrap();
        for t in 2..=c.dimension() {
            prop_assert!(c.boundary(t).composes_to_zero(&c.boundary(t - 1), c.field()));
        }
    }

    #[test]
    fn generated_complexes_are_valid(
        corners in prop::collection::vec(2usize..6, 1..=3),
        periodic in any::<bool>(),
    ) {
        let c = CubicalComplex::build(&corners, 2, None, periodic).unwrap();
        prop_assert!(c.validate_invariants().is_ok());
        for k in 1..=c.dimension() {
            for cell in c.cells_of(k) {
                prop_assert_eq!(cell.faces().len(), 2 * k);
                prop_assert_eq!(cell.vertices().len(), 1 << k);
            }
        }
    }

    #[test]
    fn every_column_has_2t_entries(
        corners in prop::collection::vec(2usize..5, 2..=3),
        q in field_order(),
    ) {
        let c = CubicalComplex::build(&corners, q, None, true).unwrap();
        for t in 1..=c.dimension() {
            let b = c.boundary(t);
            prop_assert_eq!(b.nrows(), c.count(t - 1));
            for j in 0..b.ncols() {
                prop_assert_eq!(b.column(j).len(), 2 * t);
            }
        }
    }
}
