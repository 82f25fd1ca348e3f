mod util;

use cubical_potts::homology::{Filtration, InsertionOrder, PersistenceTracker};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use util::{open_box, torus};

#[test]
fn same_seed_same_pairs() {
    let c = torus(&[3, 3], 3);
    let tracker = PersistenceTracker::new(c.clone(), 1).unwrap();
    let cocycle = vec![0; c.count(0)];
    for seed in [0u64, 1, 42, 0xDEAD_BEEF] {
        let a = tracker
            .essential_cycles_born(Filtration::Uniform, &cocycle, &mut SmallRng::seed_from_u64(seed))
            .unwrap();
        let b = tracker
            .essential_cycles_born(Filtration::Uniform, &cocycle, &mut SmallRng::seed_from_u64(seed))
            .unwrap();
        assert_eq!(a, b);
    }
}

#[test]
fn different_seeds_give_different_births() {
    let c = torus(&[3, 3], 2);
    let tracker = PersistenceTracker::new(c.clone(), 1).unwrap();
    let cocycle = vec![0; c.count(0)];
    let births: Vec<usize> = (0..20u64)
        .map(|seed| {
            let out = tracker
                .essential_cycles_born(Filtration::Uniform, &cocycle, &mut SmallRng::seed_from_u64(seed))
                .unwrap();
            let birth = out.birth.expect("the torus always percolates");
            assert!(birth < out.filtration_length);
            assert_eq!(out.filtration_length, c.len());
            birth
        })
        .collect();
    assert!(births.iter().any(|&b| b != births[0]), "births {births:?}");
}

#[test]
fn torus_betti_numbers_from_full_filtration() {
    let c = torus(&[2, 3, 2], 2);
    let mut rng = SmallRng::seed_from_u64(9);
    let tracker = PersistenceTracker::new(c.clone(), 1).unwrap();
    let order = InsertionOrder::draw(&c, 1, Filtration::Uniform, &[], &mut rng);
    let pairs = tracker.reduce(&order);
    assert_eq!(pairs.betti_at_end(0), 1);
    // H1 of the 3-torus, with the 3-cells excluded the 2-cells kill nothing extra
    assert_eq!(pairs.betti_at_end(1), 3);
    assert_eq!(pairs.columns_reduced(), order.len());

    let tracker = PersistenceTracker::new(c.clone(), 2).unwrap();
    let order = InsertionOrder::draw(&c, 2, Filtration::Uniform, &[], &mut rng);
    let pairs = tracker.reduce(&order);
    assert_eq!(pairs.betti_at_end(2), 3);
    assert_eq!(pairs.betti_at_end(3), 1);
}

#[test]
fn births_fall_inside_the_filtration() {
    let c = torus(&[3, 3], 5);
    let tracker = PersistenceTracker::new(c.clone(), 1).unwrap();
    let plaquettes = c.count(1);
    let mut rng = SmallRng::seed_from_u64(3);
    for _ in 0..25 {
        let cocycle = c.field().random_vector(c.count(0), &mut rng);
        let out = tracker
            .essential_cycles_born(Filtration::Uniform, &cocycle, &mut rng)
            .unwrap();
        let birth = out.birth.expect("the torus always percolates");
        assert!(birth < out.filtration_length);
        assert_eq!(out.essential.len(), plaquettes);
        assert_eq!(out.essential.iter().filter(|&&e| e).count(), 2);
        assert_eq!(out.occupied.last().copied(), out.birth_cell);
        assert!(out.occupied.len() <= plaquettes);
    }
}

#[test]
fn satisfied_first_occupies_satisfied_plaquettes_first() {
    let c = torus(&[3, 3], 3);
    let tracker = PersistenceTracker::new(c.clone(), 1).unwrap();
    let mut rng = SmallRng::seed_from_u64(17);
    let cocycle = c.field().random_vector(c.count(0), &mut rng);
    let out = tracker
        .essential_cycles_born(Filtration::SatisfiedFirst, &cocycle, &mut rng)
        .unwrap();
    let flags: Vec<bool> = out.occupied.iter().map(|&p| out.satisfied[p]).collect();
    // once an unsatisfied plaquette is occupied no satisfied one follows
    assert!(flags.windows(2).all(|w| w[0] || !w[1]));
}

#[test]
fn open_boxes_never_percolate() {
    let c = open_box(&[3, 3], 2);
    let tracker = PersistenceTracker::new(c.clone(), 1).unwrap();
    let mut rng = SmallRng::seed_from_u64(0);
    let out = tracker
        .essential_cycles_born(Filtration::Uniform, &vec![1; c.count(0)], &mut rng)
        .unwrap();
    assert!(!out.percolated());
    assert_eq!(out.occupied.len(), c.count(1));
    assert!(out.cocycle.iter().all(|&x| x == out.cocycle[0]));
}
