use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tarn_core::{CellCoord, ConfigError, Dimension, Topology};
use tarn_grid::{Grid, Lattice};
use tarn_init::InitialCondition;

fn fill(lattice: &Lattice, ic: &InitialCondition, seed: u64) -> Grid {
    let generator = ic.compile(lattice).unwrap();
    let mut grid = Grid::new(lattice.clone());
    grid.fill(f64::NAN);
    generator
        .fill(&mut grid, &mut ChaCha8Rng::seed_from_u64(seed))
        .unwrap();
    grid
}

proptest! {
    #[test]
    fn single_seed_sets_exactly_one_cell(
        nx in 1usize..6,
        ny in 1usize..6,
        nz in 1usize..4,
        sx in 0usize..6,
        sy in 0usize..6,
        sz in 0usize..4,
    ) {
        let lattice = Lattice::new(
            Dimension::D3,
            &[
                tarn_grid::AxisSpec::bounded(nx, 1.0),
                tarn_grid::AxisSpec::periodic(ny, 1.0),
                tarn_grid::AxisSpec::bounded(nz, 1.0),
            ],
        ).unwrap();
        let index: CellCoord = [sx % nx, sy % ny, sz % nz].into_iter().collect();
        let ic = InitialCondition::SingleSeed { index: index.clone(), value: 7.0, background: 0.5 };
        let grid = fill(&lattice, &ic, 0);
        let seeded = grid.values().iter().filter(|&&v| v == 7.0).count();
        let background = grid.values().iter().filter(|&&v| v == 0.5).count();
        prop_assert_eq!(seeded, 1);
        prop_assert_eq!(background, lattice.cell_count() - 1);
        prop_assert_eq!(grid.get(&index), Some(7.0));
    }

    #[test]
    fn every_cell_is_written(seed in any::<u64>(), n in 1usize..40) {
        let lattice = Lattice::uniform(Dimension::D1, n, 1.0, Topology::Bounded).unwrap();
        for ic in [
            InitialCondition::RandomUniform { min: -1.0, max: 1.0 },
            InitialCondition::RandomGaussian { mean: 0.0, std_dev: 1.0 },
            InitialCondition::Constant(2.0),
        ] {
            let grid = fill(&lattice, &ic, seed);
            prop_assert!(grid.values().iter().all(|v| v.is_finite()));
        }
    }
}

#[test]
fn generator_rejects_grid_of_other_size() {
    let small = Lattice::uniform(Dimension::D1, 4, 1.0, Topology::Bounded).unwrap();
    let large = Lattice::uniform(Dimension::D1, 8, 1.0, Topology::Bounded).unwrap();
    let generator = InitialCondition::Constant(1.0).compile(&small).unwrap();
    let mut grid = Grid::new(large);
    let err = generator
        .fill(&mut grid, &mut ChaCha8Rng::seed_from_u64(0))
        .unwrap_err();
    assert!(matches!(err, ConfigError::InvalidInitialCondition { .. }));
    assert!(grid.values().iter().all(|&v| v == 0.0));
}

#[test]
fn seeded_runs_reproduce() {
    let lattice = Lattice::uniform(Dimension::D2, 10, 0.5, Topology::Periodic).unwrap();
    let ic = InitialCondition::RandomGaussian {
        mean: 1.0,
        std_dev: 0.3,
    };
    assert_eq!(fill(&lattice, &ic, 11).values(), fill(&lattice, &ic, 11).values());
    assert_ne!(fill(&lattice, &ic, 11).values(), fill(&lattice, &ic, 12).values());
}
