use ndarray::Array1;
use proptest::prelude::*;
use psfd_wave::operators::SpectralOperator;
use psfd_wave::{Grid, Method, SecondDerivative, Simulation, SimulationParams, Source};

fn arb_method() -> impl Strategy<Value = Method> {
    prop_oneof![
        Just(Method::Spectral),
        Just(Method::ThreePoint),
        Just(Method::FivePoint),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn silent_runs_stay_at_rest(
        half in 3usize..64,
        nt in 1usize..60,
        eps in 0.05f64..0.6,
        method in arb_method(),
    ) {
        let nx = 2 * half;
        let grid = Grid::new(nx, 10.).unwrap();
        let params = SimulationParams::from_stability_ratio(&grid, 3., eps, nt, 7);
        let mut sim = Simulation::new(grid.clone(), params, Source::silent(&grid, nt), &[method]).unwrap();
        for snap in sim.run_recorded() {
            let field = snap.field(method).unwrap();
            prop_assert!(field.iter().all(|&v| v == 0.));
        }
    }

    #[test]
    fn boundaries_stay_pinned(
        series in prop::collection::vec(-1f64..1., 40),
        index in 1usize..47,
        method in arb_method(),
    ) {
        let grid = Grid::new(48, 47.).unwrap();
        let params = SimulationParams::from_stability_ratio(&grid, 1., 0.5, 40, 1);
        let mut profile = grid.zeros() + 0.1;
        profile[index] = 1.;
        let source = Source::new(&grid, 40, Array1::from(series), profile).unwrap();
        let mut sim = Simulation::new(grid, params, source, &[method]).unwrap();
        let mut ok = true;
        sim.run_with(|snap| {
            let f = snap.field(method).unwrap();
            ok &= f[0] == 0. && f[47] == 0.;
        });
        prop_assert!(ok);
    }

    #[test]
    fn spectral_operator_is_linear(
        a in prop::collection::vec(-1f64..1., 32),
        b in prop::collection::vec(-1f64..1., 32),
        alpha in -3f64..3.,
    ) {
        let mut op = SpectralOperator::new(32, 0.5).unwrap();
        let a = Array1::from(a);
        let b = Array1::from(b);
        let combined = &a * alpha + &b;

        let mut da = Array1::zeros(32);
        let mut db = Array1::zeros(32);
        let mut dc = Array1::zeros(32);
        op.apply(a.view(), da.view_mut());
        op.apply(b.view(), db.view_mut());
        op.apply(combined.view(), dc.view_mut());

        let expected = &da * alpha + &db;
        for (x, y) in dc.iter().zip(expected.iter()) {
            prop_assert!((x - y).abs() < 1e-9 * (1. + y.abs()));
        }
    }
}
