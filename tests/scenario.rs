//! The air setup: 2024 points over 1250 m, c = 343 m/s, eps = 0.2, a 60 Hz
//! pulse at index 1249, 3500 steps. The wavefronts stay clear of both ends.

use psfd_wave::analysis::{green_reference, max_abs, relative_misfit};
use psfd_wave::{Config, Method, Simulation};

fn air(snapshot_interval: usize) -> Simulation {
    Config {
        snapshot_interval,
        ..Config::default()
    }
    .build_simulation()
    .unwrap()
}

#[test]
fn air_scenario_setup() {
    let sim = air(50);
    let grid = sim.grid();
    assert_eq!(grid.len(), 2024);
    assert!((grid.dx() - 1250. / 2023.).abs() < 1e-12);
    assert!((sim.params().dt - 0.2 * grid.dx() / 343.).abs() < 1e-15);
    assert_eq!(sim.source().series().len(), 3500);
    assert_eq!(sim.source().profile()[1249], 1.);
}

#[test]
fn air_scenario_ranks_the_discretizations() {
    let mut sim = air(1);
    let nx = sim.grid().len();
    let mut seen = 0;
    sim.run_with(|snap| {
        seen += 1;
        for (method, field) in &snap.fields {
            assert_eq!(field[0], 0., "{} left boundary at step {}", method, snap.step);
            assert_eq!(field[nx - 1], 0., "{} right boundary at step {}", method, snap.step);
        }
    });
    assert_eq!(seen, 3501);

    let reference = green_reference(
        sim.grid(),
        sim.source(),
        sim.params().velocity,
        sim.params().dt,
        sim.current_step(),
    );
    assert!(max_abs(reference.view()) > 0.);

    let misfit = |m: Method| {
        let field = sim.propagator(m).unwrap().current();
        assert!(field.iter().all(|v| v.is_finite()), "{} produced non-finite values", m);
        relative_misfit(field, reference.view())
    };
    let spectral = misfit(Method::Spectral);
    let fd3 = misfit(Method::ThreePoint);
    let fd5 = misfit(Method::FivePoint);

    assert!(spectral < fd3, "spectral {} vs 3-point {}", spectral, fd3);
    assert!(spectral < fd5, "spectral {} vs 5-point {}", spectral, fd5);
    assert!(fd5 < fd3, "5-point {} vs 3-point {}", fd5, fd3);
}

#[test]
fn methods_do_not_influence_each_other() {
    let config = Config {
        nx: 256,
        length: 255.,
        nt: 300,
        velocity: 1.,
        source_index: 100,
        frequency: 0.08,
        ..Config::default()
    };
    let mut alone = Config {
        methods: vec![Method::Spectral],
        ..config.clone()
    }
    .build_simulation()
    .unwrap();
    let mut together = config.build_simulation().unwrap();

    let a = alone.run_recorded();
    let b = together.run_recorded();
    assert_eq!(a.len(), b.len());
    for (sa, sb) in a.iter().zip(b.iter()) {
        assert_eq!(sa.step, sb.step);
        assert_eq!(sa.field(Method::Spectral), sb.field(Method::Spectral));
    }
}
