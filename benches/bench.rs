use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ndarray::Array1;
use psfd_wave::*;

macro_rules! bench_operator {
    ($fname:ident, $method:expr, $(($name:expr, $nx:expr))+) => {
        fn $fname(c: &mut Criterion) {
            $(
            {
                let grid = Grid::new($nx, ($nx - 1) as f64).unwrap();
                let mut op = $method.operator(&grid).unwrap();
                let f = grid.coordinates().mapv(|x| (0.05 * x).sin());
                let mut d2f = black_box(Array1::zeros($nx));

                c.bench_function($name, |b| {
                    b.iter(|| {
                        op.apply(f.view(), d2f.view_mut());
                    });
                });
            }
            )+
        }
    }
}

bench_operator! {spectral, Method::Spectral,
                 ("spectral_128", 128)
                 ("spectral_512", 512)
                 ("spectral_2048", 2048)
                 }

bench_operator! {three_point, Method::ThreePoint,
                 ("three_point_128", 128)
                 ("three_point_512", 512)
                 ("three_point_2048", 2048)
                 }

bench_operator! {five_point, Method::FivePoint,
                 ("five_point_128", 128)
                 ("five_point_512", 512)
                 ("five_point_2048", 2048)
                 }

/// One leapfrog step of all three methods on the default air setup.
fn simulation_step(c: &mut Criterion) {
    let config = Config::default();
    let mut sim = config.build_simulation().unwrap();

    c.bench_function("simulation_step_2024", |b| {
        b.iter(|| {
            if sim.is_finished() {
                sim = config.build_simulation().unwrap();
            }
            sim.step();
            black_box(sim.current_step());
        });
    });
}

criterion_group!(benches, spectral, three_point, five_point, simulation_step);
criterion_main!(benches);
