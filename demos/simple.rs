use psfd_wave::{Grid, Method, Simulation, SimulationParams, Source};

fn main() {
    let u = vec![1., 2., 3., 4.];
    let v = vec![3., 2., 1., 4.];
    let d = vec![0., -2., 4., 0.];
    let mut w = vec![0.; 4];

    let dt = 1.;
    let c = 2.;

    psfd_wave::leapfrog_step(&u, &v, &d, &mut w, c * c * dt * dt);

    println!("{:?}", w);

    // a short run of all three methods on a small grid
    let grid = Grid::new(256, 255.).unwrap();
    let params = SimulationParams::from_stability_ratio(&grid, 1., 0.5, 200, 50);
    let source = Source::gaussian_pulse(&grid, 128, 0.05, params.dt, params.nt).unwrap();
    let mut sim = Simulation::new(grid, params, source, &Method::ALL).unwrap();
    sim.run_with(|snap| {
        for (method, field) in &snap.fields {
            println!("step {:4} {:>8}: p[96] = {:+.6e}", snap.step, method.to_string(), field[96]);
        }
    });
}
