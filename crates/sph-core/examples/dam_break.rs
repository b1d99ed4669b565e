//! Classic dam break: a water column collapses into a long shallow tank.

use glam::Vec3;
use sph_core::{FluidProperties, Solver, SolverConfig, SolverError};

fn main() -> Result<(), SolverError> {
    let config = SolverConfig {
        domain: Vec3::new(3.0, 2.0, 1.0),
        smoothing_length: 0.05,
        time_step: 5e-4,
        ..SolverConfig::default()
    };
    let mut solver = Solver::new(config)?;

    let placed = solver.append_fluid_box(
        Vec3::new(0.2, 0.0, 0.1),
        Vec3::new(0.6, 1.0, 0.8),
        5000,
        &FluidProperties::WATER,
    )?;
    println!("dam break: {placed} water particles");

    solver.run_with(0.25, |solver, step| {
        if (step + 1) % 100 == 0 {
            let info = solver.info();
            println!(
                "step {:>4}  t = {:.3} s  rho = {:7.1} kg/m^3  |v|max = {:5.2} m/s  cells = {}",
                info.step, info.time, info.avg_density, info.max_speed, info.grid.cells
            );
        }
    });

    let info = solver.info();
    println!(
        "done: {} particles after {} steps, mean speed {:.3} m/s",
        info.particles, info.step, info.avg_speed
    );
    Ok(())
}
