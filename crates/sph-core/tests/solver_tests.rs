use glam::Vec3;
use sph_core::{
    Centrifugal, FluidProperties, ForceContributor, ForceSample, Solver, SolverConfig,
    SolverError,
};

fn quiet_config() -> SolverConfig {
    SolverConfig {
        domain: Vec3::new(1.0, 1.0, 1.0),
        smoothing_length: 0.1,
        particle_mass: 1.0,
        gravity: Vec3::ZERO,
        time_step: 0.001,
        max_particles: 1000,
        ..SolverConfig::default()
    }
}

#[test]
fn test_invalid_parameters_rejected() {
    let bad_h = SolverConfig {
        smoothing_length: 0.0,
        ..SolverConfig::default()
    };
    assert!(matches!(
        Solver::new(bad_h).err(),
        Some(SolverError::InvalidParameter(_))
    ));

    let bad_dt = SolverConfig {
        time_step: -0.001,
        ..SolverConfig::default()
    };
    assert!(Solver::new(bad_dt).is_err());

    let bad_domain = SolverConfig {
        domain: Vec3::new(1.0, 0.0, 1.0),
        ..SolverConfig::default()
    };
    assert!(Solver::new(bad_domain).is_err());

    let bad_mass = SolverConfig {
        particle_mass: 0.0,
        ..SolverConfig::default()
    };
    assert!(Solver::new(bad_mass).is_err());
}

#[test]
fn test_empty_step_is_noop() {
    let mut solver = Solver::new(SolverConfig::default()).unwrap();

    solver.step();
    solver.step();

    assert_eq!(solver.time(), 0.0);
    assert_eq!(solver.step_count(), 0);
    assert_eq!(solver.info().particles, 0);
    assert_eq!(solver.info().avg_density, 0.0);
}

#[test]
fn test_run_on_empty_solver_keeps_clocks_at_zero() {
    let mut solver = Solver::new(quiet_config()).unwrap();

    let mut calls = 0;
    solver.run_with(0.01, |s, _| {
        calls += 1;
        assert_eq!(s.step_count(), 0);
    });

    assert_eq!(calls, 10, "callback runs per scheduled step even when empty");
    assert_eq!(solver.time(), 0.0);
}

#[test]
fn test_single_particle_free_fall_regression() {
    let config = SolverConfig {
        gravity: Vec3::new(0.0, -9.81, 0.0),
        ..quiet_config()
    };
    let mut solver = Solver::new(config).unwrap();
    solver
        .particles
        .push(Vec3::new(0.5, 0.9, 0.5), Vec3::ZERO, 1.0, Vec3::ONE, 0.0)
        .unwrap();

    for _ in 0..10 {
        solver.step();
    }

    // Semi-implicit Euler drops y0 - g*dt^2 * n(n+1)/2 after n steps:
    // 0.9 - 9.81e-6 * 55 = 0.89946045
    let y = solver.positions()[0].y;
    assert!(
        (y - 0.899_460_45).abs() < 1e-5,
        "free-fall regression drifted: y = {y}"
    );
    let vy = solver.velocities()[0].y;
    assert!((vy + 0.0981).abs() < 1e-6, "vy = {vy}, expected -0.0981");
}

#[test]
fn test_semi_implicit_update_is_observable() {
    let config = SolverConfig {
        gravity: Vec3::new(0.0, -9.81, 0.0),
        ..quiet_config()
    };
    let mut solver = Solver::new(config).unwrap();
    solver
        .particles
        .push(Vec3::new(0.5, 0.5, 0.5), Vec3::ZERO, 1.0, Vec3::ONE, 0.0)
        .unwrap();

    let before = solver.positions()[0];
    solver.step();
    let after = solver.positions()[0];
    let vel_after = solver.velocities()[0];
    let dt = solver.config().time_step;

    // Position moved by the *updated* velocity. An explicit-Euler update
    // would not move a particle starting from rest on its first step.
    let delta = after - before;
    assert!(delta.y.abs() > 1e-6, "particle should move on the first step");
    assert!(
        (delta.y - vel_after.y * dt).abs() < 1e-7,
        "delta {} != v_after * dt {}",
        delta.y,
        vel_after.y * dt
    );
}

#[test]
fn test_boundary_bounce_lower_wall() {
    let config = SolverConfig {
        smoothing_length: 0.02,
        time_step: 0.01,
        ..quiet_config()
    };
    let mut solver = Solver::new(config).unwrap();
    solver
        .particles
        .push(
            Vec3::new(0.5, 0.005, 0.5),
            Vec3::new(0.0, -1.0, 0.0),
            1.0,
            Vec3::ONE,
            0.0,
        )
        .unwrap();

    solver.step();

    let pos = solver.positions()[0];
    let vel = solver.velocities()[0];
    assert!(
        (pos.y - 1e-3).abs() < 1e-9,
        "penetrating particle teleports to the wall offset, got y = {}",
        pos.y
    );
    assert!(
        (vel.y - 0.5).abs() < 1e-9,
        "velocity flips away from the wall at half magnitude, got vy = {}",
        vel.y
    );
}

#[test]
fn test_boundary_bounce_upper_wall() {
    let config = SolverConfig {
        smoothing_length: 0.02,
        time_step: 0.01,
        ..quiet_config()
    };
    let mut solver = Solver::new(config).unwrap();
    solver
        .particles
        .push(
            Vec3::new(0.5, 0.995, 0.5),
            Vec3::new(0.0, 1.0, 0.0),
            1.0,
            Vec3::ONE,
            0.0,
        )
        .unwrap();

    solver.step();

    let pos = solver.positions()[0];
    let vel = solver.velocities()[0];
    assert!((pos.y - (1.0 - 1e-3)).abs() < 1e-6, "got y = {}", pos.y);
    assert!((vel.y + 0.5).abs() < 1e-9, "got vy = {}", vel.y);
}

#[test]
fn test_density_floor_applies() {
    let config = SolverConfig {
        smoothing_length: 0.5,
        domain: Vec3::new(2.0, 2.0, 2.0),
        ..quiet_config()
    };
    let mut solver = Solver::new(config).unwrap();
    // A lone light particle: its raw self-density is far below the floor.
    solver
        .particles
        .push(Vec3::ONE, Vec3::ZERO, 0.02, Vec3::ONE, 0.0)
        .unwrap();

    solver.compute_density_pressure();

    let rho = solver.densities()[0];
    assert!(
        (rho - 10.0).abs() < 1e-3,
        "density should be clamped to 0.01 * rho_0 = 10, got {rho}"
    );
    let pressure = solver.pressures()[0];
    let expected = 2000.0 * (10.0 - 1000.0);
    assert!(
        (pressure - expected).abs() < expected.abs() * 1e-5,
        "pressure {pressure} != k * (rho - rho_0) = {expected}"
    );
}

#[test]
fn test_lone_particle_keeps_self_density() {
    let h = 0.05_f32;
    let config = SolverConfig {
        smoothing_length: h,
        ..quiet_config()
    };
    let mut solver = Solver::new(config).unwrap();
    let mass = 0.078_f32;
    solver
        .particles
        .push(Vec3::splat(0.5), Vec3::ZERO, mass, Vec3::ONE, 0.0)
        .unwrap();

    solver.compute_density_pressure();

    let expected = mass * sph_core::kernel::poly6_kernel(0.0, h);
    let rho = solver.densities()[0];
    assert!(
        (rho - expected).abs() < expected * 1e-5,
        "self-contribution missing from density: {rho} vs {expected}"
    );
}

#[test]
fn test_monotone_clocks() {
    let mut solver = Solver::new(quiet_config()).unwrap();
    solver
        .particles
        .push(Vec3::splat(0.5), Vec3::ZERO, 1.0, Vec3::ONE, 0.0)
        .unwrap();

    let mut last_time = solver.time();
    for step in 1..=20_u64 {
        solver.step();
        assert!(solver.time() > last_time, "time must strictly increase");
        assert_eq!(solver.step_count(), step);
        last_time = solver.time();
    }
    assert!((solver.time() - 0.02).abs() < 1e-5);
}

#[test]
fn test_kinetic_energy_stays_at_zero_without_gravity() {
    let h = 0.1_f32;
    let config = SolverConfig {
        domain: Vec3::new(2.0, 2.0, 2.0),
        smoothing_length: h,
        ..quiet_config()
    };
    let mut solver = Solver::new(config).unwrap();

    // Lattice pitched just past the kernel support: no pair interactions,
    // no gravity, no initial velocity, so nothing may inject energy.
    let pitch = h * 1.01;
    for i in 0..3 {
        for j in 0..3 {
            for k in 0..3 {
                let pos = Vec3::new(0.5, 0.5, 0.5)
                    + Vec3::new(i as f32, j as f32, k as f32) * pitch;
                solver
                    .particles
                    .push(pos, Vec3::ZERO, 1.0, Vec3::ONE, 0.5)
                    .unwrap();
            }
        }
    }

    for _ in 0..20 {
        solver.step();
        let kinetic: f32 = solver
            .velocities()
            .iter()
            .zip(solver.particles.masses())
            .map(|(v, m)| 0.5 * m * v.length_squared())
            .sum();
        assert!(
            kinetic <= 1e-12,
            "kinetic energy grew without an energy source: {kinetic}"
        );
    }
}

#[test]
fn test_domain_containment_over_many_steps() {
    let config = SolverConfig {
        particle_mass: 0.02,
        gravity: Vec3::new(0.0, -9.81, 0.0),
        ..quiet_config()
    };
    let mut solver = Solver::new(config).unwrap();
    solver
        .append_fluid_box(
            Vec3::new(0.3, 0.3, 0.3),
            Vec3::new(0.4, 0.4, 0.4),
            50,
            &FluidProperties::WATER,
        )
        .unwrap();

    for _ in 0..100 {
        solver.step();
    }

    let domain = solver.config().domain;
    for (i, pos) in solver.positions().iter().enumerate() {
        for axis in 0..3 {
            assert!(
                pos[axis] >= 0.0 && pos[axis] <= domain[axis],
                "particle {i} escaped on axis {axis}: {pos:?}"
            );
            assert!(pos[axis].is_finite(), "particle {i} went non-finite");
        }
    }
}

struct Lift {
    acceleration: Vec3,
}

impl ForceContributor for Lift {
    fn force(&self, sample: ForceSample) -> Vec3 {
        sample.mass * self.acceleration
    }
}

#[test]
fn test_force_contributor_can_cancel_gravity() {
    let gravity = Vec3::new(0.0, -9.81, 0.0);
    let config = SolverConfig {
        gravity,
        ..quiet_config()
    };
    let mut solver = Solver::new(config).unwrap();
    solver
        .particles
        .push(Vec3::splat(0.5), Vec3::ZERO, 1.0, Vec3::ONE, 0.0)
        .unwrap();
    solver.add_force_contributor(Lift {
        acceleration: -gravity,
    });

    let before = solver.positions()[0];
    for _ in 0..10 {
        solver.step();
    }

    let after = solver.positions()[0];
    assert!(
        (after - before).length() < 1e-7,
        "lift should hold the particle in place, drifted {:?}",
        after - before
    );
}

#[test]
fn test_centrifugal_contributor_pushes_outward() {
    let mut solver = Solver::new(quiet_config()).unwrap();
    solver
        .particles
        .push(Vec3::new(0.75, 0.5, 0.5), Vec3::ZERO, 1.0, Vec3::ONE, 0.0)
        .unwrap();
    solver.add_force_contributor(Centrifugal {
        center: Vec3::new(0.5, 0.0, 0.5),
        angular_velocity: 2.0,
    });

    solver.step();

    let vel = solver.velocities()[0];
    assert!(vel.x > 0.0, "particle right of the axis accelerates +x");
    assert_eq!(vel.y, 0.0);
    assert_eq!(vel.z, 0.0);
}

#[test]
fn test_run_invokes_callback_per_step() {
    let mut solver = Solver::new(quiet_config()).unwrap();
    solver
        .append_fluid_box(
            Vec3::new(0.3, 0.3, 0.3),
            Vec3::new(0.3, 0.3, 0.3),
            20,
            &FluidProperties::WATER,
        )
        .unwrap();

    let mut calls = 0;
    let mut last_index = None;
    solver.run_with(0.1, |s, step| {
        calls += 1;
        last_index = Some(step);
        assert_eq!(s.step_count(), step as u64 + 1);
    });

    assert_eq!(solver.step_count(), 100, "0.1s / 0.001s = 100 steps");
    assert_eq!(calls, 100);
    assert_eq!(last_index, Some(99), "step indices are zero-based");
}

#[test]
fn test_info_reports_state() {
    let mut solver = Solver::new(quiet_config()).unwrap();
    let placed = solver
        .append_fluid_box(
            Vec3::new(0.3, 0.3, 0.3),
            Vec3::new(0.3, 0.3, 0.3),
            30,
            &FluidProperties::WATER,
        )
        .unwrap();

    solver.step();
    let info = solver.info();

    assert_eq!(info.particles, placed);
    assert_eq!(info.step, 1);
    assert!(info.avg_density > 0.0);
    assert!(info.grid.cells > 0);
    assert_eq!(info.grid.particles, placed);
    assert!(info.max_speed >= info.avg_speed);
    assert!(info.avg_speed >= 0.0);
}

#[test]
fn test_removing_all_particles_returns_to_noop_steps() {
    let mut solver = Solver::new(quiet_config()).unwrap();
    solver
        .particles
        .push(Vec3::splat(0.5), Vec3::ZERO, 1.0, Vec3::ONE, 0.0)
        .unwrap();

    solver.step();
    assert_eq!(solver.step_count(), 1);

    solver.particles.swap_remove(0);
    let t = solver.time();
    solver.step();

    assert_eq!(solver.step_count(), 1, "empty step must not advance the counter");
    assert_eq!(solver.time(), t);
}
