use glam::Vec3;
use rand::Rng;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::config::SolverConfig;
use crate::error::SolverError;
use crate::fluid::FluidProperties;
use crate::forces::{ForceContributor, ForceSample};
use crate::grid::{GridStats, SpatialHashGrid};
use crate::kernel::{poly6_kernel, spiky_gradient, viscosity_laplacian};
use crate::particle::ParticleSet;

/// Offset from a wall a reflected particle is placed at, so it does not
/// stick to the boundary.
const WALL_OFFSET: f32 = 1e-3;

/// Velocity damping applied on wall reflection (coefficient of restitution).
const WALL_DAMPING: f32 = 0.5;

/// Snapshot of the simulation state, for HUDs and progress reporting.
#[derive(Clone, Copy, Debug, Default)]
pub struct SimulationInfo {
    pub time: f32,
    pub step: u64,
    pub particles: usize,
    pub avg_density: f32,
    pub avg_pressure: f32,
    pub avg_speed: f32,
    pub max_speed: f32,
    pub grid: GridStats,
}

/// Weakly-compressible SPH solver.
///
/// Each `step` runs the fixed pipeline: rebuild the spatial grid, compute
/// density and pressure, accumulate forces, integrate with semi-implicit
/// Euler, reflect off the domain walls. Every phase writes only into its
/// own particle's slots while reading a snapshot of the others, so
/// particle-to-particle order inside a phase is not observable (and the
/// `parallel` feature maps the heavy phases over a rayon pool).
pub struct Solver {
    pub particles: ParticleSet,
    config: SolverConfig,
    grid: SpatialHashGrid,
    contributors: Vec<Box<dyn ForceContributor>>,
    time: f32,
    step_count: u64,
}

impl Solver {
    pub fn new(config: SolverConfig) -> Result<Self, SolverError> {
        config.validate()?;
        Ok(Self {
            particles: ParticleSet::new(config.max_particles),
            grid: SpatialHashGrid::new(config.smoothing_length),
            contributors: Vec::new(),
            time: 0.0,
            step_count: 0,
            config,
        })
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Simulation time, advanced by one timestep per non-empty step.
    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    /// Register an external force evaluated for every particle each step.
    pub fn add_force_contributor<C>(&mut self, contributor: C)
    where
        C: ForceContributor + 'static,
    {
        self.contributors.push(Box::new(contributor));
    }

    /// Fill an axis-aligned box with `count` particles on a jittered
    /// lattice.
    ///
    /// The lattice pitch is chosen so `count` particles tile the box
    /// volume; when the resulting lattice undersamples the box the emitted
    /// count falls short of `count`. Positions are clamped to the domain.
    /// Returns the number of particles actually placed.
    pub fn append_fluid_box(
        &mut self,
        origin: Vec3,
        size: Vec3,
        count: usize,
        fluid: &FluidProperties,
    ) -> Result<usize, SolverError> {
        if !(size.x > 0.0 && size.y > 0.0 && size.z > 0.0) {
            return Err(SolverError::InvalidParameter(
                "fluid box size must be positive",
            ));
        }

        let volume = size.x * size.y * size.z;
        let spacing = (volume / count as f32).cbrt();

        // Absorb round-off so exact lattices keep their intended size.
        let cells = |extent: f32| ((extent / spacing + 1e-4).floor() as usize).max(1);
        let (nx, ny, nz) = (cells(size.x), cells(size.y), cells(size.z));

        let mut rng = rand::thread_rng();
        let mut placed = 0;
        'fill: for i in 0..nx {
            for j in 0..ny {
                for k in 0..nz {
                    if placed == count {
                        break 'fill;
                    }
                    let lattice = Vec3::new(i as f32, j as f32, k as f32) * spacing;
                    let jitter = Vec3::new(
                        rng.gen_range(-0.1..0.1),
                        rng.gen_range(-0.1..0.1),
                        rng.gen_range(-0.1..0.1),
                    ) * spacing;
                    let position =
                        (origin + lattice + jitter).clamp(Vec3::ZERO, self.config.domain);
                    self.particles.push(
                        position,
                        Vec3::ZERO,
                        self.config.particle_mass,
                        fluid.color,
                        fluid.viscosity,
                    )?;
                    placed += 1;
                }
            }
        }
        Ok(placed)
    }

    /// Phase 1: rebuild the grid, then compute density and pressure.
    ///
    /// The density sum includes the particle itself (the query returns it),
    /// which keeps lone particles away from zero density. The result is
    /// floored at 1% of the rest density before the equation of state.
    pub fn compute_density_pressure(&mut self) {
        let count = self.particles.len();
        self.grid.rebuild(&self.particles.position[..count]);

        let h = self.config.smoothing_length;
        let rho0 = self.config.rest_density;
        let density_floor = 0.01 * rho0;
        let k = self.config.gas_constant;

        let mut density = std::mem::take(&mut self.particles.density);
        let mut pressure = std::mem::take(&mut self.particles.pressure);
        {
            let particles = &self.particles;
            let grid = &self.grid;
            let eval = |i: usize, rho_out: &mut f32, p_out: &mut f32| {
                let rho =
                    density_at(particles, grid, particles.position[i], h).max(density_floor);
                *rho_out = rho;
                *p_out = k * (rho - rho0);
            };

            #[cfg(feature = "parallel")]
            density[..count]
                .par_iter_mut()
                .zip(pressure[..count].par_iter_mut())
                .enumerate()
                .for_each(|(i, (rho_out, p_out))| eval(i, rho_out, p_out));

            #[cfg(not(feature = "parallel"))]
            for i in 0..count {
                let (rho_out, p_out) = (&mut density[i], &mut pressure[i]);
                eval(i, rho_out, p_out);
            }
        }
        self.particles.density = density;
        self.particles.pressure = pressure;
    }

    /// Phase 2: overwrite each particle's force with pressure, viscosity,
    /// gravity, and registered contributor terms.
    ///
    /// Positions have not moved since phase 1, so the grid is still valid.
    pub fn compute_forces(&mut self) {
        let count = self.particles.len();
        let h = self.config.smoothing_length;
        let gravity = self.config.gravity;
        let time = self.time;

        let mut force = std::mem::take(&mut self.particles.force);
        {
            let particles = &self.particles;
            let grid = &self.grid;
            let contributors = &self.contributors;
            let eval = |i: usize| -> Vec3 {
                let mut f = pair_forces(particles, grid, i, h);
                f += particles.mass[i] * gravity;
                for contributor in contributors {
                    f += contributor.force(ForceSample {
                        index: i,
                        position: particles.position[i],
                        velocity: particles.velocity[i],
                        mass: particles.mass[i],
                        time,
                    });
                }
                f
            };

            #[cfg(feature = "parallel")]
            force[..count]
                .par_iter_mut()
                .enumerate()
                .for_each(|(i, out)| *out = eval(i));

            #[cfg(not(feature = "parallel"))]
            for i in 0..count {
                force[i] = eval(i);
            }
        }
        self.particles.force = force;
    }

    /// Phase 3: semi-implicit Euler. Velocity first, then position from
    /// the just-updated velocity.
    pub fn integrate(&mut self) {
        let dt = self.config.time_step;
        for i in 0..self.particles.len() {
            let acceleration = self.particles.force[i] / self.particles.mass[i];
            self.particles.velocity[i] += acceleration * dt;
            let velocity = self.particles.velocity[i];
            self.particles.position[i] += velocity * dt;
        }
    }

    /// Phase 4: reflect particles off the domain walls.
    ///
    /// A penetrating particle is teleported to a small inset from the wall
    /// and its normal velocity component is forced away from the wall at
    /// half magnitude, however deep the penetration was.
    pub fn apply_boundary(&mut self) {
        let extents = self.config.domain;
        for i in 0..self.particles.len() {
            let mut position = self.particles.position[i];
            let mut velocity = self.particles.velocity[i];
            for axis in 0..3 {
                if position[axis] < 0.0 {
                    position[axis] = WALL_OFFSET;
                    velocity[axis] = velocity[axis].abs() * WALL_DAMPING;
                } else if position[axis] > extents[axis] {
                    position[axis] = extents[axis] - WALL_OFFSET;
                    velocity[axis] = -velocity[axis].abs() * WALL_DAMPING;
                }
            }
            self.particles.position[i] = position;
            self.particles.velocity[i] = velocity;
        }
    }

    /// Advance the simulation by one time step.
    ///
    /// A step with no live particles is a no-op: neither the clock nor the
    /// step counter moves.
    pub fn step(&mut self) {
        if self.particles.is_empty() {
            return;
        }
        self.compute_density_pressure();
        self.compute_forces();
        self.integrate();
        self.apply_boundary();
        self.time += self.config.time_step;
        self.step_count += 1;
    }

    /// Run for `duration` seconds of simulation time.
    pub fn run(&mut self, duration: f32) {
        self.run_with(duration, |_, _| {});
    }

    /// Run for `duration` seconds, invoking `callback(solver, step_index)`
    /// after each step with a zero-based index.
    pub fn run_with<F>(&mut self, duration: f32, mut callback: F)
    where
        F: FnMut(&Solver, usize),
    {
        // Relative epsilon so ratios like 0.1 / 0.001 that land a few ulps
        // under an integer still schedule the intended step count.
        let steps = (duration / self.config.time_step * (1.0 + 1e-6)).floor() as usize;
        for step in 0..steps {
            self.step();
            callback(self, step);
        }
    }

    pub fn info(&self) -> SimulationInfo {
        let count = self.particles.len();
        if count == 0 {
            return SimulationInfo {
                time: self.time,
                step: self.step_count,
                ..SimulationInfo::default()
            };
        }

        let inv = 1.0 / count as f32;
        let avg_density = self.particles.densities().iter().sum::<f32>() * inv;
        let avg_pressure = self.particles.pressures().iter().sum::<f32>() * inv;
        let mut speed_sum = 0.0;
        let mut max_speed: f32 = 0.0;
        for velocity in self.particles.velocities() {
            let speed = velocity.length();
            speed_sum += speed;
            max_speed = max_speed.max(speed);
        }

        SimulationInfo {
            time: self.time,
            step: self.step_count,
            particles: count,
            avg_density,
            avg_pressure,
            avg_speed: speed_sum * inv,
            max_speed,
            grid: self.grid.stats(),
        }
    }

    pub fn positions(&self) -> &[Vec3] {
        self.particles.positions()
    }

    pub fn velocities(&self) -> &[Vec3] {
        self.particles.velocities()
    }

    pub fn densities(&self) -> &[f32] {
        self.particles.densities()
    }

    pub fn pressures(&self) -> &[f32] {
        self.particles.pressures()
    }

    pub fn colors(&self) -> &[Vec3] {
        self.particles.colors()
    }
}

/// Density at `point`: kernel-weighted mass sum over the grid candidates,
/// including the querying particle itself.
fn density_at(particles: &ParticleSet, grid: &SpatialHashGrid, point: Vec3, h: f32) -> f32 {
    let mut rho = 0.0;
    for j in grid.query(point) {
        let j = j as usize;
        let r_len = (point - particles.position[j]).length();
        rho += particles.mass[j] * poly6_kernel(r_len, h);
    }
    rho
}

/// Pressure and viscosity forces on particle `i` from its neighbors.
///
/// The viscosity coefficient is particle `i`'s own, not a symmetrized pair
/// value, so the viscous exchange between two unlike fluids is asymmetric.
fn pair_forces(particles: &ParticleSet, grid: &SpatialHashGrid, i: usize, h: f32) -> Vec3 {
    let pos_i = particles.position[i];
    let vel_i = particles.velocity[i];
    let pressure_i = particles.pressure[i];
    let viscosity_i = particles.viscosity[i];

    let mut f_pressure = Vec3::ZERO;
    let mut f_viscosity = Vec3::ZERO;
    for j in grid.query(pos_i) {
        let j = j as usize;
        if j == i {
            continue;
        }
        let rho_j = particles.density[j];
        if rho_j <= 0.0 {
            continue;
        }
        let r = pos_i - particles.position[j];
        let r_len = r.length();

        let p_avg = (pressure_i + particles.pressure[j]) * 0.5;
        f_pressure += -particles.mass[j] * p_avg / rho_j * spiky_gradient(r, r_len, h);

        f_viscosity += viscosity_i * particles.mass[j] * viscosity_laplacian(r_len, h) / rho_j
            * (particles.velocity[j] - vel_i);
    }
    f_pressure + f_viscosity
}
