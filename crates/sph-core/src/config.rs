use glam::Vec3;

use crate::error::SolverError;

/// Global solver parameters, fixed for the lifetime of a `Solver`.
///
/// All quantities are SI: meters, seconds, kilograms.
pub struct SolverConfig {
    /// Domain extents; the simulation box is `[0, x] x [0, y] x [0, z]`.
    pub domain: Vec3,
    /// SPH smoothing kernel radius h. Also the spatial grid cell size.
    pub smoothing_length: f32,
    /// Mass given to particles emitted by `append_fluid_box`.
    pub particle_mass: f32,
    /// Rest density rho_0 (kg/m^3).
    pub rest_density: f32,
    /// Equation-of-state stiffness k in `P = k (rho - rho_0)`.
    pub gas_constant: f32,
    /// Default dynamic viscosity (Pa*s) for particles without their own.
    pub viscosity: f32,
    pub gravity: Vec3,
    pub time_step: f32,
    /// Particle store capacity; appends past this fail with `Capacity`.
    pub max_particles: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            domain: Vec3::new(2.0, 2.0, 2.0),
            smoothing_length: 0.05,
            particle_mass: 0.02,
            rest_density: 1000.0,
            gas_constant: 2000.0,
            viscosity: 0.001,
            gravity: Vec3::new(0.0, -9.81, 0.0),
            time_step: 0.001,
            max_particles: 100_000,
        }
    }
}

impl SolverConfig {
    /// Reject parameters the pipeline cannot run with.
    ///
    /// The `!(x > 0.0)` form also catches NaN.
    pub fn validate(&self) -> Result<(), SolverError> {
        if !(self.domain.x > 0.0 && self.domain.y > 0.0 && self.domain.z > 0.0) {
            return Err(SolverError::InvalidParameter(
                "domain extents must be positive",
            ));
        }
        if !(self.smoothing_length > 0.0) {
            return Err(SolverError::InvalidParameter(
                "smoothing length must be positive",
            ));
        }
        if !(self.time_step > 0.0) {
            return Err(SolverError::InvalidParameter(
                "time step must be positive",
            ));
        }
        if !(self.particle_mass > 0.0) {
            return Err(SolverError::InvalidParameter(
                "particle mass must be positive",
            ));
        }
        Ok(())
    }
}
