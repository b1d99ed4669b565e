use glam::Vec3;

use crate::error::SolverError;

/// SoA particle storage.
///
/// All field arrays are preallocated to the configured capacity; indices
/// `0..len()` are live, everything past that is undefined. `push` and
/// `swap_remove` are the only operations that move the live boundary, and
/// neither triggers any recomputation.
pub struct ParticleSet {
    count: usize,
    pub position: Vec<Vec3>,
    pub velocity: Vec<Vec3>,
    /// Accumulated force, overwritten by every force pass.
    pub force: Vec<Vec3>,
    pub mass: Vec<f32>,
    /// Current SPH density estimate.
    pub density: Vec<f32>,
    /// Equation-of-state pressure; may be negative.
    pub pressure: Vec<f32>,
    /// Per-particle dynamic viscosity.
    pub viscosity: Vec<f32>,
    /// RGB in [0, 1] for visualization consumers.
    pub color: Vec<Vec3>,
}

impl ParticleSet {
    pub fn new(capacity: usize) -> Self {
        Self {
            count: 0,
            position: vec![Vec3::ZERO; capacity],
            velocity: vec![Vec3::ZERO; capacity],
            force: vec![Vec3::ZERO; capacity],
            mass: vec![0.0; capacity],
            density: vec![0.0; capacity],
            pressure: vec![0.0; capacity],
            viscosity: vec![0.0; capacity],
            color: vec![Vec3::ZERO; capacity],
        }
    }

    /// Number of live particles.
    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.position.len()
    }

    /// Append a particle, zeroing its density, pressure, and force.
    ///
    /// Returns the new particle's index. Index handles are invalidated by
    /// any later `swap_remove`, so they should not be held across steps.
    pub fn push(
        &mut self,
        position: Vec3,
        velocity: Vec3,
        mass: f32,
        color: Vec3,
        viscosity: f32,
    ) -> Result<usize, SolverError> {
        if self.count >= self.capacity() {
            return Err(SolverError::Capacity {
                capacity: self.capacity(),
            });
        }
        if !(mass > 0.0) {
            return Err(SolverError::InvalidParameter(
                "particle mass must be positive",
            ));
        }

        let idx = self.count;
        self.position[idx] = position;
        self.velocity[idx] = velocity;
        self.force[idx] = Vec3::ZERO;
        self.mass[idx] = mass;
        self.density[idx] = 0.0;
        self.pressure[idx] = 0.0;
        self.viscosity[idx] = viscosity;
        self.color[idx] = color;

        self.count += 1;
        Ok(idx)
    }

    /// Remove particle `index` by copying the last live slot over it.
    ///
    /// No-op when `index` is out of range.
    pub fn swap_remove(&mut self, index: usize) {
        if index >= self.count {
            return;
        }
        let last = self.count - 1;
        if index != last {
            self.position[index] = self.position[last];
            self.velocity[index] = self.velocity[last];
            self.force[index] = self.force[last];
            self.mass[index] = self.mass[last];
            self.density[index] = self.density[last];
            self.pressure[index] = self.pressure[last];
            self.viscosity[index] = self.viscosity[last];
            self.color[index] = self.color[last];
        }
        self.count -= 1;
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.position[..self.count]
    }

    pub fn velocities(&self) -> &[Vec3] {
        &self.velocity[..self.count]
    }

    pub fn forces(&self) -> &[Vec3] {
        &self.force[..self.count]
    }

    pub fn masses(&self) -> &[f32] {
        &self.mass[..self.count]
    }

    pub fn densities(&self) -> &[f32] {
        &self.density[..self.count]
    }

    pub fn pressures(&self) -> &[f32] {
        &self.pressure[..self.count]
    }

    pub fn viscosities(&self) -> &[f32] {
        &self.viscosity[..self.count]
    }

    pub fn colors(&self) -> &[Vec3] {
        &self.color[..self.count]
    }

    /// Live positions as a flat `x0 y0 z0 x1 y1 z1 ...` float slice, for
    /// handing straight to a renderer's vertex buffer.
    pub fn positions_flat(&self) -> &[f32] {
        bytemuck::cast_slice(self.positions())
    }

    /// Live colors as a flat RGB float slice.
    pub fn colors_flat(&self) -> &[f32] {
        bytemuck::cast_slice(self.colors())
    }
}
