use glam::Vec3;

/// Per-particle inputs handed to a force contributor during the force pass.
#[derive(Clone, Copy, Debug)]
pub struct ForceSample {
    pub index: usize,
    pub position: Vec3,
    pub velocity: Vec3,
    pub mass: f32,
    /// Simulation time at the start of the current step.
    pub time: f32,
}

/// An external force registered on the solver.
///
/// Contributors are evaluated once per particle per step, after the SPH
/// pressure/viscosity terms and gravity, and their results are summed into
/// the particle's force. A contributor sees a read-only sample of a single
/// particle and must not depend on evaluation order; this keeps the force
/// phase an independent per-index map.
pub trait ForceContributor: Send + Sync {
    fn force(&self, sample: ForceSample) -> Vec3;
}

/// Centrifugal pseudo-force for a tank rotating about a vertical axis.
///
/// Pushes each particle away from the axis through `center` with magnitude
/// `m * omega^2 * r`, r being the horizontal distance to the axis.
#[derive(Clone, Copy, Debug)]
pub struct Centrifugal {
    /// A point on the rotation axis; the axis is vertical (y).
    pub center: Vec3,
    /// Angular velocity omega (rad/s).
    pub angular_velocity: f32,
}

impl ForceContributor for Centrifugal {
    fn force(&self, sample: ForceSample) -> Vec3 {
        let mut radial = sample.position - self.center;
        radial.y = 0.0;
        sample.mass * self.angular_velocity * self.angular_velocity * radial
    }
}
