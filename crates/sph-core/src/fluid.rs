use glam::Vec3;

/// Per-fluid properties consumed at particle-insertion time.
///
/// `rest_density` is informational for the bundle; the equation of state
/// runs on the solver-wide rest density. Viscosity and color are written
/// into every inserted particle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FluidProperties {
    /// Density of the material (kg/m^3).
    pub rest_density: f32,
    /// Dynamic viscosity (Pa*s).
    pub viscosity: f32,
    /// RGB in [0, 1].
    pub color: Vec3,
}

impl FluidProperties {
    pub const WATER: Self = Self {
        rest_density: 1000.0,
        viscosity: 0.001,
        color: Vec3::new(0.2, 0.5, 1.0),
    };

    /// Light oil, ~5 cP.
    pub const OIL_LIGHT: Self = Self {
        rest_density: 850.0,
        viscosity: 0.005,
        color: Vec3::new(0.8, 0.6, 0.2),
    };

    /// Medium oil, ~20 cP.
    pub const OIL_MEDIUM: Self = Self {
        rest_density: 900.0,
        viscosity: 0.02,
        color: Vec3::new(0.7, 0.5, 0.1),
    };

    /// Heavy oil, ~100 cP.
    pub const OIL_HEAVY: Self = Self {
        rest_density: 950.0,
        viscosity: 0.1,
        color: Vec3::new(0.3, 0.2, 0.1),
    };

    pub const HONEY: Self = Self {
        rest_density: 1420.0,
        viscosity: 10.0,
        color: Vec3::new(1.0, 0.7, 0.0),
    };

    pub const GLYCERIN: Self = Self {
        rest_density: 1260.0,
        viscosity: 1.5,
        color: Vec3::new(0.9, 0.9, 0.95),
    };

    pub const MERCURY: Self = Self {
        rest_density: 13534.0,
        viscosity: 0.0015,
        color: Vec3::new(0.7, 0.7, 0.8),
    };

    pub const MILK: Self = Self {
        rest_density: 1030.0,
        viscosity: 0.002,
        color: Vec3::new(1.0, 1.0, 0.95),
    };

    pub const BLOOD: Self = Self {
        rest_density: 1060.0,
        viscosity: 0.004,
        color: Vec3::new(0.8, 0.1, 0.1),
    };
}
