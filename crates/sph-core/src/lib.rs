//! Weakly-compressible SPH fluid solver.
//!
//! Particles carry mass, per-particle viscosity, and color; density is
//! reconstructed with the Poly6 kernel, pressure follows the linear
//! equation of state `P = k (rho - rho_0)`, and forces combine the Spiky
//! pressure gradient, the viscosity-kernel Laplacian, gravity, and any
//! registered external contributors. Integration is semi-implicit Euler
//! with damped wall reflection on an axis-aligned box domain.
//!
//! The crate exposes the simulation state as structure-of-arrays views;
//! rendering, presets, and drivers live with the consumer.

pub mod config;
pub mod error;
pub mod fluid;
pub mod forces;
pub mod grid;
pub mod kernel;
pub mod particle;
pub mod solver;

pub use config::SolverConfig;
pub use error::SolverError;
pub use fluid::FluidProperties;
pub use forces::{Centrifugal, ForceContributor, ForceSample};
pub use grid::{GridCell, GridStats, SpatialHashGrid};
pub use particle::ParticleSet;
pub use solver::{SimulationInfo, Solver};
