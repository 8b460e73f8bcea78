// Copyright 2025 John Brosnihan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//! # Particle Physics
//!
//! A mass-spring particle system: point masses joined by damped springs and
//! inverse-square attractions, advanced through time by a pluggable
//! numerical integrator.
//!
//! ## Features
//!
//! - **Handles**: Particles and force elements are owned by the system and
//!   named by generational handles that go stale instead of dangling
//! - **Force Accumulation**: Gravity, drag, springs, attractions and custom
//!   forces add into per-particle accumulators each pass
//! - **Integrators**: Euler, modified Euler and Runge-Kutta 4, or your own
//! - **Parallelization**: Optional Rayon integration for per-particle loops
//!   (`parallel` feature)
//! - **View**: Zoom and pan transform for interactive 2D display
//!
//! ## Example
//!
//! ```rust
//! use particle_physics::{IntegratorKind, ParticleSystem, Vector3D};
//!
//! let mut system = ParticleSystem::new();
//! system.set_gravity_y(-9.81);
//! system.set_integrator(IntegratorKind::ModifiedEuler);
//!
//! let anchor = system.make_particle(1.0, Vector3D::new(0.0, 10.0, 0.0));
//! system.particle_mut(anchor).unwrap().make_fixed();
//! let bob = system.make_particle(2.0, Vector3D::new(0.0, 8.0, 0.0));
//! system.make_spring(anchor, bob, 20.0, 0.5, 2.0).unwrap();
//!
//! system.tick_by(0.01).unwrap();
//! assert_eq!(system.position(anchor), Some(Vector3D::new(0.0, 10.0, 0.0)));
//! ```
//!
//! ## Logging
//!
//! The crate logs through `tracing`: one `trace` event per tick, `debug`
//! events for configuration changes, and a `warn` event whenever an
//! integrator refuses a non-finite result. Install any subscriber to see
//! them.

#![warn(missing_docs)]

/// Three-component vector math
pub mod vector;

/// Generational handles and arena storage
pub mod handle;

/// Point masses
pub mod particle;

/// Springs, attractions and custom forces
pub mod forces;

/// The particle/force graph integrators operate on
pub mod world;

/// Numerical integration methods
pub mod integration;

/// The particle system facade
pub mod system;

/// Configuration defaults and environment overrides
pub mod config;

/// Error types
pub mod error;

/// Zoom and pan view transform
pub mod view;

pub use config::SystemConfig;
pub use error::{PhysicsError, Result};
pub use forces::{
    Accumulators, Attraction, AttractionHandle, CustomForce, CustomForceHandle, ForceElement,
    Spring, SpringHandle, TargetedForce, Targets,
};
pub use handle::{Arena, Handle};
pub use integration::{Integrator, IntegratorKind};
pub use particle::{Particle, ParticleHandle};
pub use system::ParticleSystem;
pub use vector::Vector3D;
pub use view::{ZoomPan, ZoomPanListener};
pub use world::World;
