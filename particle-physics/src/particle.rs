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
//! Point masses
//!
//! A [`Particle`] carries its kinematic state, a force accumulator and a
//! fixed/free flag. Particles are created through
//! [`ParticleSystem::make_particle`](crate::ParticleSystem::make_particle)
//! and owned by the system; user code refers to them through
//! [`ParticleHandle`]s.

use crate::handle::Handle;
use crate::vector::Vector3D;

/// Handle naming a particle inside a [`ParticleSystem`](crate::ParticleSystem)
pub type ParticleHandle = Handle<Particle>;

/// Mass given to particles created without an explicit mass
pub const DEFAULT_MASS: f64 = 1.0;

/// Point mass with position, velocity and an accumulated force
///
/// # Invariants
///
/// - `mass` is positive. This is a precondition of
///   [`ParticleSystem::make_particle`](crate::ParticleSystem::make_particle);
///   it is not re-checked in the integration hot path.
/// - A fixed particle's position and velocity are never changed by an
///   integrator. Forces may still be accumulated on it and are discarded.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    position: Vector3D,
    velocity: Vector3D,
    force: Vector3D,
    mass: f64,
    fixed: bool,
}

impl Particle {
    pub(crate) fn new(mass: f64, position: Vector3D) -> Self {
        Particle {
            position,
            velocity: Vector3D::zero(),
            force: Vector3D::zero(),
            mass,
            fixed: false,
        }
    }

    /// Current position
    pub fn position(&self) -> Vector3D {
        self.position
    }

    /// Current velocity
    pub fn velocity(&self) -> Vector3D {
        self.velocity
    }

    /// Force accumulated since the last clear
    pub fn force(&self) -> Vector3D {
        self.force
    }

    /// Particle mass
    pub fn mass(&self) -> f64 {
        self.mass
    }

    /// Move the particle
    pub fn set_position(&mut self, position: Vector3D) {
        self.position = position;
    }

    /// Set the particle's velocity
    pub fn set_velocity(&mut self, velocity: Vector3D) {
        self.velocity = velocity;
    }

    /// Set the particle mass
    ///
    /// # Panics
    ///
    /// Panics if the mass is not positive and finite.
    pub fn set_mass(&mut self, mass: f64) {
        assert!(mass > 0.0 && mass.is_finite(), "Mass must be positive and finite");
        self.mass = mass;
    }

    /// Add `force` to the accumulator
    ///
    /// Applies to fixed particles too; integration simply ignores it.
    pub fn add_force(&mut self, force: Vector3D) {
        self.force += force;
    }

    /// Reset the accumulator to zero
    pub fn clear_force(&mut self) {
        self.force = Vector3D::zero();
    }

    /// Pin the particle in place
    pub fn make_fixed(&mut self) {
        self.fixed = true;
    }

    /// Release a pinned particle
    pub fn make_free(&mut self) {
        self.fixed = false;
    }

    /// Whether integration leaves this particle alone
    pub fn is_fixed(&self) -> bool {
        self.fixed
    }

    /// Whether integration moves this particle
    pub fn is_free(&self) -> bool {
        !self.fixed
    }

    /// Acceleration implied by the accumulated force (F/m)
    pub fn acceleration(&self) -> Vector3D {
        self.force / self.mass
    }

    /// Kinetic energy, zero for fixed particles
    ///
    /// KE = 0.5 * m * v²
    pub fn kinetic_energy(&self) -> f64 {
        if self.fixed {
            return 0.0;
        }
        0.5 * self.mass * self.velocity.magnitude_squared()
    }
}
