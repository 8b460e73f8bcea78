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
//! Force elements and the accumulator capability they write through
//!
//! Every force contributor implements [`ForceElement`]. The built-in
//! elements are [`Spring`] and [`Attraction`]; anything else is a custom
//! force, registered as a boxed trait object (see [`CustomForce`]) or built
//! from a closure with [`TargetedForce`].
//!
//! # Phase separation
//!
//! Force elements receive an [`Accumulators`] view, not the particles
//! themselves. The view can read particle state and add to force
//! accumulators, nothing more. Only integrators write positions and
//! velocities.

mod attraction;
mod custom;
mod spring;

pub use attraction::{Attraction, AttractionHandle};
pub use custom::{CustomForceHandle, TargetedForce, Targets};
pub use spring::{Spring, SpringHandle};

use crate::handle::Arena;
use crate::particle::{Particle, ParticleHandle};
use crate::vector::Vector3D;

/// A contributor to the per-particle force accumulators
///
/// Implementations must only call [`Accumulators::add_force`]; they never
/// see a mutable particle. Elements referring to particles that have been
/// removed should do nothing.
pub trait ForceElement: Send {
    /// Add this element's contribution to the accumulators
    fn apply(&mut self, particles: &mut Accumulators<'_>);

    /// Get a descriptive name for this force element
    fn name(&self) -> &str;
}

/// A user-defined force element as stored by the system
pub type CustomForce = Box<dyn ForceElement>;

/// Write-only-to-force view over the particle set
///
/// Handed to every [`ForceElement`] during the accumulate phase.
pub struct Accumulators<'a> {
    particles: &'a mut Arena<Particle>,
}

impl<'a> Accumulators<'a> {
    pub(crate) fn new(particles: &'a mut Arena<Particle>) -> Self {
        Accumulators { particles }
    }

    /// Read-only access to a particle
    pub fn particle(&self, handle: ParticleHandle) -> Option<&Particle> {
        self.particles.get(handle)
    }

    /// Current position of a particle
    pub fn position(&self, handle: ParticleHandle) -> Option<Vector3D> {
        self.particle(handle).map(Particle::position)
    }

    /// Current velocity of a particle
    pub fn velocity(&self, handle: ParticleHandle) -> Option<Vector3D> {
        self.particle(handle).map(Particle::velocity)
    }

    /// Number of live particles
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// Check if there are no particles
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Handles of all live particles in insertion order
    pub fn handles(&self) -> impl Iterator<Item = ParticleHandle> + '_ {
        self.particles.handles()
    }

    /// Iterate live particles read-only
    pub fn iter(&self) -> impl Iterator<Item = (ParticleHandle, &Particle)> + '_ {
        self.particles.iter()
    }

    /// Add `force` to a particle's accumulator
    ///
    /// Returns false when the handle is stale.
    pub fn add_force(&mut self, handle: ParticleHandle, force: Vector3D) -> bool {
        match self.particles.get_mut(handle) {
            Some(particle) => {
                particle.add_force(force);
                true
            }
            None => false,
        }
    }

    /// Compute and add a force for every live particle
    pub fn add_force_to_all<F>(&mut self, mut force: F)
    where
        F: FnMut(ParticleHandle, &Particle) -> Vector3D,
    {
        self.particles.for_each_in_order(|handle, particle| {
            let f = force(handle, particle);
            particle.add_force(f);
        });
    }
}
