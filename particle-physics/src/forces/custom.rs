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
//! Closure-backed custom forces

use super::{Accumulators, CustomForce, ForceElement};
use crate::handle::Handle;
use crate::particle::{Particle, ParticleHandle};
use crate::vector::Vector3D;

/// Handle naming a custom force inside a [`ParticleSystem`](crate::ParticleSystem)
pub type CustomForceHandle = Handle<CustomForce>;

/// The particles a [`TargetedForce`] acts on
#[derive(Debug, Clone, PartialEq)]
pub enum Targets {
    /// Every particle alive at application time
    All,
    /// A fixed set of particles captured when the force was created
    Subset(Vec<ParticleHandle>),
}

impl Targets {
    /// Snapshot a subset of particles
    pub fn subset(handles: impl IntoIterator<Item = ParticleHandle>) -> Self {
        Targets::Subset(handles.into_iter().collect())
    }
}

/// Custom force computing a per-particle contribution from a closure
///
/// # Example
///
/// ```
/// use particle_physics::{ParticleSystem, Targets, Vector3D};
///
/// let mut system = ParticleSystem::new();
/// let p = system.make_particle(1.0, Vector3D::new(2.0, 0.0, 0.0));
///
/// // Pull every particle back towards the origin
/// system.make_targeted_force("centering", Targets::All, |_, particle| {
///     -particle.position() * 0.1
/// });
/// system.tick().unwrap();
/// assert!(system.position(p).unwrap().x() < 2.0);
/// ```
pub struct TargetedForce<F> {
    name: String,
    targets: Targets,
    force: F,
}

impl<F> TargetedForce<F>
where
    F: FnMut(ParticleHandle, &Particle) -> Vector3D,
{
    /// Create a custom force over `targets`
    pub fn new(name: impl Into<String>, targets: Targets, force: F) -> Self {
        TargetedForce {
            name: name.into(),
            targets,
            force,
        }
    }

    /// The particles this force acts on
    pub fn targets(&self) -> &Targets {
        &self.targets
    }
}

impl<F> ForceElement for TargetedForce<F>
where
    F: FnMut(ParticleHandle, &Particle) -> Vector3D + Send,
{
    fn apply(&mut self, particles: &mut Accumulators<'_>) {
        let TargetedForce { targets, force, .. } = self;
        match targets {
            Targets::All => particles.add_force_to_all(|handle, particle| force(handle, particle)),
            Targets::Subset(handles) => {
                for &handle in handles.iter() {
                    // Stale handles in the snapshot are skipped
                    let Some(particle) = particles.particle(handle) else {
                        continue;
                    };
                    let f = force(handle, particle);
                    particles.add_force(handle, f);
                }
            }
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}
