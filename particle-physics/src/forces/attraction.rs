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
//! Inverse-square attraction or repulsion between two particles
//!
//! **F = k / r²**, directed along the line joining the particles.
//! Positive `k` pulls the pair together, negative `k` pushes it apart.
//!
//! ## Minimum Distance
//!
//! The separation used for the magnitude is clamped to at least
//! `min_distance`, which bounds the force by `|k| / min_distance²` when the
//! particles get close. Exactly coincident particles have no direction and
//! receive no force.

use super::{Accumulators, ForceElement};
use crate::handle::Handle;
use crate::particle::ParticleHandle;

/// Handle naming an attraction inside a [`ParticleSystem`](crate::ParticleSystem)
pub type AttractionHandle = Handle<Attraction>;

/// Pairwise inverse-square force
#[derive(Debug, Clone, PartialEq)]
pub struct Attraction {
    a: ParticleHandle,
    b: ParticleHandle,
    strength: f64,
    min_distance: f64,
    on: bool,
}

impl Attraction {
    pub(crate) fn new(a: ParticleHandle, b: ParticleHandle, strength: f64, min_distance: f64) -> Self {
        Attraction {
            a,
            b,
            strength,
            min_distance,
            on: true,
        }
    }

    /// First particle
    pub fn one_end(&self) -> ParticleHandle {
        self.a
    }

    /// Second particle
    pub fn other_end(&self) -> ParticleHandle {
        self.b
    }

    /// Strength `k`; negative values repel
    pub fn strength(&self) -> f64 {
        self.strength
    }

    /// Separation below which the force stops growing
    pub fn min_distance(&self) -> f64 {
        self.min_distance
    }

    /// Set the strength
    ///
    /// # Panics
    ///
    /// Panics if `k` is NaN or infinite.
    pub fn set_strength(&mut self, k: f64) {
        assert!(k.is_finite(), "Attraction strength must be finite");
        self.strength = k;
    }

    /// Set the minimum distance
    ///
    /// # Panics
    ///
    /// Panics if `min_distance` is negative or not finite.
    pub fn set_min_distance(&mut self, min_distance: f64) {
        assert!(
            min_distance >= 0.0 && min_distance.is_finite(),
            "Minimum distance must be non-negative and finite"
        );
        self.min_distance = min_distance;
    }

    /// Enable the attraction
    pub fn turn_on(&mut self) {
        self.on = true;
    }

    /// Disable the attraction without removing it
    pub fn turn_off(&mut self) {
        self.on = false;
    }

    /// Whether the attraction currently applies force
    pub fn is_on(&self) -> bool {
        self.on
    }

    /// Force magnitude at separation `distance`, after clamping
    pub fn magnitude_at(&self, distance: f64) -> f64 {
        let r = distance.max(self.min_distance);
        self.strength / (r * r)
    }
}

impl ForceElement for Attraction {
    fn apply(&mut self, particles: &mut Accumulators<'_>) {
        if !self.on {
            return;
        }
        let (Some(a), Some(b)) = (particles.particle(self.a), particles.particle(self.b)) else {
            return;
        };
        if a.is_fixed() && b.is_fixed() {
            return;
        }

        let a2b = a.position() - b.position();
        let distance = a2b.magnitude();
        if distance == 0.0 {
            return;
        }

        let force = a2b / distance * self.magnitude_at(distance);

        let (a_free, b_free) = (a.is_free(), b.is_free());
        if a_free {
            particles.add_force(self.a, -force);
        }
        if b_free {
            particles.add_force(self.b, force);
        }
    }

    fn name(&self) -> &str {
        "attraction"
    }
}
