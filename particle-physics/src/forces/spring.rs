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
//! Damped Hookean spring between two particles
//!
//! # Physics
//!
//! With `d = pos(a) - pos(b)`, `L = |d|` and `u = d / L`:
//!
//! ```text
//! F_a = u * ( -ks * (L - rest) - damping * ((vel(a) - vel(b)) · u) )
//! F_b = -F_a
//! ```
//!
//! # Degenerate Cases
//!
//! - Coincident particles (`L == 0`): the direction is undefined and the
//!   spring contributes nothing for that pass. No arbitrary axis is chosen.
//! - A removed particle: the spring is inert until removed itself.

use super::{Accumulators, ForceElement};
use crate::handle::Handle;
use crate::particle::ParticleHandle;

/// Handle naming a spring inside a [`ParticleSystem`](crate::ParticleSystem)
pub type SpringHandle = Handle<Spring>;

/// Damped spring joining two particles
#[derive(Debug, Clone, PartialEq)]
pub struct Spring {
    a: ParticleHandle,
    b: ParticleHandle,
    strength: f64,
    damping: f64,
    rest_length: f64,
    on: bool,
}

impl Spring {
    pub(crate) fn new(
        a: ParticleHandle,
        b: ParticleHandle,
        strength: f64,
        damping: f64,
        rest_length: f64,
    ) -> Self {
        Spring {
            a,
            b,
            strength,
            damping,
            rest_length,
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

    /// Spring constant `ks`
    pub fn strength(&self) -> f64 {
        self.strength
    }

    /// Damping coefficient
    pub fn damping(&self) -> f64 {
        self.damping
    }

    /// Length at which the spring exerts no force
    pub fn rest_length(&self) -> f64 {
        self.rest_length
    }

    /// Set the spring constant
    ///
    /// # Panics
    ///
    /// Panics if `ks` is not positive and finite.
    pub fn set_strength(&mut self, ks: f64) {
        assert!(ks > 0.0 && ks.is_finite(), "Spring strength must be positive and finite");
        self.strength = ks;
    }

    /// Set the damping coefficient
    ///
    /// # Panics
    ///
    /// Panics if `damping` is negative or not finite.
    pub fn set_damping(&mut self, damping: f64) {
        assert!(
            damping >= 0.0 && damping.is_finite(),
            "Spring damping must be non-negative and finite"
        );
        self.damping = damping;
    }

    /// Set the rest length
    ///
    /// # Panics
    ///
    /// Panics if `rest_length` is negative or not finite.
    pub fn set_rest_length(&mut self, rest_length: f64) {
        assert!(
            rest_length >= 0.0 && rest_length.is_finite(),
            "Spring rest length must be non-negative and finite"
        );
        self.rest_length = rest_length;
    }

    /// Enable the spring
    pub fn turn_on(&mut self) {
        self.on = true;
    }

    /// Disable the spring without removing it
    pub fn turn_off(&mut self) {
        self.on = false;
    }

    /// Whether the spring currently applies force
    pub fn is_on(&self) -> bool {
        self.on
    }
}

impl ForceElement for Spring {
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
        let length = a2b.magnitude();
        if length == 0.0 {
            return;
        }
        let direction = a2b / length;

        let spring_force = -self.strength * (length - self.rest_length);
        let damping_force = -self.damping * (a.velocity() - b.velocity()).dot(direction);
        let force = direction * (spring_force + damping_force);

        let (a_free, b_free) = (a.is_free(), b.is_free());
        if a_free {
            particles.add_force(self.a, force);
        }
        if b_free {
            particles.add_force(self.b, -force);
        }
    }

    fn name(&self) -> &str {
        "spring"
    }
}
