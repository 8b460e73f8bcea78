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
//! Semi-implicit Euler integrator
//!
//! ```text
//! v(t + dt) = v(t) + a(t) * dt
//! x(t + dt) = x(t) + v(t + dt) * dt
//! ```
//!
//! Using the updated velocity for the position update makes this the
//! symplectic variant of Euler's method. It is first-order accurate but
//! keeps oscillators bounded where explicit Euler would blow up.

use super::{commit, Integrator, Kinematics};
use crate::world::World;

/// One force evaluation per step
#[derive(Debug, Clone, Default)]
pub struct EulerIntegrator;

impl EulerIntegrator {
    /// Create a new Euler integrator
    pub fn new() -> Self {
        EulerIntegrator
    }
}

impl Integrator for EulerIntegrator {
    fn name(&self) -> &str {
        "Euler"
    }

    fn step(&mut self, world: &mut World, dt: f64) {
        world.clear_forces();
        world.apply_forces();

        let name = self.name();
        world.particles_mut().for_each_mut(|particle| {
            if particle.is_fixed() {
                return;
            }
            let start = Kinematics::of(particle);
            let velocity = start.velocity + particle.acceleration() * dt;
            let candidate = Kinematics {
                position: start.position + velocity * dt,
                velocity,
            };
            commit(name, particle, candidate, start);
        });
    }
}
