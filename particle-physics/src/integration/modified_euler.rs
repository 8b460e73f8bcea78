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
//! Modified Euler (Heun) integrator
//!
//! A predictor-corrector scheme with two force evaluations per step:
//!
//! ```text
//! a1 = a(x, v)
//! x* = x + v * dt
//! v* = v + a1 * dt
//! a2 = a(x*, v*)
//! x(t + dt) = x + (v + v*) * dt / 2
//! v(t + dt) = v + (a1 + a2) * dt / 2
//! ```
//!
//! Second-order accurate, and exact for constant acceleration.

use super::{commit, Integrator, Kinematics};
use crate::vector::Vector3D;
use crate::world::World;

/// Per-particle state carried from the predictor pass to the corrector pass
#[derive(Debug, Clone, Copy, Default)]
struct Predictor {
    start: Kinematics,
    acceleration: Vector3D,
}

/// Two force evaluations per step
#[derive(Debug, Clone, Default)]
pub struct ModifiedEulerIntegrator {
    // Reused across steps, one entry per particle slot
    stages: Vec<Predictor>,
}

impl ModifiedEulerIntegrator {
    /// Create a new modified Euler integrator
    pub fn new() -> Self {
        ModifiedEulerIntegrator { stages: Vec::new() }
    }
}

impl Integrator for ModifiedEulerIntegrator {
    fn name(&self) -> &str {
        "Modified Euler"
    }

    fn step(&mut self, world: &mut World, dt: f64) {
        self.stages
            .resize(world.particles().slot_count(), Predictor::default());

        // Predictor: derivative at the start, move to the Euler estimate
        world.clear_forces();
        world.apply_forces();
        world
            .particles_mut()
            .zip_mut(&mut self.stages, |particle, stage| {
                if particle.is_fixed() {
                    return;
                }
                stage.start = Kinematics::of(particle);
                stage.acceleration = particle.acceleration();
                Kinematics {
                    position: stage.start.position + stage.start.velocity * dt,
                    velocity: stage.start.velocity + stage.acceleration * dt,
                }
                .store(particle);
            });

        // Corrector: average the two derivatives from the start state
        world.clear_forces();
        world.apply_forces();
        let half_dt = dt * 0.5;
        world
            .particles_mut()
            .zip_mut(&mut self.stages, |particle, stage| {
                if particle.is_fixed() {
                    return;
                }
                let start = stage.start;
                let candidate = Kinematics {
                    position: start.position + (start.velocity + particle.velocity()) * half_dt,
                    velocity: start.velocity
                        + (stage.acceleration + particle.acceleration()) * half_dt,
                };
                commit("Modified Euler", particle, candidate, start);
            });
    }
}
