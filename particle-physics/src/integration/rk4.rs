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
//! Runge-Kutta 4th order (RK4) integrator implementation
//!
//! The RK4 method is a classical explicit integrator that provides fourth-order
//! accuracy for smooth ordinary differential equations.
//!
//! # Algorithm
//!
//! For our second-order system (position and velocity), with `h = dt`:
//!
//! ```text
//! k1_x = v                 k1_v = a(x, v)
//! k2_x = v + k1_v*h/2      k2_v = a(x + k1_x*h/2, v + k1_v*h/2)
//! k3_x = v + k2_v*h/2      k3_v = a(x + k2_x*h/2, v + k2_v*h/2)
//! k4_x = v + k3_v*h        k4_v = a(x + k3_x*h,   v + k3_v*h)
//! x(t + h) = x + (k1_x + 2*k2_x + 2*k3_x + k4_x)*h/6
//! v(t + h) = v + (k1_v + 2*k2_v + 2*k3_v + k4_v)*h/6
//! ```
//!
//! Each stage moves every free particle to its evaluation point and runs a
//! full accumulate pass over the world, so springs and attractions see the
//! intermediate state of both their ends.
//!
//! # Properties
//!
//! - **Fourth-order accurate**: Local error O(dt⁵), global error O(dt⁴)
//! - **Not symplectic**: Energy may drift over long simulations
//! - **Four evaluations per step**
//!
//! # References
//!
//! - Press, W. H., Teukolsky, S. A., Vetterling, W. T., & Flannery, B. P. (2007).
//!   Numerical Recipes: The Art of Scientific Computing (3rd ed.). Cambridge
//!   University Press. Section 17.1.

use super::{commit, Integrator, Kinematics};
use crate::vector::Vector3D;
use crate::world::World;

/// Fraction of the step at which stages 2, 3 and 4 are evaluated
const STAGE_OFFSETS: [f64; 3] = [0.5, 0.5, 1.0];

/// Per-particle start state and stage derivatives
#[derive(Debug, Clone, Copy, Default)]
struct Stages {
    start: Kinematics,
    k_position: [Vector3D; 4],
    k_velocity: [Vector3D; 4],
}

/// Runge-Kutta 4th order integrator
///
/// Four force evaluations per step. This is the default integrator of a
/// [`ParticleSystem`](crate::ParticleSystem).
///
/// # Example
///
/// ```
/// use particle_physics::integration::{Integrator, RungeKuttaIntegrator};
///
/// let integrator = RungeKuttaIntegrator::new();
/// assert_eq!(integrator.name(), "Runge-Kutta 4");
/// ```
#[derive(Debug, Clone, Default)]
pub struct RungeKuttaIntegrator {
    // Reusable buffer to avoid allocation on each integration step
    stages: Vec<Stages>,
}

impl RungeKuttaIntegrator {
    /// Create a new RK4 integrator
    pub fn new() -> Self {
        RungeKuttaIntegrator { stages: Vec::new() }
    }
}

impl Integrator for RungeKuttaIntegrator {
    fn name(&self) -> &str {
        "Runge-Kutta 4"
    }

    fn step(&mut self, world: &mut World, dt: f64) {
        self.stages
            .resize(world.particles().slot_count(), Stages::default());

        // k1 at the start state
        world.clear_forces();
        world.apply_forces();
        world
            .particles_mut()
            .zip_mut(&mut self.stages, |particle, stage| {
                if particle.is_fixed() {
                    return;
                }
                stage.start = Kinematics::of(particle);
                stage.k_position[0] = particle.velocity();
                stage.k_velocity[0] = particle.acceleration();
            });

        // k2..k4, each evaluated from the previous stage's derivative
        for (i, offset) in STAGE_OFFSETS.iter().enumerate() {
            let h = dt * offset;
            world
                .particles_mut()
                .zip_mut(&mut self.stages, |particle, stage| {
                    if particle.is_fixed() {
                        return;
                    }
                    Kinematics {
                        position: stage.start.position + stage.k_position[i] * h,
                        velocity: stage.start.velocity + stage.k_velocity[i] * h,
                    }
                    .store(particle);
                });

            world.clear_forces();
            world.apply_forces();
            world
                .particles_mut()
                .zip_mut(&mut self.stages, |particle, stage| {
                    if particle.is_fixed() {
                        return;
                    }
                    stage.k_position[i + 1] = particle.velocity();
                    stage.k_velocity[i + 1] = particle.acceleration();
                });
        }

        // Final update: y(t+dt) = y(t) + (k1 + 2*k2 + 2*k3 + k4)*dt/6
        let dt_6 = dt / 6.0;
        world
            .particles_mut()
            .zip_mut(&mut self.stages, |particle, stage| {
                if particle.is_fixed() {
                    return;
                }
                let [x1, x2, x3, x4] = stage.k_position;
                let [v1, v2, v3, v4] = stage.k_velocity;
                let candidate = Kinematics {
                    position: stage.start.position + (x1 + x2 * 2.0 + x3 * 2.0 + x4) * dt_6,
                    velocity: stage.start.velocity + (v1 + v2 * 2.0 + v3 * 2.0 + v4) * dt_6,
                };
                commit("Runge-Kutta 4", particle, candidate, stage.start);
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forces::Spring;
    use crate::particle::Particle;

    #[test]
    fn test_rk4_free_motion() {
        // With no forces, position should update by velocity * dt
        let mut world = World::default();
        let h = world.particles_mut().insert(Particle::new(1.0, Vector3D::zero()));
        world
            .particles_mut()
            .get_mut(h)
            .unwrap()
            .set_velocity(Vector3D::new(1.0, 2.0, 3.0));

        RungeKuttaIntegrator::new().step(&mut world, 0.1);

        let pos = world.particles().get(h).unwrap().position();
        assert!((pos.x() - 0.1).abs() < 1e-10);
        assert!((pos.y() - 0.2).abs() < 1e-10);
        assert!((pos.z() - 0.3).abs() < 1e-10);
    }

    #[test]
    fn test_rk4_constant_acceleration() {
        let mut world = World::new(Vector3D::new(0.0, -10.0, 0.0), 0.0);
        let h = world.particles_mut().insert(Particle::new(2.0, Vector3D::zero()));

        RungeKuttaIntegrator::new().step(&mut world, 1.0);

        // a = F/m = -5, y = 0.5 * a * t²
        let p = world.particles().get(h).unwrap();
        assert!((p.position().y() + 2.5).abs() < 1e-12);
        assert!((p.velocity().y() + 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_rk4_buffer_reuse() {
        let mut world = World::default();
        let anchor = world.particles_mut().insert(Particle::new(1.0, Vector3D::zero()));
        world.particles_mut().get_mut(anchor).unwrap().make_fixed();
        let bob = world.particles_mut().insert(Particle::new(1.0, Vector3D::new(1.0, 0.0, 0.0)));
        world.springs_mut().insert(Spring::new(bob, anchor, 1.0, 0.0, 0.0));

        let mut integrator = RungeKuttaIntegrator::new();
        for _ in 0..100 {
            integrator.step(&mut world, 0.01);
        }
        // Growing the particle set between steps resizes the buffer
        let late = world.particles_mut().insert(Particle::new(1.0, Vector3D::new(5.0, 0.0, 0.0)));
        integrator.step(&mut world, 0.01);

        let x = world.particles().get(bob).unwrap().position().x();
        let expected = 1.01_f64.cos();
        assert!((x - expected).abs() < 1e-8, "x = {}, expected {}", x, expected);
        assert_eq!(world.particles().get(late).unwrap().position().x(), 5.0);
        assert_eq!(world.particles().get(anchor).unwrap().position(), Vector3D::zero());
    }
}
