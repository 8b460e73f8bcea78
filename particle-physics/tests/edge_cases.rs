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
//! Edge case tests for the particle system
//!
//! Tests singularities, stale handles, fixed particles, and unusual scenarios

use particle_physics::integration::Integrator;
use particle_physics::{
    Accumulators, ForceElement, IntegratorKind, ParticleSystem, PhysicsError, Targets, Vector3D,
    World,
};

fn quiet_system(kind: IntegratorKind) -> ParticleSystem {
    let mut system = ParticleSystem::new();
    system.set_integrator(kind);
    system.set_drag(0.0).unwrap();
    system
}

#[test]
fn test_empty_system_ticks() {
    for kind in IntegratorKind::ALL {
        let mut system = quiet_system(kind);
        system.set_gravity_y(-9.81);
        assert!(system.tick().is_ok());
        assert_eq!(system.particle_count(), 0);
        assert_eq!(system.kinetic_energy(), 0.0);
    }
}

#[test]
fn test_coincident_spring_ends_are_skipped() {
    for kind in IntegratorKind::ALL {
        let mut system = quiet_system(kind);
        let a = system.make_particle(1.0, Vector3D::new(1.0, 1.0, 1.0));
        let b = system.make_particle(1.0, Vector3D::new(1.0, 1.0, 1.0));
        system.make_spring(a, b, 5.0, 0.5, 2.0).unwrap();

        system.tick_by(0.1).unwrap();

        // No direction, no force; nothing moves and nothing turns NaN
        assert_eq!(system.position(a), Some(Vector3D::new(1.0, 1.0, 1.0)), "{kind}");
        assert_eq!(system.position(b), Some(Vector3D::new(1.0, 1.0, 1.0)), "{kind}");
        assert_eq!(system.velocity(a), Some(Vector3D::zero()), "{kind}");
    }
}

#[test]
fn test_coincident_attraction_is_skipped() {
    let mut system = quiet_system(IntegratorKind::RungeKutta);
    let a = system.make_particle(1.0, Vector3D::zero());
    let b = system.make_particle(1.0, Vector3D::zero());
    system.make_attraction(a, b, 10.0, 0.0).unwrap();

    system.tick_by(0.1).unwrap();

    assert_eq!(system.position(a), Some(Vector3D::zero()));
    assert_eq!(system.position(b), Some(Vector3D::zero()));
}

#[test]
fn test_zero_min_distance_attraction_stays_finite() {
    let mut system = quiet_system(IntegratorKind::Euler);
    let a = system.make_particle(1.0, Vector3D::new(-1e-3, 0.0, 0.0));
    let b = system.make_particle(1.0, Vector3D::new(1e-3, 0.0, 0.0));
    system.make_attraction(a, b, 1.0, 0.0).unwrap();

    system.tick_by(1e-3).unwrap();

    assert!(system.position(a).unwrap().is_valid());
    assert!(system.velocity(b).unwrap().is_valid());
}

#[test]
fn test_fixed_particles_never_move() {
    for kind in IntegratorKind::ALL {
        let mut system = quiet_system(kind);
        system.set_gravity(Vector3D::new(1.0, -9.81, 2.0));
        let fixed = system.make_particle(1.0, Vector3D::new(3.0, 3.0, 3.0));
        system.particle_mut(fixed).unwrap().make_fixed();
        system
            .particle_mut(fixed)
            .unwrap()
            .set_velocity(Vector3D::new(1.0, 0.0, 0.0));
        let free = system.make_particle(1.0, Vector3D::zero());
        system.make_spring(fixed, free, 50.0, 1.0, 1.0).unwrap();
        system.make_attraction(fixed, free, 5.0, 0.1).unwrap();

        for _ in 0..25 {
            system.tick_by(0.01).unwrap();
        }

        let p = system.particle(fixed).unwrap();
        assert_eq!(p.position(), Vector3D::new(3.0, 3.0, 3.0), "{kind}");
        assert_eq!(p.velocity(), Vector3D::new(1.0, 0.0, 0.0), "{kind}");
        assert_ne!(system.position(free), Some(Vector3D::zero()), "{kind}");
    }
}

#[test]
fn test_spring_between_fixed_particles_is_inert() {
    let mut system = quiet_system(IntegratorKind::Euler);
    let a = system.make_particle(1.0, Vector3D::zero());
    let b = system.make_particle(1.0, Vector3D::new(10.0, 0.0, 0.0));
    system.particle_mut(a).unwrap().make_fixed();
    system.particle_mut(b).unwrap().make_fixed();
    system.make_spring(a, b, 1.0, 0.0, 1.0).unwrap();

    system.tick_by(1.0).unwrap();

    assert!(system.particle(a).unwrap().force().is_zero());
    assert!(system.particle(b).unwrap().force().is_zero());
}

#[test]
fn test_disabled_spring_and_attraction() {
    let mut system = quiet_system(IntegratorKind::ModifiedEuler);
    let a = system.make_particle(1.0, Vector3D::zero());
    let b = system.make_particle(1.0, Vector3D::new(4.0, 0.0, 0.0));
    let s = system.make_spring(a, b, 10.0, 0.0, 1.0).unwrap();
    let at = system.make_attraction(a, b, 10.0, 0.1).unwrap();
    system.spring_mut(s).unwrap().turn_off();
    system.attraction_mut(at).unwrap().turn_off();

    system.tick_by(0.5).unwrap();
    assert_eq!(system.position(b), Some(Vector3D::new(4.0, 0.0, 0.0)));

    system.spring_mut(s).unwrap().turn_on();
    system.tick_by(0.5).unwrap();
    assert!(system.position(b).unwrap().x() < 4.0);
}

#[test]
fn test_removed_elements_are_stale() {
    let mut system = ParticleSystem::new();
    let a = system.make_default_particle();
    let b = system.make_default_particle();
    let s = system.make_spring(a, b, 1.0, 0.0, 1.0).unwrap();
    let at = system.make_attraction(a, b, 1.0, 1.0).unwrap();

    assert!(system.remove_spring(s).is_some());
    assert!(system.remove_spring(s).is_none());
    assert!(system.remove_attraction(at).is_some());
    assert!(system.attraction(at).is_none());
    assert!(system.remove_particle(a).is_some());
    assert!(system.position(a).is_none());
    assert!(system.velocity(a).is_none());
    assert_eq!(system.particle_count(), 1);
}

#[test]
fn test_targeted_force_subset_survives_removal() {
    let mut system = quiet_system(IntegratorKind::Euler);
    let a = system.make_particle(1.0, Vector3D::zero());
    let b = system.make_particle(1.0, Vector3D::zero());
    let c = system.make_particle(1.0, Vector3D::zero());
    system.make_targeted_force("lift", Targets::subset([a, b]), |_, _| {
        Vector3D::new(0.0, 1.0, 0.0)
    });

    system.remove_particle(b);
    system.tick_by(1.0).unwrap();

    assert_eq!(system.velocity(a), Some(Vector3D::new(0.0, 1.0, 0.0)));
    assert_eq!(system.velocity(c), Some(Vector3D::zero()));
}

/// Force that produces NaN for every particle
struct Poison;

impl ForceElement for Poison {
    fn apply(&mut self, particles: &mut Accumulators<'_>) {
        let handles: Vec<_> = particles.handles().collect();
        for h in handles {
            particles.add_force(h, Vector3D::new(f64::NAN, 0.0, 0.0));
        }
    }

    fn name(&self) -> &str {
        "poison"
    }
}

#[test]
fn test_non_finite_result_is_not_committed() {
    for kind in IntegratorKind::ALL {
        let mut system = quiet_system(kind);
        let p = system.make_particle(1.0, Vector3D::new(1.0, 2.0, 3.0));
        system
            .particle_mut(p)
            .unwrap()
            .set_velocity(Vector3D::new(0.5, 0.0, 0.0));
        let poison = system.add_custom_force(Box::new(Poison));

        system.tick_by(0.1).unwrap();
        assert_eq!(system.position(p), Some(Vector3D::new(1.0, 2.0, 3.0)), "{kind}");
        assert_eq!(system.velocity(p), Some(Vector3D::new(0.5, 0.0, 0.0)), "{kind}");

        // Once the bad force is gone the particle moves again
        system.remove_custom_force(poison);
        system.tick_by(0.1).unwrap();
        assert!((system.position(p).unwrap().x() - 1.05).abs() < 1e-12, "{kind}");
    }
}

/// Integrator that only counts its steps
struct Counting {
    steps: usize,
}

impl Integrator for Counting {
    fn name(&self) -> &str {
        "counting"
    }

    fn step(&mut self, world: &mut World, _dt: f64) {
        self.steps += 1;
        world.clear_forces();
        world.apply_forces();
    }
}

#[test]
fn test_custom_integrator_is_used() {
    let mut system = ParticleSystem::new();
    system.set_gravity_y(-1.0);
    let p = system.make_default_particle();
    system.set_custom_integrator(Box::new(Counting { steps: 0 }));
    assert_eq!(system.integrator_name(), "counting");

    system.tick().unwrap();
    system.tick().unwrap();

    // Forces were accumulated but nothing was integrated
    assert_eq!(system.position(p), Some(Vector3D::zero()));
    assert_eq!(system.particle(p).unwrap().force().y(), -1.0);
}

#[test]
fn test_clear_all_forces_zeroes_accumulators() {
    let mut system = quiet_system(IntegratorKind::Euler);
    system.set_gravity_y(-3.0);
    let p = system.make_default_particle();
    system.tick().unwrap();
    assert_eq!(system.particle(p).unwrap().force().y(), -3.0);

    system.clear_all_forces();
    assert!(system.particle(p).unwrap().force().is_zero());
    assert_eq!(system.particle_count(), 1);
}

#[test]
fn test_drag_opposes_velocity() {
    let mut system = ParticleSystem::new();
    system.set_integrator(IntegratorKind::Euler);
    system.set_drag(0.5).unwrap();
    let p = system.make_default_particle();
    system
        .particle_mut(p)
        .unwrap()
        .set_velocity(Vector3D::new(2.0, 0.0, 0.0));

    system.tick_by(1.0).unwrap();

    // v' = v - drag * v * dt
    assert_eq!(system.velocity(p), Some(Vector3D::new(1.0, 0.0, 0.0)));
}

#[test]
fn test_negative_drag_speeds_particle_up() {
    let mut system = ParticleSystem::new();
    system.set_integrator(IntegratorKind::Euler);
    system.set_drag(-0.5).unwrap();
    assert_eq!(system.drag(), -0.5);
    let p = system.make_default_particle();
    system
        .particle_mut(p)
        .unwrap()
        .set_velocity(Vector3D::new(2.0, 0.0, 0.0));

    system.tick_by(1.0).unwrap();

    assert_eq!(system.velocity(p), Some(Vector3D::new(3.0, 0.0, 0.0)));
}

#[test]
fn test_non_finite_drag_is_rejected() {
    let mut system = ParticleSystem::new();
    for drag in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
        assert!(matches!(
            system.set_drag(drag),
            Err(PhysicsError::InvalidParameter(_))
        ));
    }
    assert_eq!(system.drag(), 0.001);
}
