//! World management
//!
//! The World is the particle/force graph an integrator operates on: the
//! particle arena, every registered force element, and the global gravity
//! and drag. It exposes the two accumulate-phase operations integrators
//! call, [`World::clear_forces`] and [`World::apply_forces`].

use crate::forces::{Accumulators, Attraction, CustomForce, ForceElement, Spring};
use crate::handle::Arena;
use crate::particle::Particle;
use crate::vector::Vector3D;

/// Particles, force elements and global field settings
pub struct World {
    particles: Arena<Particle>,
    springs: Arena<Spring>,
    attractions: Arena<Attraction>,
    custom_forces: Arena<CustomForce>,
    gravity: Vector3D,
    drag: f64,
}

impl World {
    /// Create an empty world with the given gravity and drag
    pub fn new(gravity: Vector3D, drag: f64) -> Self {
        World {
            particles: Arena::new(),
            springs: Arena::new(),
            attractions: Arena::new(),
            custom_forces: Arena::new(),
            gravity,
            drag,
        }
    }

    /// All particles
    pub fn particles(&self) -> &Arena<Particle> {
        &self.particles
    }

    /// All particles, mutably
    ///
    /// Integrators use this to read accumulators and write kinematic state.
    pub fn particles_mut(&mut self) -> &mut Arena<Particle> {
        &mut self.particles
    }

    /// All springs
    pub fn springs(&self) -> &Arena<Spring> {
        &self.springs
    }

    pub(crate) fn springs_mut(&mut self) -> &mut Arena<Spring> {
        &mut self.springs
    }

    /// All attractions
    pub fn attractions(&self) -> &Arena<Attraction> {
        &self.attractions
    }

    pub(crate) fn attractions_mut(&mut self) -> &mut Arena<Attraction> {
        &mut self.attractions
    }

    /// All custom forces
    pub fn custom_forces(&self) -> &Arena<CustomForce> {
        &self.custom_forces
    }

    pub(crate) fn custom_forces_mut(&mut self) -> &mut Arena<CustomForce> {
        &mut self.custom_forces
    }

    /// Global gravity, added to every particle's force each pass
    pub fn gravity(&self) -> Vector3D {
        self.gravity
    }

    /// Set the global gravity vector
    pub fn set_gravity(&mut self, gravity: Vector3D) {
        self.gravity = gravity;
    }

    /// Global drag coefficient
    pub fn drag(&self) -> f64 {
        self.drag
    }

    /// Set the global drag coefficient
    pub fn set_drag(&mut self, drag: f64) {
        self.drag = drag;
    }

    /// Reset every particle's force accumulator
    pub fn clear_forces(&mut self) {
        self.particles.for_each_mut(Particle::clear_force);
    }

    /// Run one accumulate pass over every force element
    ///
    /// Order: gravity and drag, springs, attractions, custom forces, each in
    /// insertion order. Contributions are additive, so the order only
    /// matters for reproducing floating-point results exactly.
    pub fn apply_forces(&mut self) {
        let gravity = self.gravity;
        let drag = self.drag;
        if gravity.is_zero() {
            self.particles
                .for_each_mut(|p| p.add_force(p.velocity() * -drag));
        } else {
            self.particles.for_each_mut(|p| {
                p.add_force(gravity);
                p.add_force(p.velocity() * -drag);
            });
        }

        let mut accumulators = Accumulators::new(&mut self.particles);
        self.springs
            .for_each_in_order(|_, spring| spring.apply(&mut accumulators));
        self.attractions
            .for_each_in_order(|_, attraction| attraction.apply(&mut accumulators));
        self.custom_forces
            .for_each_in_order(|_, force| force.apply(&mut accumulators));
    }

    /// Drop all particles and force elements, keeping gravity and drag
    pub fn clear(&mut self) {
        self.particles.clear();
        self.springs.clear();
        self.attractions.clear();
        self.custom_forces.clear();
    }

    /// Drop all force elements and zero the accumulators, keeping particles
    pub fn clear_all_forces(&mut self) {
        self.clear_forces();
        self.springs.clear();
        self.attractions.clear();
        self.custom_forces.clear();
    }

    /// Remove springs and attractions with an end that is no longer alive
    ///
    /// Returns how many elements were removed.
    pub fn prune_inert_forces(&mut self) -> usize {
        let particles = &self.particles;
        let dangling = |a, b| !particles.contains(a) || !particles.contains(b);
        self.springs
            .remove_where(|s| dangling(s.one_end(), s.other_end()))
            + self
                .attractions
                .remove_where(|a| dangling(a.one_end(), a.other_end()))
    }

    /// Total kinetic energy of the free particles
    pub fn kinetic_energy(&self) -> f64 {
        self.particles.iter().map(|(_, p)| p.kinetic_energy()).sum()
    }
}

impl Default for World {
    fn default() -> Self {
        World::new(Vector3D::zero(), 0.0)
    }
}
