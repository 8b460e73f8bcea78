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
//! The particle system
//!
//! [`ParticleSystem`] owns every particle and force element, the global
//! gravity and drag, the current integrator and the default step size. It
//! is the only way to create particles and force elements; callers keep
//! typed handles.
//!
//! # Tick
//!
//! [`ParticleSystem::tick_by`] validates the step and hands the world to the
//! integrator, which runs one or more clear/accumulate passes and updates
//! positions and velocities. A failed precondition leaves all state as it
//! was.
//!
//! # Stale Handles
//!
//! Removing a particle does not remove the springs or attractions attached
//! to it. Those elements become inert and stay in the system until removed
//! themselves.

use crate::config::SystemConfig;
use crate::error::{PhysicsError, Result};
use crate::forces::{
    Attraction, AttractionHandle, CustomForce, CustomForceHandle, ForceElement, Spring,
    SpringHandle, TargetedForce, Targets,
};
use crate::integration::{Integrator, IntegratorKind};
use crate::particle::{Particle, ParticleHandle, DEFAULT_MASS};
use crate::vector::Vector3D;
use crate::world::World;
use tracing::{debug, trace};

/// Mutable system of particles, springs, attractions and custom forces
///
/// # Example
///
/// ```
/// use particle_physics::{IntegratorKind, ParticleSystem, Vector3D};
///
/// let mut system = ParticleSystem::new();
/// system.set_integrator(IntegratorKind::Euler);
/// system.set_drag(0.0).unwrap();
///
/// let anchor = system.make_particle(1.0, Vector3D::zero());
/// system.particle_mut(anchor).unwrap().make_fixed();
/// let bob = system.make_particle(1.0, Vector3D::new(0.0, 10.0, 0.0));
/// system.make_spring(anchor, bob, 0.1, 0.1, 5.0).unwrap();
///
/// for _ in 0..100 {
///     system.tick().unwrap();
/// }
/// assert!((system.position(bob).unwrap().y() - 5.0).abs() < 0.5);
/// ```
pub struct ParticleSystem {
    world: World,
    integrator: Box<dyn Integrator>,
    delta_t: f64,
}

impl ParticleSystem {
    /// Create an empty system with the default configuration
    ///
    /// Gravity zero, drag 0.001, step size 1.0, Runge-Kutta 4.
    pub fn new() -> Self {
        Self::from_valid_config(SystemConfig::default())
    }

    /// Create an empty system from a configuration
    ///
    /// # Errors
    ///
    /// Returns the first field of `config` that fails
    /// [`SystemConfig::validate`].
    pub fn with_config(config: SystemConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: SystemConfig) -> Self {
        ParticleSystem {
            world: World::new(config.gravity, config.drag),
            integrator: config.integrator.create(),
            delta_t: config.delta_t,
        }
    }

    // ---- factories ----

    /// Create a free particle at rest
    ///
    /// # Panics
    ///
    /// Panics if `mass` is not positive and finite.
    pub fn make_particle(&mut self, mass: f64, position: Vector3D) -> ParticleHandle {
        assert!(mass > 0.0 && mass.is_finite(), "Mass must be positive and finite");
        self.world.particles_mut().insert(Particle::new(mass, position))
    }

    /// Create a free particle of unit mass at the origin
    pub fn make_default_particle(&mut self) -> ParticleHandle {
        self.make_particle(DEFAULT_MASS, Vector3D::zero())
    }

    /// Join two particles with a damped spring
    ///
    /// # Errors
    ///
    /// - [`PhysicsError::UnknownParticle`] if either handle is stale
    /// - [`PhysicsError::InvalidParameter`] unless `strength > 0`,
    ///   `damping >= 0` and `rest_length >= 0`, all finite
    pub fn make_spring(
        &mut self,
        a: ParticleHandle,
        b: ParticleHandle,
        strength: f64,
        damping: f64,
        rest_length: f64,
    ) -> Result<SpringHandle> {
        self.require_particle(a)?;
        self.require_particle(b)?;
        if !(strength > 0.0 && strength.is_finite()) {
            return Err(invalid_parameter("spring strength", strength, "positive"));
        }
        if !(damping >= 0.0 && damping.is_finite()) {
            return Err(invalid_parameter("spring damping", damping, "non-negative"));
        }
        if !(rest_length >= 0.0 && rest_length.is_finite()) {
            return Err(invalid_parameter("spring rest length", rest_length, "non-negative"));
        }
        Ok(self
            .world
            .springs_mut()
            .insert(Spring::new(a, b, strength, damping, rest_length)))
    }

    /// Create an inverse-square attraction between two particles
    ///
    /// Positive `strength` pulls the particles together, negative pushes
    /// them apart.
    ///
    /// # Errors
    ///
    /// - [`PhysicsError::UnknownParticle`] if either handle is stale
    /// - [`PhysicsError::InvalidParameter`] unless `strength` is finite and
    ///   `min_distance` is non-negative and finite
    pub fn make_attraction(
        &mut self,
        a: ParticleHandle,
        b: ParticleHandle,
        strength: f64,
        min_distance: f64,
    ) -> Result<AttractionHandle> {
        self.require_particle(a)?;
        self.require_particle(b)?;
        if !strength.is_finite() {
            return Err(invalid_parameter("attraction strength", strength, "finite"));
        }
        if !(min_distance >= 0.0 && min_distance.is_finite()) {
            return Err(invalid_parameter(
                "attraction minimum distance",
                min_distance,
                "non-negative",
            ));
        }
        Ok(self
            .world
            .attractions_mut()
            .insert(Attraction::new(a, b, strength, min_distance)))
    }

    /// Register a custom force element
    pub fn add_custom_force(&mut self, force: CustomForce) -> CustomForceHandle {
        self.world.custom_forces_mut().insert(force)
    }

    /// Register a closure-backed custom force
    ///
    /// See [`TargetedForce`] for the closure contract.
    pub fn make_targeted_force<F>(
        &mut self,
        name: impl Into<String>,
        targets: Targets,
        force: F,
    ) -> CustomForceHandle
    where
        F: FnMut(ParticleHandle, &Particle) -> Vector3D + Send + 'static,
    {
        self.add_custom_force(Box::new(TargetedForce::new(name, targets, force)))
    }

    fn require_particle(&self, handle: ParticleHandle) -> Result<()> {
        if self.world.particles().contains(handle) {
            Ok(())
        } else {
            Err(PhysicsError::UnknownParticle(handle))
        }
    }

    // ---- removal ----

    /// Remove a particle
    ///
    /// Springs and attractions referring to it are kept and become inert.
    pub fn remove_particle(&mut self, handle: ParticleHandle) -> Option<Particle> {
        self.world.particles_mut().remove(handle)
    }

    /// Remove a spring
    pub fn remove_spring(&mut self, handle: SpringHandle) -> Option<Spring> {
        self.world.springs_mut().remove(handle)
    }

    /// Remove an attraction
    pub fn remove_attraction(&mut self, handle: AttractionHandle) -> Option<Attraction> {
        self.world.attractions_mut().remove(handle)
    }

    /// Remove a custom force
    pub fn remove_custom_force(&mut self, handle: CustomForceHandle) -> Option<CustomForce> {
        self.world.custom_forces_mut().remove(handle)
    }

    /// Remove every spring and attraction attached to a particle that is no
    /// longer in the system, returning how many were removed
    pub fn prune_inert_forces(&mut self) -> usize {
        let removed = self.world.prune_inert_forces();
        if removed > 0 {
            debug!(removed, "pruned force elements attached to removed particles");
        }
        removed
    }

    /// Remove all particles and force elements
    ///
    /// Gravity, drag, integrator and step size are kept. Every outstanding
    /// handle becomes stale.
    pub fn clear(&mut self) {
        debug!(
            particles = self.world.particles().len(),
            springs = self.world.springs().len(),
            attractions = self.world.attractions().len(),
            custom_forces = self.world.custom_forces().len(),
            "clearing particle system"
        );
        self.world.clear();
    }

    /// Remove every force element and zero all force accumulators
    ///
    /// Particles are kept.
    pub fn clear_all_forces(&mut self) {
        debug!("clearing all force elements");
        self.world.clear_all_forces();
    }

    // ---- global settings ----

    /// Global gravity
    pub fn gravity(&self) -> Vector3D {
        self.world.gravity()
    }

    /// Set the global gravity vector
    pub fn set_gravity(&mut self, gravity: Vector3D) {
        self.world.set_gravity(gravity);
    }

    /// Set gravity to `(0, g, 0)`
    pub fn set_gravity_y(&mut self, g: f64) {
        self.world.set_gravity(Vector3D::new(0.0, g, 0.0));
    }

    /// Global drag coefficient
    pub fn drag(&self) -> f64 {
        self.world.drag()
    }

    /// Set the global drag coefficient
    ///
    /// Positive values slow particles down; negative values feed energy in.
    ///
    /// # Errors
    ///
    /// [`PhysicsError::InvalidParameter`] if `drag` is NaN or infinite.
    pub fn set_drag(&mut self, drag: f64) -> Result<()> {
        if !drag.is_finite() {
            return Err(PhysicsError::InvalidParameter(format!(
                "drag must be finite, got {drag}"
            )));
        }
        self.world.set_drag(drag);
        Ok(())
    }

    /// Name of the current integrator
    pub fn integrator_name(&self) -> &str {
        self.integrator.name()
    }

    /// Switch to a built-in integrator
    pub fn set_integrator(&mut self, kind: IntegratorKind) {
        self.replace_integrator(kind.create());
    }

    /// Switch to a built-in integrator by name
    ///
    /// # Errors
    ///
    /// [`PhysicsError::UnknownIntegrator`] if `name` is not a known scheme.
    /// The current integrator is kept in that case.
    pub fn set_integrator_by_name(&mut self, name: &str) -> Result<()> {
        let kind: IntegratorKind = name.parse()?;
        self.set_integrator(kind);
        Ok(())
    }

    /// Install a user-provided integrator
    pub fn set_custom_integrator(&mut self, integrator: Box<dyn Integrator>) {
        self.replace_integrator(integrator);
    }

    fn replace_integrator(&mut self, integrator: Box<dyn Integrator>) {
        debug!(
            from = self.integrator.name(),
            to = integrator.name(),
            "switching integrator"
        );
        self.integrator = integrator;
    }

    /// Step size used by [`tick`](Self::tick)
    pub fn delta_t(&self) -> f64 {
        self.delta_t
    }

    /// Set the step size used by [`tick`](Self::tick)
    ///
    /// # Errors
    ///
    /// [`PhysicsError::InvalidTimestep`] unless `delta_t` is positive and
    /// finite.
    pub fn set_delta_t(&mut self, delta_t: f64) -> Result<()> {
        validate_timestep(delta_t)?;
        self.delta_t = delta_t;
        Ok(())
    }

    // ---- advance ----

    /// Advance the system by the stored step size
    pub fn tick(&mut self) -> Result<()> {
        self.tick_by(self.delta_t)
    }

    /// Advance the system by `dt`
    ///
    /// # Errors
    ///
    /// [`PhysicsError::InvalidTimestep`] unless `dt` is positive and finite.
    /// Nothing is changed in that case.
    pub fn tick_by(&mut self, dt: f64) -> Result<()> {
        validate_timestep(dt)?;
        trace!(
            particles = self.world.particles().len(),
            integrator = self.integrator.name(),
            dt,
            "tick"
        );
        self.integrator.step(&mut self.world, dt);
        Ok(())
    }

    // ---- accessors ----

    /// The particle/force graph
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Number of live particles
    pub fn particle_count(&self) -> usize {
        self.world.particles().len()
    }

    /// Number of springs, including inert ones
    pub fn spring_count(&self) -> usize {
        self.world.springs().len()
    }

    /// Number of attractions, including inert ones
    pub fn attraction_count(&self) -> usize {
        self.world.attractions().len()
    }

    /// Number of custom forces
    pub fn custom_force_count(&self) -> usize {
        self.world.custom_forces().len()
    }

    /// Look up a particle
    pub fn particle(&self, handle: ParticleHandle) -> Option<&Particle> {
        self.world.particles().get(handle)
    }

    /// Look up a particle mutably, to fix it or place it
    pub fn particle_mut(&mut self, handle: ParticleHandle) -> Option<&mut Particle> {
        self.world.particles_mut().get_mut(handle)
    }

    /// The `index`-th live particle in creation order
    pub fn particle_at(&self, index: usize) -> Option<(ParticleHandle, &Particle)> {
        self.world.particles().nth(index)
    }

    /// Iterate particles in creation order
    pub fn particles(&self) -> impl Iterator<Item = (ParticleHandle, &Particle)> + '_ {
        self.world.particles().iter()
    }

    /// Look up a spring
    pub fn spring(&self, handle: SpringHandle) -> Option<&Spring> {
        self.world.springs().get(handle)
    }

    /// Look up a spring mutably, to tune it or turn it off
    pub fn spring_mut(&mut self, handle: SpringHandle) -> Option<&mut Spring> {
        self.world.springs_mut().get_mut(handle)
    }

    /// The `index`-th spring in creation order
    pub fn spring_at(&self, index: usize) -> Option<(SpringHandle, &Spring)> {
        self.world.springs().nth(index)
    }

    /// Iterate springs in creation order
    pub fn springs(&self) -> impl Iterator<Item = (SpringHandle, &Spring)> + '_ {
        self.world.springs().iter()
    }

    /// Look up an attraction
    pub fn attraction(&self, handle: AttractionHandle) -> Option<&Attraction> {
        self.world.attractions().get(handle)
    }

    /// Look up an attraction mutably
    pub fn attraction_mut(&mut self, handle: AttractionHandle) -> Option<&mut Attraction> {
        self.world.attractions_mut().get_mut(handle)
    }

    /// The `index`-th attraction in creation order
    pub fn attraction_at(&self, index: usize) -> Option<(AttractionHandle, &Attraction)> {
        self.world.attractions().nth(index)
    }

    /// Iterate attractions in creation order
    pub fn attractions(&self) -> impl Iterator<Item = (AttractionHandle, &Attraction)> + '_ {
        self.world.attractions().iter()
    }

    /// Look up a custom force
    pub fn custom_force(&self, handle: CustomForceHandle) -> Option<&dyn ForceElement> {
        self.world.custom_forces().get(handle).map(|f| &**f)
    }

    /// The `index`-th custom force in registration order
    pub fn custom_force_at(&self, index: usize) -> Option<(CustomForceHandle, &dyn ForceElement)> {
        self.world
            .custom_forces()
            .nth(index)
            .map(|(h, f)| (h, &**f))
    }

    /// Current position of a particle
    pub fn position(&self, handle: ParticleHandle) -> Option<Vector3D> {
        self.particle(handle).map(Particle::position)
    }

    /// Current velocity of a particle
    pub fn velocity(&self, handle: ParticleHandle) -> Option<Vector3D> {
        self.particle(handle).map(Particle::velocity)
    }

    /// Current distance between the ends of a spring
    ///
    /// `None` if the spring or either of its particles is gone.
    pub fn spring_length(&self, handle: SpringHandle) -> Option<f64> {
        let spring = self.spring(handle)?;
        let a = self.position(spring.one_end())?;
        let b = self.position(spring.other_end())?;
        Some(a.distance_to(b))
    }

    /// Total kinetic energy of the free particles
    pub fn kinetic_energy(&self) -> f64 {
        self.world.kinetic_energy()
    }
}

impl Default for ParticleSystem {
    fn default() -> Self {
        Self::new()
    }
}

/// Check that a step size is positive and finite
pub fn validate_timestep(dt: f64) -> Result<()> {
    if dt > 0.0 && dt.is_finite() {
        Ok(())
    } else {
        Err(PhysicsError::InvalidTimestep(dt))
    }
}

fn invalid_parameter(what: &str, value: f64, expected: &str) -> PhysicsError {
    PhysicsError::InvalidParameter(format!("{what} must be {expected} and finite, got {value}"))
}
