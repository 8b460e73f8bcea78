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
//! Error type for the particle system boundary
//!
//! Only precondition checks at the API boundary produce errors. Inside a
//! tick, stale handles and coincident particles are skipped silently so
//! every tick can complete.

use crate::particle::ParticleHandle;
use thiserror::Error;

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, PhysicsError>;

/// Errors signalled by [`ParticleSystem`](crate::ParticleSystem) operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PhysicsError {
    /// Time step was zero, negative, NaN or infinite
    #[error("invalid timestep {0}: must be positive and finite")]
    InvalidTimestep(f64),

    /// A factory operation was given a particle that is not in the system
    #[error("particle {0} is not part of this system")]
    UnknownParticle(ParticleHandle),

    /// A force element parameter violates its documented range
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// No integrator is registered under the given name
    #[error("unknown integrator '{0}'; expected euler, modified-euler or runge-kutta")]
    UnknownIntegrator(String),

    /// Environment configuration could not be parsed
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
