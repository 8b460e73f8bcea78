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
//! System configuration
//!
//! [`SystemConfig`] carries the global settings of a
//! [`ParticleSystem`](crate::ParticleSystem): gravity, drag, the default step
//! size and the integrator.
//!
//! # Environment Configuration
//!
//! [`SystemConfig::from_env`] starts from the defaults and applies any of
//! these variables that are set:
//!
//! ```bash
//! export PARTICLE_PHYSICS_GRAVITY=-9.81        # y component only
//! export PARTICLE_PHYSICS_GRAVITY=0,-9.81,0    # full vector
//! export PARTICLE_PHYSICS_DRAG=0.01
//! export PARTICLE_PHYSICS_DELTA_T=0.016
//! export PARTICLE_PHYSICS_INTEGRATOR=modified-euler
//! ```

use crate::error::{PhysicsError, Result};
use crate::integration::IntegratorKind;
use crate::vector::Vector3D;

/// Gravity override, `g` (y only) or `x,y,z`
pub const GRAVITY_VAR: &str = "PARTICLE_PHYSICS_GRAVITY";
/// Drag coefficient override
pub const DRAG_VAR: &str = "PARTICLE_PHYSICS_DRAG";
/// Default step size override
pub const DELTA_T_VAR: &str = "PARTICLE_PHYSICS_DELTA_T";
/// Integrator name override
pub const INTEGRATOR_VAR: &str = "PARTICLE_PHYSICS_INTEGRATOR";

/// Default drag coefficient
pub const DEFAULT_DRAG: f64 = 0.001;
/// Default step size used by [`ParticleSystem::tick`](crate::ParticleSystem::tick)
pub const DEFAULT_DELTA_T: f64 = 1.0;

/// Global settings of a particle system
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SystemConfig {
    /// Force added to every particle on each accumulate pass
    pub gravity: Vector3D,
    /// Velocity-proportional drag coefficient
    pub drag: f64,
    /// Step size for [`ParticleSystem::tick`](crate::ParticleSystem::tick)
    pub delta_t: f64,
    /// Integration scheme
    pub integrator: IntegratorKind,
}

impl Default for SystemConfig {
    fn default() -> Self {
        SystemConfig {
            gravity: Vector3D::zero(),
            drag: DEFAULT_DRAG,
            delta_t: DEFAULT_DELTA_T,
            integrator: IntegratorKind::default(),
        }
    }
}

impl SystemConfig {
    /// Defaults overridden by the `PARTICLE_PHYSICS_*` environment variables
    ///
    /// Unset variables keep their default. A variable that is set but cannot
    /// be parsed is an error rather than being ignored.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = SystemConfig::default();

        if let Some(value) = lookup(GRAVITY_VAR) {
            config.gravity = parse_gravity(&value)?;
        }
        if let Some(value) = lookup(DRAG_VAR) {
            config.drag = parse_number(DRAG_VAR, &value)?;
        }
        if let Some(value) = lookup(DELTA_T_VAR) {
            config.delta_t = parse_number(DELTA_T_VAR, &value)?;
        }
        if let Some(value) = lookup(INTEGRATOR_VAR) {
            config.integrator = value.parse()?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Check every field against its documented range
    pub fn validate(&self) -> Result<()> {
        if !self.gravity.is_valid() {
            return Err(PhysicsError::InvalidConfig(format!(
                "gravity must be finite, got {}",
                self.gravity
            )));
        }
        if !self.drag.is_finite() {
            return Err(PhysicsError::InvalidConfig(format!(
                "drag must be finite, got {}",
                self.drag
            )));
        }
        if !(self.delta_t.is_finite() && self.delta_t > 0.0) {
            return Err(PhysicsError::InvalidTimestep(self.delta_t));
        }
        Ok(())
    }
}

fn parse_number(var: &str, value: &str) -> Result<f64> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|e| PhysicsError::InvalidConfig(format!("{var}={value:?}: {e}")))
}

fn parse_gravity(value: &str) -> Result<Vector3D> {
    let parts: Vec<&str> = value.split(',').collect();
    match parts.as_slice() {
        [y] => Ok(Vector3D::new(0.0, parse_number(GRAVITY_VAR, y)?, 0.0)),
        [x, y, z] => Ok(Vector3D::new(
            parse_number(GRAVITY_VAR, x)?,
            parse_number(GRAVITY_VAR, y)?,
            parse_number(GRAVITY_VAR, z)?,
        )),
        _ => Err(PhysicsError::InvalidConfig(format!(
            "{GRAVITY_VAR}={value:?}: expected one or three comma-separated numbers"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = SystemConfig::default();
        assert!(config.gravity.is_zero());
        assert_eq!(config.drag, 0.001);
        assert_eq!(config.delta_t, 1.0);
        assert_eq!(config.integrator, IntegratorKind::RungeKutta);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_environment_gives_defaults() {
        let config = SystemConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, SystemConfig::default());
    }

    #[test]
    fn test_overrides() {
        let config = SystemConfig::from_lookup(lookup_from(&[
            (GRAVITY_VAR, "-9.81"),
            (DRAG_VAR, "0.5"),
            (DELTA_T_VAR, " 0.01 "),
            (INTEGRATOR_VAR, "Euler"),
        ]))
        .unwrap();
        assert_eq!(config.gravity, Vector3D::new(0.0, -9.81, 0.0));
        assert_eq!(config.drag, 0.5);
        assert_eq!(config.delta_t, 0.01);
        assert_eq!(config.integrator, IntegratorKind::Euler);
    }

    #[test]
    fn test_gravity_vector() {
        let config = SystemConfig::from_lookup(lookup_from(&[(GRAVITY_VAR, "1, 2, 3")])).unwrap();
        assert_eq!(config.gravity, Vector3D::new(1.0, 2.0, 3.0));

        let err = SystemConfig::from_lookup(lookup_from(&[(GRAVITY_VAR, "1,2")])).unwrap_err();
        assert!(matches!(err, PhysicsError::InvalidConfig(_)));
    }

    #[test]
    fn test_malformed_values_are_errors() {
        let err = SystemConfig::from_lookup(lookup_from(&[(DRAG_VAR, "lots")])).unwrap_err();
        assert!(matches!(err, PhysicsError::InvalidConfig(_)));

        let err = SystemConfig::from_lookup(lookup_from(&[(DELTA_T_VAR, "0")])).unwrap_err();
        assert_eq!(err, PhysicsError::InvalidTimestep(0.0));

        let err = SystemConfig::from_lookup(lookup_from(&[(INTEGRATOR_VAR, "leapfrog")])).unwrap_err();
        assert!(matches!(err, PhysicsError::UnknownIntegrator(_)));
    }

    #[test]
    fn test_validate_drag_needs_only_finiteness() {
        let negative = SystemConfig {
            drag: -1.0,
            ..SystemConfig::default()
        };
        assert!(negative.validate().is_ok());

        let parsed = SystemConfig::from_lookup(lookup_from(&[(DRAG_VAR, "-0.25")]))
            .map(|config| config.drag);
        assert_eq!(parsed, Ok(-0.25));

        let infinite = SystemConfig {
            drag: f64::INFINITY,
            ..SystemConfig::default()
        };
        assert!(matches!(infinite.validate(), Err(PhysicsError::InvalidConfig(_))));
    }
}
