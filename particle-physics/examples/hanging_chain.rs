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
//! Hanging chain example
//!
//! A chain of particles joined by damped springs hangs from a fixed anchor
//! under gravity and settles. Configuration comes from the environment:
//!
//! ```bash
//! PARTICLE_PHYSICS_INTEGRATOR=euler PARTICLE_PHYSICS_DELTA_T=0.005 \
//!     RUST_LOG=particle_physics=debug cargo run --example hanging_chain
//! ```

use particle_physics::{ParticleSystem, SystemConfig, Vector3D};
use tracing_subscriber::EnvFilter;

const LINKS: usize = 8;
const LINK_LENGTH: f64 = 1.0;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("Particle Physics - Hanging Chain Example");
    println!("========================================\n");

    let mut config = SystemConfig::from_env()?;
    if config.gravity.is_zero() {
        config.gravity = Vector3D::new(0.0, -9.81, 0.0);
    }
    if config.delta_t >= 0.1 {
        config.delta_t = 0.01;
    }
    let mut system = ParticleSystem::with_config(config)?;

    println!("Configuration:");
    println!("  Integrator: {}", system.integrator_name());
    println!("  Gravity:    {}", system.gravity());
    println!("  Drag:       {}", system.drag());
    println!("  Time step:  {}\n", system.delta_t());

    // Anchor plus a horizontal chain that swings down
    let anchor = system.make_particle(1.0, Vector3D::zero());
    if let Some(p) = system.particle_mut(anchor) {
        p.make_fixed();
    }
    let mut links = vec![anchor];
    for i in 1..=LINKS {
        let particle = system.make_particle(0.5, Vector3D::new(i as f64 * LINK_LENGTH, 0.0, 0.0));
        let previous = links[i - 1];
        system.make_spring(previous, particle, 400.0, 4.0, LINK_LENGTH)?;
        links.push(particle);
    }
    println!(
        "Created {} particles and {} springs\n",
        system.particle_count(),
        system.spring_count()
    );

    let seconds = 10.0;
    let ticks = (seconds / system.delta_t()).round() as usize;
    let report_every = (ticks / 5).max(1);

    println!("{:>8} {:>14} {:>14}", "time", "tail y", "kinetic");
    for tick in 1..=ticks {
        system.tick()?;
        if tick % report_every == 0 {
            let tail = system.position(links[LINKS]).unwrap_or_default();
            println!(
                "{:>8.2} {:>14.4} {:>14.6}",
                tick as f64 * system.delta_t(),
                tail.y(),
                system.kinetic_energy()
            );
        }
    }

    println!("\nFinal link lengths:");
    for (i, (handle, _)) in system.springs().enumerate() {
        if let Some(length) = system.spring_length(handle) {
            println!("  link {}: {:.4}", i + 1, length);
        }
    }

    Ok(())
}
