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
//! Repulsion cloud example
//!
//! Particles repel each other pairwise while a custom centering force holds
//! the cloud together. The settled cloud is drawn as text through a
//! [`ZoomPan`] view, before and after a simulated wheel zoom.

use particle_physics::view::{Modifiers, Point2, PointerEvent};
use particle_physics::{IntegratorKind, ParticleSystem, Targets, Vector3D, ZoomPan};
use tracing_subscriber::EnvFilter;

const COUNT: usize = 24;
const COLUMNS: usize = 60;
const ROWS: usize = 24;

fn render(system: &ParticleSystem, view: &ZoomPan) {
    let mut grid = vec![vec!['.'; COLUMNS]; ROWS];
    for (_, particle) in system.particles() {
        let p = particle.position();
        // Simulation units are small; stretch them onto the character grid
        let display = view.coord_to_display(Point2::new(p.x() * 8.0 + 30.0, p.y() * 4.0 + 12.0));
        let (col, row) = (display.x.round(), display.y.round());
        if (0.0..COLUMNS as f64).contains(&col) && (0.0..ROWS as f64).contains(&row) {
            grid[row as usize][col as usize] = if particle.is_fixed() { '#' } else { 'o' };
        }
    }
    for row in grid {
        println!("  {}", row.into_iter().collect::<String>());
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("Particle Physics - Repulsion Cloud Example");
    println!("==========================================\n");

    let mut system = ParticleSystem::new();
    system.set_integrator(IntegratorKind::RungeKutta);
    system.set_drag(0.5)?;
    system.set_delta_t(0.05)?;

    // Start on a tight spiral so the initial repulsion is strong
    let handles: Vec<_> = (0..COUNT)
        .map(|i| {
            let angle = i as f64 * 0.7;
            let radius = 0.1 + i as f64 * 0.02;
            system.make_particle(1.0, Vector3D::new(radius * angle.cos(), radius * angle.sin(), 0.0))
        })
        .collect();
    for (i, &a) in handles.iter().enumerate() {
        for &b in &handles[i + 1..] {
            system.make_attraction(a, b, -0.05, 0.2)?;
        }
    }
    system.make_targeted_force("centering", Targets::All, |_, particle| {
        -particle.position() * 0.5
    });

    println!(
        "Created {} particles, {} repulsions and {} custom force(s)\n",
        system.particle_count(),
        system.attraction_count(),
        system.custom_force_count()
    );

    for _ in 0..400 {
        system.tick()?;
    }
    println!("Kinetic energy after settling: {:.6}\n", system.kinetic_energy());

    let mut view = ZoomPan::new(COLUMNS as f64, ROWS as f64);
    println!("Scale {:.3}:", view.zoom_scale());
    render(&system, &view);

    // Three wheel notches towards the screen, centred on the cloud
    for _ in 0..3 {
        view.handle_event(PointerEvent::Wheel {
            position: Point2::new(30.0, 12.0),
            rotation: -1,
            modifiers: Modifiers::NONE,
        });
    }
    println!("\nScale {:.3}:", view.zoom_scale());
    render(&system, &view);

    Ok(())
}
