/*
 * 3D Boid Flocking Viewer
 *
 * Interactive viewer for the flocking simulation. A single flock is spawned
 * inside its bounds and simulated at a fixed tick rate; the egui panel exposes
 * every behaviour parameter so their effect can be explored live.
 *
 * Logging is controlled with RUST_LOG (default: info), e.g.
 * RUST_LOG=boids3d=debug to see per-tick statistics.
 */

use tracing_subscriber::EnvFilter;

mod app;
mod camera;
mod input;
mod renderer;
mod ui;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    nannou::app(app::model).update(app::update).run();
}
