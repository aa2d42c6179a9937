/*
 * Renderer Module
 *
 * This module draws the flock from above. Agents are drawn as small triangles
 * pointing along their heading projected onto the X/Z plane. With partition
 * colouring enabled, agents are tinted by the checkerboard parity of their
 * cell, which makes the single-cell neighbourhood visible: agents of different
 * colours never influence each other.
 */

use nannou::prelude::*;

use boids3d::{cell_index, cell_parity, flocking::BOUNDS_RECENTER_THRESHOLD, AgentStore};

use crate::app::{active_parameters, Model};
use crate::ui;

const AGENT_SIZE: f32 = 6.0;

// Render the model
pub fn view(app: &App, model: &Model, frame: Frame) {
    let draw = app.draw();
    draw.background().color(BLACK);

    let window_rect = app.window_rect();
    let params = active_parameters(model);

    // Bounds box and the radius where the recenter force starts
    let camera = &model.camera;
    let center = camera.world_to_screen(params.bounds_center, window_rect);
    draw.rect()
        .xy(center)
        .w_h(
            camera.scale(params.bounds_size.x * 2.0),
            camera.scale(params.bounds_size.z * 2.0),
        )
        .no_fill()
        .stroke_weight(1.0)
        .stroke(rgba(0.3, 0.3, 0.3, 1.0));
    draw.ellipse()
        .xy(center)
        .radius(camera.scale(params.inside_bounds_distance * BOUNDS_RECENTER_THRESHOLD))
        .no_fill()
        .stroke_weight(1.0)
        .stroke(rgba(0.2, 0.4, 0.2, 1.0));

    let points = [
        pt2(AGENT_SIZE, 0.0),
        pt2(-AGENT_SIZE, AGENT_SIZE / 2.0),
        pt2(-AGENT_SIZE, -AGENT_SIZE / 2.0),
    ];

    for agent in model.store.agents(model.group) {
        let screen_pos = camera.world_to_screen(agent.position, window_rect);
        if !window_rect.contains(screen_pos) {
            continue;
        }

        let forward = agent.forward();
        let angle = forward.z.atan2(forward.x);

        let color = if model.settings.color_by_partition {
            if cell_parity(cell_index(agent.position, params.partition_cell_size)) {
                rgb(0.0, 0.0, 1.0)
            } else {
                rgb(1.0, 1.0, 0.0)
            }
        } else {
            rgb(0.86, 0.86, 0.86)
        };

        draw.polygon()
            .color(color)
            .points(points.iter().cloned())
            .xy(screen_pos)
            .rotate(angle);
    }

    if model.settings.show_debug {
        ui::draw_debug_info(&draw, &model.debug_info, window_rect, camera.zoom);
    }

    draw.to_frame(app, &frame).unwrap();
    model.egui.draw_to_frame(&frame).unwrap();
}
