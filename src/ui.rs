/*
 * UI Module
 *
 * This module builds the egui control panel. Every behaviour parameter of the
 * flock has a control here; edits are detected by the app through a parameter
 * snapshot and pushed to the store between ticks.
 */

use nannou_egui::{egui, Egui};

use boids3d::{BehaviorParameters, DebugInfo, RotationBlend};

use crate::app::ViewerSettings;

// Buttons pressed this frame
#[derive(Default)]
pub struct UiActions {
    pub respawn: bool,
    pub reset_camera: bool,
}

pub fn update_ui(
    egui: &mut Egui,
    params: &mut BehaviorParameters,
    settings: &mut ViewerSettings,
    debug_info: &DebugInfo,
    status: Option<&str>,
) -> UiActions {
    let mut actions = UiActions::default();
    let ctx = egui.begin_frame();

    egui::Window::new("Flock Controls")
        .default_pos([10.0, 10.0])
        .show(&ctx, |ui| {
            ui.collapsing("Flock", |ui| {
                ui.add(egui::Slider::new(&mut settings.agent_count, 1..=20_000).text("Agents"));
                if ui.button("Respawn").clicked() {
                    actions.respawn = true;
                }
                ui.checkbox(&mut settings.paused, "Pause Simulation");
                ui.add(egui::Slider::new(&mut settings.steps_per_second, 10.0..=240.0).text("Ticks / s"));
            });

            ui.collapsing("Movement", |ui| {
                ui.add(egui::Slider::new(&mut params.min_speed, BehaviorParameters::speed_range()).text("Min Speed"));
                ui.add(egui::Slider::new(&mut params.max_speed, BehaviorParameters::speed_range()).text("Max Speed"));
                ui.add(egui::Slider::new(&mut params.rotation_speed, BehaviorParameters::speed_range()).text("Rotation Speed"));
                ui.horizontal(|ui| {
                    ui.radio_value(&mut params.rotation_blend, RotationBlend::RotationSpeed, "dt x rotation speed");
                    ui.radio_value(&mut params.rotation_blend, RotationBlend::DeltaTimeOnly, "dt only");
                });
            });

            ui.collapsing("Behaviours", |ui| {
                behaviour_row(ui, "Cohesion", &mut params.cohesion_distance, &mut params.cohesion_weight);
                behaviour_row(ui, "Avoidance", &mut params.avoidance_distance, &mut params.avoidance_weight);
                behaviour_row(ui, "Alignment", &mut params.alignment_distance, &mut params.alignment_weight);
            });

            ui.collapsing("Bounds", |ui| {
                vec3_row(ui, "Center", &mut params.bounds_center);
                vec3_row(ui, "Size", &mut params.bounds_size);
                ui.add(
                    egui::Slider::new(&mut params.inside_bounds_distance, BehaviorParameters::bounds_distance_range())
                        .text("Inside Distance"),
                );
                ui.add(
                    egui::Slider::new(&mut params.inside_bounds_weight, BehaviorParameters::weight_range())
                        .text("Inside Weight"),
                );
                ui.add(
                    egui::Slider::new(&mut params.partition_cell_size, BehaviorParameters::cell_size_range())
                        .text("Partition Cell Size"),
                );
            });

            ui.collapsing("View", |ui| {
                ui.checkbox(&mut settings.color_by_partition, "Colour by Partition");
                ui.checkbox(&mut settings.show_debug, "Show Debug Info");
                if ui.button("Reset Camera").clicked() {
                    actions.reset_camera = true;
                }
            });

            ui.separator();
            ui.label(format!("FPS: {:.1}", debug_info.fps));
            ui.label(format!("Tick: {:.2} ms", debug_info.last_tick.elapsed.as_secs_f64() * 1000.0));
            if let Some(message) = status {
                ui.colored_label(egui::Color32::RED, message);
            }
        });

    actions
}

fn behaviour_row(ui: &mut egui::Ui, name: &str, distance: &mut f32, weight: &mut f32) {
    ui.label(name);
    ui.add(egui::Slider::new(distance, BehaviorParameters::distance_range()).text("Distance"));
    ui.add(egui::Slider::new(weight, BehaviorParameters::weight_range()).text("Weight"));
}

fn vec3_row(ui: &mut egui::Ui, name: &str, value: &mut glam::Vec3) {
    ui.horizontal(|ui| {
        ui.label(name);
        ui.add(egui::DragValue::new(&mut value.x).speed(0.5));
        ui.add(egui::DragValue::new(&mut value.y).speed(0.5));
        ui.add(egui::DragValue::new(&mut value.z).speed(0.5));
    });
}

// Draw debug information on the screen
pub fn draw_debug_info(draw: &nannou::Draw, debug_info: &DebugInfo, window_rect: nannou::geom::Rect, zoom: f32) {
    let margin = 20.0;
    let line_height = 20.0;
    let text_x = window_rect.right() - 120.0;
    let text_y = window_rect.top() - margin;

    let stats = &debug_info.last_tick;
    let debug_texts = [
        format!("FPS: {:.1}", debug_info.fps),
        format!("Frame time: {:.2} ms", debug_info.frame_time.as_secs_f64() * 1000.0),
        format!("Ticks / frame: {}", debug_info.ticks_per_frame),
        format!("Agents: {}", stats.agents),
        format!("Cells: {}", stats.occupied_cells),
        format!("Largest cell: {}", stats.largest_bucket),
        format!("Mean cell: {:.1}", stats.mean_bucket()),
        format!("Zoom: {:.2}x", zoom),
    ];

    for (i, text) in debug_texts.iter().enumerate() {
        draw.text(text)
            .x_y(text_x, text_y - i as f32 * line_height)
            .color(nannou::color::WHITE)
            .font_size(14);
    }
}
