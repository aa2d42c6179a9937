/*
 * Application Module
 *
 * This module defines the viewer's model and update loop. The viewer owns an
 * agent store with a single flock, feeds the simulation fixed time steps and
 * pushes parameter edits from the UI into the store between ticks.
 */

use nannou::prelude::*;
use nannou_egui::Egui;
use tracing::{info, warn};

use boids3d::{
    AgentStore, BehaviorParameters, DebugInfo, FixedTimestep, FlockStore, GroupId, ParamSnapshot,
    Simulation, Spawner,
};

use crate::camera::Camera;
use crate::input;
use crate::renderer;
use crate::ui::{self, UiActions};

// Viewer-only settings that never reach the simulation
pub struct ViewerSettings {
    pub agent_count: usize,
    pub steps_per_second: f32,
    pub paused: bool,
    pub color_by_partition: bool,
    pub show_debug: bool,
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self {
            agent_count: 1500,
            steps_per_second: 60.0,
            paused: false,
            color_by_partition: false,
            show_debug: false,
        }
    }
}

// Main model for the application
pub struct Model {
    pub store: FlockStore,
    pub group: GroupId,
    pub params: BehaviorParameters,
    pub param_snapshot: ParamSnapshot,
    pub simulation: Simulation,
    pub spawner: Spawner,
    pub clock: FixedTimestep,
    pub settings: ViewerSettings,
    pub egui: Egui,
    pub camera: Camera,
    pub mouse_position: Vec2,
    pub debug_info: DebugInfo,
    pub status: Option<String>,
}

// Initialize the model
pub fn model(app: &App) -> Model {
    let window_id = app
        .new_window()
        .title("3D Boid Flocking")
        .size(1280, 800)
        .view(renderer::view)
        .mouse_moved(input::mouse_moved)
        .mouse_pressed(input::mouse_pressed)
        .mouse_released(input::mouse_released)
        .mouse_wheel(input::mouse_wheel)
        .raw_event(input::raw_window_event)
        .build()
        .expect("failed to open viewer window");

    let window = app.window(window_id).expect("viewer window vanished");
    let egui = Egui::from_window(&window);

    let settings = ViewerSettings::default();
    let params = BehaviorParameters::default();

    let mut store = FlockStore::new();
    let group = store
        .add_group(params.clone())
        .expect("default behaviour parameters are valid");

    let mut spawner = Spawner::default();
    if let Err(err) = spawner.spawn_group(&mut store, group, settings.agent_count) {
        warn!(%err, "initial spawn failed");
    }
    info!(agents = store.agent_count(), "viewer started");

    let mut camera = Camera::new();
    camera.fit(params.bounds_center, params.bounds_size, app.window_rect());

    Model {
        store,
        group,
        params,
        param_snapshot: ParamSnapshot::default(),
        simulation: Simulation::new(),
        spawner,
        clock: FixedTimestep::new(settings.steps_per_second, 4),
        settings,
        egui,
        camera,
        mouse_position: Vec2::ZERO,
        debug_info: DebugInfo::default(),
        status: None,
    }
}

// Update the model
pub fn update(app: &App, model: &mut Model, update: Update) {
    model.debug_info.fps = app.fps();
    model.debug_info.frame_time = update.since_last;
    model.egui.set_elapsed_time(update.since_start);

    model.param_snapshot.take(&model.params);
    let actions = ui::update_ui(
        &mut model.egui,
        &mut model.params,
        &mut model.settings,
        &model.debug_info,
        model.status.as_deref(),
    );
    apply_actions(model, actions, app.window_rect());

    if model.param_snapshot.changed(&model.params) {
        push_parameters(model);
    }

    model.clock.set_rate(model.settings.steps_per_second);
    if model.settings.paused {
        model.debug_info.ticks_per_frame = 0;
        return;
    }

    let steps = model.clock.advance(update.since_last);
    let delta_time = model.clock.step().as_secs_f32();
    for _ in 0..steps {
        match model.simulation.tick(&mut model.store, delta_time) {
            Ok(stats) => model.debug_info.last_tick = stats,
            Err(err) => {
                warn!(%err, "tick rejected");
                model.status = Some(err.to_string());
                break;
            }
        }
    }
    model.debug_info.ticks_per_frame = steps;
}

fn apply_actions(model: &mut Model, actions: UiActions, window_rect: Rect) {
    if actions.reset_camera {
        let params = active_parameters(model);
        let (center, size) = (params.bounds_center, params.bounds_size);
        model.camera.fit(center, size, window_rect);
    }
    if actions.respawn {
        let count = model.settings.agent_count;
        match model.spawner.respawn_group(&mut model.store, model.group, count) {
            Ok(_) => info!(count, "flock respawned"),
            Err(err) => {
                warn!(%err, "respawn failed");
                model.status = Some(err.to_string());
            }
        }
    }
}

// Invalid edits stay in the panel but are not handed to the simulation
fn push_parameters(model: &mut Model) {
    match model.store.set_parameters(model.group, model.params.clone()) {
        Ok(()) => model.status = None,
        Err(err) => {
            warn!(%err, "parameters rejected");
            model.status = Some(err.to_string());
        }
    }
}

pub fn active_parameters(model: &Model) -> &BehaviorParameters {
    model.store.parameters(model.group).unwrap_or(&model.params)
}
