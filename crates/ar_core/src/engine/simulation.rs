//! Per-tick orchestration of every registered car.
//!
//! Tick order: inputs → integrate → car/car contacts → track containment →
//! publish. Nothing in the tick path fails; unknown ids are reported as
//! absent.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::{PhysicsConfig, TimestepConfig};
use crate::engine::collision;
use crate::engine::containment::{self, BoundarySample};
use crate::engine::vehicle_physics;
use crate::models::{ControlInput, VehicleConfig, VehicleState, VehicleStatePatch};

/// Where a car's input comes from, resolved once per tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControlSource {
    /// Reads the shared human input snapshot
    Human,
    /// Reads the input last pushed with `set_ai_input`
    Scripted,
}

#[derive(Debug, Clone)]
struct VehicleEntry {
    id: String,
    source: ControlSource,
    config: VehicleConfig,
    state: VehicleState,
    input: ControlInput,
}

/// What happened during one tick.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TickReport {
    /// Colliding pairs, in registration order
    pub collisions: Vec<(String, String)>,
    /// Cars pushed back onto the track
    pub containments: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct Simulation {
    physics: PhysicsConfig,
    max_step_dt: f32,
    /// Registration order; pair checks and iteration follow it
    vehicles: Vec<VehicleEntry>,
    boundaries: Vec<BoundarySample>,
    player_input: ControlInput,
    published: BTreeMap<String, VehicleState>,
    tick_count: u64,
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new(PhysicsConfig::default(), &TimestepConfig::default())
    }
}

impl Simulation {
    pub fn new(physics: PhysicsConfig, timestep: &TimestepConfig) -> Self {
        Self {
            physics,
            max_step_dt: timestep.max_step_dt,
            vehicles: Vec::new(),
            boundaries: Vec::new(),
            player_input: ControlInput::NONE,
            published: BTreeMap::new(),
            tick_count: 0,
        }
    }

    fn entry(&self, id: &str) -> Option<&VehicleEntry> {
        self.vehicles.iter().find(|v| v.id == id)
    }

    fn entry_mut(&mut self, id: &str) -> Option<&mut VehicleEntry> {
        self.vehicles.iter_mut().find(|v| v.id == id)
    }

    /// Adds a car at rest. Registering an existing id replaces that car.
    pub fn register(&mut self, id: &str, x: f32, y: f32, rotation: f32, config: VehicleConfig, is_player: bool) {
        let source = if is_player { ControlSource::Human } else { ControlSource::Scripted };
        let state = VehicleState::new(x, y, rotation);
        let entry = VehicleEntry { id: id.to_string(), source, config, state, input: ControlInput::NONE };

        match self.entry_mut(id) {
            Some(existing) => {
                log::debug!("Re-registering vehicle '{}'", id);
                *existing = entry;
            }
            None => {
                log::debug!("Registered vehicle '{}' ({:?}) at ({:.1}, {:.1})", id, source, x, y);
                self.vehicles.push(entry);
            }
        }
        self.published.insert(id.to_string(), state);
    }

    pub fn unregister(&mut self, id: &str) -> bool {
        let before = self.vehicles.len();
        self.vehicles.retain(|v| v.id != id);
        self.published.remove(id);
        let removed = self.vehicles.len() != before;
        if !removed {
            log::debug!("unregister: unknown vehicle '{}'", id);
        }
        removed
    }

    /// Live state, including changes made since the last tick.
    pub fn get_state(&self, id: &str) -> Option<VehicleState> {
        self.entry(id).map(|v| v.state)
    }

    pub fn get_config(&self, id: &str) -> Option<VehicleConfig> {
        self.entry(id).map(|v| v.config)
    }

    pub fn control_source(&self, id: &str) -> Option<ControlSource> {
        self.entry(id).map(|v| v.source)
    }

    /// Partial update (teleport, reset). Returns false for an unknown id.
    pub fn set_state(&mut self, id: &str, patch: VehicleStatePatch) -> bool {
        match self.entry_mut(id) {
            Some(entry) => {
                patch.apply(&mut entry.state, &entry.config);
                let state = entry.state;
                self.published.insert(id.to_string(), state);
                true
            }
            None => {
                log::debug!("set_state: unknown vehicle '{}'", id);
                false
            }
        }
    }

    /// Centerline samples used for containment. Empty disables containment.
    pub fn set_track_boundaries(&mut self, samples: Vec<BoundarySample>) {
        log::debug!("Track boundaries set: {} samples", samples.len());
        self.boundaries = samples;
    }

    pub fn set_ai_input(&mut self, id: &str, input: ControlInput) -> bool {
        match self.entry_mut(id) {
            Some(entry) => {
                entry.input = input;
                true
            }
            None => {
                log::debug!("set_ai_input: unknown vehicle '{}'", id);
                false
            }
        }
    }

    pub fn set_player_input(&mut self, input: ControlInput) {
        self.player_input = input;
    }

    /// Advances every car by `dt`. Non-finite, negative or oversized steps
    /// are clamped to `[0, max_step_dt]`.
    pub fn tick(&mut self, dt: f32) -> TickReport {
        let dt = self.sanitize_dt(dt);
        let mut report = TickReport::default();

        for entry in &mut self.vehicles {
            let input = match entry.source {
                ControlSource::Human => self.player_input,
                ControlSource::Scripted => entry.input,
            };
            entry.state = vehicle_physics::step(&entry.state, &input, &entry.config, dt);
        }

        let mut states: Vec<VehicleState> = self.vehicles.iter().map(|v| v.state).collect();
        let configs: Vec<VehicleConfig> = self.vehicles.iter().map(|v| v.config).collect();
        for (i, j) in collision::resolve_all(&mut states, &configs, &self.physics) {
            log::trace!("Contact: '{}' <-> '{}'", self.vehicles[i].id, self.vehicles[j].id);
            report.collisions.push((self.vehicles[i].id.clone(), self.vehicles[j].id.clone()));
        }
        for (entry, state) in self.vehicles.iter_mut().zip(states) {
            entry.state = state;
        }

        if !self.boundaries.is_empty() {
            for entry in &mut self.vehicles {
                let result = containment::constrain_to_track_by_distance(&entry.state, &self.boundaries, &self.physics);
                if result.corrected {
                    log::trace!("Wall hit: '{}'", entry.id);
                    entry.state = result.state;
                    report.containments.push(entry.id.clone());
                }
            }
        }

        self.published = self.vehicles.iter().map(|v| (v.id.clone(), v.state)).collect();
        self.tick_count += 1;
        report
    }

    fn sanitize_dt(&self, dt: f32) -> f32 {
        if dt.is_finite() && (0.0..=self.max_step_dt).contains(&dt) {
            return dt;
        }
        let clamped = if dt.is_finite() { dt.clamp(0.0, self.max_step_dt) } else { 0.0 };
        log::warn!("tick dt {} out of range, clamped to {}", dt, clamped);
        clamped
    }

    /// Snapshot refreshed once per tick (and on register / set_state).
    pub fn published(&self) -> &BTreeMap<String, VehicleState> {
        &self.published
    }

    /// Ids in registration order.
    pub fn vehicle_ids(&self) -> impl Iterator<Item = &str> {
        self.vehicles.iter().map(|v| v.id.as_str())
    }

    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn physics(&self) -> &PhysicsConfig {
        &self.physics
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn throttle() -> ControlInput {
        ControlInput { accelerate: true, ..ControlInput::NONE }
    }

    #[test]
    fn test_register_and_lookup() {
        let mut sim = Simulation::default();
        sim.register("p1", 10.0, 20.0, 0.5, VehicleConfig::player(), true);
        sim.register("ai1", 50.0, 20.0, 0.0, VehicleConfig::ai(), false);

        assert_eq!(sim.len(), 2);
        assert_eq!(sim.get_state("p1").unwrap().position, (10.0, 20.0));
        assert_eq!(sim.control_source("p1"), Some(ControlSource::Human));
        assert_eq!(sim.control_source("ai1"), Some(ControlSource::Scripted));
        assert!(sim.get_state("ghost").is_none());
        assert!(sim.published().contains_key("ai1"));
    }

    #[test]
    fn test_unknown_ids_are_soft_failures() {
        let mut sim = Simulation::default();
        assert!(!sim.set_ai_input("ghost", throttle()));
        assert!(!sim.set_state("ghost", VehicleStatePatch::teleport(0.0, 0.0, 0.0)));
        assert!(!sim.unregister("ghost"));
        sim.tick(DT);
    }

    #[test]
    fn test_inputs_follow_control_source() {
        let mut sim = Simulation::default();
        sim.register("human", 0.0, 0.0, 0.0, VehicleConfig::player(), true);
        sim.register("bot", 0.0, 500.0, 0.0, VehicleConfig::ai(), false);

        sim.set_player_input(throttle());
        sim.tick(DT);
        assert!(sim.get_state("human").unwrap().speed > 0.0);
        assert_eq!(sim.get_state("bot").unwrap().speed, 0.0);

        // Scripted input never reaches the human car.
        sim.set_player_input(ControlInput::NONE);
        sim.set_ai_input("bot", throttle());
        sim.set_ai_input("human", throttle());
        sim.tick(DT);
        assert!(sim.get_state("bot").unwrap().speed > 0.0);
        assert!(sim.get_state("human").unwrap().speed < 150.0 * DT);
    }

    #[test]
    fn test_tick_reports_contacts() {
        let mut sim = Simulation::default();
        sim.register("a", 0.0, 0.0, 0.0, VehicleConfig::player(), false);
        sim.register("b", 0.0, 0.0, 0.0, VehicleConfig::player(), false);
        let report = sim.tick(DT);
        assert_eq!(report.collisions, vec![("a".to_string(), "b".to_string())]);

        let a = sim.published()["a"];
        let b = sim.published()["b"];
        assert!(b.position.0 - a.position.0 > 20.0);
    }

    #[test]
    fn test_containment_runs_after_integration() {
        let mut sim = Simulation::default();
        let samples: Vec<BoundarySample> = (0..=50)
            .map(|i| BoundarySample { position: (i as f32 * 10.0, 100.0), half_width: 20.0 })
            .collect();
        sim.set_track_boundaries(samples);
        sim.register("car", 250.0, 300.0, 0.0, VehicleConfig::player(), false);

        let report = sim.tick(DT);
        assert_eq!(report.containments, vec!["car".to_string()]);
        assert!((sim.get_state("car").unwrap().position.1 - 118.0).abs() < 1e-3);
    }

    #[test]
    fn test_oversized_dt_is_clamped() {
        let mut sim = Simulation::default();
        sim.register("car", 0.0, 0.0, 0.0, VehicleConfig::player(), false);
        sim.set_ai_input("car", throttle());
        sim.tick(10.0);
        let max_step = TimestepConfig::default().max_step_dt;
        assert!((sim.get_state("car").unwrap().speed - 150.0 * max_step).abs() < 1e-3);

        sim.tick(f32::NAN);
        assert_eq!(sim.tick_count(), 2);
    }

    #[test]
    fn test_set_state_and_unregister() {
        let mut sim = Simulation::default();
        sim.register("car", 0.0, 0.0, 0.0, VehicleConfig::player(), false);
        assert!(sim.set_state("car", VehicleStatePatch::teleport(40.0, 50.0, 1.0)));
        assert_eq!(sim.published()["car"].position, (40.0, 50.0));

        assert!(sim.unregister("car"));
        assert!(sim.is_empty());
        assert!(sim.published().is_empty());
    }

    #[test]
    fn test_re_register_replaces() {
        let mut sim = Simulation::default();
        sim.register("car", 0.0, 0.0, 0.0, VehicleConfig::player(), false);
        sim.register("car", 9.0, 9.0, 0.0, VehicleConfig::ai(), true);
        assert_eq!(sim.len(), 1);
        assert_eq!(sim.get_config("car"), Some(VehicleConfig::ai()));
        assert_eq!(sim.control_source("car"), Some(ControlSource::Human));
    }
}
