//! Headless race: one track, one simulation, any number of AI drivers,
//! stepped through a fixed-timestep accumulator.

use std::sync::Arc;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::ai::AiDriver;
use crate::config::EngineConfig;
use crate::engine::simulation::{Simulation, TickReport};
use crate::engine::timestep::FixedTimestep;
use crate::models::{ControlInput, VehicleConfig, VehicleState};
use crate::track::{ComputedTrack, GridSlot};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleSummary {
    pub id: String,
    pub state: VehicleState,
    /// Lap fraction from the start line, 0..1
    pub progress: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub track_id: String,
    pub ticks: u64,
    pub elapsed: f32,
    pub collisions: u64,
    pub containments: u64,
    pub vehicles: Vec<VehicleSummary>,
}

pub struct RaceSession {
    track: Arc<ComputedTrack>,
    config: EngineConfig,
    simulation: Simulation,
    drivers: Vec<(String, AiDriver)>,
    timestep: FixedTimestep,
    base_seed: u64,
    /// Grid slot taken by each id, in arrival order
    slots: Vec<(String, GridSlot)>,
    collisions: u64,
    containments: u64,
}

impl RaceSession {
    pub fn new(track: Arc<ComputedTrack>, config: EngineConfig) -> Self {
        Self::with_seed(track, config, 0)
    }

    /// AI driver `k` on the grid gets seed `seed + k`.
    pub fn with_seed(track: Arc<ComputedTrack>, config: EngineConfig, seed: u64) -> Self {
        let mut simulation = Simulation::new(config.physics.clone(), &config.timestep);
        simulation.set_track_boundaries(track.boundary_samples());
        Self {
            timestep: FixedTimestep::new(config.timestep.clone()),
            track,
            config,
            simulation,
            drivers: Vec::new(),
            base_seed: seed,
            slots: Vec::new(),
            collisions: 0,
            containments: 0,
        }
    }

    /// Grid index for `id`. A returning id keeps its slot.
    fn slot_index(&self, id: &str) -> usize {
        self.slots.iter().position(|(other, _)| other == id).unwrap_or(self.slots.len())
    }

    fn claim_slot(&mut self, id: &str) -> GridSlot {
        let index = self.slot_index(id);
        if let Some((_, slot)) = self.slots.get(index) {
            return *slot;
        }
        let slot = self.track.grid_slot(index).unwrap_or(GridSlot { position: (0.0, 0.0), rotation: 0.0 });
        self.slots.push((id.to_string(), slot));
        slot
    }

    /// Human car on the next free grid slot.
    pub fn add_player(&mut self, id: &str, vehicle: VehicleConfig) -> GridSlot {
        let slot = self.claim_slot(id);
        self.drivers.retain(|(other, _)| other != id);
        self.simulation.register(id, slot.position.0, slot.position.1, slot.rotation, vehicle, true);
        slot
    }

    /// AI car on the next free grid slot (or its old one), seeded from the
    /// slot index.
    pub fn add_ai(&mut self, id: &str, skill: f32, aggressiveness: f32) -> GridSlot {
        let seed = self.base_seed.wrapping_add(self.slot_index(id) as u64);
        let driver = AiDriver::new(
            skill,
            aggressiveness,
            VehicleConfig::ai(),
            self.config.ai.clone(),
            ChaCha8Rng::seed_from_u64(seed),
        );
        self.add_ai_driver(id, driver, VehicleConfig::ai())
    }

    pub fn add_ai_driver(&mut self, id: &str, mut driver: AiDriver, vehicle: VehicleConfig) -> GridSlot {
        let slot = self.claim_slot(id);
        driver.set_vehicle_config(vehicle);
        driver.set_track(Arc::clone(&self.track));
        self.drivers.retain(|(other, _)| other != id);
        self.drivers.push((id.to_string(), driver));
        self.simulation.register(id, slot.position.0, slot.position.1, slot.rotation, vehicle, false);
        slot
    }

    /// One fixed step: every AI reads the last published snapshot, then the
    /// simulation ticks.
    pub fn step(&mut self, human_input: ControlInput) -> TickReport {
        let published = self.simulation.published();
        let mut inputs = Vec::with_capacity(self.drivers.len());
        for (id, driver) in &mut self.drivers {
            let Some(own) = published.get(id.as_str()) else {
                continue;
            };
            let traffic: Vec<VehicleState> =
                published.iter().filter(|(other, _)| other.as_str() != id.as_str()).map(|(_, s)| *s).collect();
            inputs.push((id.clone(), driver.generate_input(own, &traffic)));
        }
        for (id, input) in inputs {
            self.simulation.set_ai_input(&id, input);
        }

        self.simulation.set_player_input(human_input);
        let report = self.simulation.tick(self.timestep.fixed_dt());
        self.collisions += report.collisions.len() as u64;
        self.containments += report.containments.len() as u64;
        report
    }

    /// Feeds a variable frame delta through the accumulator. Returns the
    /// number of fixed steps run.
    pub fn advance(&mut self, frame_dt: f32, human_input: ControlInput) -> u32 {
        let steps = self.timestep.advance(frame_dt);
        for _ in 0..steps {
            self.step(human_input);
        }
        steps
    }

    /// Runs `seconds` of race time with no human input. Returns steps run.
    pub fn run_for(&mut self, seconds: f32) -> u64 {
        let dt = self.timestep.fixed_dt();
        if !seconds.is_finite() || seconds <= 0.0 || dt <= 0.0 {
            return 0;
        }
        let steps = (seconds / dt).round() as u64;
        for _ in 0..steps {
            self.step(ControlInput::NONE);
        }
        log::debug!("Session on '{}' ran {} steps", self.track.id, steps);
        steps
    }

    pub fn progress_of(&self, id: &str) -> Option<f32> {
        self.simulation.get_state(id).map(|s| self.track.progress_at(s.position))
    }

    pub fn summary(&self) -> SessionSummary {
        let ticks = self.simulation.tick_count();
        let vehicles = self
            .simulation
            .vehicle_ids()
            .filter_map(|id| {
                let state = self.simulation.get_state(id)?;
                Some(VehicleSummary { id: id.to_string(), state, progress: self.track.progress_at(state.position) })
            })
            .collect();
        SessionSummary {
            track_id: self.track.id.clone(),
            ticks,
            elapsed: ticks as f32 * self.timestep.fixed_dt(),
            collisions: self.collisions,
            containments: self.containments,
            vehicles,
        }
    }

    pub fn driver(&self, id: &str) -> Option<&AiDriver> {
        self.drivers.iter().find(|(other, _)| other == id).map(|(_, d)| d)
    }

    pub fn simulation(&self) -> &Simulation {
        &self.simulation
    }

    pub fn simulation_mut(&mut self) -> &mut Simulation {
        &mut self.simulation
    }

    pub fn track(&self) -> &Arc<ComputedTrack> {
        &self.track
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}
