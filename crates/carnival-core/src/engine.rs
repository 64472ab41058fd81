//! Simulation engine - main entry point for running the simulation

use hecs::{Entity, World};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::biome::Biome;
use crate::components::*;
use crate::config::{ConfigError, WorldConfig};
use crate::generation::{generate_population, generate_strain, spawn_agent};
use crate::persistence::{Snapshot, SnapshotError};
use crate::systems::*;

/// Ticks per displayed day
pub const TICKS_PER_DAY: u64 = 100;

/// Errors surfaced by engine commands. Companion and tick-count failures
/// are also written to the event log before being returned.
#[derive(Debug, Error, PartialEq)]
pub enum EngineError {
    #[error("no living entity with id {0}")]
    UnknownAgent(AgentId),
    #[error("no companion connected")]
    NoCompanion,
    #[error("invalid tick count: {0:?}")]
    InvalidTickCount(String),
    #[error("every entity id is taken")]
    IdsExhausted,
}

/// What happened during one tick
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    pub tick: u64,
    /// Entities that expired during their own update
    pub deaths: Vec<AgentId>,
    pub event: Option<WorldEvent>,
    /// Entities removed from the population at the end of the tick
    pub culled: Vec<AgentId>,
}

/// Read-only view of one entity
#[derive(Debug, Clone, PartialEq)]
pub struct AgentSummary {
    pub id: AgentId,
    pub pos: GridPos,
    pub role: Role,
    pub energy: f64,
    pub alive: bool,
    pub bravery: f64,
    pub curiosity: f64,
    pub treasures: u32,
    pub stance: Stance,
    pub kanban: ConsentKanban,
}

/// Main simulation engine
pub struct SimulationEngine {
    /// ECS world containing all entities
    pub world: World,
    /// Shared environment grid
    pub biome: Biome,
    log: EventLog,
    rng: ChaCha8Rng,
    config: WorldConfig,
    tick_count: u64,
    global_resonance: f64,
    seed_strain: String,
    /// Non-owning; validated before every use
    companion: Option<Entity>,
    next_id: Option<u32>,
}

impl SimulationEngine {
    /// Generate a fresh world: terrain, strain, then population
    pub fn new(config: WorldConfig) -> Result<Self, ConfigError> {
        let config = config.validated()?;
        let mut rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };

        let biome = Biome::new(config.width, config.height, &mut rng);
        let seed_strain = generate_strain(&config.strain_prefix, &mut rng);
        let mut world = World::new();
        generate_population(&mut world, &config, &mut rng);

        info!(
            strain = %seed_strain,
            width = config.width,
            height = config.height,
            population = config.population,
            "world generated"
        );

        Ok(Self {
            world,
            biome,
            log: EventLog::new(config.log_capacity),
            rng,
            tick_count: 0,
            global_resonance: 0.0,
            seed_strain,
            companion: None,
            next_id: Some(config.population),
            config,
        })
    }

    /// Add one entity to the population. Traits and genes are drawn from
    /// the engine RNG. Fails once id `u32::MAX` has been handed out.
    pub fn spawn_agent(
        &mut self,
        pos: GridPos,
        role: Role,
        energy: f64,
    ) -> Result<AgentId, EngineError> {
        let id = AgentId(self.next_id.ok_or(EngineError::IdsExhausted)?);
        self.next_id = id.0.checked_add(1);
        spawn_agent(&mut self.world, id, pos, Some(role), energy, &mut self.rng);
        Ok(id)
    }

    /// Change how a living entity moves from now on
    pub fn set_stance(&mut self, id: AgentId, stance: Stance) -> Result<(), EngineError> {
        let Some(current) = self
            .world
            .query_mut::<(&AgentId, &Vitals, &mut Stance)>()
            .into_iter()
            .find(|(_, (aid, vitals, _))| **aid == id && vitals.alive)
            .map(|(_, (_, _, current))| current)
        else {
            return Err(EngineError::UnknownAgent(id));
        };
        *current = stance;
        Ok(())
    }

    /// Run one simulation step
    pub fn tick(&mut self) -> TickReport {
        self.tick_count += 1;

        self.biome.tick(&mut self.rng);

        let deaths = {
            let mut ctx = TickContext {
                rng: &mut self.rng,
                log: &mut self.log,
            };
            agent_system(&mut self.world, &self.biome, &mut ctx)
        };

        let event = if self.rng.gen::<f64>() < self.config.event_chance {
            Some(self.trigger_world_event())
        } else {
            None
        };

        let culled = cull_dead(&mut self.world);

        debug!(
            tick = self.tick_count,
            alive = self.world.len(),
            deaths = deaths.len(),
            culled = culled.len(),
            "tick"
        );

        TickReport {
            tick: self.tick_count,
            deaths,
            event,
            culled,
        }
    }

    /// Roll the spiral die and apply a world event right now
    pub fn trigger_world_event(&mut self) -> WorldEvent {
        world_event_system(
            &mut self.world,
            &mut self.log,
            &mut self.rng,
            &self.seed_strain,
            self.global_resonance,
            self.config.event_die_scale,
        )
    }

    /// Run `n` ticks back to back
    pub fn auto_run(&mut self, n: u32) -> Result<(), EngineError> {
        if n == 0 {
            self.log.push("Invalid number.");
            return Err(EngineError::InvalidTickCount(n.to_string()));
        }
        for _ in 0..n {
            self.tick();
        }
        self.log.push(format!("Auto-ran {n} ticks."));
        info!(ticks = n, total = self.tick_count, "auto-run finished");
        Ok(())
    }

    /// [`auto_run`](Self::auto_run) with a user-typed tick count
    pub fn auto_run_input(&mut self, input: &str) -> Result<(), EngineError> {
        match input.trim().parse::<u32>() {
            Ok(n) => self.auto_run(n),
            Err(_) => {
                self.log.push("Invalid number.");
                Err(EngineError::InvalidTickCount(input.trim().to_string()))
            }
        }
    }

    // --- companion ---

    /// Connect to a specific living entity
    pub fn set_companion(&mut self, id: AgentId) -> Result<(), EngineError> {
        let Some((entity, role)) = self
            .world
            .query::<(&AgentId, &Role, &Vitals)>()
            .iter()
            .find(|(_, (aid, _, vitals))| **aid == id && vitals.alive)
            .map(|(entity, (_, role, _))| (entity, *role))
        else {
            warn!(id = id.0, "companion not found");
            return Err(EngineError::UnknownAgent(id));
        };

        self.companion = Some(entity);
        self.log.push(format!("Connected to {role} {id}."));
        Ok(())
    }

    /// Connect to the living entity nearest the grid centre
    pub fn connect_nearest(&mut self) -> Option<AgentId> {
        self.connect_nearest_to(self.biome.width() / 2, self.biome.height() / 2)
    }

    /// Connect to the living entity nearest `(cx, cy)`. Ties go to the
    /// lowest id.
    pub fn connect_nearest_to(&mut self, cx: usize, cy: usize) -> Option<AgentId> {
        let mut candidates: Vec<(AgentId, usize)> = self
            .world
            .query::<(&AgentId, &GridPos, &Vitals)>()
            .iter()
            .filter(|(_, (_, _, vitals))| vitals.alive)
            .map(|(_, (id, pos, _))| (*id, pos.manhattan(cx, cy)))
            .collect();
        candidates.sort_unstable_by_key(|(id, _)| *id);

        let Some(&(nearest, _)) = candidates.iter().min_by_key(|(_, dist)| *dist) else {
            self.log.push("No entities alive.");
            return None;
        };
        self.set_companion(nearest).ok()?;
        Some(nearest)
    }

    /// Companion handle, if it still refers to a living entity
    pub fn companion(&self) -> Option<Entity> {
        let entity = self.companion?;
        let alive = self.world.get::<&Vitals>(entity).ok()?.alive;
        alive.then_some(entity)
    }

    pub fn companion_summary(&self) -> Option<AgentSummary> {
        self.companion().and_then(|entity| self.summarize(entity))
    }

    /// Tell the companion a joke
    pub fn talk(&mut self) -> Result<InteractionOutcome, EngineError> {
        self.interact_with_companion(Interaction::Joke, "TALK to")
    }

    /// Try to hug the companion; refused unless consent is high enough
    pub fn hug(&mut self) -> Result<InteractionOutcome, EngineError> {
        self.interact_with_companion(Interaction::Hug, "HUG")
    }

    fn interact_with_companion(
        &mut self,
        kind: Interaction,
        verb: &str,
    ) -> Result<InteractionOutcome, EngineError> {
        let Some(entity) = self.companion() else {
            self.log.push("No companion connected.");
            return Err(EngineError::NoCompanion);
        };
        let Ok((id, kanban)) = self
            .world
            .query_one_mut::<(&AgentId, &mut ConsentKanban)>(entity)
        else {
            self.log.push("No companion connected.");
            return Err(EngineError::NoCompanion);
        };

        let outcome = kanban.interact(kind, true);
        self.log.push(format!("You {verb} {id}. {}", outcome.message));
        Ok(outcome)
    }

    // --- persistence ---

    /// Capture the persisted subset of the current world
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(
            &self.world,
            &self.biome,
            &self.seed_strain,
            self.global_resonance,
        )
    }

    /// Replace the world with a restored snapshot. On error nothing changes.
    /// The companion is cleared.
    pub fn restore(&mut self, snapshot: Snapshot) -> Result<(), SnapshotError> {
        let restored = snapshot.restore(&mut self.rng)?;

        self.biome = restored.biome;
        self.world = restored.world;
        self.seed_strain = restored.strain;
        self.global_resonance = restored.resonance;
        self.next_id = restored.next_id;
        self.companion = None;
        Ok(())
    }

    /// Write a seed file, `<strain>.seed` by default
    pub fn export_seed(&mut self, path: Option<&Path>) -> Result<PathBuf, SnapshotError> {
        let path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(format!("{}.seed", self.seed_strain)));

        match self.snapshot().save(&path) {
            Ok(()) => {
                info!(path = %path.display(), "seed exported");
                self.log.push(format!("Seed exported: {}", path.display()));
                Ok(path)
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "seed export failed");
                self.log.push(format!("Export failed: {err}"));
                Err(err)
            }
        }
    }

    /// Load a seed file and replace the world with it. On error the
    /// running world is untouched.
    pub fn import_seed(&mut self, path: &Path) -> Result<(), SnapshotError> {
        let result = Snapshot::load(path).and_then(|snapshot| {
            let strain = snapshot.strain.clone();
            self.restore(snapshot)?;
            Ok(strain)
        });

        match result {
            Ok(strain) => {
                info!(path = %path.display(), strain = %self.seed_strain, "seed imported");
                self.log
                    .push(format!("Imported strain: {strain}. World mutated."));
                Ok(())
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "seed import failed");
                self.log.push(format!("Import failed: {err}"));
                Err(err)
            }
        }
    }

    // --- views ---

    /// Every entity in population order
    pub fn agents(&self) -> Vec<AgentSummary> {
        population_order(&self.world)
            .into_iter()
            .filter_map(|entity| self.summarize(entity))
            .collect()
    }

    fn summarize(&self, entity: Entity) -> Option<AgentSummary> {
        let mut query = self
            .world
            .query_one::<(
                &AgentId,
                &GridPos,
                &Role,
                &Vitals,
                &Traits,
                &Stance,
                &ConsentKanban,
            )>(entity)
            .ok()?;
        let (id, pos, role, vitals, traits, stance, kanban) = query.get()?;
        Some(AgentSummary {
            id: *id,
            pos: *pos,
            role: *role,
            energy: vitals.energy,
            alive: vitals.alive,
            bravery: traits.bravery,
            curiosity: traits.curiosity,
            treasures: vitals.treasures,
            stance: *stance,
            kanban: kanban.clone(),
        })
    }

    pub fn alive_count(&self) -> usize {
        self.world
            .query::<&Vitals>()
            .iter()
            .filter(|(_, vitals)| vitals.alive)
            .count()
    }

    pub fn biome(&self) -> &Biome {
        &self.biome
    }

    pub fn log(&self) -> &EventLog {
        &self.log
    }

    /// Append a driver-side line (e.g. an unrecognised command) to the log
    pub fn push_log(&mut self, line: impl Into<String>) {
        self.log.push(line);
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn day(&self) -> u64 {
        self.tick_count / TICKS_PER_DAY
    }

    pub fn global_resonance(&self) -> f64 {
        self.global_resonance
    }

    pub fn set_global_resonance(&mut self, resonance: f64) {
        self.global_resonance = resonance;
    }

    pub fn seed_strain(&self) -> &str {
        &self.seed_strain
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }
}
