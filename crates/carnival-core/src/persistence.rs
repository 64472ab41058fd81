//! Seed export/import - persisting a world snapshot
//!
//! A snapshot holds only the strain, the static terrain, the water field,
//! the global resonance and a flat record per entity. Nutrients, fungi,
//! bacteria, stances, genes and memories are not part of it and come back
//! at their creation defaults on restore.
//!
//! Two encodings are supported: JSON (`.seed`, the default) and bincode
//! (`.bin`). Decoding validates the whole snapshot before anything is
//! built, so a bad file never half-replaces a running world.

use hecs::World;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use thiserror::Error;

use crate::biome::{Biome, Field};
use crate::components::*;
use crate::generation::mutate_strain;
use crate::systems::population_order;

/// Errors that can occur during export/import
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("bad seed JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("bad binary seed: {0}")]
    Binary(#[from] bincode::Error),
    #[error("malformed seed: {0}")]
    Malformed(String),
}

/// On-disk encoding of a snapshot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SnapshotFormat {
    #[default]
    Json,
    Binary,
}

impl SnapshotFormat {
    /// `.bin` files are binary, everything else is JSON
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("bin") => SnapshotFormat::Binary,
            _ => SnapshotFormat::Json,
        }
    }
}

/// Persisted state of one entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityRecord {
    pub uid: u32,
    pub x: usize,
    pub y: usize,
    pub role: Role,
    pub energy: f64,
    pub bravery: f64,
    pub curiosity: f64,
    pub consent_kanban: ConsentKanban,
}

/// Serializable subset of a running world
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub strain: String,
    /// Altitude, indexed `[x][y]`
    pub terrain: Vec<Vec<f64>>,
    /// Water, indexed `[x][y]`
    pub water: Vec<Vec<f64>>,
    pub resonance: f64,
    pub entities: Vec<EntityRecord>,
}

/// A world rebuilt from a snapshot, ready to be swapped into an engine
pub struct RestoredWorld {
    pub strain: String,
    pub biome: Biome,
    pub world: World,
    pub resonance: f64,
    /// First id above every restored entity; `None` once `u32::MAX` is taken
    pub next_id: Option<u32>,
}

impl Snapshot {
    /// Capture the persisted subset of a world, entities in population order
    pub fn capture(world: &World, biome: &Biome, strain: &str, resonance: f64) -> Self {
        let entities = population_order(world)
            .into_iter()
            .filter_map(|entity| {
                let mut query = world
                    .query_one::<(&AgentId, &GridPos, &Role, &Vitals, &Traits, &ConsentKanban)>(entity)
                    .ok()?;
                let (id, pos, role, vitals, traits, kanban) = query.get()?;
                Some(EntityRecord {
                    uid: id.0,
                    x: pos.x,
                    y: pos.y,
                    role: *role,
                    energy: vitals.energy,
                    bravery: traits.bravery,
                    curiosity: traits.curiosity,
                    consent_kanban: kanban.clone(),
                })
            })
            .collect();

        Self {
            strain: strain.to_string(),
            terrain: biome.altitude.to_columns(),
            water: biome.water.to_columns(),
            resonance,
            entities,
        }
    }

    /// Check that the snapshot can be restored without breaking any world
    /// invariant
    pub fn validate(&self) -> Result<(), SnapshotError> {
        let malformed = |msg: String| Err(SnapshotError::Malformed(msg));

        let Some(terrain) = Field::from_columns(&self.terrain) else {
            return malformed("terrain must be a non-empty rectangular grid".into());
        };
        let Some(water) = Field::from_columns(&self.water) else {
            return malformed("water must be a non-empty rectangular grid".into());
        };
        if (terrain.width(), terrain.height()) != (water.width(), water.height()) {
            return malformed(format!(
                "terrain is {}x{} but water is {}x{}",
                terrain.width(),
                terrain.height(),
                water.width(),
                water.height()
            ));
        }
        for (name, field) in [("terrain", &terrain), ("water", &water)] {
            if field.values().iter().any(|v| !(0.0..=1.0).contains(v)) {
                return malformed(format!("{name} values must lie within [0, 1]"));
            }
        }
        if !self.resonance.is_finite() {
            return malformed("resonance must be finite".into());
        }

        let mut seen = HashSet::with_capacity(self.entities.len());
        for record in &self.entities {
            if !seen.insert(record.uid) {
                return malformed(format!("duplicate entity uid {}", record.uid));
            }
            if record.x >= terrain.width() || record.y >= terrain.height() {
                return malformed(format!(
                    "entity {} at ({}, {}) lies outside the {}x{} grid",
                    record.uid,
                    record.x,
                    record.y,
                    terrain.width(),
                    terrain.height()
                ));
            }
            let scalars = [record.energy, record.bravery, record.curiosity];
            if scalars.iter().any(|v| !v.is_finite()) {
                return malformed(format!("entity {} has a non-finite value", record.uid));
            }
            if !record.consent_kanban.vibe_bias().is_finite() {
                return malformed(format!("entity {} has a non-finite vibe", record.uid));
            }
            if !(0.0..=1.0).contains(&record.consent_kanban.consent_level()) {
                return malformed(format!(
                    "entity {} consent level must lie within [0, 1]",
                    record.uid
                ));
            }
        }

        Ok(())
    }

    pub fn write_to<W: Write>(&self, writer: W, format: SnapshotFormat) -> Result<(), SnapshotError> {
        match format {
            SnapshotFormat::Json => serde_json::to_writer_pretty(writer, self)?,
            SnapshotFormat::Binary => bincode::serialize_into(writer, self)?,
        }
        Ok(())
    }

    /// Decode and validate
    pub fn read_from<R: Read>(reader: R, format: SnapshotFormat) -> Result<Self, SnapshotError> {
        let snapshot: Snapshot = match format {
            SnapshotFormat::Json => serde_json::from_reader(reader)?,
            SnapshotFormat::Binary => bincode::deserialize_from(reader)?,
        };
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Write to `path`, encoding chosen by its extension
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SnapshotError> {
        let path = path.as_ref();
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_to(&mut writer, SnapshotFormat::from_path(path))?;
        writer.flush()?;
        Ok(())
    }

    /// Read from `path`, encoding chosen by its extension
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SnapshotError> {
        let path = path.as_ref();
        let reader = BufReader::new(File::open(path)?);
        Self::read_from(reader, SnapshotFormat::from_path(path))
    }

    /// Rebuild a world. Genes are redrawn from `rng`; everything outside the
    /// snapshot starts from its creation default. The strain gains a
    /// lineage suffix.
    pub fn restore(self, rng: &mut impl Rng) -> Result<RestoredWorld, SnapshotError> {
        self.validate()?;

        let (Some(altitude), Some(water)) = (
            Field::from_columns(&self.terrain),
            Field::from_columns(&self.water),
        ) else {
            return Err(SnapshotError::Malformed("empty grid".into()));
        };
        let biome = Biome::with_terrain(altitude, water);

        let next_id = match self.entities.iter().map(|r| r.uid).max() {
            Some(highest) => highest.checked_add(1),
            None => Some(0),
        };

        let mut world = World::new();
        for record in self.entities {
            let traits = Traits {
                bravery: record.bravery,
                curiosity: record.curiosity,
            };
            let genes = Genes::random(rng, traits.curiosity);
            world.spawn((
                AgentId(record.uid),
                GridPos::new(record.x, record.y),
                record.role,
                Vitals::new(record.energy),
                traits,
                genes,
                record.consent_kanban,
                Stance::Dormant,
                Memory::new(),
            ));
        }

        Ok(RestoredWorld {
            strain: mutate_strain(&self.strain),
            biome,
            world,
            resonance: self.resonance,
            next_id,
        })
    }
}
