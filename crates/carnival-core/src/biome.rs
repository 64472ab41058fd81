//! Biome - the shared environment grid and its resource fields
//!
//! Four dynamic fields (water, nutrients, fungi, bacteria) evolve every tick;
//! altitude is generated once and never changes. Each cell's update reads
//! only its own previous values, so cells are order-independent.

use rand::Rng;

use crate::generation::generate_altitude;

/// Water level above which a cell counts as sea
pub const SEA_LEVEL: f64 = 0.6;
/// Altitude above which a cell counts as mountain
pub const MOUNTAIN_LEVEL: f64 = 0.7;

/// Starting value of the nutrient and water fields
const INITIAL_NUTRIENTS: f64 = 0.5;
const INITIAL_WATER: f64 = 0.5;

// Rainfall: the amount is drawn first, then gated
const STORM_CHANCE: f64 = 0.01;
const STORM_RAIN: f64 = 0.1;
const DRIZZLE_RAIN: f64 = 0.01;
const RAIN_CHANCE: f64 = 0.05;

const EVAPORATION: f64 = 0.01;
const FUNGI_WATER_THRESHOLD: f64 = 0.6;
const BACTERIA_NUTRIENT_THRESHOLD: f64 = 0.6;
const GROWTH: f64 = 0.01;
const NUTRIENT_DECAY: f64 = 0.999;
const NUTRIENT_RELEASE: f64 = 0.002;

/// Dense W x H grid of scalars, stored column by column (`[x][y]`)
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    width: usize,
    height: usize,
    cells: Vec<f64>,
}

impl Field {
    pub fn filled(width: usize, height: usize, value: f64) -> Self {
        Self {
            width,
            height,
            cells: vec![value; width * height],
        }
    }

    /// Build from nested columns. None unless non-empty and rectangular.
    pub fn from_columns(columns: &[Vec<f64>]) -> Option<Self> {
        let width = columns.len();
        let height = columns.first()?.len();
        if height == 0 || columns.iter().any(|c| c.len() != height) {
            return None;
        }
        Some(Self {
            width,
            height,
            cells: columns.concat(),
        })
    }

    pub fn to_columns(&self) -> Vec<Vec<f64>> {
        self.cells.chunks(self.height.max(1)).map(<[f64]>::to_vec).collect()
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, x: usize, y: usize) -> Option<f64> {
        self.index(x, y).map(|i| self.cells[i])
    }

    /// Write a value; out-of-bounds writes are ignored
    pub fn set(&mut self, x: usize, y: usize, value: f64) {
        if let Some(i) = self.index(x, y) {
            self.cells[i] = value;
        }
    }

    pub fn values(&self) -> &[f64] {
        &self.cells
    }

    fn index(&self, x: usize, y: usize) -> Option<usize> {
        (x < self.width && y < self.height).then_some(x * self.height + y)
    }
}

/// The shared environment
#[derive(Debug, Clone, PartialEq)]
pub struct Biome {
    width: usize,
    height: usize,
    pub nutrients: Field,
    pub water: Field,
    pub fungi: Field,
    pub bacteria: Field,
    /// Static terrain, generated once
    pub altitude: Field,
}

impl Biome {
    /// Fresh biome with generated terrain and default fields
    pub fn new(width: usize, height: usize, rng: &mut impl Rng) -> Self {
        let altitude = generate_altitude(width, height, rng);
        Self::with_terrain(altitude, Field::filled(width, height, INITIAL_WATER))
    }

    /// Biome from restored terrain and water. Nutrients, fungi and bacteria
    /// start from their creation defaults. Both fields must share a shape.
    pub fn with_terrain(altitude: Field, water: Field) -> Self {
        let (width, height) = (altitude.width(), altitude.height());
        debug_assert_eq!((width, height), (water.width(), water.height()));
        Self {
            width,
            height,
            nutrients: Field::filled(width, height, INITIAL_NUTRIENTS),
            water,
            fungi: Field::filled(width, height, 0.0),
            bacteria: Field::filled(width, height, 0.0),
            altitude,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn in_bounds(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }

    pub fn is_sea(&self, x: usize, y: usize) -> bool {
        self.water.get(x, y).is_some_and(|w| w > SEA_LEVEL)
    }

    pub fn is_mountain(&self, x: usize, y: usize) -> bool {
        self.altitude.get(x, y).is_some_and(|a| a > MOUNTAIN_LEVEL)
    }

    /// Advance every cell by one step
    pub fn tick(&mut self, rng: &mut impl Rng) {
        for i in 0..self.width * self.height {
            let rain = if rng.gen::<f64>() < STORM_CHANCE {
                STORM_RAIN
            } else {
                DRIZZLE_RAIN
            };

            let mut water = self.water.cells[i];
            if rng.gen::<f64>() < RAIN_CHANCE {
                water = (water + rain).min(1.0);
            }
            water = (water - EVAPORATION).max(0.0);

            let mut fungi = self.fungi.cells[i];
            if water > FUNGI_WATER_THRESHOLD {
                fungi = (fungi + GROWTH).min(1.0);
            }

            let mut nutrients = self.nutrients.cells[i];
            let mut bacteria = self.bacteria.cells[i];
            if nutrients > BACTERIA_NUTRIENT_THRESHOLD {
                bacteria = (bacteria + GROWTH).min(1.0);
            }

            // Fungi crowd out bacteria
            if fungi > 0.5 && bacteria > 0.1 {
                bacteria *= 0.95;
            }

            nutrients *= NUTRIENT_DECAY;
            if bacteria > 0.5 {
                nutrients = (nutrients + NUTRIENT_RELEASE).min(1.0);
            }

            self.water.cells[i] = water;
            self.fungi.cells[i] = fungi;
            self.bacteria.cells[i] = bacteria;
            self.nutrients.cells[i] = nutrients;
        }
    }
}
