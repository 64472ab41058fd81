//! Text renderers: header, 2D map, isometric 3D view, event feed and the
//! companion panel. Everything returns a `String`; the caller decides when
//! and where to print it.

use carnival_core::prelude::*;
use std::fmt::Write as _;

const RULE_WIDTH: usize = 60;
/// Rows reserved for header, panel and prompt around the 3D view
const CHROME_ROWS: u16 = 10;
/// Terminal size used when the real one cannot be queried
pub const FALLBACK_SIZE: (u16, u16) = (80, 24);

const ISO_SCALE: f64 = 2.0;
const ALTITUDE_HEIGHT: f64 = 10.0;
const CAMERA_HEIGHT: f64 = 20.0;
const TERRAIN_STRIDE: usize = 2;

/// Which main panel is shown
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum View {
    #[default]
    Map2D,
    Iso3D,
    Feed,
}

impl View {
    pub fn next(self) -> Self {
        match self {
            View::Map2D => View::Iso3D,
            View::Iso3D => View::Feed,
            View::Feed => View::Map2D,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            View::Map2D => "2D",
            View::Iso3D => "3D",
            View::Feed => "FEED",
        }
    }
}

fn rule() -> String {
    "-".repeat(RULE_WIDTH)
}

fn terrain_glyph(biome: &Biome, x: usize, y: usize) -> char {
    if biome.is_mountain(x, y) {
        '^'
    } else if biome.is_sea(x, y) {
        '~'
    } else {
        '.'
    }
}

fn agent_glyph(agent: &AgentSummary, companion: Option<AgentId>) -> char {
    if companion == Some(agent.id) {
        '@'
    } else {
        agent.role.glyph()
    }
}

pub fn header(engine: &SimulationEngine, view: View) -> String {
    format!(
        ":: DARK CARNIVAL RNG :: STRAIN: {}\n\
         :: TICK: {} :: DAY: {} :: RESONANCE: {:.2} :: ENTITIES: {}\n\
         :: VIEW: {}",
        engine.seed_strain(),
        engine.tick_count(),
        engine.day(),
        engine.global_resonance(),
        engine.agents().len(),
        view.label(),
    )
}

/// Top-down map. The lowest-id entity on a cell wins it.
pub fn render_2d(engine: &SimulationEngine) -> String {
    let biome = engine.biome();
    let (w, h) = (biome.width(), biome.height());
    let companion = engine.companion_summary().map(|a| a.id);

    let mut cells: Vec<Vec<char>> = (0..h)
        .map(|y| (0..w).map(|x| terrain_glyph(biome, x, y)).collect())
        .collect();
    for agent in engine.agents().iter().rev().filter(|a| a.alive) {
        if let Some(cell) = cells.get_mut(agent.pos.y).and_then(|row| row.get_mut(agent.pos.x)) {
            *cell = agent_glyph(agent, companion);
        }
    }

    cells
        .into_iter()
        .map(|row| row.into_iter().collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

struct Point {
    dist: f64,
    x: f64,
    y: f64,
    z: f64,
    glyph: char,
}

/// Isometric projection of every second terrain tile plus all entities,
/// drawn far to near and scaled to fit `cols` x `rows`.
pub fn render_3d(engine: &SimulationEngine, cols: u16, rows: u16) -> String {
    let mut screen_h = rows.saturating_sub(CHROME_ROWS) as usize;
    let mut screen_w = cols as usize;
    if screen_h == 0 || screen_w == 0 {
        screen_w = FALLBACK_SIZE.0 as usize;
        screen_h = (FALLBACK_SIZE.1 - 4) as usize;
    }

    let biome = engine.biome();
    let cam = (
        biome.width() as f64 / 2.0,
        biome.height() as f64 / 2.0,
        CAMERA_HEIGHT,
    );
    let distance = |x: f64, y: f64, z: f64| {
        ((x - cam.0).powi(2) + (y - cam.1).powi(2) + (z - cam.2).powi(2)).sqrt()
    };
    let altitude = |x: usize, y: usize| biome.altitude.get(x, y).unwrap_or(0.0) * ALTITUDE_HEIGHT;

    let mut points = Vec::new();
    for x in (0..biome.width()).step_by(TERRAIN_STRIDE) {
        for y in (0..biome.height()).step_by(TERRAIN_STRIDE) {
            let (fx, fy, z) = (x as f64, y as f64, altitude(x, y));
            points.push(Point {
                dist: distance(fx, fy, z),
                x: fx,
                y: fy,
                z,
                glyph: terrain_glyph(biome, x, y),
            });
        }
    }
    let companion = engine.companion_summary().map(|a| a.id);
    for agent in engine.agents().iter().filter(|a| a.alive) {
        let (fx, fy) = (agent.pos.x as f64, agent.pos.y as f64);
        let z = altitude(agent.pos.x, agent.pos.y) + 0.5;
        points.push(Point {
            dist: distance(fx, fy, z),
            x: fx,
            y: fy,
            z,
            glyph: agent_glyph(agent, companion),
        });
    }

    // Painter's order: far first, so near points overwrite
    points.sort_by(|a, b| b.dist.total_cmp(&a.dist));

    let (iso_x, iso_y) = (
        30f64.to_radians().cos() * ISO_SCALE,
        30f64.to_radians().sin() * ISO_SCALE,
    );
    let projected: Vec<(f64, f64, char)> = points
        .iter()
        .map(|p| ((p.x - p.y) * iso_x, (p.x + p.y) * iso_y - p.z, p.glyph))
        .collect();

    let bounds = projected.iter().fold(
        (f64::INFINITY, f64::NEG_INFINITY, f64::INFINITY, f64::NEG_INFINITY),
        |(min_x, max_x, min_y, max_y), &(sx, sy, _)| {
            (min_x.min(sx), max_x.max(sx), min_y.min(sy), max_y.max(sy))
        },
    );
    let (min_sx, max_sx, min_sy, max_sy) = if projected.is_empty() {
        (0.0, 0.0, 0.0, 0.0)
    } else {
        bounds
    };
    let scale = ((screen_w - 1) as f64 / (max_sx - min_sx + 1.0))
        .min((screen_h - 1) as f64 / (max_sy - min_sy + 1.0));

    let mut buffer = vec![vec![' '; screen_w]; screen_h];
    for (sx, sy, glyph) in projected {
        let gx = ((sx - min_sx) * scale) as usize;
        let gy = ((sy - min_sy) * scale) as usize;
        if gx < screen_w && gy < screen_h {
            buffer[gy][gx] = glyph;
        }
    }

    buffer
        .into_iter()
        .map(|row| row.into_iter().collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_feed(engine: &SimulationEngine) -> String {
    engine.log().iter().collect::<Vec<_>>().join("\n")
}

pub fn companion_panel(companion: &AgentSummary) -> String {
    let kanban = &companion.kanban;
    format!(
        ":: COMPANION :: {} ID:{}\n  \
         Energy: {:.1} | Bravery: {:.2} | Curiosity: {:.2}\n  \
         Consent: {:.0}% | Vibe: {:.2} ({})",
        companion.role,
        companion.id,
        companion.energy,
        companion.bravery,
        companion.curiosity,
        kanban.consent_level() * 100.0,
        kanban.vibe_bias(),
        kanban.mode().name(),
    )
}

pub fn command_help() -> &'static str {
    "[Enter] Tick | [v] View (2D/3D/Feed) | [a] Auto-run (ticks) | [m] Menu\n\
     [c] Connect Entity | [t] Talk | [h] Hug | [x] Export | [i] Import | [q] Quit"
}

/// One full screen for the given view and terminal size
pub fn frame(engine: &SimulationEngine, view: View, size: (u16, u16)) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", header(engine, view));
    let _ = writeln!(out, "{}", rule());

    let body = match view {
        View::Map2D => render_2d(engine),
        View::Iso3D => render_3d(engine, size.0, size.1),
        View::Feed => render_feed(engine),
    };
    let _ = writeln!(out, "{body}");

    if let Some(companion) = engine.companion_summary() {
        let _ = writeln!(out, "\n{}", companion_panel(&companion));
    }

    let _ = writeln!(out, "{}", rule());
    let _ = writeln!(out, "{}", command_help());
    out
}

/// Headless run summary: tick, survivors, role census and the latest lines
pub fn summary(engine: &SimulationEngine, last_lines: usize) -> String {
    let agents = engine.agents();
    let mut out = String::new();
    let _ = writeln!(out, "strain:  {}", engine.seed_strain());
    let _ = writeln!(out, "tick:    {} (day {})", engine.tick_count(), engine.day());
    let _ = writeln!(out, "alive:   {}", engine.alive_count());

    let _ = writeln!(out, "census:");
    for role in Role::ALL {
        let count = agents.iter().filter(|a| a.role == role).count();
        if count > 0 {
            let _ = writeln!(out, "  {:<12}{count}", role.name());
        }
    }

    let _ = writeln!(out, "recent:");
    for line in engine.log().recent(last_lines) {
        let _ = writeln!(out, "  {line}");
    }
    out
}
