//! Social components: the consent kanban relationship state machine
//!
//! Every entity owns one [`ConsentKanban`]. It tracks how aware the entity is
//! of its interaction partner, a signed vibe, a consent level, and a derived
//! relational mode. Awareness and consent only ever move forward.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Vibe below which the relationship turns into a rivalry
const RIVAL_VIBE: f64 = -0.4;
/// Vibe below which a rivalry goes full juff
const FULL_JUFF_VIBE: f64 = -0.7;
/// Vibe above which the relationship becomes a homie bond
const HOMIE_VIBE: f64 = 0.4;
/// Weighted interaction history needed for admiration
const ADMIRING_HISTORY: u64 = 10;
/// Consent needed before a hug lands
const HUG_CONSENT: f64 = 0.7;

/// Ordered awareness stages, ECLIPSE through FULL
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Awareness {
    #[default]
    Eclipse,
    Crescent,
    Quarter,
    Gibbous,
    Full,
}

impl Awareness {
    pub fn name(&self) -> &'static str {
        match self {
            Awareness::Eclipse => "ECLIPSE",
            Awareness::Crescent => "CRESCENT",
            Awareness::Quarter => "QUARTER",
            Awareness::Gibbous => "GIBBOUS",
            Awareness::Full => "FULL",
        }
    }
}

/// Derived relational mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Mode {
    #[default]
    Sovereign,
    Homie,
    Rival,
}

impl Mode {
    pub fn name(&self) -> &'static str {
        match self {
            Mode::Sovereign => "SOVEREIGN",
            Mode::Homie => "HOMIE",
            Mode::Rival => "RIVAL",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Flavor of the current mode; absent while sovereign
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubState {
    #[serde(rename = "ADMIRING")]
    Admiring,
    #[serde(rename = "FLIRTY")]
    Flirty,
    #[serde(rename = "FULL JUFF")]
    FullJuff,
    #[serde(rename = "OL' EVIL EYE")]
    EvilEye,
}

impl SubState {
    pub fn name(&self) -> &'static str {
        match self {
            SubState::Admiring => "ADMIRING",
            SubState::Flirty => "FLIRTY",
            SubState::FullJuff => "FULL JUFF",
            SubState::EvilEye => "OL' EVIL EYE",
        }
    }
}

/// Kind of interaction directed at an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Interaction {
    Insult,
    Joke,
    Hug,
    /// Anything else: counted, but no vibe effect
    Other,
}

impl Interaction {
    pub fn parse(kind: &str) -> Self {
        match kind.trim().to_ascii_lowercase().as_str() {
            "insult" => Interaction::Insult,
            "joke" => Interaction::Joke,
            "hug" => Interaction::Hug,
            _ => Interaction::Other,
        }
    }
}

/// Result of a consent check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Consent {
    Granted,
    Blocked,
}

impl Consent {
    pub fn is_granted(&self) -> bool {
        matches!(self, Consent::Granted)
    }

    pub fn message(&self) -> &'static str {
        match self {
            Consent::Granted => "Access Granted.",
            Consent::Blocked => "BLOCKED. Glass Door active.",
        }
    }
}

/// Outcome of [`ConsentKanban::interact`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InteractionOutcome {
    /// False only when a hug was refused
    pub accepted: bool,
    pub message: String,
}

/// Per-entity relationship state machine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsentKanban {
    awareness: Awareness,
    vibe_bias: f64,
    consent_level: f64,
    mode: Mode,
    sub_state: Option<SubState>,
    #[serde(alias = "local_fungi")]
    local_count: u64,
    #[serde(alias = "distant_dms")]
    distant_count: u64,
}

impl Default for ConsentKanban {
    fn default() -> Self {
        Self {
            awareness: Awareness::Eclipse,
            vibe_bias: 0.0,
            consent_level: 0.0,
            mode: Mode::Sovereign,
            sub_state: None,
            local_count: 0,
            distant_count: 0,
        }
    }
}

impl ConsentKanban {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn awareness(&self) -> Awareness {
        self.awareness
    }

    pub fn vibe_bias(&self) -> f64 {
        self.vibe_bias
    }

    pub fn consent_level(&self) -> f64 {
        self.consent_level
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn sub_state(&self) -> Option<SubState> {
        self.sub_state
    }

    pub fn local_count(&self) -> u64 {
        self.local_count
    }

    pub fn distant_count(&self) -> u64 {
        self.distant_count
    }

    /// Grant iff consent has reached `required`. A refusal sours the vibe.
    pub fn check_consent(&mut self, required: f64) -> Consent {
        if self.consent_level >= required {
            Consent::Granted
        } else {
            self.vibe_bias -= 0.1;
            self.evolve_mode();
            Consent::Blocked
        }
    }

    /// Register one interaction and advance the state machine
    pub fn interact(&mut self, kind: Interaction, is_local: bool) -> InteractionOutcome {
        if is_local {
            self.local_count = self.local_count.saturating_add(1);
        } else {
            self.distant_count = self.distant_count.saturating_add(1);
        }

        self.advance_awareness();

        match kind {
            Interaction::Insult => self.vibe_bias -= 0.2,
            Interaction::Joke => self.vibe_bias += 0.1,
            Interaction::Hug => {
                let consent = self.check_consent(HUG_CONSENT);
                if !consent.is_granted() {
                    return InteractionOutcome {
                        accepted: false,
                        message: format!("INTERACTION FAILED: {}", consent.message()),
                    };
                }
                self.vibe_bias += 0.2;
            }
            Interaction::Other => {}
        }

        if self.vibe_bias > 0.5 && self.awareness >= Awareness::Gibbous {
            self.consent_level = (self.consent_level + 0.05).min(1.0);
        }

        self.evolve_mode();
        InteractionOutcome {
            accepted: true,
            message: format!("Interaction logged. Vibe: {:.2}", self.vibe_bias),
        }
    }

    /// At most one stage per call, judged against the current stage only
    fn advance_awareness(&mut self) {
        let next = match self.awareness {
            Awareness::Eclipse if self.local_count > 1 || self.distant_count > 1 => {
                Awareness::Crescent
            }
            Awareness::Crescent if self.local_count > 3 => Awareness::Quarter,
            Awareness::Quarter if self.vibe_bias > 0.2 => Awareness::Gibbous,
            Awareness::Gibbous if self.consent_level > 0.7 => Awareness::Full,
            current => current,
        };
        self.awareness = next;
    }

    fn evolve_mode(&mut self) {
        if self.vibe_bias < RIVAL_VIBE {
            self.mode = Mode::Rival;
            self.sub_state = Some(if self.vibe_bias < FULL_JUFF_VIBE {
                SubState::FullJuff
            } else {
                SubState::EvilEye
            });
        } else if self.vibe_bias > HOMIE_VIBE {
            self.mode = Mode::Homie;
            let history = self
                .local_count
                .saturating_add(self.distant_count.saturating_mul(2));
            self.sub_state = Some(
                if self.awareness == Awareness::Full && history > ADMIRING_HISTORY {
                    SubState::Admiring
                } else {
                    SubState::Flirty
                },
            );
        } else {
            self.mode = Mode::Sovereign;
            self.sub_state = None;
        }
    }
}
