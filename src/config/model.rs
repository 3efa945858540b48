// src/config/model.rs

use std::collections::BTreeMap;
use std::time::Duration;

use serde::Deserialize;

use crate::anim::{Animatable, Pause, Target, TimedAnimation};
use crate::types::{AnimationKind, RepeatCount};

/// Choreography as read from a TOML file, before validation.
///
/// ```toml
/// [timeline]
/// name = "flash"
/// start_delay = "50ms"
///
/// [animation.fade]
/// duration = "300ms"
/// after = ["wait"]
///
/// [animation.wait]
/// kind = "pause"
/// duration = "100ms"
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct RawConfigFile {
    /// Set-wide settings from `[timeline]`.
    #[serde(default)]
    pub timeline: TimelineSection,

    /// All animations from `[animation.<name>]`, keyed by name.
    #[serde(default)]
    pub animation: BTreeMap<String, AnimationConfig>,
}

/// `[timeline]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct TimelineSection {
    #[serde(default = "default_timeline_name")]
    pub name: String,

    /// Delay between `start()` and the first root starting, e.g. `"50ms"`.
    #[serde(default)]
    pub start_delay: Option<String>,

    /// When set, every animation in the set plays for this long.
    #[serde(default)]
    pub duration: Option<String>,
}

fn default_timeline_name() -> String {
    "timeline".to_string()
}

impl Default for TimelineSection {
    fn default() -> Self {
        Self {
            name: default_timeline_name(),
            start_delay: None,
            duration: None,
        }
    }
}

/// `repeat = 2` or `repeat = "infinite"`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RepeatSetting {
    Count(u32),
    Keyword(String),
}

/// `[animation.<name>]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct AnimationConfig {
    #[serde(default)]
    pub kind: AnimationKind,

    /// Duration string such as `"300ms"` or `"2s"`.
    pub duration: String,

    #[serde(default)]
    pub start_delay: Option<String>,

    #[serde(default)]
    pub repeat: Option<RepeatSetting>,

    /// Object the animation drives. Not allowed on `kind = "pause"`.
    #[serde(default)]
    pub target: Option<String>,

    /// Start once all of these have ended.
    #[serde(default)]
    pub after: Vec<String>,

    /// Start as soon as these start.
    #[serde(default)]
    pub with: Vec<String>,
}

/// Validated set-wide settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timeline {
    pub name: String,
    pub start_delay: Duration,
    pub duration: Option<Duration>,
}

/// Validated animation declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimationSpec {
    pub kind: AnimationKind,
    pub duration: Duration,
    pub start_delay: Duration,
    pub repeat: RepeatCount,
    pub target: Option<Target>,
    pub after: Vec<String>,
    pub with: Vec<String>,
}

impl AnimationSpec {
    /// Instantiate the declared animation under `name`.
    pub fn build(&self, name: &str) -> Box<dyn Animatable> {
        match self.kind {
            AnimationKind::Timed => {
                let mut anim = TimedAnimation::new(name, self.duration)
                    .with_start_delay(self.start_delay)
                    .with_repeat(self.repeat);
                if let Some(target) = &self.target {
                    anim = anim.with_target(target.clone());
                }
                Box::new(anim)
            }
            AnimationKind::Pause => {
                let mut pause = Pause::new(name, self.duration);
                pause.set_start_delay(self.start_delay);
                Box::new(pause)
            }
        }
    }
}

/// Validated choreography. Only obtainable through `TryFrom<RawConfigFile>`.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub timeline: Timeline,
    /// Keyed by name; iteration order is the node insertion order.
    pub animations: BTreeMap<String, AnimationSpec>,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(
        timeline: Timeline,
        animations: BTreeMap<String, AnimationSpec>,
    ) -> Self {
        Self {
            timeline,
            animations,
        }
    }
}
