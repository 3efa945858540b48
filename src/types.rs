use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// How a dependent node relates to the node it depends on.
///
/// - `With`: the dependent starts at the moment the dependency *starts*.
/// - `After`: the dependent starts when the dependency *ends*.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rule {
    With,
    After,
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::With => f.write_str("with"),
            Rule::After => f.write_str("after"),
        }
    }
}

/// Kind of leaf animation declared in a choreography file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimationKind {
    /// A clock-driven animation with optional target and interpolator.
    Timed,
    /// A plain timer used as a gap between other animations.
    Pause,
}

impl Default for AnimationKind {
    fn default() -> Self {
        AnimationKind::Timed
    }
}

impl FromStr for AnimationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "timed" => Ok(AnimationKind::Timed),
            "pause" => Ok(AnimationKind::Pause),
            other => Err(format!(
                "invalid animation kind: {other} (expected \"timed\" or \"pause\")"
            )),
        }
    }
}

/// How many extra times an animation plays after its first iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepeatCount {
    Finite(u32),
    Infinite,
}

impl Default for RepeatCount {
    fn default() -> Self {
        RepeatCount::Finite(0)
    }
}

impl RepeatCount {
    /// Whether another iteration follows the one numbered `completed`
    /// (zero-based count of iterations already played).
    pub fn allows_another(&self, completed: u32) -> bool {
        match self {
            RepeatCount::Finite(n) => completed < *n,
            RepeatCount::Infinite => true,
        }
    }
}

impl FromStr for RepeatCount {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        if s == "infinite" {
            return Ok(RepeatCount::Infinite);
        }
        s.parse::<u32>()
            .map(RepeatCount::Finite)
            .map_err(|_| format!("invalid repeat count: {s} (expected a number or \"infinite\")"))
    }
}
