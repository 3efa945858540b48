// src/config/validate.rs

use std::collections::BTreeMap;
use std::str::FromStr;
use std::time::Duration;

use petgraph::algo::{tarjan_scc, toposort};
use petgraph::graphmap::DiGraphMap;

use crate::anim::Target;
use crate::config::model::{
    AnimationConfig, AnimationSpec, ConfigFile, RawConfigFile, RepeatSetting, Timeline,
};
use crate::errors::{AnimdagError, Result};
use crate::types::{AnimationKind, RepeatCount};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = AnimdagError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;

        let timeline = Timeline {
            name: raw.timeline.name.clone(),
            start_delay: optional_duration(raw.timeline.start_delay.as_deref())?,
            duration: raw
                .timeline
                .duration
                .as_deref()
                .map(parse_duration)
                .transpose()?,
        };

        let mut animations = BTreeMap::new();
        for (name, anim) in raw.animation.iter() {
            animations.insert(name.clone(), resolve_animation(name, anim)?);
        }

        Ok(ConfigFile::new_unchecked(timeline, animations))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    ensure_has_animations(cfg)?;
    validate_references(cfg)?;
    validate_dag(cfg)?;
    Ok(())
}

fn ensure_has_animations(cfg: &RawConfigFile) -> Result<()> {
    if cfg.animation.is_empty() {
        return Err(AnimdagError::ConfigError(
            "config must contain at least one [animation.<name>] section".to_string(),
        ));
    }
    Ok(())
}

fn validate_references(cfg: &RawConfigFile) -> Result<()> {
    for (name, anim) in cfg.animation.iter() {
        let refs = anim
            .after
            .iter()
            .map(|d| ("after", d))
            .chain(anim.with.iter().map(|d| ("with", d)));

        for (field, dep) in refs {
            if !cfg.animation.contains_key(dep) {
                return Err(AnimdagError::ConfigError(format!(
                    "animation '{}' has unknown dependency '{}' in `{}`",
                    name, dep, field
                )));
            }
            if dep == name {
                return Err(AnimdagError::ConfigError(format!(
                    "animation '{}' cannot depend on itself in `{}`",
                    name, field
                )));
            }
        }
    }
    Ok(())
}

fn validate_dag(cfg: &RawConfigFile) -> Result<()> {
    // Edge direction: dependency -> dependent, for both rules.
    let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();

    for name in cfg.animation.keys() {
        graph.add_node(name.as_str());
    }

    for (name, anim) in cfg.animation.iter() {
        for dep in anim.after.iter().chain(anim.with.iter()) {
            graph.add_edge(dep.as_str(), name.as_str(), ());
        }
    }

    match toposort(&graph, None) {
        Ok(_order) => Ok(()),
        Err(cycle) => {
            let culprit = cycle.node_id();
            let mut members: Vec<String> = tarjan_scc(&graph)
                .into_iter()
                .find(|scc| scc.contains(&culprit))
                .unwrap_or_else(|| vec![culprit])
                .into_iter()
                .map(str::to_string)
                .collect();
            members.sort();
            Err(AnimdagError::Cycle(members))
        }
    }
}

fn resolve_animation(name: &str, cfg: &AnimationConfig) -> Result<AnimationSpec> {
    if cfg.kind == AnimationKind::Pause && cfg.target.is_some() {
        return Err(AnimdagError::ConfigError(format!(
            "animation '{}' is a pause and cannot have a `target`",
            name
        )));
    }

    let repeat = match &cfg.repeat {
        None => RepeatCount::default(),
        Some(RepeatSetting::Count(n)) => RepeatCount::Finite(*n),
        Some(RepeatSetting::Keyword(word)) => RepeatCount::from_str(word).map_err(|e| {
            AnimdagError::ConfigError(format!("animation '{}': {}", name, e))
        })?,
    };

    Ok(AnimationSpec {
        kind: cfg.kind,
        duration: parse_duration(&cfg.duration)?,
        start_delay: optional_duration(cfg.start_delay.as_deref())?,
        repeat,
        target: cfg.target.as_deref().map(Target::from),
        after: cfg.after.clone(),
        with: cfg.with.clone(),
    })
}

fn optional_duration(s: Option<&str>) -> Result<Duration> {
    s.map(parse_duration)
        .transpose()
        .map(Option::unwrap_or_default)
}

/// Parse `"<n>ms"`, `"<n>s"`, `"<n>m"` or `"<n>h"`.
///
/// A negative value is an [`AnimdagError::InvalidArgument`]; anything else
/// malformed is a [`AnimdagError::ConfigError`].
pub fn parse_duration(s: &str) -> Result<Duration> {
    let s = s.trim();
    if s.is_empty() {
        return Err(AnimdagError::ConfigError("empty duration string".to_string()));
    }
    if s.starts_with('-') {
        return Err(AnimdagError::InvalidArgument(format!(
            "duration must be a value of zero or greater (got '{}')",
            s
        )));
    }

    // Find the boundary between digits and suffix.
    let idx = s
        .chars()
        .position(|c| !c.is_ascii_digit())
        .ok_or_else(|| AnimdagError::ConfigError(format!("duration '{}' missing unit suffix", s)))?;

    let (num_part, unit_part) = s.split_at(idx);
    let value: u64 = num_part.parse().map_err(|e| {
        AnimdagError::ConfigError(format!("invalid duration number '{}': {}", num_part, e))
    })?;
    let unit = unit_part.trim().to_lowercase();

    let secs_per_unit = match unit.as_str() {
        "ms" => return Ok(Duration::from_millis(value)),
        "s" => 1,
        "m" => 60,
        "h" => 60 * 60,
        _ => {
            return Err(AnimdagError::ConfigError(format!(
                "unsupported duration unit '{}'; expected ms, s, m, or h",
                unit
            )));
        }
    };

    value
        .checked_mul(secs_per_unit)
        .map(Duration::from_secs)
        .ok_or_else(|| AnimdagError::ConfigError(format!("duration '{}' is too large", s)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_supported_units() {
        assert_eq!(parse_duration("250ms").unwrap(), Duration::from_millis(250));
        assert_eq!(parse_duration(" 2s ").unwrap(), Duration::from_secs(2));
        assert_eq!(parse_duration("1m").unwrap(), Duration::from_secs(60));
        assert_eq!(parse_duration("1h").unwrap(), Duration::from_secs(3600));
    }

    #[test]
    fn negative_duration_is_invalid_argument() {
        assert!(matches!(
            parse_duration("-5ms"),
            Err(AnimdagError::InvalidArgument(_))
        ));
    }

    #[test]
    fn malformed_durations_are_config_errors() {
        for input in ["", "10", "ms", "10 parsecs"] {
            assert!(
                matches!(parse_duration(input), Err(AnimdagError::ConfigError(_))),
                "expected config error for {input:?}"
            );
        }
    }

    #[test]
    fn oversized_durations_are_config_errors() {
        for input in ["18446744073709551h", "307445734561825861m"] {
            assert!(
                matches!(parse_duration(input), Err(AnimdagError::ConfigError(_))),
                "expected config error for {input:?}"
            );
        }
        assert_eq!(
            parse_duration("18446744073709551615s").unwrap(),
            Duration::from_secs(u64::MAX)
        );
    }
}
