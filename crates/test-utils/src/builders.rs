#![allow(dead_code)]

use std::collections::BTreeMap;

use animdag::config::model::{RepeatSetting, TimelineSection};
use animdag::config::{AnimationConfig, ConfigFile, RawConfigFile};
use animdag::errors::Result;
use animdag::types::AnimationKind;

/// Builder for `ConfigFile` to simplify test setup.
pub struct ChoreographyBuilder {
    config: RawConfigFile,
}

impl ChoreographyBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            config: RawConfigFile {
                timeline: TimelineSection {
                    name: name.to_string(),
                    ..TimelineSection::default()
                },
                animation: BTreeMap::new(),
            },
        }
    }

    pub fn with_animation(mut self, name: &str, anim: AnimationConfig) -> Self {
        self.config.animation.insert(name.to_string(), anim);
        self
    }

    pub fn start_delay(mut self, delay: &str) -> Self {
        self.config.timeline.start_delay = Some(delay.to_string());
        self
    }

    pub fn duration(mut self, duration: &str) -> Self {
        self.config.timeline.duration = Some(duration.to_string());
        self
    }

    pub fn raw(self) -> RawConfigFile {
        self.config
    }

    pub fn try_build(self) -> Result<ConfigFile> {
        ConfigFile::try_from(self.config)
    }

    pub fn build(self) -> ConfigFile {
        self.try_build()
            .expect("Failed to build valid config from builder")
    }
}

/// Builder for `AnimationConfig`.
pub struct AnimationConfigBuilder {
    anim: AnimationConfig,
}

impl AnimationConfigBuilder {
    pub fn new(duration: &str) -> Self {
        Self {
            anim: AnimationConfig {
                kind: AnimationKind::Timed,
                duration: duration.to_string(),
                start_delay: None,
                repeat: None,
                target: None,
                after: vec![],
                with: vec![],
            },
        }
    }

    pub fn pause(duration: &str) -> Self {
        let mut builder = Self::new(duration);
        builder.anim.kind = AnimationKind::Pause;
        builder
    }

    pub fn after(mut self, dep: &str) -> Self {
        self.anim.after.push(dep.to_string());
        self
    }

    pub fn with(mut self, dep: &str) -> Self {
        self.anim.with.push(dep.to_string());
        self
    }

    pub fn target(mut self, target: &str) -> Self {
        self.anim.target = Some(target.to_string());
        self
    }

    pub fn start_delay(mut self, delay: &str) -> Self {
        self.anim.start_delay = Some(delay.to_string());
        self
    }

    pub fn repeat(mut self, count: u32) -> Self {
        self.anim.repeat = Some(RepeatSetting::Count(count));
        self
    }

    pub fn repeat_forever(mut self) -> Self {
        self.anim.repeat = Some(RepeatSetting::Keyword("infinite".to_string()));
        self
    }

    pub fn build(self) -> AnimationConfig {
        self.anim
    }
}
