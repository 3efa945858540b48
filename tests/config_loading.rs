// tests/config_loading.rs

mod common;
use crate::common::builders::{AnimationConfigBuilder, ChoreographyBuilder};
use crate::common::names_in_order;

use std::io::Write;
use std::time::Duration;

use tempfile::NamedTempFile;

use animdag::anim::Animatable;
use animdag::config::{default_config_path, load_and_validate, load_from_path};
use animdag::dag::Scheduler;
use animdag::errors::AnimdagError;
use animdag::types::{AnimationKind, RepeatCount};

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{contents}").unwrap();
    file
}

#[test]
fn loads_full_choreography() {
    let file = write_config(
        r#"
[timeline]
name = "flash"
start_delay = "50ms"
duration = "200ms"

[animation.fade]
duration = "300ms"
repeat = 1
target = "overlay"
after = ["wait"]

[animation.glow]
duration = "1s"
repeat = "infinite"
with = ["fade"]

[animation.wait]
kind = "pause"
duration = "100ms"
"#,
    );

    let cfg = load_and_validate(file.path()).unwrap();
    assert_eq!(cfg.timeline.name, "flash");
    assert_eq!(cfg.timeline.start_delay, Duration::from_millis(50));
    assert_eq!(cfg.timeline.duration, Some(Duration::from_millis(200)));

    let fade = &cfg.animations["fade"];
    assert_eq!(fade.kind, AnimationKind::Timed);
    assert_eq!(fade.repeat, RepeatCount::Finite(1));
    assert_eq!(fade.target.as_ref().map(|t| t.0.as_str()), Some("overlay"));
    assert_eq!(cfg.animations["glow"].repeat, RepeatCount::Infinite);
    assert_eq!(cfg.animations["wait"].kind, AnimationKind::Pause);

    let mut set = Scheduler::from_config(&cfg).unwrap();
    assert_eq!(names_in_order(&mut set), vec!["wait", "fade", "glow"]);
    assert_eq!(set.start_delay(), Duration::from_millis(50));
}

#[test]
fn cycle_returns_structured_error() {
    let file = write_config(
        r#"
[animation.a]
duration = "10ms"
after = ["b"]

[animation.b]
duration = "10ms"
with = ["a"]
"#,
    );

    match load_and_validate(file.path()) {
        Err(AnimdagError::Cycle(members)) => assert_eq!(members, vec!["a", "b"]),
        Err(e) => panic!("Expected Cycle error, got: {e:?}"),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn unknown_dependency_returns_config_error() {
    let err = ChoreographyBuilder::new("t")
        .with_animation("a", AnimationConfigBuilder::new("10ms").after("ghost").build())
        .try_build()
        .unwrap_err();

    match err {
        AnimdagError::ConfigError(msg) => {
            assert!(msg.contains("unknown dependency"));
            assert!(msg.contains("ghost"));
        }
        e => panic!("Expected ConfigError, got: {e:?}"),
    }
}

#[test]
fn self_dependency_is_rejected() {
    let err = ChoreographyBuilder::new("t")
        .with_animation("a", AnimationConfigBuilder::new("10ms").with("a").build())
        .try_build()
        .unwrap_err();
    assert!(matches!(err, AnimdagError::ConfigError(msg) if msg.contains("itself")));
}

#[test]
fn empty_choreography_is_rejected() {
    let err = ChoreographyBuilder::new("t").try_build().unwrap_err();
    assert!(matches!(err, AnimdagError::ConfigError(_)));
}

#[test]
fn pause_cannot_have_a_target() {
    let err = ChoreographyBuilder::new("t")
        .with_animation("gap", AnimationConfigBuilder::pause("10ms").target("box").build())
        .try_build()
        .unwrap_err();
    assert!(matches!(err, AnimdagError::ConfigError(msg) if msg.contains("pause")));
}

#[test]
fn negative_duration_is_invalid_argument() {
    let err = ChoreographyBuilder::new("t")
        .with_animation("a", AnimationConfigBuilder::new("-10ms").build())
        .try_build()
        .unwrap_err();
    assert!(matches!(err, AnimdagError::InvalidArgument(_)));

    let err = ChoreographyBuilder::new("t")
        .duration("-1s")
        .with_animation("a", AnimationConfigBuilder::new("10ms").build())
        .try_build()
        .unwrap_err();
    assert!(matches!(err, AnimdagError::InvalidArgument(_)));
}

#[test]
fn bad_repeat_keyword_is_rejected() {
    let file = write_config(
        r#"
[animation.a]
duration = "10ms"
repeat = "forever"
"#,
    );
    let err = load_and_validate(file.path()).unwrap_err();
    assert!(matches!(err, AnimdagError::ConfigError(msg) if msg.contains("forever")));
}

#[test]
fn malformed_toml_returns_toml_error() {
    let file = write_config("[animation.a\nduration = ");
    assert!(matches!(
        load_from_path(file.path()),
        Err(AnimdagError::TomlError(_))
    ));
}

#[test]
fn missing_file_returns_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.toml");
    assert!(matches!(
        load_and_validate(&missing),
        Err(AnimdagError::IoError(_))
    ));
}

#[test]
fn default_path_is_choreography_toml() {
    assert_eq!(default_config_path().to_str(), Some("Choreography.toml"));
}

#[test]
fn builder_settings_reach_the_scheduler() {
    let cfg = ChoreographyBuilder::new("built")
        .start_delay("30ms")
        .with_animation("a", AnimationConfigBuilder::new("10ms").start_delay("5ms").build())
        .with_animation("b", AnimationConfigBuilder::new("10ms").after("a").repeat(2).build())
        .build();

    let set = Scheduler::from_config(&cfg).unwrap();
    assert_eq!(set.name(), "built");
    assert_eq!(set.start_delay(), Duration::from_millis(30));
    let a = &set.children()[0];
    assert_eq!(a.name, "a");
    assert_eq!(
        set.child(a.id).unwrap().start_delay(),
        Duration::from_millis(5)
    );
    assert_eq!(set.children()[1].edges.len(), 1);
}
