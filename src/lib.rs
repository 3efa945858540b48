// src/lib.rs

pub mod anim;
pub mod cli;
pub mod config;
pub mod dag;
pub mod engine;
pub mod errors;
pub mod logging;
pub mod types;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::anim::{Animatable, Lifecycle};
use crate::cli::CliArgs;
use crate::config::loader::load_and_validate;
use crate::config::model::ConfigFile;
use crate::dag::Scheduler;
use crate::engine::{PlaybackCore, PlaybackEvent, Runtime};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - choreography loading
/// - the animation set and its per-child lifecycle printer
/// - the frame-driven runtime
/// - Ctrl-C handling (cancels the set)
pub async fn run(args: CliArgs) -> Result<()> {
    let config_path = PathBuf::from(&args.config);
    let cfg = load_and_validate(&config_path)?;

    if args.dry_run {
        print_dry_run(&cfg)?;
        return Ok(());
    }

    let mut scheduler = Scheduler::from_config_with(&cfg, attach_printer)?;
    attach_printer(&mut scheduler);

    let (tx, rx) = mpsc::channel::<PlaybackEvent>(16);

    // Ctrl-C → cancel; the set then ends and the runtime stops on its own.
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            eprintln!("failed to listen for Ctrl+C: {e}");
            return;
        }
        let _ = tx.send(PlaybackEvent::CancelRequested).await;
    });

    let core = PlaybackCore::new(scheduler);
    let runtime = Runtime::new(core, rx, Duration::from_millis(args.frame_ms));
    let history = runtime.run().await?;

    info!(events = history.len(), "animation set finished");
    Ok(())
}

/// Print every lifecycle event of `animation` to stdout.
fn attach_printer(animation: &mut dyn Animatable) {
    animation.add_listener(Box::new(|source: &str, event: Lifecycle| {
        println!("{source}: {event}");
    }));
}

/// Print the resolved play order and every dependency edge.
fn print_dry_run(cfg: &ConfigFile) -> Result<()> {
    let mut scheduler = Scheduler::from_config(cfg)?;
    let order = scheduler.sorted_order()?;

    println!("animdag dry-run");
    println!("  timeline.name = {}", cfg.timeline.name);
    println!("  timeline.start_delay = {:?}", cfg.timeline.start_delay);
    if let Some(duration) = cfg.timeline.duration {
        println!("  timeline.duration = {duration:?}");
    }
    println!();

    println!("play order ({}):", order.len());
    let children = scheduler.children();
    for id in order {
        let child = &children[id.index()];
        println!("  - {}", child.name);
        if let Some(spec) = cfg.animations.get(&child.name) {
            println!("      kind: {:?}", spec.kind);
            println!("      duration: {:?}", spec.duration);
            if !spec.start_delay.is_zero() {
                println!("      start_delay: {:?}", spec.start_delay);
            }
            if let Some(target) = &spec.target {
                println!("      target: {target}");
            }
        }
        for edge in &child.edges {
            println!("      {} {}", edge.rule, children[edge.target.index()].name);
        }
    }

    debug!("dry-run complete (no playback)");
    Ok(())
}
