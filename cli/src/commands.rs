//! REPL command implementations over the shared app state.

use pxwatch_core::app_state::AppState;
use pxwatch_core::export::{RowOrder, write_bitmap};
use pxwatch_core::sampler::bounding_rect;
use pxwatch_core::{FrameSource, XcapSource};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;

pub async fn start(state: Arc<RwLock<AppState>>) {
    let mut s = state.write().await;
    match s.start_sampling() {
        Ok(()) => println!(
            "sampling started ({} offsets, period {}ms)",
            s.registry.as_ref().map_or(0, |r| r.len()),
            s.config.sampler.period_ms
        ),
        Err(e) => println!("error: {e}"),
    }
}

pub async fn stop(state: Arc<RwLock<AppState>>) {
    let mut s = state.write().await;
    if s.is_sampling() {
        s.stop_sampling();
        println!("sampling stopped");
    } else {
        println!("sampler is not running");
    }
}

pub async fn get(name: &str, state: Arc<RwLock<AppState>>) {
    let s = state.read().await;
    match s.get_value(name) {
        Ok(value) => println!("{name} = {value}"),
        Err(e) => println!("error: {e}"),
    }
}

pub async fn list(state: Arc<RwLock<AppState>>) {
    let s = state.read().await;
    if s.config.offsets.is_empty() {
        println!("no offsets configured");
        return;
    }
    for entry in &s.config.offsets {
        println!("  [{}] {} ({})", entry.index, entry.name, entry.kind);
    }
}

pub async fn snapshot(state: Arc<RwLock<AppState>>) {
    let s = state.read().await;
    let Some(cache) = s.cache() else {
        println!("sampler is not running");
        return;
    };
    let snap = cache.snapshot();
    if snap.is_empty() {
        println!("no valid cycle committed yet");
        return;
    }
    let mut entries: Vec<_> = snap.into_iter().collect();
    entries.sort();
    for (name, value) in entries {
        println!("  {name} = {value}");
    }
}

pub async fn show_config(state: Arc<RwLock<AppState>>) {
    let s = state.read().await;
    let c = &s.config.calibration;
    println!(
        "screen {}x{}, ui_scale {}, anchor ({}, {}), spacing {}, pixel_size {}, factor {}",
        c.screen_width, c.screen_height, c.ui_scale, c.ref_x, c.ref_y, c.spacing, c.pixel_size,
        c.layout_factor
    );
    println!("period {}ms, marker {}", s.config.sampler.period_ms, s.config.sampler.marker);
}

/// Capture one frame of the configured region and write it as a BMP.
pub async fn export(path: &str, state: Arc<RwLock<AppState>>) {
    let s = state.read().await;
    let rect = bounding_rect(s.config.offsets.len(), &s.config.calibration);
    drop(s);

    let mut source = match XcapSource::primary() {
        Ok(source) => source,
        Err(e) => {
            println!("error: {e}");
            return;
        }
    };
    match source.capture_region(rect) {
        Ok(frame) => match write_bitmap(&frame, Path::new(path), RowOrder::TopDown) {
            Ok(()) => println!("wrote {path}"),
            Err(e) => println!("error: {e}"),
        },
        Err(e) => println!("error: {e}"),
    }
}

pub fn exit() {
    println!("quitting...");
}
