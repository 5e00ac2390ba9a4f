//! Background sample loop: capture -> validate -> decode -> publish.
//!
//! One plain blocking thread owns the whole cycle. The only shared
//! mutable state is the [`ValueCache`] and the stop signal. Each cycle
//! makes exactly one display capture; everything else reads out of the
//! in-memory frame. A frame whose reference pixel is not the calibration
//! marker is routine "producer not ready" and is discarded without
//! touching the cache. No failure is allowed to escape the thread.

use crate::cache::ValueCache;
use crate::capture::{FrameSource, ScreenRect};
use crate::decode::decode;
use crate::error::ConfigError;
use crate::registry::{OffsetRegistry, swatch_column};
use crate::translate::ui_to_monitor;
use hashbrown::HashMap;
use pxwatch_types::{CalibrationData, SamplerSettings};
use std::sync::{Arc, Condvar, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

/// Cancellation signal that can interrupt the inter-cycle sleep
/// immediately, so shutdown latency is not coupled to the period.
#[derive(Debug, Default)]
struct StopSignal {
    stopped: Mutex<bool>,
    condvar: Condvar,
}

impl StopSignal {
    fn trigger(&self) {
        let mut stopped = self.lock();
        *stopped = true;
        self.condvar.notify_all();
    }

    fn is_set(&self) -> bool {
        *self.lock()
    }

    /// Sleep up to `period`, waking early on `trigger`. Returns true if
    /// the stop was requested.
    fn sleep(&self, period: Duration) -> bool {
        let deadline = std::time::Instant::now() + period;
        let mut stopped = self.lock();
        while !*stopped {
            let Some(remaining) = deadline.checked_duration_since(std::time::Instant::now())
            else {
                break;
            };
            let (guard, timeout) = self
                .condvar
                .wait_timeout(stopped, remaining)
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            stopped = guard;
            if timeout.timed_out() {
                break;
            }
        }
        *stopped
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, bool> {
        self.stopped.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

/// Display-space bounding rectangle covering every registered swatch.
///
/// The UI-space rectangle spans from the anchor across `count` spacing
/// columns; its translated top-left corner and translated width become
/// the capture region. Height is the swatch edge length in pixels.
pub fn bounding_rect(count: usize, calib: &CalibrationData) -> ScreenRect {
    let ui_left = calib.ref_x;
    let ui_top = calib.ref_y;
    let ui_right = ui_left + count as f32 * calib.spacing;

    let (screen_left, screen_top) = ui_to_monitor(ui_left, ui_top, calib);
    let (screen_right, _) = ui_to_monitor(ui_right, ui_top, calib);

    ScreenRect {
        x: screen_left,
        y: screen_top,
        width: screen_right.saturating_sub(screen_left).max(0) as u32,
        height: calib.pixel_size,
    }
}

/// Reject calibrations whose swatch rectangle strays off the screen.
pub fn validate_calibration(calib: &CalibrationData, count: usize) -> Result<(), ConfigError> {
    if !calib.dimensions_valid() {
        return Err(ConfigError::InvalidDimensions);
    }

    let rect = bounding_rect(count, calib);
    let right = rect.x + rect.width as i32;
    let bottom = rect.y + rect.height as i32;
    if rect.x < 0
        || rect.y < 0
        || right > calib.screen_width as i32
        || bottom > calib.screen_height as i32
    {
        return Err(ConfigError::RectOutOfBounds {
            left: rect.x,
            top: rect.y,
            right,
            bottom,
            width: calib.screen_width,
            height: calib.screen_height,
        });
    }
    Ok(())
}

/// Handle to the running sample loop.
///
/// Construction validates the calibration, computes the bounding
/// rectangle once, and spawns the thread; `shutdown` (or Drop) signals
/// stop and joins. Join latency is bounded by one in-flight cycle since
/// the sleep wakes on the signal.
pub struct Sampler {
    cache: Arc<ValueCache>,
    stop: Arc<StopSignal>,
    handle: Option<JoinHandle<()>>,
}

impl Sampler {
    pub fn spawn(
        source: Box<dyn FrameSource>,
        registry: Arc<OffsetRegistry>,
        calib: CalibrationData,
        settings: SamplerSettings,
    ) -> Result<Self, ConfigError> {
        validate_calibration(&calib, registry.len())?;

        let cache = Arc::new(ValueCache::new());
        let stop = Arc::new(StopSignal::default());
        let rect = bounding_rect(registry.len(), &calib);

        tracing::info!(
            "[SAMPLER] starting: {} offsets, region {}x{} at ({}, {}), period {}ms",
            registry.len(),
            rect.width,
            rect.height,
            rect.x,
            rect.y,
            settings.period_ms
        );

        let handle = {
            let cache = Arc::clone(&cache);
            let stop = Arc::clone(&stop);
            std::thread::spawn(move || {
                run_loop(source, registry, calib, settings, rect, cache, stop);
            })
        };

        Ok(Self {
            cache,
            stop,
            handle: Some(handle),
        })
    }

    /// Shared handle to the published values; stays valid across cycles.
    pub fn cache(&self) -> Arc<ValueCache> {
        Arc::clone(&self.cache)
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some() && !self.stop.is_set()
    }

    /// Signal stop and join the thread.
    pub fn shutdown(&mut self) {
        self.stop.trigger();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::error!("[SAMPLER] capture thread panicked");
            }
        }
    }
}

impl Drop for Sampler {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn run_loop(
    mut source: Box<dyn FrameSource>,
    registry: Arc<OffsetRegistry>,
    calib: CalibrationData,
    settings: SamplerSettings,
    rect: ScreenRect,
    cache: Arc<ValueCache>,
    stop: Arc<StopSignal>,
) {
    let period = Duration::from_millis(settings.period_ms);

    loop {
        if stop.is_set() {
            break;
        }

        match source.capture_region(rect) {
            Ok(frame) => {
                // Batch is staged entirely off-lock; commit is one short
                // lock acquisition, so readers never see a torn cycle.
                if let Some(batch) = decode_frame(&frame, &registry, &calib, &settings) {
                    cache.commit(batch);
                }
            }
            Err(e) => {
                // Skipped cycle, retried next period; never escalated.
                tracing::warn!("[SAMPLER] capture failed: {e}");
            }
        }

        if stop.sleep(period) {
            break;
        }
    }

    tracing::info!("[SAMPLER] loop exited");
}

/// Validate the marker and decode every registered swatch.
///
/// Returns `None` when the reference pixel does not carry the
/// calibration marker (producer not ready; not an error). A swatch that
/// falls outside the captured frame is logged and omitted from the
/// batch; its stale cache entry, if any, persists.
fn decode_frame(
    frame: &crate::capture::Frame,
    registry: &OffsetRegistry,
    calib: &CalibrationData,
    settings: &SamplerSettings,
) -> Option<HashMap<String, i64>> {
    let reference = frame.color_at(0, 0)?;
    if reference != settings.marker {
        tracing::trace!("[SAMPLER] marker mismatch: {reference}, frame discarded");
        return None;
    }

    let mut batch = HashMap::with_capacity(registry.len());
    for (name, meta) in registry.iter() {
        let x = swatch_column(meta.index, calib);
        match frame.color_at(x, 0) {
            Some(color) => {
                batch.insert(name.to_string(), decode(color, meta.kind));
            }
            None => {
                tracing::warn!("[SAMPLER] swatch {name:?} at column {x} is outside the frame");
            }
        }
    }
    Some(batch)
}

#[cfg(test)]
#[path = "sampler_tests.rs"]
mod sampler_tests;
