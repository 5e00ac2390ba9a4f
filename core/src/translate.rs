//! Coordinate translation between the monitored application's UI space
//! and absolute display pixels.
//!
//! UI space has its origin bottom-left; display space top-left, so the Y
//! axis inverts going UI -> display. The two directions use different
//! formulas calibrated independently against the producing application
//! and are NOT inverses of one another under composition. Treat each as
//! a one-way projection.

use pxwatch_types::CalibrationData;

/// Translate a UI-space point to display-pixel coordinates.
///
/// The UI layout extent is `screen * ui_scale * layout_factor`; the
/// input is projected through its fraction of that extent onto the
/// screen dimensions.
pub fn ui_to_monitor(ui_x: f32, ui_y: f32, calib: &CalibrationData) -> (i32, i32) {
    let layout_max_x = calib.screen_width as f32 * calib.ui_scale * calib.layout_factor;
    let layout_max_y = calib.screen_height as f32 * calib.ui_scale * calib.layout_factor;

    let fraction_x = ui_x / layout_max_x;
    let fraction_y = ui_y / layout_max_y;

    let screen_x = (fraction_x * calib.screen_width as f32) as i32;
    // UI origin is bottom-left; flip Y onto the top-left display origin
    let screen_y = (calib.screen_height as f32 - fraction_y * calib.screen_height as f32) as i32;

    (screen_x, screen_y)
}

/// Translate display-pixel coordinates to UI-space coordinates.
///
/// Deliberately not the algebraic inverse of [`ui_to_monitor`]; it
/// divides by `screen / ui_scale` and performs no Y flip.
pub fn monitor_to_ui(screen_x: i32, screen_y: i32, calib: &CalibrationData) -> (f32, f32) {
    let ui_x =
        (screen_x as f32 * calib.layout_factor) / (calib.screen_width as f32 / calib.ui_scale);
    let ui_y =
        (screen_y as f32 * calib.layout_factor) / (calib.screen_height as f32 / calib.ui_scale);

    (ui_x, ui_y)
}
