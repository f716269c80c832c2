//! Picker controller — the inactive/active state machine driving the
//! magnifier.
//!
//! The controller owns all mutable picker state: the active flag, the
//! current color, the zoom factor and the last pointer sample. Pointer
//! events are only processed while active; transitions are returned as
//! [`PickerEvent`]s so the shell syncs the UI explicitly instead of
//! through side effects.

use crate::canvas::{Surface, SurfaceView};
use crate::color::{color_from_pixel_data, parse_hex_color};
use crate::config::Config;
use crate::magnifier::Magnifier;
use crate::mapper;
use egui::{Color32, Pos2};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PickerState {
    #[default]
    Inactive,
    Active,
}

/// Transition notifications surfaced to the app shell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PickerEvent {
    Activated,
    Deactivated,
    /// A color was committed to the clipboard; the picker deactivated.
    ColorCommitted(String),
}

/// The pointer sample driving the current preview. Kept so a zoom change
/// can re-render without waiting for the pointer to move.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerSample {
    /// Focus point in surface-pixel space.
    pub pixel: Pos2,
    /// Pointer position in screen coordinates.
    pub client: Pos2,
}

pub struct PickerController {
    state: PickerState,
    zoom_factor: u32,
    min_zoom_factor: u32,
    max_zoom_factor: u32,
    color: Option<String>,
    last_sample: Option<PointerSample>,
    pub magnifier: Magnifier,
}

impl PickerController {
    pub fn new(config: &Config) -> Result<Self, String> {
        Ok(Self {
            state: PickerState::Inactive,
            zoom_factor: config.magnifier.default_zoom_factor,
            min_zoom_factor: config.magnifier.min_zoom_factor,
            max_zoom_factor: config.magnifier.max_zoom_factor,
            color: None,
            last_sample: None,
            magnifier: Magnifier::new(&config.magnifier, config.header_height)?,
        })
    }

    pub fn is_active(&self) -> bool {
        self.state == PickerState::Active
    }

    /// The last sampled color as `#rrggbb`, if any. Survives
    /// deactivation — the header keeps showing the final pick.
    pub fn color(&self) -> Option<&str> {
        self.color.as_deref()
    }

    pub fn zoom_factor(&self) -> u32 {
        self.zoom_factor
    }

    pub fn last_sample(&self) -> Option<PointerSample> {
        self.last_sample
    }

    /// Flip between `Inactive` and `Active`. Deactivating hides the
    /// preview and drops the retained pointer sample.
    pub fn toggle(&mut self) -> PickerEvent {
        match self.state {
            PickerState::Inactive => {
                self.state = PickerState::Active;
                PickerEvent::Activated
            }
            PickerState::Active => {
                self.state = PickerState::Inactive;
                self.last_sample = None;
                self.magnifier.hide();
                PickerEvent::Deactivated
            }
        }
    }

    /// Handle a pointer position over the canvas area.
    ///
    /// Maps the pointer into surface-pixel space, samples the pixel color
    /// (out-of-bounds reads come back transparent black), and either
    /// renders the magnifier or — when the mapped point left the surface
    /// bounds — hides it. No-op while inactive.
    pub fn sample(
        &mut self,
        ctx: &egui::Context,
        surface: &Surface,
        client: Pos2,
        view: &SurfaceView,
    ) {
        if !self.is_active() {
            return;
        }

        let pixel = mapper::map_client_to_surface(
            client,
            view.rect.min,
            surface.intrinsic_size(),
            view.display_size,
        );

        // The color updates before the bounds check, mirroring the
        // order pointer handling has always had here.
        let sampled = surface.pixel_at(pixel.x, pixel.y);
        let hex = color_from_pixel_data(sampled.0);
        let border = parse_hex_color(&hex).unwrap_or(Color32::BLACK);
        self.color = Some(hex);

        let in_bounds = pixel.x >= 0.0
            && pixel.x <= surface.width() as f32
            && pixel.y >= 0.0
            && pixel.y <= surface.height() as f32;
        if in_bounds {
            self.last_sample = Some(PointerSample { pixel, client });
            self.magnifier
                .render(ctx, surface, pixel, client, self.zoom_factor, border, view);
        } else {
            self.last_sample = None;
            self.magnifier.hide();
        }
    }

    /// The pointer left the canvas area.
    pub fn pointer_left(&mut self) {
        self.last_sample = None;
        self.magnifier.hide();
    }

    /// Set the zoom factor. Bounds are enforced by the callers (the
    /// selector offers only valid values; the shortcuts clamp). The next
    /// `sample` call re-renders at the new zoom — with a stationary
    /// pointer that happens immediately, no movement needed.
    pub fn set_zoom_factor(&mut self, value: u32) {
        self.zoom_factor = value;
    }

    /// Increase zoom by one step, capped at the configured maximum.
    pub fn zoom_in(&mut self) {
        self.zoom_factor = (self.zoom_factor + 1).min(self.max_zoom_factor);
    }

    /// Decrease zoom by one step, floored at the configured minimum.
    pub fn zoom_out(&mut self) {
        self.zoom_factor = self.zoom_factor.saturating_sub(1).max(self.min_zoom_factor);
    }

    /// Begin a commit: returns the color to write to the clipboard, if
    /// the picker is active and something was sampled. The shell performs
    /// the write and calls [`complete_commit`](Self::complete_commit)
    /// only on success; on failure the picker simply stays active.
    pub fn commit(&self) -> Option<String> {
        if self.is_active() { self.color.clone() } else { None }
    }

    /// Finish a successful commit: deactivate and report the committed
    /// color. Returns `None` if the picker was not active.
    pub fn complete_commit(&mut self) -> Option<PickerEvent> {
        if !self.is_active() {
            return None;
        }
        let color = self.color.clone()?;
        self.state = PickerState::Inactive;
        self.last_sample = None;
        self.magnifier.hide();
        Some(PickerEvent::ColorCommitted(color))
    }
}

/// Write text to the system clipboard.
pub fn copy_text_to_system_clipboard(text: &str) -> Result<(), String> {
    let mut clipboard =
        arboard::Clipboard::new().map_err(|e| format!("clipboard unavailable: {}", e))?;
    clipboard
        .set_text(text)
        .map_err(|e| format!("clipboard write failed: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{Rect, pos2, vec2};
    use image::{Rgba, RgbaImage};

    /// 8×8 surface: left half red, right half blue.
    fn two_tone_surface() -> Surface {
        let mut img = RgbaImage::new(8, 8);
        for (x, _, px) in img.enumerate_pixels_mut() {
            *px = if x < 4 {
                Rgba([255, 0, 0, 255])
            } else {
                Rgba([0, 0, 255, 255])
            };
        }
        Surface::from_image(img)
    }

    /// Surface drawn 1:1 at (0, 50), no scroll.
    fn view() -> SurfaceView {
        SurfaceView {
            rect: Rect::from_min_size(pos2(0.0, 50.0), vec2(8.0, 8.0)),
            display_size: vec2(8.0, 8.0),
            scroll: egui::Vec2::ZERO,
        }
    }

    fn controller() -> PickerController {
        PickerController::new(&Config::default()).expect("default config is valid")
    }

    #[test]
    fn starts_inactive_with_default_zoom() {
        let picker = controller();
        assert!(!picker.is_active());
        assert_eq!(picker.zoom_factor(), 2);
        assert_eq!(picker.color(), None);
    }

    #[test]
    fn toggle_flips_state_and_reports_transitions() {
        let mut picker = controller();
        assert_eq!(picker.toggle(), PickerEvent::Activated);
        assert!(picker.is_active());
        assert_eq!(picker.toggle(), PickerEvent::Deactivated);
        assert!(!picker.is_active());
        assert!(!picker.magnifier.is_visible());
    }

    #[test]
    fn sample_in_bounds_updates_color_and_shows_preview() {
        let ctx = egui::Context::default();
        let surface = two_tone_surface();
        let mut picker = controller();
        picker.toggle();

        picker.sample(&ctx, &surface, pos2(1.0, 51.0), &view());
        assert_eq!(picker.color(), Some("#ff0000"));
        assert!(picker.magnifier.is_visible());
        assert!(picker.last_sample().is_some());

        picker.sample(&ctx, &surface, pos2(6.0, 51.0), &view());
        assert_eq!(picker.color(), Some("#0000ff"));
    }

    #[test]
    fn sample_out_of_bounds_hides_preview() {
        let ctx = egui::Context::default();
        let surface = two_tone_surface();
        let mut picker = controller();
        picker.toggle();

        picker.sample(&ctx, &surface, pos2(1.0, 51.0), &view());
        assert!(picker.magnifier.is_visible());

        // Maps to pixel (20, 1) — beyond the 8-pixel surface.
        picker.sample(&ctx, &surface, pos2(20.0, 51.0), &view());
        assert!(!picker.magnifier.is_visible());
        assert!(picker.last_sample().is_none());
        // The out-of-bounds read still updated the color, to the
        // transparent-black formatting.
        assert_eq!(picker.color(), Some("#000000"));
    }

    #[test]
    fn sample_is_ignored_while_inactive() {
        let ctx = egui::Context::default();
        let surface = two_tone_surface();
        let mut picker = controller();
        picker.sample(&ctx, &surface, pos2(1.0, 51.0), &view());
        assert_eq!(picker.color(), None);
        assert!(!picker.magnifier.is_visible());
    }

    #[test]
    fn zoom_steps_clamp_to_configured_bounds() {
        let mut picker = controller();
        for _ in 0..10 {
            picker.zoom_in();
        }
        assert_eq!(picker.zoom_factor(), 5);
        for _ in 0..10 {
            picker.zoom_out();
        }
        assert_eq!(picker.zoom_factor(), 1);
    }

    #[test]
    fn zoom_change_recomposites_without_pointer_movement() {
        let ctx = egui::Context::default();
        let surface = two_tone_surface();
        let mut picker = controller();
        picker.toggle();

        let client = pos2(4.0, 54.0);
        picker.sample(&ctx, &surface, client, &view());
        let before = picker.magnifier.preview().pixels.clone();

        // Stationary pointer: the same position is sampled again on the
        // next frame, now at the new zoom.
        picker.zoom_in();
        picker.sample(&ctx, &surface, client, &view());
        assert_ne!(picker.magnifier.preview().pixels, before);
    }

    #[test]
    fn commit_requires_active_state_and_a_sample() {
        let ctx = egui::Context::default();
        let surface = two_tone_surface();
        let mut picker = controller();
        assert_eq!(picker.commit(), None);

        picker.toggle();
        assert_eq!(picker.commit(), None);

        picker.sample(&ctx, &surface, pos2(1.0, 51.0), &view());
        assert_eq!(picker.commit(), Some("#ff0000".to_string()));
    }

    #[test]
    fn complete_commit_deactivates_and_reports_the_color() {
        let ctx = egui::Context::default();
        let surface = two_tone_surface();
        let mut picker = controller();
        picker.toggle();
        picker.sample(&ctx, &surface, pos2(6.0, 51.0), &view());

        let event = picker.complete_commit();
        assert_eq!(
            event,
            Some(PickerEvent::ColorCommitted("#0000ff".to_string()))
        );
        assert!(!picker.is_active());
        assert!(!picker.magnifier.is_visible());
        // The picked color remains displayed after deactivation.
        assert_eq!(picker.color(), Some("#0000ff"));
    }

    #[test]
    fn complete_commit_without_activation_is_none() {
        let mut picker = controller();
        assert_eq!(picker.complete_commit(), None);
    }
}
