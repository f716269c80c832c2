//! Pointer-to-surface coordinate mapping.
//!
//! The surface's intrinsic pixel size and its on-screen display size are
//! independent: the canvas may be rendered scaled down to fit the window.
//! Everything that samples or crops pixels works in intrinsic space, so
//! pointer positions have to be mapped through the display ratio first.

use egui::{Pos2, Vec2, pos2};

/// Convert a pointer position in screen coordinates into surface pixel
/// coordinates.
///
/// `surface_min` is the on-screen top-left corner of the surface,
/// `intrinsic` its pixel-buffer dimensions and `display` its on-screen
/// dimensions. The result is intentionally **not clamped**: out-of-bounds
/// coordinates tell the caller the cursor has left the surface.
pub fn map_client_to_surface(client: Pos2, surface_min: Pos2, intrinsic: Vec2, display: Vec2) -> Pos2 {
    let ratio_x = display.x / intrinsic.x;
    let ratio_y = display.y / intrinsic.y;
    pos2(
        (client.x - surface_min.x) / ratio_x,
        (client.y - surface_min.y) / ratio_y,
    )
}

/// The zoom actually applied when cropping the surface for the magnifier.
///
/// When the surface is displayed smaller or larger than its intrinsic
/// size, the raw zoom factor is scaled by the display ratio so the
/// magnified crop always covers the same number of *source* pixels
/// regardless of display scale. An expanded surface is displayed 1:1, so
/// the compensation is skipped there. A degenerate ratio (zero-size
/// surface or zero-width display) falls back to 1.
pub fn effective_zoom_ratio(
    zoom_factor: u32,
    intrinsic_width: f32,
    display_width: f32,
    expanded: bool,
) -> f32 {
    if expanded {
        return zoom_factor as f32;
    }
    let ratio = display_width / intrinsic_width;
    let ratio = if ratio.is_finite() && ratio != 0.0 { ratio } else { 1.0 };
    zoom_factor as f32 * ratio
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::vec2;

    #[test]
    fn maps_one_to_one_when_display_matches_intrinsic() {
        let px = map_client_to_surface(
            pos2(150.0, 130.0),
            pos2(100.0, 80.0),
            vec2(200.0, 100.0),
            vec2(200.0, 100.0),
        );
        assert_eq!(px, pos2(50.0, 50.0));
    }

    #[test]
    fn round_trips_within_tolerance_at_ratio_one() {
        let min = pos2(12.5, 7.25);
        let intrinsic = vec2(640.0, 480.0);
        for &(cx, cy) in &[(12.5, 7.25), (300.0, 200.0), (652.4, 487.1)] {
            let px = map_client_to_surface(pos2(cx, cy), min, intrinsic, intrinsic);
            let back_x = px.x + min.x;
            let back_y = px.y + min.y;
            assert!((back_x - cx).abs() < 1e-4);
            assert!((back_y - cy).abs() < 1e-4);
        }
    }

    #[test]
    fn scales_through_display_ratio() {
        // Surface shown at half size: one screen point covers two pixels.
        let px = map_client_to_surface(
            pos2(150.0, 90.0),
            pos2(100.0, 80.0),
            vec2(200.0, 100.0),
            vec2(100.0, 50.0),
        );
        assert_eq!(px, pos2(100.0, 20.0));
    }

    #[test]
    fn does_not_clamp_out_of_bounds() {
        let px = map_client_to_surface(
            pos2(90.0, 300.0),
            pos2(100.0, 80.0),
            vec2(200.0, 100.0),
            vec2(200.0, 100.0),
        );
        assert!(px.x < 0.0);
        assert!(px.y > 100.0);
    }

    #[test]
    fn effective_zoom_compensates_display_scale() {
        // Shown at half width: apparent zoom halves.
        assert_eq!(effective_zoom_ratio(2, 200.0, 100.0, false), 1.0);
        assert_eq!(effective_zoom_ratio(4, 1000.0, 250.0, false), 1.0);
    }

    #[test]
    fn effective_zoom_is_raw_when_expanded() {
        // Expanded surfaces are 1:1 — no compensation even if the caller
        // passes a mismatched display width.
        assert_eq!(effective_zoom_ratio(2, 200.0, 100.0, true), 2.0);
        assert_eq!(effective_zoom_ratio(5, 200.0, 200.0, true), 5.0);
    }

    #[test]
    fn effective_zoom_degenerate_ratio_falls_back_to_one() {
        assert_eq!(effective_zoom_ratio(3, 200.0, 0.0, false), 3.0);
        assert_eq!(effective_zoom_ratio(3, 0.0, 200.0, false), 3.0);
    }
}
