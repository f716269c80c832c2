//! The drawing surface — the raster image being color-picked.
//!
//! The surface has two independent sizes: the intrinsic pixel-buffer
//! dimensions and the on-screen display dimensions. Collapsed (the
//! default) it is scaled down to fit the window width; expanded it is
//! shown 1:1 and scrolls. All pixel reads happen in intrinsic space.

use egui::{Color32, ColorImage, Rect, TextureFilter, TextureId, TextureOptions, Vec2, vec2};
use image::{Rgba, RgbaImage};
use std::path::Path;

/// Returned by reference for reads outside the surface bounds.
static TRANSPARENT_PIXEL: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// On-screen geometry of the surface for the current frame, captured where
/// the canvas is laid out and threaded into the mapping/render paths.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceView {
    /// Screen rect the surface occupies (moves with the scroll area).
    pub rect: Rect,
    /// On-screen display size (≠ intrinsic size when scaled to fit).
    pub display_size: Vec2,
    /// Scroll offset of the canvas area; converts screen coordinates into
    /// document coordinates.
    pub scroll: Vec2,
}

pub struct Surface {
    pixels: RgbaImage,
    /// Actual-size (1:1) display instead of fit-to-width.
    pub expanded: bool,
    texture: Option<egui::TextureHandle>,
    texture_dirty: bool,
}

impl Surface {
    pub fn from_image(pixels: RgbaImage) -> Self {
        Self {
            pixels,
            expanded: false,
            texture: None,
            texture_dirty: true,
        }
    }

    /// Decode an image file into a surface. Any format the `image` crate
    /// understands is accepted.
    pub fn from_path(path: &Path) -> Result<Self, String> {
        let img = image::open(path)
            .map_err(|e| format!("cannot open {}: {}", path.display(), e))?;
        Ok(Self::from_image(img.to_rgba8()))
    }

    /// Generated stand-in shown when no image was given on the command
    /// line — a color gradient, so the picker has something to sample.
    pub fn placeholder() -> Self {
        let (w, h) = (1280u32, 800u32);
        let mut img = RgbaImage::new(w, h);
        for (x, y, px) in img.enumerate_pixels_mut() {
            let r = (x * 255 / (w - 1)) as u8;
            let g = (y * 255 / (h - 1)) as u8;
            let b = 255 - ((x + y) * 255 / (w + h - 2)) as u8;
            *px = Rgba([r, g, b, 255]);
        }
        Self::from_image(img)
    }

    /// Swap in a newly loaded image, keeping display mode.
    pub fn replace_image(&mut self, pixels: RgbaImage) {
        self.pixels = pixels;
        self.texture_dirty = true;
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Intrinsic pixel-buffer dimensions.
    pub fn intrinsic_size(&self) -> Vec2 {
        vec2(self.pixels.width() as f32, self.pixels.height() as f32)
    }

    /// Read one pixel at fractional intrinsic coordinates (floored).
    /// Reads outside the buffer yield transparent black.
    pub fn pixel_at(&self, x: f32, y: f32) -> Rgba<u8> {
        if x < 0.0 || y < 0.0 {
            return TRANSPARENT_PIXEL;
        }
        let (px, py) = (x as u32, y as u32);
        if px >= self.pixels.width() || py >= self.pixels.height() {
            return TRANSPARENT_PIXEL;
        }
        *self.pixels.get_pixel(px, py)
    }

    /// On-screen display size: intrinsic when expanded, otherwise scaled
    /// down (never up) to fit `available_width`, preserving aspect.
    pub fn display_size(&self, available_width: f32) -> Vec2 {
        let intrinsic = self.intrinsic_size();
        if self.expanded {
            return intrinsic;
        }
        let scale = (available_width / intrinsic.x).min(1.0);
        intrinsic * scale
    }

    /// Texture for drawing the surface; uploaded once and updated in
    /// place when the pixels change.
    pub fn texture_id(&mut self, ctx: &egui::Context) -> TextureId {
        let options = TextureOptions {
            magnification: TextureFilter::Nearest,
            minification: TextureFilter::Linear,
            ..Default::default()
        };
        match &mut self.texture {
            Some(tex) => {
                if self.texture_dirty {
                    tex.set(color_image(&self.pixels), options);
                    self.texture_dirty = false;
                }
                tex.id()
            }
            None => {
                let tex = ctx.load_texture("surface", color_image(&self.pixels), options);
                let id = tex.id();
                self.texture = Some(tex);
                self.texture_dirty = false;
                id
            }
        }
    }
}

/// Convert an [`RgbaImage`] to egui's [`ColorImage`].
fn color_image(img: &RgbaImage) -> ColorImage {
    let pixels = img
        .as_raw()
        .chunks_exact(4)
        .map(|p| Color32::from_rgba_unmultiplied(p[0], p[1], p[2], p[3]))
        .collect();
    ColorImage {
        size: [img.width() as usize, img.height() as usize],
        pixels,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker(w: u32, h: u32) -> Surface {
        let mut img = RgbaImage::new(w, h);
        for (x, y, px) in img.enumerate_pixels_mut() {
            *px = if (x + y) % 2 == 0 {
                Rgba([255, 0, 0, 255])
            } else {
                Rgba([0, 0, 255, 255])
            };
        }
        Surface::from_image(img)
    }

    #[test]
    fn pixel_at_floors_fractional_coordinates() {
        let s = checker(4, 4);
        assert_eq!(s.pixel_at(0.9, 0.9), Rgba([255, 0, 0, 255]));
        assert_eq!(s.pixel_at(1.1, 0.0), Rgba([0, 0, 255, 255]));
    }

    #[test]
    fn out_of_bounds_reads_are_transparent_black() {
        let s = checker(4, 4);
        assert_eq!(s.pixel_at(-0.5, 1.0), Rgba([0, 0, 0, 0]));
        assert_eq!(s.pixel_at(1.0, -3.0), Rgba([0, 0, 0, 0]));
        assert_eq!(s.pixel_at(4.0, 0.0), Rgba([0, 0, 0, 0]));
        assert_eq!(s.pixel_at(0.0, 400.0), Rgba([0, 0, 0, 0]));
    }

    #[test]
    fn display_size_fits_width_when_collapsed() {
        let s = checker(200, 100);
        assert_eq!(s.display_size(100.0), vec2(100.0, 50.0));
        // Never upscaled beyond intrinsic size.
        assert_eq!(s.display_size(1000.0), vec2(200.0, 100.0));
    }

    #[test]
    fn display_size_is_intrinsic_when_expanded() {
        let mut s = checker(200, 100);
        s.expanded = true;
        assert_eq!(s.display_size(50.0), vec2(200.0, 100.0));
    }
}
