//! Magnifier renderer — the floating zoomed preview that follows the
//! cursor while the picker is active.
//!
//! The preview is a fixed-size square pixel buffer composited on the CPU
//! from a cropped region of the surface, uploaded once as a texture and
//! updated in place. The grid overlay and the sampled-color border are
//! stroked over the drawn texture each frame.

use crate::canvas::{Surface, SurfaceView};
use crate::color::parse_hex_color;
use crate::config::MagnifierConfig;
use crate::mapper;
use egui::{
    Color32, ColorImage, Pos2, Rect, Stroke, TextureFilter, TextureOptions, Vec2, pos2, vec2,
};

/// Default grid stroke width. Also baked into the centrality test — see
/// [`is_central_cell`].
const GRID_LINE_WIDTH: f32 = 0.3;
/// Stroke width for the central cell once classified.
const CENTRAL_LINE_WIDTH: f32 = 1.0;
/// Border around the preview, drawn in the sampled color.
const BORDER_WIDTH: f32 = 3.0;

/// Inputs of the last composite; when unchanged, a render call only has
/// to keep the preview visible.
#[derive(Clone, Copy, PartialEq)]
struct RenderKey {
    pixel: Pos2,
    client: Pos2,
    zoom_factor: u32,
    border_color: Color32,
    scroll: Vec2,
    display_width: f32,
    expanded: bool,
}

pub struct Magnifier {
    size: u32,
    grid_size: u32,
    grid_color: Color32,
    central_grid_color: Color32,
    header_height: f32,
    preview: ColorImage,
    texture: Option<egui::TextureHandle>,
    /// Top-left of the preview container in document coordinates
    /// (screen + scroll), as set by the last render.
    container_pos: Pos2,
    border_color: Color32,
    visible: bool,
    last_key: Option<RenderKey>,
}

impl Magnifier {
    /// Build the renderer from its configuration. Fails on unparsable
    /// grid colors — a misconfigured magnifier must not half-work.
    pub fn new(config: &MagnifierConfig, header_height: f32) -> Result<Self, String> {
        let grid_color = parse_hex_color(&config.grid_color)
            .ok_or_else(|| format!("invalid gridColor {:?}", config.grid_color))?;
        let central_grid_color = parse_hex_color(&config.central_grid_color)
            .ok_or_else(|| format!("invalid centralGridColor {:?}", config.central_grid_color))?;
        Ok(Self {
            size: config.size,
            grid_size: config.grid_size,
            grid_color,
            central_grid_color,
            header_height,
            preview: ColorImage::new([config.size as usize; 2], Color32::TRANSPARENT),
            texture: None,
            container_pos: Pos2::ZERO,
            border_color: Color32::TRANSPARENT,
            visible: false,
            last_key: None,
        })
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Current composited preview pixels.
    pub fn preview(&self) -> &ColorImage {
        &self.preview
    }

    /// Recomposite and reposition the preview for a pointer sample.
    ///
    /// `pixel` is the focus point in surface-pixel space, `client` the
    /// pointer in screen coordinates, `border_color` the sampled color.
    /// The composite is skipped when nothing changed since the last call,
    /// so per-frame invocation with a stationary pointer is cheap.
    pub fn render(
        &mut self,
        ctx: &egui::Context,
        surface: &Surface,
        pixel: Pos2,
        client: Pos2,
        zoom_factor: u32,
        border_color: Color32,
        view: &SurfaceView,
    ) {
        let key = RenderKey {
            pixel,
            client,
            zoom_factor,
            border_color,
            scroll: view.scroll,
            display_width: view.display_size.x,
            expanded: surface.expanded,
        };
        if self.visible && self.last_key == Some(key) {
            return;
        }

        let effective_zoom = mapper::effective_zoom_ratio(
            zoom_factor,
            surface.intrinsic_size().x,
            view.display_size.x,
            surface.expanded,
        );
        let half_size = self.size as f32 / 2.0;

        // Crop origin in source-pixel space, clamped so the crop never
        // starts before the surface origin. It may still overrun the far
        // edge; the overrun composites as blank.
        let source_x = (pixel.x - half_size / effective_zoom).max(0.0);
        let source_y = (pixel.y - half_size / effective_zoom).max(0.0);

        let y_offset = image_y_offset(
            client.y,
            half_size,
            zoom_factor,
            self.header_height,
            view.scroll.y,
        );

        self.compose(surface, source_x, source_y, effective_zoom, y_offset);
        self.upload(ctx);

        // The container lives in document space; client coordinates are
        // viewport-relative, so the scroll offset is always added.
        self.container_pos = pos2(
            client.x - half_size + view.scroll.x,
            client.y - half_size + view.scroll.y,
        );
        self.border_color = border_color;
        self.visible = true;
        self.last_key = Some(key);
    }

    /// Hide the preview and release the cursor. Idempotent.
    pub fn hide(&mut self) {
        self.visible = false;
        self.last_key = None;
    }

    /// Draw the preview for this frame: background, magnified image, grid
    /// overlay and sampled-color border, at the document position set by
    /// the last render. Replaces the system cursor while visible.
    pub fn show(&self, ctx: &egui::Context, scroll: Vec2) {
        if !self.visible {
            return;
        }
        let Some(texture) = &self.texture else {
            return;
        };

        ctx.set_cursor_icon(egui::CursorIcon::None);

        let painter = ctx.layer_painter(egui::LayerId::new(
            egui::Order::Foreground,
            egui::Id::new("magnifier_preview"),
        ));
        let rect = Rect::from_min_size(self.container_pos - scroll, Vec2::splat(self.size as f32));

        painter.rect_filled(rect, 0.0, Color32::WHITE);
        painter.image(
            texture.id(),
            rect,
            Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0)),
            Color32::WHITE,
        );
        self.draw_grid(&painter, rect.min);
        painter.rect_stroke(rect, 0.0, Stroke::new(BORDER_WIDTH, self.border_color));
    }

    /// Composite the cropped, scaled source region into the preview
    /// buffer. `y_offset` shifts the image down within the preview (the
    /// vertical position correction); rows above it stay blank, as does
    /// any part of the crop that overruns the surface.
    fn compose(
        &mut self,
        surface: &Surface,
        source_x: f32,
        source_y: f32,
        effective_zoom: f32,
        y_offset: f32,
    ) {
        let size = self.size as usize;
        for dy in 0..size {
            let image_y = dy as f32 - y_offset;
            for dx in 0..size {
                let color = if image_y < 0.0 {
                    Color32::TRANSPARENT
                } else {
                    let sx = source_x + dx as f32 / effective_zoom;
                    let sy = source_y + image_y / effective_zoom;
                    let p = surface.pixel_at(sx, sy);
                    Color32::from_rgba_unmultiplied(p.0[0], p.0[1], p.0[2], p.0[3])
                };
                self.preview.pixels[dy * size + dx] = color;
            }
        }
    }

    fn upload(&mut self, ctx: &egui::Context) {
        let options = TextureOptions {
            magnification: TextureFilter::Nearest,
            minification: TextureFilter::Nearest,
            ..Default::default()
        };
        match &mut self.texture {
            Some(tex) => tex.set(self.preview.clone(), options),
            None => {
                self.texture = Some(ctx.load_texture("magnifier", self.preview.clone(), options));
            }
        }
    }

    /// Stroke the cell grid over the preview. The cell nearest the exact
    /// center — the one holding the sampled pixel — gets a wider stroke
    /// in the central grid color.
    fn draw_grid(&self, painter: &egui::Painter, origin: Pos2) {
        let size = self.size as f32;
        let grid = self.grid_size as f32;
        let mut i = 0.0;
        while i < size {
            let mut j = 0.0;
            while j < size {
                let (width, color) = if is_central_cell(i, j, grid, GRID_LINE_WIDTH, size) {
                    (CENTRAL_LINE_WIDTH, self.central_grid_color)
                } else {
                    (GRID_LINE_WIDTH, self.grid_color)
                };
                let cell = Rect::from_min_size(origin + vec2(i, j), Vec2::splat(grid));
                painter.rect_stroke(cell, 0.0, Stroke::new(width, color));
                j += grid;
            }
            i += grid;
        }
    }
}

/// Whether the grid cell at top-left `(i, j)` is the central cell.
///
/// `line_width` is always the *default* grid stroke width: the original
/// classification ran before the central cell's stroke was widened, and
/// the choice of highlighted cell depends on it. Passing the upgraded
/// width would move the highlight.
pub fn is_central_cell(i: f32, j: f32, grid_size: f32, line_width: f32, magnifier_size: f32) -> bool {
    (i + grid_size + line_width - magnifier_size / 2.0).abs() <= grid_size / 2.0
        && (j + grid_size + line_width - magnifier_size / 2.0).abs() <= grid_size / 2.0
}

/// Vertical position correction for the composited image.
///
/// When the pointer is within one half-preview of the page header, the
/// floating preview overlaps the header; the sampled image is shifted
/// down inside the preview to compensate. Returns the destination Y
/// origin for the composite, 0 when no correction applies.
pub fn image_y_offset(
    client_y: f32,
    half_size: f32,
    zoom_factor: u32,
    header_height: f32,
    scroll_y: f32,
) -> f32 {
    let header_scroll_delta = header_height - scroll_y;
    if client_y - header_height + scroll_y <= half_size && scroll_y <= header_height {
        -(client_y - header_scroll_delta - half_size) / zoom_factor as f32
    } else {
        0.0
    }
}
