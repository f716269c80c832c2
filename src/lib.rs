//! HuePick — a magnifier color picker for raster images.
//!
//! Open an image onto the canvas surface, activate the picker, and a
//! zoomed, gridded loupe follows the cursor; clicking copies the hovered
//! pixel's color to the system clipboard as `#rrggbb`.

#![allow(clippy::too_many_arguments)]

#[macro_use]
pub mod logger;
pub mod app;
pub mod canvas;
pub mod color;
pub mod config;
pub mod magnifier;
pub mod mapper;
pub mod picker;
