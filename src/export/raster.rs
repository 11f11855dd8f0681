//! PNG rasterization using resvg.

use std::io::Cursor;

use image::{ImageFormat, Rgba, RgbaImage};
use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg::{Options, Tree};
use tracing::warn;

use crate::error::{Error, Result};
use crate::svg::create_webflow_optimized_svg;

/// Renders SVG markup onto a transparent `size x size` canvas.
///
/// The artwork is scaled to fit (the larger dimension becomes `size`) and
/// centered along the other axis.
pub fn render_svg(markup: &str, size: u32) -> Result<RgbaImage> {
    let tree = Tree::from_str(markup, &Options::default()).map_err(|e| Error::Raster(e.to_string()))?;

    let svg_size = tree.size();
    let scale = size as f32 / svg_size.width().max(svg_size.height());
    let offset_x = (size as f32 - svg_size.width() * scale) / 2.0;
    let offset_y = (size as f32 - svg_size.height() * scale) / 2.0;

    let mut pixmap = Pixmap::new(size, size)
        .ok_or_else(|| Error::Raster(format!("cannot allocate a {size}x{size} canvas")))?;
    let transform = Transform::from_row(scale, 0.0, 0.0, scale, offset_x, offset_y);
    resvg::render(&tree, transform, &mut pixmap.as_mut());

    Ok(pixmap_to_rgba_image(&pixmap))
}

/// Encodes an image as PNG bytes.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>> {
    let mut bytes = Cursor::new(Vec::new());
    image.write_to(&mut bytes, ImageFormat::Png)?;
    Ok(bytes.into_inner())
}

/// Renders already finalized markup to PNG bytes.
pub fn rasterize_png(markup: &str, size: u32) -> Result<Vec<u8>> {
    encode_png(&render_svg(markup, size)?)
}

/// Optimizes a logo for embedding and rasterizes it.
///
/// Returns `None` if the markup cannot be decoded or rendered.
pub fn svg_to_png(markup: &str, size: u32) -> Option<Vec<u8>> {
    let optimized = create_webflow_optimized_svg(markup);
    match rasterize_png(&optimized, size) {
        Ok(bytes) => Some(bytes),
        Err(error) => {
            warn!(%error, size, "png conversion failed");
            None
        }
    }
}

/// Converts a premultiplied tiny-skia pixmap to a straight-alpha image.
fn pixmap_to_rgba_image(pixmap: &Pixmap) -> RgbaImage {
    let width = pixmap.width();
    let pixels = pixmap.pixels();
    RgbaImage::from_fn(width, pixmap.height(), |x, y| {
        let color = pixels[(y * width + x) as usize].demultiply();
        Rgba([color.red(), color.green(), color.blue(), color.alpha()])
    })
}
