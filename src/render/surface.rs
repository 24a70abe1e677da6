//! Raster drawing surface with a canvas-style transform stack.

use image::{Rgba, RgbaImage};
use resvg::tiny_skia::{
    self, Color, ColorU8, FilterQuality, Paint, Path, PathBuilder, Pixmap, PixmapPaint, Stroke,
    Transform,
};
use resvg::usvg::Tree;

use crate::color::HexColor;
use crate::error::{MockupError, Result};
use crate::geometry::{Point, Rect};

/// A transparent RGBA surface.
///
/// Drawing calls go through the current transform, which is edited with
/// [`translate`](Self::translate), [`scale`](Self::scale) and
/// [`rotate`](Self::rotate) and bracketed with [`save`](Self::save) /
/// [`restore`](Self::restore), like a 2D canvas context.
pub struct Surface {
    pixmap: Pixmap,
    transform: Transform,
    saved: Vec<Transform>,
}

impl Surface {
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let pixmap = Pixmap::new(width, height).ok_or(MockupError::Surface { width, height })?;
        Ok(Self {
            pixmap,
            transform: Transform::identity(),
            saved: Vec::new(),
        })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Resets every pixel to transparent.
    pub fn clear(&mut self) {
        self.pixmap.fill(Color::TRANSPARENT);
    }

    // ---- Transform stack ----

    pub fn save(&mut self) {
        self.saved.push(self.transform);
    }

    /// Restores the most recently saved transform. Does nothing if none is saved.
    pub fn restore(&mut self) {
        if let Some(transform) = self.saved.pop() {
            self.transform = transform;
        }
    }

    pub fn transform(&self) -> Transform {
        self.transform
    }

    pub fn translate(&mut self, dx: f32, dy: f32) {
        self.transform = self.transform.pre_translate(dx, dy);
    }

    pub fn scale(&mut self, sx: f32, sy: f32) {
        self.transform = self.transform.pre_scale(sx, sy);
    }

    /// Rotates clockwise by `degrees`.
    pub fn rotate(&mut self, degrees: f32) {
        self.transform = self.transform.pre_concat(Transform::from_rotate(degrees));
    }

    // ---- Drawing ----

    pub fn fill_rect(&mut self, rect: Rect, color: HexColor) {
        let Some(rect) = tiny_skia::Rect::from_xywh(rect.x, rect.y, rect.width, rect.height)
        else {
            return;
        };
        self.pixmap
            .fill_rect(rect, &paint_for(color), self.transform, None);
    }

    pub fn fill_path(&mut self, path: &Path, color: HexColor) {
        self.pixmap.fill_path(
            path,
            &paint_for(color),
            tiny_skia::FillRule::Winding,
            self.transform,
            None,
        );
    }

    /// Strokes a straight line of the given `width`.
    pub fn stroke_line(&mut self, from: Point, to: Point, color: HexColor, width: f32) {
        let mut pb = PathBuilder::new();
        pb.move_to(from.x, from.y);
        pb.line_to(to.x, to.y);
        let Some(path) = pb.finish() else {
            return;
        };
        let stroke = Stroke {
            width,
            ..Default::default()
        };
        self.pixmap
            .stroke_path(&path, &paint_for(color), &stroke, self.transform, None);
    }

    /// Draws `image` stretched into `dest` with bilinear filtering.
    pub fn draw_image(&mut self, image: &Pixmap, dest: Rect) {
        let sx = dest.width / image.width() as f32;
        let sy = dest.height / image.height() as f32;
        let transform = self
            .transform
            .pre_translate(dest.x, dest.y)
            .pre_scale(sx, sy);
        let paint = PixmapPaint {
            quality: FilterQuality::Bilinear,
            ..PixmapPaint::default()
        };
        self.pixmap
            .draw_pixmap(0, 0, image.as_ref(), &paint, transform, None);
    }

    /// Renders a parsed SVG tree in surface coordinates.
    pub fn draw_tree(&mut self, tree: &Tree) {
        resvg::render(tree, self.transform, &mut self.pixmap.as_mut());
    }

    /// Copies the surface out as straight-alpha RGBA.
    pub fn to_rgba_image(&self) -> RgbaImage {
        let mut img = RgbaImage::new(self.width(), self.height());
        for (dst, src) in img.pixels_mut().zip(self.pixmap.pixels()) {
            // tiny_skia stores premultiplied alpha
            let color = src.demultiply();
            *dst = Rgba([color.red(), color.green(), color.blue(), color.alpha()]);
        }
        img
    }
}

fn paint_for(color: HexColor) -> Paint<'static> {
    let [r, g, b, a] = color.to_rgba8();
    let mut paint = Paint::default();
    paint.set_color_rgba8(r, g, b, a);
    paint.anti_alias = true;
    paint
}

/// Converts a decoded straight-alpha image into a premultiplied pixmap.
pub fn pixmap_from_rgba(img: &RgbaImage) -> Result<Pixmap> {
    let (width, height) = img.dimensions();
    let mut pixmap = Pixmap::new(width, height).ok_or(MockupError::Surface { width, height })?;
    for (dst, src) in pixmap.pixels_mut().iter_mut().zip(img.pixels()) {
        let [r, g, b, a] = src.0;
        *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
    }
    Ok(pixmap)
}
