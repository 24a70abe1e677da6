//! Text shaping and drawing through usvg.
//!
//! The text block is expressed as a one-element SVG document and laid out by
//! usvg against a font database, which gives real shaping for every family in
//! the font menu plus a width measurement for the underline.

use std::fmt::Write as _;
use std::sync::Arc;

use resvg::usvg::{fontdb, Options, Tree};
use tracing::{debug, warn};

use super::surface::Surface;
use crate::config::CanvasConfig;
use crate::design::{FontFamily, TextBlock, TextStyle};
use crate::error::Result;
use crate::geometry::{Point, Size};

/// Installed families tried, in order, for a generic family whose default
/// face is missing.
const SANS_SERIF_SUBSTITUTES: &[&str] = &[
    "Liberation Sans",
    "Arimo",
    "DejaVu Sans",
    "Noto Sans",
    "FreeSans",
];
const SERIF_SUBSTITUTES: &[&str] = &[
    "Liberation Serif",
    "Tinos",
    "DejaVu Serif",
    "Noto Serif",
    "FreeSerif",
];
const MONOSPACE_SUBSTITUTES: &[&str] = &[
    "Liberation Mono",
    "Cousine",
    "DejaVu Sans Mono",
    "Noto Sans Mono",
    "FreeMono",
];

/// Brackets measured text so leading and trailing spaces keep their advance.
const MEASURE_GUARD: char = 'X';

/// Lays out and draws the design's text.
pub struct TextPainter {
    options: Options<'static>,
    font_size: f32,
    canvas: Size,
}

impl TextPainter {
    /// Builds the font database described by `config`.
    pub fn new(config: &CanvasConfig) -> Self {
        let mut db = fontdb::Database::new();
        if config.system_fonts {
            db.load_system_fonts();
        }
        for dir in &config.font_dirs {
            db.load_fonts_dir(dir);
        }
        debug!(faces = db.len(), "font database loaded");
        Self::with_fontdb(db, config)
    }

    /// Uses an already populated font database.
    ///
    /// Generic families that name no installed face are pointed at one that
    /// is installed, so every menu font falls back to something drawable.
    pub fn with_fontdb(mut db: fontdb::Database, config: &CanvasConfig) -> Self {
        resolve_generic_families(&mut db);
        let mut options = Options::default();
        options.fontdb = Arc::new(db);
        Self {
            options,
            font_size: config.font_size,
            canvas: config.canvas,
        }
    }

    /// Number of font faces available for shaping.
    pub fn face_count(&self) -> usize {
        self.options.fontdb.len()
    }

    /// Shapes the block's text, horizontally centered on its position.
    ///
    /// Returns `None` when there is nothing to draw: empty or whitespace-only
    /// text, or no installed face could render it.
    pub fn layout(&self, block: &TextBlock) -> Result<Option<Tree>> {
        if block.is_empty() {
            return Ok(None);
        }
        let markup = text_markup(block, self.font_size, self.canvas);
        let tree = Tree::from_str(&markup, &self.options)?;
        if !tree.root().has_children() {
            return Ok(None);
        }
        Ok(Some(tree))
    }

    /// Advance width of the text, spaces included.
    ///
    /// Returns 0 for empty text or when no installed face could shape it.
    pub fn measure(&self, content: &str, font: FontFamily, style: TextStyle) -> Result<f32> {
        if content.is_empty() {
            return Ok(0.0);
        }
        let guarded = format!("{MEASURE_GUARD}{content}{MEASURE_GUARD}");
        let guards = format!("{MEASURE_GUARD}{MEASURE_GUARD}");
        match (
            self.advance(&guarded, font, style)?,
            self.advance(&guards, font, style)?,
        ) {
            (Some(with), Some(without)) => Ok((with - without).max(0.0)),
            _ => Ok(0.0),
        }
    }

    /// Width of the laid-out line. usvg sizes text boxes from glyph advances,
    /// not outlines.
    fn advance(&self, content: &str, font: FontFamily, style: TextStyle) -> Result<Option<f32>> {
        let center = Point::new(self.canvas.width / 2.0, self.canvas.height / 2.0);
        let mut block = TextBlock::new(center);
        block.content = content.to_string();
        block.font = font;
        block.style = style;
        Ok(self
            .layout(&block)?
            .map(|tree| tree.root().bounding_box().width()))
    }

    /// Draws the block's text and, when enabled, its underline.
    ///
    /// The underline runs `underline_offset` below the baseline across the
    /// measured text width, centered on the anchor like the text itself.
    pub fn draw(
        &self,
        surface: &mut Surface,
        block: &TextBlock,
        underline_offset: f32,
        underline_thickness: f32,
    ) -> Result<()> {
        if block.is_empty() {
            return Ok(());
        }
        match self.layout(block)? {
            Some(tree) => surface.draw_tree(&tree),
            None if !block.content.trim().is_empty() => {
                warn!(
                    font = block.font.name(),
                    faces = self.face_count(),
                    "no installed font could shape the text"
                );
                return Ok(());
            }
            None => {}
        }

        if block.style.underline {
            let width = self.measure(&block.content, block.font, block.style)?;
            if width > 0.0 {
                let Point { x, y } = block.position;
                let y = y + underline_offset;
                surface.stroke_line(
                    Point::new(x - width / 2.0, y),
                    Point::new(x + width / 2.0, y),
                    block.color,
                    underline_thickness,
                );
            }
        }
        Ok(())
    }
}

/// Points each generic family at an installed face.
///
/// fontdb maps the generics to Microsoft core fonts, which many hosts lack.
/// A generic that does not resolve gets the first installed substitute, or
/// failing that any installed family.
fn resolve_generic_families(db: &mut fontdb::Database) {
    let Some(any_family) = db
        .faces()
        .filter_map(|face| face.families.first())
        .map(|(name, _)| name.clone())
        .min()
    else {
        return;
    };

    for (generic, substitutes) in [
        (fontdb::Family::SansSerif, SANS_SERIF_SUBSTITUTES),
        (fontdb::Family::Serif, SERIF_SUBSTITUTES),
        (fontdb::Family::Monospace, MONOSPACE_SUBSTITUTES),
    ] {
        if resolves(db, generic) {
            continue;
        }
        let family = substitutes
            .iter()
            .copied()
            .find(|name| resolves(db, fontdb::Family::Name(name)))
            .map_or_else(|| any_family.clone(), str::to_string);
        debug!(
            generic = db.family_name(&generic),
            family = family.as_str(),
            "remapping missing generic font family"
        );
        match generic {
            fontdb::Family::Serif => db.set_serif_family(family),
            fontdb::Family::Monospace => db.set_monospace_family(family),
            _ => db.set_sans_serif_family(family),
        }
    }
}

fn resolves(db: &fontdb::Database, family: fontdb::Family<'_>) -> bool {
    db.query(&fontdb::Query {
        families: &[family],
        ..fontdb::Query::default()
    })
    .is_some()
}

/// Builds the SVG document for one line of text.
fn text_markup(block: &TextBlock, font_size: f32, canvas: Size) -> String {
    let weight = if block.style.bold { "bold" } else { "normal" };
    let slant = if block.style.italic { "italic" } else { "normal" };
    let mut svg = String::with_capacity(256 + block.content.len());
    let _ = write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = canvas.width,
        h = canvas.height,
    );
    let _ = write!(
        svg,
        r#"<text x="{x}" y="{y}" font-family="'{family}', {generic}" font-size="{font_size}" font-weight="{weight}" font-style="{slant}" text-anchor="middle" fill="{fill}" xml:space="preserve">"#,
        x = block.position.x,
        y = block.position.y,
        family = block.font.name(),
        generic = block.font.generic_fallback(),
        fill = block.color,
    );
    push_escaped(&mut svg, &block.content);
    svg.push_str("</text></svg>");
    svg
}

/// Appends `text` with XML special characters escaped.
fn push_escaped(out: &mut String, text: &str) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c if c.is_control() => {}
            c => out.push(c),
        }
    }
}
