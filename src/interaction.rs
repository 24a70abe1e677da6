//! Pointer gestures: dragging the text and reordering layer rows.

use crate::design::Design;
use crate::error::Result;
use crate::geometry::Point;

/// Tracks whether the text is being dragged across the canvas.
///
/// Pressing anywhere on the canvas picks the text up; while the pointer is
/// held, every move puts the text anchor under the pointer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextDrag {
    active: bool,
}

impl TextDrag {
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn pointer_down(&mut self) {
        self.active = true;
    }

    pub fn pointer_up(&mut self) {
        self.active = false;
    }

    /// Moves the text to `position` (canvas coordinates) if a drag is active.
    ///
    /// Returns true if the design changed.
    pub fn pointer_move(&self, design: &mut Design, position: Point) -> bool {
        self.active && design.set_text_position(position)
    }
}

/// A layer row being dragged through the layer list.
///
/// `index` is where the dragged layer currently sits. Hovering over another
/// row moves the layer there right away, so the list reorders live while the
/// pointer travels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerDrag {
    index: usize,
}

impl LayerDrag {
    /// Starts dragging the row at `index`.
    pub fn start(design: &Design, index: usize) -> Result<Self> {
        design.layers().get(index)?;
        Ok(Self { index })
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Handles the pointer hovering the row at `target`.
    ///
    /// Returns true if the layer moved.
    pub fn hover(&mut self, design: &mut Design, target: usize) -> Result<bool> {
        if target == self.index {
            return Ok(false);
        }
        design.move_layer(self.index, target)?;
        self.index = target;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CanvasConfig;
    use crate::design::ImageSource;
    use crate::test_support::png_bytes;

    fn design_with(names: &[&str]) -> Design {
        let mut design = Design::new(&CanvasConfig::default());
        for name in names {
            design
                .add_image(ImageSource::new(png_bytes(1, 1)).with_name(*name))
                .unwrap();
        }
        design
    }

    fn order(design: &Design) -> Vec<String> {
        design
            .layers()
            .iter()
            .map(|layer| layer.source.name.clone().unwrap())
            .collect()
    }

    #[test]
    fn text_follows_pointer_only_while_pressed() {
        let mut design = Design::new(&CanvasConfig::default());
        let mut drag = TextDrag::default();

        assert!(!drag.pointer_move(&mut design, Point::new(10.0, 10.0)));
        assert_eq!(design.text().position, Point::new(200.0, 360.0));

        drag.pointer_down();
        assert!(drag.pointer_move(&mut design, Point::new(50.0, 60.0)));
        assert_eq!(design.text().position, Point::new(50.0, 60.0));

        assert!(drag.pointer_move(&mut design, Point::new(500.0, 60.0)));
        assert_eq!(design.text().position, Point::new(400.0, 60.0));

        drag.pointer_up();
        assert!(!drag.pointer_move(&mut design, Point::new(1.0, 1.0)));
        assert_eq!(design.text().position, Point::new(400.0, 60.0));
    }

    #[test]
    fn hover_reorders_live() {
        let mut design = design_with(&["a", "b", "c", "d"]);
        let mut drag = LayerDrag::start(&design, 0).unwrap();

        assert!(drag.hover(&mut design, 1).unwrap());
        assert_eq!(order(&design), ["b", "a", "c", "d"]);
        assert!(drag.hover(&mut design, 3).unwrap());
        assert_eq!(order(&design), ["b", "c", "d", "a"]);
        assert_eq!(drag.index(), 3);

        // Hovering its own row again does nothing.
        assert!(!drag.hover(&mut design, 3).unwrap());
        assert_eq!(order(&design), ["b", "c", "d", "a"]);
    }

    #[test]
    fn hover_past_the_end_is_rejected() {
        let mut design = design_with(&["a", "b"]);
        let mut drag = LayerDrag::start(&design, 1).unwrap();
        assert!(drag.hover(&mut design, 2).is_err());
        assert_eq!(drag.index(), 1);
        assert!(LayerDrag::start(&design, 2).is_err());
    }
}
