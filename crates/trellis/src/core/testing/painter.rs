use crate::{
    error::Result,
    geom::{Point, Rect},
    paint::Painter,
    style::{Color, Style},
};

/// One recorded drawing call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaintOp {
    /// A filled rectangle.
    Fill(Rect, Color),
    /// A rectangle outline.
    Outline(Rect, Color),
    /// A text line.
    Text(Point, Style, String),
}

/// A painter that records every call.
#[derive(Debug, Default)]
pub struct RecordingPainter {
    /// Calls in the order they were made.
    pub ops: Vec<PaintOp>,
}

impl RecordingPainter {
    /// All text drawn, in order.
    pub fn texts(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                PaintOp::Text(_, _, s) => Some(s.as_str()),
                _ => None,
            })
            .collect()
    }

    /// The position of the first text line matching `text`.
    pub fn text_at(&self, text: &str) -> Option<Point> {
        self.ops.iter().find_map(|op| match op {
            PaintOp::Text(p, _, s) if s == text => Some(*p),
            _ => None,
        })
    }

    /// Forget recorded calls.
    pub fn clear(&mut self) {
        self.ops.clear();
    }
}

impl Painter for RecordingPainter {
    fn fill_rect(&mut self, rect: Rect, color: Color) -> Result<()> {
        self.ops.push(PaintOp::Fill(rect, color));
        Ok(())
    }

    fn draw_rect(&mut self, rect: Rect, color: Color) -> Result<()> {
        self.ops.push(PaintOp::Outline(rect, color));
        Ok(())
    }

    fn draw_string(&mut self, at: Point, style: Style, text: &str) -> Result<()> {
        self.ops.push(PaintOp::Text(at, style, text.to_string()));
        Ok(())
    }
}
