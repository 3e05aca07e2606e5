// SPDX-License-Identifier: GPL-3.0-only

//! Scan frame widget implementation
//!
//! Renders the corner brackets and the scan line directly with the
//! renderer, computing geometry at draw time from the laid-out bounds.

use cosmic::iced::advanced::renderer::{self, Renderer as _};
use cosmic::iced::advanced::widget::Tree;
use cosmic::iced::advanced::{Layout, Widget, layout, mouse};
use cosmic::iced::{Border, Color, Element, Length, Rectangle, Shadow, Size, Vector};
use cosmic::{Renderer, Theme};

use super::{bracket_rects, corner_brackets, square_side};
use crate::constants::scan_frame::{
    CORNER_RADIUS, LINE_SHADOW_BLUR, LINE_SHADOW_MAX_OFFSET, LINE_THICKNESS, STROKE_WIDTH,
};

/// Overlay widget drawing the corner brackets and the animated scan line
pub struct ScanFrame {
    /// Scan line position, 0.0 (top) to 1.0 (bottom)
    position: f32,
}

impl ScanFrame {
    /// Create a scan frame with the line at the given sweep position
    pub fn new(position: f32) -> Self {
        Self {
            position: position.clamp(0.0, 1.0),
        }
    }
}

impl<Message> Widget<Message, Theme, Renderer> for ScanFrame {
    fn size(&self) -> Size<Length> {
        Size::new(Length::Fill, Length::Fill)
    }

    fn layout(
        &self,
        _tree: &mut Tree,
        _renderer: &Renderer,
        limits: &layout::Limits,
    ) -> layout::Node {
        layout::Node::new(limits.max())
    }

    fn draw(
        &self,
        _tree: &Tree,
        renderer: &mut Renderer,
        theme: &Theme,
        _style: &renderer::Style,
        layout: Layout<'_>,
        _cursor: mouse::Cursor,
        _viewport: &Rectangle,
    ) {
        let bounds = layout.bounds();
        let side = square_side(bounds.width, bounds.height);
        if side < STROKE_WIDTH {
            return;
        }

        // Center the square region inside the laid-out bounds.
        let region = Rectangle {
            x: bounds.x + (bounds.width - side) / 2.0,
            y: bounds.y + (bounds.height - side) / 2.0,
            width: side,
            height: side,
        };

        let accent: Color = theme.cosmic().accent_color().into();

        for bracket in corner_brackets(side) {
            for rect in bracket_rects(region, &bracket) {
                renderer.fill_quad(
                    renderer::Quad {
                        bounds: rect,
                        border: Border {
                            radius: CORNER_RADIUS.into(),
                            ..Default::default()
                        },
                        shadow: Shadow::default(),
                    },
                    accent,
                );
            }
        }

        // Scan line, offset from the top by the sweep position; the shadow
        // trails further the lower the line travels.
        let line = Rectangle {
            x: region.x,
            y: region.y + self.position * (side - LINE_THICKNESS),
            width: side,
            height: LINE_THICKNESS,
        };
        renderer.fill_quad(
            renderer::Quad {
                bounds: line,
                border: Border::default(),
                shadow: Shadow {
                    color: Color::from_rgba(0.0, 0.0, 0.0, 0.8),
                    offset: Vector::new(0.0, self.position * LINE_SHADOW_MAX_OFFSET),
                    blur_radius: LINE_SHADOW_BLUR,
                },
            },
            accent,
        );
    }
}

impl<'a, Message: 'a> From<ScanFrame> for Element<'a, Message, Theme, Renderer> {
    fn from(widget: ScanFrame) -> Self {
        Element::new(widget)
    }
}

/// Create the scan frame overlay for the given sweep position
pub fn scan_frame(position: f32) -> ScanFrame {
    ScanFrame::new(position)
}
