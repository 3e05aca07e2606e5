// SPDX-License-Identifier: GPL-3.0-only

//! Square container for the scan region
//!
//! Enforces a 1:1 aspect ratio by sizing itself to the smaller of the
//! available width and height, so the scan region renders square for any
//! container size.

use cosmic::iced::advanced::widget::Tree;
use cosmic::iced::advanced::{Widget, layout};
use cosmic::iced::{Element, Length, Rectangle, Size};
use cosmic::{Renderer, Theme};

use super::scan_frame::square_side;

/// Container that enforces a square aspect ratio (side = min(width, height))
pub struct SquareRegion<'a, Message> {
    content: Element<'a, Message, Theme, Renderer>,
}

impl<'a, Message> SquareRegion<'a, Message> {
    /// Create a new square region wrapping the given content
    pub fn new(content: impl Into<Element<'a, Message, Theme, Renderer>>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

impl<'a, Message> Widget<Message, Theme, Renderer> for SquareRegion<'a, Message> {
    fn size(&self) -> Size<Length> {
        Size::new(Length::Fill, Length::Fill)
    }

    fn layout(
        &self,
        tree: &mut Tree,
        renderer: &Renderer,
        limits: &layout::Limits,
    ) -> layout::Node {
        let max = limits.max();
        let side = square_side(max.width, max.height);

        let square = Size::new(side, side);
        let square_limits = layout::Limits::new(Size::ZERO, square);

        let child_node =
            self.content
                .as_widget()
                .layout(&mut tree.children[0], renderer, &square_limits);

        // Center the square within the available space.
        let x_offset = ((max.width - side) / 2.0).max(0.0);
        let y_offset = ((max.height - side) / 2.0).max(0.0);
        let child_node = child_node.move_to(cosmic::iced::Point::new(x_offset, y_offset));

        layout::Node::with_children(max, vec![child_node])
    }

    fn draw(
        &self,
        tree: &Tree,
        renderer: &mut Renderer,
        theme: &Theme,
        style: &cosmic::iced::advanced::renderer::Style,
        layout: layout::Layout<'_>,
        cursor: cosmic::iced::mouse::Cursor,
        viewport: &Rectangle,
    ) {
        self.content.as_widget().draw(
            &tree.children[0],
            renderer,
            theme,
            style,
            layout.children().next().unwrap(),
            cursor,
            viewport,
        );
    }

    fn children(&self) -> Vec<Tree> {
        vec![Tree::new(&self.content)]
    }

    fn diff(&mut self, tree: &mut Tree) {
        tree.diff_children(std::slice::from_mut(&mut self.content));
    }

    fn operate(
        &self,
        tree: &mut Tree,
        layout: layout::Layout<'_>,
        renderer: &Renderer,
        operation: &mut dyn cosmic::iced::advanced::widget::Operation,
    ) {
        self.content.as_widget().operate(
            &mut tree.children[0],
            layout.children().next().unwrap(),
            renderer,
            operation,
        );
    }

    fn on_event(
        &mut self,
        tree: &mut Tree,
        event: cosmic::iced::Event,
        layout: layout::Layout<'_>,
        cursor: cosmic::iced::mouse::Cursor,
        renderer: &Renderer,
        clipboard: &mut dyn cosmic::iced::advanced::Clipboard,
        shell: &mut cosmic::iced::advanced::Shell<'_, Message>,
        viewport: &Rectangle,
    ) -> cosmic::iced::event::Status {
        self.content.as_widget_mut().on_event(
            &mut tree.children[0],
            event,
            layout.children().next().unwrap(),
            cursor,
            renderer,
            clipboard,
            shell,
            viewport,
        )
    }

    fn mouse_interaction(
        &self,
        tree: &Tree,
        layout: layout::Layout<'_>,
        cursor: cosmic::iced::mouse::Cursor,
        viewport: &Rectangle,
        renderer: &Renderer,
    ) -> cosmic::iced::mouse::Interaction {
        self.content.as_widget().mouse_interaction(
            &tree.children[0],
            layout.children().next().unwrap(),
            cursor,
            viewport,
            renderer,
        )
    }
}

impl<'a, Message: 'a> From<SquareRegion<'a, Message>> for Element<'a, Message, Theme, Renderer> {
    fn from(region: SquareRegion<'a, Message>) -> Self {
        Element::new(region)
    }
}

/// Create a square region that enforces a 1:1 aspect ratio
pub fn square_region<'a, Message>(
    content: impl Into<Element<'a, Message, Theme, Renderer>>,
) -> SquareRegion<'a, Message> {
    SquareRegion::new(content)
}
