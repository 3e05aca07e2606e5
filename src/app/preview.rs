// SPDX-License-Identifier: GPL-3.0-only

//! Camera preview widget implementation

use cosmic::Element;
use cosmic::iced::{Background, ContentFit, Length};
use cosmic::widget;

use crate::app::state::{AppModel, Message};
use crate::fl;

impl AppModel {
    /// Build the camera preview for the scan region
    ///
    /// Pure rendering: the latest frame, aspect-filled and clipped to the
    /// region; a themed placeholder while no frame has arrived. Rebuilt
    /// from current state on every layout pass, so size and session
    /// updates always take effect.
    pub fn build_preview(&self) -> Element<'_, Message> {
        if let Some(frame) = &self.current_frame {
            let handle = widget::image::Handle::from_rgba(
                frame.width,
                frame.height,
                frame.to_tight_rgba(),
            );

            widget::image(handle)
                .content_fit(ContentFit::Cover)
                .width(Length::Fill)
                .height(Length::Fill)
                .into()
        } else {
            widget::container(widget::text(fl!("waiting-for-camera")))
                .width(Length::Fill)
                .height(Length::Fill)
                .align_x(cosmic::iced::alignment::Horizontal::Center)
                .align_y(cosmic::iced::alignment::Vertical::Center)
                .style(|theme: &cosmic::Theme| widget::container::Style {
                    background: Some(Background::Color(theme.cosmic().bg_color().into())),
                    text_color: Some(theme.cosmic().on_bg_color().into()),
                    ..Default::default()
                })
                .into()
        }
    }
}
