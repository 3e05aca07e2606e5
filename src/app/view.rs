// SPDX-License-Identifier: GPL-3.0-only

//! Main application view
//!
//! Composes the scanner screen: dismiss control, instruction text, the
//! square scan region (camera preview under the scan frame overlay), the
//! result row once a code decodes, and the rescan control.

use cosmic::Element;
use cosmic::iced::{Alignment, Length};
use cosmic::widget::{self, icon};

use crate::app::scan_frame::scan_frame;
use crate::app::square_region::square_region;
use crate::app::state::{AppModel, Message};
use crate::constants::ui;
use crate::detect::CodeAction;
use crate::fl;

impl AppModel {
    /// Build the main application view
    pub fn view(&self) -> Element<'_, Message> {
        let spacing = cosmic::theme::spacing();

        // Dismiss control, aligned leading like a sheet's close button.
        let dismiss = widget::button::icon(icon::from_name("window-close-symbolic"))
            .on_press(Message::Dismiss);
        let dismiss_row = widget::container(dismiss)
            .width(Length::Fill)
            .align_x(cosmic::iced::alignment::Horizontal::Left);

        let title = widget::text::title3(fl!("place-code-hint"));
        let hint = widget::text::body(fl!("scanning-hint"));

        // The scan region: preview under the bracket/scan-line overlay,
        // forced square for any container size.
        let region = square_region(
            cosmic::iced::widget::stack![
                self.build_preview(),
                Element::from(scan_frame(self.scan_line_position)),
            ]
            .width(Length::Fill)
            .height(Length::Fill),
        );
        let region = widget::container(region)
            .width(Length::Fill)
            .height(Length::Fill)
            .padding([0.0, ui::SCAN_REGION_PADDING]);

        let rescan = widget::button::icon(icon::from_name("view-refresh-symbolic").size(32))
            .on_press(Message::Rescan);

        let mut column = widget::column()
            .push(dismiss_row)
            .push(
                widget::container(title)
                    .width(Length::Fill)
                    .align_x(cosmic::iced::alignment::Horizontal::Center)
                    .padding([spacing.space_s, 0]),
            )
            .push(
                widget::container(hint)
                    .width(Length::Fill)
                    .align_x(cosmic::iced::alignment::Horizontal::Center),
            )
            .push(region)
            .spacing(spacing.space_xxs)
            .align_x(Alignment::Center)
            .width(Length::Fill)
            .height(Length::Fill);

        if let Some(result_row) = self.build_result_row() {
            column = column.push(result_row);
        }

        column = column.push(
            widget::container(rescan)
                .width(Length::Fill)
                .align_x(cosmic::iced::alignment::Horizontal::Center)
                .padding([spacing.space_s, 0]),
        );

        widget::container(column)
            .width(Length::Fill)
            .height(Length::Fill)
            .padding(ui::SCREEN_PADDING)
            .into()
    }

    /// Build the row showing the last decoded code, if any
    fn build_result_row(&self) -> Option<Element<'_, Message>> {
        let detection = self.last_detection.as_ref()?;
        let spacing = cosmic::theme::spacing();

        let action: Element<'_, Message> = match detection.action() {
            CodeAction::Url(url) => widget::button::suggested(fl!("open-link"))
                .on_press(Message::OpenDetected(url))
                .into(),
            CodeAction::Text(text) => widget::button::standard(fl!("copy-text"))
                .on_press(Message::CopyDetected(text))
                .into(),
        };

        Some(
            widget::row()
                .push(widget::text::caption(fl!("scanned-code")))
                .push(widget::text::body(detection.content.as_str()))
                .push(action)
                .spacing(spacing.space_xs)
                .align_y(Alignment::Center)
                .into(),
        )
    }
}
