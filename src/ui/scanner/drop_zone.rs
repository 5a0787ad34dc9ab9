// SPDX-License-Identifier: MPL-2.0
//! Intake widget: a pick button inside a drop target.
//!
//! The whole window accepts drops; this widget is the visual anchor. It
//! highlights while a drag hovers the window and while a collection is
//! running, and the pick button is disabled during both.

use super::Message;
use crate::i18n::fluent::I18n;
use crate::ui::design_tokens::{palette, spacing, typography};
use crate::ui::styles;
use iced::widget::{button, Column, Container, Text};
use iced::{alignment, Element, Length};

/// Renders the drop zone.
pub fn view<'a>(i18n: &'a I18n, drop_hover: bool, collecting: bool) -> Element<'a, Message> {
    let busy = drop_hover || collecting;

    let mut pick_button = button(
        Text::new(i18n.tr("drop-zone-button")).size(typography::BODY),
    )
    .padding([spacing::SM, spacing::LG])
    .style(styles::button::primary);
    if !busy {
        pick_button = pick_button.on_press(Message::PickFiles);
    }

    let hint_key = if collecting {
        "drop-zone-collecting"
    } else {
        "drop-zone-hint"
    };
    let hint = Text::new(i18n.tr(hint_key))
        .size(typography::BODY_SM)
        .color(palette::GRAY_400);

    let content = Column::new()
        .spacing(spacing::SM)
        .align_x(alignment::Horizontal::Center)
        .push(pick_button)
        .push(hint);

    let style = if busy {
        styles::container::card_highlighted
    } else {
        styles::container::card
    };

    Container::new(content)
        .width(Length::Fill)
        .padding(spacing::LG)
        .style(style)
        .into()
}
