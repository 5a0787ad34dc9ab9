// SPDX-License-Identifier: MPL-2.0
//! About screen: application description and engine details.

use crate::engine::ENGINE_VERSION;
use crate::i18n::fluent::I18n;
use crate::ui::design_tokens::{palette, spacing, typography};
use iced::widget::{Column, Container, Text};
use iced::{alignment, Element, Length};

/// Renders the about screen. The screen has no interactions, so it works
/// for any message type.
pub fn view<M: 'static>(i18n: &I18n) -> Element<'_, M> {
    let title = Text::new(i18n.tr("about-title")).size(typography::TITLE_LG);

    let description = Text::new(i18n.tr("about-description"))
        .size(typography::BODY)
        .width(Length::Fixed(520.0));

    let engine = Text::new(i18n.tr_with_args("about-engine-version", &[("version", ENGINE_VERSION)]))
        .size(typography::BODY_SM)
        .color(palette::GRAY_400);

    let homepage = Text::new(env!("CARGO_PKG_REPOSITORY"))
        .size(typography::BODY_SM)
        .color(palette::GRAY_400);

    let content = Column::new()
        .spacing(spacing::LG)
        .align_x(alignment::Horizontal::Center)
        .push(title)
        .push(description)
        .push(engine)
        .push(homepage);

    Container::new(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .align_x(alignment::Horizontal::Center)
        .align_y(alignment::Vertical::Center)
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_returns_element() {
        let i18n = I18n::default();
        let _element: Element<'_, ()> = view(&i18n);
    }
}
