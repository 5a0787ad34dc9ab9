// SPDX-License-Identifier: MPL-2.0
//! Top navigation bar for switching between screens.

use crate::app::Screen;
use crate::i18n::fluent::I18n;
use crate::ui::design_tokens::{spacing, typography};
use crate::ui::styles;
use iced::widget::{button, Container, Row, Text};
use iced::{alignment, Element, Length};

/// Messages emitted by the navigation bar.
#[derive(Debug, Clone, Copy)]
pub enum Message {
    ScreenSelected(Screen),
}

/// Renders the navigation bar with the current screen highlighted.
pub fn view<'a>(i18n: &'a I18n, current: Screen) -> Element<'a, Message> {
    let entries = [
        (Screen::Scanner, "navbar-scanner"),
        (Screen::Settings, "navbar-settings"),
        (Screen::About, "navbar-about"),
    ];

    let mut row = Row::new()
        .spacing(spacing::XS)
        .align_y(alignment::Vertical::Center)
        .push(
            Text::new(i18n.tr("window-title"))
                .size(typography::TITLE_MD)
                .width(Length::Fill),
        );

    for (screen, key) in entries {
        let mut entry = button(Text::new(i18n.tr(key)).size(typography::BODY));
        entry = if screen == current {
            entry.style(styles::button::primary)
        } else {
            entry
                .style(styles::button::subtle)
                .on_press(Message::ScreenSelected(screen))
        };
        row = row.push(entry);
    }

    Container::new(row)
        .width(Length::Fill)
        .padding([spacing::SM, spacing::MD])
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_renders_for_each_screen() {
        let i18n = I18n::default();
        for screen in [Screen::Scanner, Screen::Settings, Screen::About] {
            let _element = view(&i18n, screen);
        }
    }
}
