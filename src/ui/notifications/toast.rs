// SPDX-License-Identifier: MPL-2.0
//! Toast widget for rendering individual notifications.
//!
//! Toasts are small cards with a severity-colored accent border, a glyph
//! marking the severity, the resolved message, and a dismiss button.

use super::manager::{Manager, Message};
use super::notification::{Notification, Severity};
use crate::i18n::fluent::I18n;
use crate::ui::design_tokens::{palette, radius, shadow, sizing, spacing, typography};
use iced::widget::{button, container, text, Column, Container, Row, Text};
use iced::{alignment, Color, Element, Length, Theme};

/// Toast widget renderer.
pub struct Toast;

impl Toast {
    /// Renders a single toast notification.
    pub fn view<'a>(notification: &'a Notification, i18n: &'a I18n) -> Element<'a, Message> {
        let severity = notification.severity();
        let accent_color = severity.color();

        let message_text = if notification.message_args().is_empty() {
            i18n.tr(notification.message_key())
        } else {
            let args: Vec<(&str, &str)> = notification
                .message_args()
                .iter()
                .map(|(k, v)| (k.as_str(), v.as_str()))
                .collect();
            i18n.tr_with_args(notification.message_key(), &args)
        };

        let glyph = Text::new(Self::severity_glyph(severity))
            .size(typography::TITLE_SM)
            .color(accent_color);

        let message_widget =
            Text::new(message_text)
                .size(typography::BODY)
                .style(|theme: &Theme| text::Style {
                    color: Some(theme.palette().text),
                });

        let dismiss_button = button(Text::new("\u{2715}").size(typography::BODY_SM))
            .on_press(Message::Dismiss(notification.id()))
            .padding(spacing::XXS)
            .style(crate::ui::styles::button::subtle);

        let content = Row::new()
            .spacing(spacing::SM)
            .align_y(alignment::Vertical::Center)
            .push(Container::new(glyph).padding(spacing::XXS))
            .push(
                Container::new(message_widget)
                    .width(Length::Fill)
                    .align_x(alignment::Horizontal::Left),
            )
            .push(dismiss_button);

        Container::new(content)
            .width(Length::Fixed(sizing::TOAST_WIDTH))
            .padding(spacing::SM)
            .style(move |theme: &Theme| toast_container_style(theme, accent_color))
            .into()
    }

    /// Renders the toast overlay with all visible notifications, stacked
    /// in the bottom-right corner.
    pub fn view_overlay<'a>(manager: &'a Manager, i18n: &'a I18n) -> Element<'a, Message> {
        let toasts: Vec<Element<'a, Message>> = manager
            .visible()
            .map(|notification| Self::view(notification, i18n))
            .collect();

        if toasts.is_empty() {
            return Container::new(text(""))
                .width(Length::Shrink)
                .height(Length::Shrink)
                .into();
        }

        let toast_column = Column::with_children(toasts)
            .spacing(spacing::XS)
            .align_x(alignment::Horizontal::Right);

        Container::new(toast_column)
            .width(Length::Fill)
            .height(Length::Fill)
            .align_x(alignment::Horizontal::Right)
            .align_y(alignment::Vertical::Bottom)
            .padding(spacing::MD)
            .into()
    }

    /// Returns the text glyph marking the severity level.
    fn severity_glyph(severity: Severity) -> &'static str {
        match severity {
            Severity::Success => "\u{2713}",
            Severity::Info => "\u{2139}",
            Severity::Warning | Severity::Error => "\u{26A0}",
        }
    }
}

/// Style function for the toast container.
fn toast_container_style(theme: &Theme, accent_color: Color) -> container::Style {
    let bg_color = theme.extended_palette().background.base.color;

    container::Style {
        background: Some(iced::Background::Color(bg_color)),
        border: iced::Border {
            color: accent_color,
            width: 2.0,
            radius: radius::MD.into(),
        },
        shadow: shadow::MD,
        text_color: Some(theme.palette().text),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toast_container_style_uses_accent_color() {
        let style = toast_container_style(&Theme::Dark, palette::SUCCESS_500);
        assert_eq!(style.border.color, palette::SUCCESS_500);
        assert!(style.background.is_some());
    }

    #[test]
    fn severity_glyphs_are_defined() {
        assert_eq!(Toast::severity_glyph(Severity::Success), "\u{2713}");
        assert_eq!(
            Toast::severity_glyph(Severity::Warning),
            Toast::severity_glyph(Severity::Error)
        );
    }
}
