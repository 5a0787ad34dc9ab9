// SPDX-License-Identifier: MPL-2.0
//! Centralized button styles.

use crate::ui::design_tokens::{
    palette::{self, WHITE},
    radius, shadow,
};
use iced::widget::button;
use iced::{Background, Border, Theme};

/// Primary action button (brand colors, consistent in both themes).
pub fn primary(theme: &Theme, status: button::Status) -> button::Style {
    let is_light = matches!(theme, Theme::Light);

    match status {
        button::Status::Active | button::Status::Pressed => button::Style {
            background: Some(Background::Color(palette::PRIMARY_500)),
            text_color: WHITE,
            border: Border {
                color: palette::PRIMARY_600,
                width: 1.0,
                radius: radius::SM.into(),
            },
            shadow: shadow::SM,
            snap: true,
        },
        button::Status::Hovered => button::Style {
            background: Some(Background::Color(palette::PRIMARY_400)),
            text_color: WHITE,
            border: Border {
                color: palette::PRIMARY_500,
                width: 1.0,
                radius: radius::SM.into(),
            },
            shadow: shadow::MD,
            snap: true,
        },
        button::Status::Disabled => button::Style {
            background: Some(Background::Color(if is_light {
                palette::GRAY_200
            } else {
                palette::GRAY_700
            })),
            text_color: palette::GRAY_400,
            border: Border {
                color: palette::GRAY_400,
                width: 1.0,
                radius: radius::SM.into(),
            },
            shadow: shadow::NONE,
            snap: true,
        },
    }
}

/// Quiet button for secondary actions (navbar, dismiss, details toggle).
pub fn subtle(theme: &Theme, status: button::Status) -> button::Style {
    let extended = theme.extended_palette();
    let background = match status {
        button::Status::Hovered | button::Status::Pressed => {
            Some(Background::Color(extended.background.weak.color))
        }
        _ => None,
    };

    button::Style {
        background,
        text_color: extended.background.base.text,
        border: Border {
            radius: radius::SM.into(),
            ..Border::default()
        },
        shadow: shadow::NONE,
        snap: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_disabled_state_is_muted() {
        let style = primary(&Theme::Light, button::Status::Disabled);
        assert_eq!(style.text_color, palette::GRAY_400);
    }

    #[test]
    fn subtle_idle_state_has_no_background() {
        let style = subtle(&Theme::Dark, button::Status::Active);
        assert!(style.background.is_none());
    }
}
