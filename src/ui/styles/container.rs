// SPDX-License-Identifier: MPL-2.0
//! Container styles.

use crate::ui::design_tokens::{opacity, radius};
use iced::widget::container;
use iced::{Background, Border, Color, Theme};

/// Generic panel surface used for the settings form and result cards.
///
/// The color is derived from the active Iced `Theme` background, with a
/// slight opacity, so panels stay readable in both light and dark modes
/// without hard-coding colors.
pub fn panel(theme: &Theme) -> container::Style {
    let palette = theme.extended_palette();
    let base = palette.background.base.color;

    container::Style {
        background: Some(Background::Color(Color::from_rgba(
            base.r,
            base.g,
            base.b,
            opacity::SURFACE,
        ))),
        border: Border {
            radius: radius::LG.into(),
            ..Default::default()
        },
        ..Default::default()
    }
}

/// Raised card surface for one scanned image.
pub fn card(theme: &Theme) -> container::Style {
    let palette = theme.extended_palette();

    container::Style {
        background: Some(Background::Color(palette.background.weak.color)),
        border: Border {
            color: palette.background.strong.color,
            width: 1.0,
            radius: radius::MD.into(),
        },
        ..Default::default()
    }
}

/// Highlighted variant of [`card`] shown while a drop hovers the window.
pub fn card_highlighted(theme: &Theme) -> container::Style {
    let palette = theme.extended_palette();

    container::Style {
        background: Some(Background::Color(palette.primary.weak.color)),
        border: Border {
            color: palette.primary.strong.color,
            width: 2.0,
            radius: radius::MD.into(),
        },
        ..Default::default()
    }
}
