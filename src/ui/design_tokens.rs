// SPDX-License-Identifier: MPL-2.0
//! Design tokens centralized following the W3C Design Tokens standard.
//!
//! - **Palette**: Base colors
//! - **Opacity**: Standardized opacity levels
//! - **Spacing**: Spacing scale (8px grid)
//! - **Sizing**: Component sizes
//! - **Typography**: Font size scale
//! - **Radius**: Border radii

use iced::Color;

pub mod palette {
    use super::Color;

    // Grayscale
    pub const BLACK: Color = Color::BLACK;
    pub const WHITE: Color = Color::WHITE;
    pub const GRAY_900: Color = Color::from_rgb(0.1, 0.1, 0.1);
    pub const GRAY_700: Color = Color::from_rgb(0.3, 0.3, 0.3);
    pub const GRAY_400: Color = Color::from_rgb(0.4, 0.4, 0.4);
    pub const GRAY_200: Color = Color::from_rgb(0.75, 0.75, 0.75);
    pub const GRAY_100: Color = Color::from_rgb(0.85, 0.85, 0.85);

    // Brand colors (blue scale)
    pub const PRIMARY_400: Color = Color::from_rgb(0.4, 0.7, 1.0);
    pub const PRIMARY_500: Color = Color::from_rgb(0.3, 0.6, 0.9);
    pub const PRIMARY_600: Color = Color::from_rgb(0.2, 0.5, 0.8);

    // Semantic colors
    pub const ERROR_500: Color = Color::from_rgb(0.898, 0.224, 0.208);
    pub const WARNING_500: Color = Color::from_rgb(0.945, 0.651, 0.125);
    pub const SUCCESS_500: Color = Color::from_rgb(0.263, 0.702, 0.404);
    pub const INFO_500: Color = Color::from_rgb(0.392, 0.588, 1.0);
}

pub mod opacity {
    pub const OVERLAY_SUBTLE: f32 = 0.2;
    pub const OVERLAY_MEDIUM: f32 = 0.5;
    pub const OVERLAY_STRONG: f32 = 0.7;

    /// Surface background - Semi-transparent panels and containers
    pub const SURFACE: f32 = 0.95;
}

pub mod spacing {
    pub const XXS: f32 = 4.0; // 0.5 unit
    pub const XS: f32 = 8.0; // 1 unit
    pub const SM: f32 = 12.0; // 1.5 units
    pub const MD: f32 = 16.0; // 2 units
    pub const LG: f32 = 24.0; // 3 units
    pub const XL: f32 = 32.0; // 4 units
}

pub mod sizing {
    pub const ICON_SM: f32 = 16.0;
    pub const ICON_MD: f32 = 24.0;
    pub const ICON_XL: f32 = 48.0;

    /// Maximum displayed width of a scanned image card.
    pub const CARD_IMAGE_WIDTH: f32 = 320.0;
    pub const TOAST_WIDTH: f32 = 320.0;
}

pub mod typography {
    /// Large title - Main page headings (Settings, About)
    pub const TITLE_LG: f32 = 30.0;

    /// Medium title - App name, prominent labels
    pub const TITLE_MD: f32 = 20.0;

    /// Small title - Section headers
    pub const TITLE_SM: f32 = 18.0;

    /// Standard body - Most UI text, labels, descriptions
    pub const BODY: f32 = 14.0;

    /// Small body - Hints, secondary labels
    pub const BODY_SM: f32 = 13.0;

    /// Caption - Badges, timestamps, small info
    pub const CAPTION: f32 = 12.0;
}

pub mod radius {
    pub const SM: f32 = 4.0;
    pub const MD: f32 = 8.0;
    pub const LG: f32 = 12.0;
    pub const FULL: f32 = 9999.0; // Pill shape
}

pub mod shadow {
    use super::palette;
    use iced::{Shadow, Vector};

    pub const NONE: Shadow = Shadow {
        color: palette::BLACK,
        offset: Vector::ZERO,
        blur_radius: 0.0,
    };

    pub const SM: Shadow = Shadow {
        color: palette::BLACK,
        offset: Vector { x: 0.0, y: 2.0 },
        blur_radius: 4.0,
    };

    pub const MD: Shadow = Shadow {
        color: palette::BLACK,
        offset: Vector { x: 0.0, y: 4.0 },
        blur_radius: 8.0,
    };
}

const _: () = {
    assert!(spacing::XS > 0.0);
    assert!(spacing::SM > spacing::XS);
    assert!(spacing::MD > spacing::SM);
    assert!(spacing::LG > spacing::MD);
    assert!(typography::TITLE_LG > typography::TITLE_MD);
    assert!(typography::BODY > typography::BODY_SM);
    assert!(palette::PRIMARY_500.r >= 0.0 && palette::PRIMARY_500.r <= 1.0);
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spacing_scale_is_consistent() {
        assert_eq!(spacing::MD, spacing::XS * 2.0);
        assert_eq!(spacing::LG, spacing::MD * 1.5);
    }
}
