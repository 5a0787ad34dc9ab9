// SPDX-License-Identifier: MPL-2.0
//! Canvas overlay drawing the bounding quadrilateral of each valid result.
//!
//! Result positions are in the image's natural pixel coordinates; the
//! overlay maps them into the displayed area using the same contain-fit
//! placement the image widget applies, inset by a small bleed margin so
//! strokes on the image edge stay visible.

use crate::decode::DecodeResult;
use iced::widget::canvas;
use iced::{mouse, Color, Rectangle, Renderer, Theme};
use std::marker::PhantomData;

/// Margin around the displayed image, in canvas pixels.
pub const BLEED: f32 = 4.0;

/// Stroke width of a result quadrilateral.
const QUAD_STROKE_WIDTH: f32 = 3.0;

/// Stroke color of a result quadrilateral.
const QUAD_STROKE_COLOR: Color = Color::from_rgb(0.957, 0.263, 0.212);

/// Uniform mapping from natural image coordinates into display space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct FitMapping {
    pub scale: f32,
    pub offset_x: f32,
    pub offset_y: f32,
}

/// Computes the contain-fit placement of a `img_width x img_height` image
/// inside a `bounds_width x bounds_height` area.
pub(crate) fn contain_fit(
    img_width: f32,
    img_height: f32,
    bounds_width: f32,
    bounds_height: f32,
) -> FitMapping {
    if img_width <= 0.0 || img_height <= 0.0 {
        return FitMapping {
            scale: 0.0,
            offset_x: 0.0,
            offset_y: 0.0,
        };
    }

    let scale = (bounds_width / img_width).min(bounds_height / img_height);
    let display_width = img_width * scale;
    let display_height = img_height * scale;

    FitMapping {
        scale,
        offset_x: (bounds_width - display_width) / 2.0,
        offset_y: (bounds_height - display_height) / 2.0,
    }
}

impl FitMapping {
    /// Maps a natural-coordinate point into display space.
    pub(crate) fn map(&self, point: crate::decode::Point) -> iced::Point {
        iced::Point::new(
            self.offset_x + point.x * self.scale,
            self.offset_y + point.y * self.scale,
        )
    }
}

/// Canvas program that strokes the quadrilateral of every valid result.
///
/// The overlay is purely visual; it never captures events.
pub struct ResultOverlay<'a, Message> {
    pub img_width: u32,
    pub img_height: u32,
    pub results: &'a [DecodeResult],
    pub _message: PhantomData<Message>,
}

impl<'a, Message> ResultOverlay<'a, Message> {
    pub fn new(img_width: u32, img_height: u32, results: &'a [DecodeResult]) -> Self {
        Self {
            img_width,
            img_height,
            results,
            _message: PhantomData,
        }
    }
}

impl<Message> canvas::Program<Message> for ResultOverlay<'_, Message> {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<canvas::Geometry> {
        use iced::widget::canvas::{Frame, Path, Stroke};

        let mut frame = Frame::new(renderer, bounds.size());

        // The image widget sits inside the same bounds inset by BLEED.
        let mapping = contain_fit(
            self.img_width as f32,
            self.img_height as f32,
            bounds.width - 2.0 * BLEED,
            bounds.height - 2.0 * BLEED,
        );

        for result in self.results.iter().filter(|result| result.is_valid) {
            let corners = result.position.corners();
            let path = Path::new(|builder| {
                let first = mapping.map(corners[0]);
                builder.move_to(iced::Point::new(first.x + BLEED, first.y + BLEED));
                for corner in &corners[1..] {
                    let mapped = mapping.map(*corner);
                    builder.line_to(iced::Point::new(mapped.x + BLEED, mapped.y + BLEED));
                }
                builder.close();
            });

            frame.stroke(
                &path,
                Stroke::default()
                    .with_width(QUAD_STROKE_WIDTH)
                    .with_color(QUAD_STROKE_COLOR),
            );
        }

        vec![frame.into_geometry()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::Point;
    use approx::assert_abs_diff_eq;

    #[test]
    fn wide_image_fits_to_width_and_centers_vertically() {
        let mapping = contain_fit(2000.0, 1000.0, 400.0, 400.0);
        assert_abs_diff_eq!(mapping.scale, 0.2, epsilon = 1e-6);
        assert_abs_diff_eq!(mapping.offset_x, 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(mapping.offset_y, 100.0, epsilon = 1e-6);
    }

    #[test]
    fn tall_image_fits_to_height_and_centers_horizontally() {
        let mapping = contain_fit(500.0, 1000.0, 400.0, 400.0);
        assert_abs_diff_eq!(mapping.scale, 0.4, epsilon = 1e-6);
        assert_abs_diff_eq!(mapping.offset_x, 100.0, epsilon = 1e-6);
        assert_abs_diff_eq!(mapping.offset_y, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn map_scales_and_offsets_points() {
        let mapping = contain_fit(1000.0, 1000.0, 100.0, 100.0);
        let mapped = mapping.map(Point::new(500.0, 250.0));
        assert_abs_diff_eq!(mapped.x, 50.0, epsilon = 1e-6);
        assert_abs_diff_eq!(mapped.y, 25.0, epsilon = 1e-6);
    }

    #[test]
    fn degenerate_image_dimensions_do_not_divide_by_zero() {
        let mapping = contain_fit(0.0, 0.0, 100.0, 100.0);
        assert_eq!(mapping.scale, 0.0);
        let mapped = mapping.map(Point::new(10.0, 10.0));
        assert_eq!(mapped.x, 0.0);
        assert_eq!(mapped.y, 0.0);
    }
}
