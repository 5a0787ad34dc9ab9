// SPDX-License-Identifier: MPL-2.0
//! One scanned image rendered as a card: the image, the result overlay,
//! a count badge, and an expandable raw-results panel.

use super::overlay::{ResultOverlay, BLEED};
use super::{CardStatus, Message, ScanCard};
use crate::decode::{DecodeResult, ScanOutcome};
use crate::i18n::fluent::I18n;
use crate::ui::design_tokens::{palette, radius, sizing, spacing, typography};
use crate::ui::styles;
use iced::widget::{button, container, image, Canvas, Column, Container, Row, Stack, Text};
use iced::{alignment, Color, Element, Length};

/// Display height of the image area within a card.
const CARD_IMAGE_HEIGHT: f32 = 240.0;

/// Number of payload bytes shown before the hex preview is elided.
const HEX_PREVIEW_BYTES: usize = 12;

/// Renders a single card.
pub fn view<'a>(card: &'a ScanCard, i18n: &'a I18n) -> Element<'a, Message> {
    let mut content = Column::new()
        .spacing(spacing::XS)
        .align_x(alignment::Horizontal::Center)
        .push(image_area(card, i18n))
        .push(
            Text::new(card.name.as_str())
                .size(typography::CAPTION)
                .color(palette::GRAY_400),
        );

    if let CardStatus::Decoded(results) = &card.status {
        if !results.is_empty() {
            let toggle_key = if card.show_details {
                "card-details-hide"
            } else {
                "card-details-show"
            };
            content = content.push(
                button(Text::new(i18n.tr(toggle_key)).size(typography::BODY_SM))
                    .style(styles::button::subtle)
                    .on_press(Message::ToggleDetails(card.id)),
            );

            if card.show_details {
                content = content.push(details(results, i18n));
            }
        }
    }

    Container::new(content)
        .padding(spacing::SM)
        .style(styles::container::card)
        .into()
}

/// The stacked image, overlay, and badge area.
fn image_area<'a>(card: &'a ScanCard, i18n: &'a I18n) -> Element<'a, Message> {
    let width = sizing::CARD_IMAGE_WIDTH + 2.0 * BLEED;
    let height = CARD_IMAGE_HEIGHT + 2.0 * BLEED;

    let mut stack = Stack::new().width(Length::Fixed(width)).height(Length::Fixed(height));

    match (&card.image, &card.status) {
        (Some(data), _) => {
            stack = stack.push(
                Container::new(
                    image(data.handle.clone())
                        .content_fit(iced::ContentFit::Contain)
                        .width(Length::Fill)
                        .height(Length::Fill),
                )
                .padding(BLEED)
                .width(Length::Fill)
                .height(Length::Fill),
            );

            if let CardStatus::Decoded(results) = &card.status {
                stack = stack.push(
                    Canvas::new(ResultOverlay::new(data.width, data.height, results))
                        .width(Length::Fill)
                        .height(Length::Fill),
                );
            }
        }
        (None, CardStatus::LoadFailed) => {
            stack = stack.push(
                Container::new(
                    Text::new(i18n.tr("card-load-error"))
                        .size(typography::BODY_SM)
                        .color(palette::GRAY_400),
                )
                .width(Length::Fill)
                .height(Length::Fill)
                .align_x(alignment::Horizontal::Center)
                .align_y(alignment::Vertical::Center),
            );
        }
        (None, _) => {
            stack = stack.push(
                Container::new(
                    Text::new(i18n.tr("card-decoding"))
                        .size(typography::BODY_SM)
                        .color(palette::GRAY_400),
                )
                .width(Length::Fill)
                .height(Length::Fill)
                .align_x(alignment::Horizontal::Center)
                .align_y(alignment::Vertical::Center),
            );
        }
    }

    let (badge_text, badge_color) = badge(&card.status);
    stack = stack.push(
        Container::new(
            Container::new(Text::new(badge_text).size(typography::CAPTION).color(palette::WHITE))
                .padding([spacing::XXS, spacing::XS])
                .style(move |_theme: &iced::Theme| container::Style {
                    background: Some(iced::Background::Color(badge_color)),
                    border: iced::Border {
                        radius: radius::FULL.into(),
                        ..Default::default()
                    },
                    ..Default::default()
                }),
        )
        .width(Length::Fill)
        .align_x(alignment::Horizontal::Right),
    );

    stack.into()
}

/// Badge content and color for a card's current status.
///
/// Mirrors the decode lifecycle: unknown, in flight, then a result count
/// colored by how many of the results are valid.
fn badge(status: &CardStatus) -> (String, Color) {
    match status {
        CardStatus::Loading | CardStatus::AwaitingEngine => {
            ("?".to_string(), palette::PRIMARY_500)
        }
        CardStatus::Decoding => ("...".to_string(), palette::WARNING_500),
        CardStatus::LoadFailed | CardStatus::DecodeFailed(_) => {
            ("!".to_string(), palette::ERROR_500)
        }
        CardStatus::Decoded(results) => {
            let color = match ScanOutcome::summarize(results) {
                ScanOutcome::Full => palette::SUCCESS_500,
                ScanOutcome::Partial => palette::WARNING_500,
                ScanOutcome::Empty => palette::ERROR_500,
            };
            (results.len().to_string(), color)
        }
    }
}

/// The expandable raw-results panel.
fn details<'a>(results: &'a [DecodeResult], i18n: &'a I18n) -> Element<'a, Message> {
    let mut column = Column::new().spacing(spacing::XXS).width(Length::Fixed(
        sizing::CARD_IMAGE_WIDTH,
    ));

    for (index, result) in results.iter().enumerate() {
        let mut headline = format!("[{}] {} — {}", index + 1, result.format, result.text);
        if !result.is_valid {
            headline.push_str(&format!(" ({})", i18n.tr("card-result-invalid")));
        }

        let mut entry = Column::new()
            .spacing(0.0)
            .push(Text::new(headline).size(typography::BODY_SM));

        if !result.bytes.is_empty() {
            entry = entry.push(
                Text::new(hex_preview(&result.bytes))
                    .size(typography::CAPTION)
                    .color(palette::GRAY_400),
            );
        }
        if let Some(error) = &result.error {
            entry = entry.push(
                Text::new(error.as_str())
                    .size(typography::CAPTION)
                    .color(palette::ERROR_500),
            );
        }

        column = column.push(entry);
    }

    Row::new()
        .push(column)
        .padding([spacing::XXS, spacing::XS])
        .into()
}

/// Formats a byte payload as space-separated hex, elided after
/// [`HEX_PREVIEW_BYTES`] bytes.
fn hex_preview(bytes: &[u8]) -> String {
    let shown: Vec<String> = bytes
        .iter()
        .take(HEX_PREVIEW_BYTES)
        .map(|byte| format!("{byte:02x}"))
        .collect();
    let mut preview = shown.join(" ");
    if bytes.len() > HEX_PREVIEW_BYTES {
        preview.push('…');
    }
    preview
}
