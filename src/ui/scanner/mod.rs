// SPDX-License-Identifier: MPL-2.0
//! Scanner screen: intake widget plus the grid of scanned images.
//!
//! Cards move through a small lifecycle: collected bytes are rasterized
//! for display, then handed to the engine once it is ready. Each step can
//! fail independently without touching the other cards.

mod card;
mod drop_zone;
pub mod overlay;

use crate::app::EngineStatus;
use crate::decode::DecodeResult;
use crate::i18n::fluent::I18n;
use crate::media::ImageData;
use crate::ui::design_tokens::{palette, spacing, typography};
use crate::ui::styles;
use iced::widget::{button, scrollable, Column, Container, Row, Text};
use iced::{alignment, Element, Length};

/// Cards per grid row.
const GRID_COLUMNS: usize = 3;

/// Messages emitted by the scanner screen.
#[derive(Debug, Clone, Copy)]
pub enum Message {
    /// Open the multi-file picker.
    PickFiles,
    /// Open the folder picker.
    PickFolder,
    /// Remove every card.
    Clear,
    /// Expand or collapse a card's raw-results panel.
    ToggleDetails(usize),
}

/// Decode lifecycle of one card.
#[derive(Debug, Clone)]
pub enum CardStatus {
    /// Bytes are being rasterized for display.
    Loading,
    /// The bytes could not be rasterized.
    LoadFailed,
    /// Displayable, but the engine is not ready yet.
    AwaitingEngine,
    /// A decode task is in flight.
    Decoding,
    /// The engine rejected the image.
    DecodeFailed(String),
    /// Results are in (possibly zero of them).
    Decoded(Vec<DecodeResult>),
}

/// One collected image and its scan state.
#[derive(Debug, Clone)]
pub struct ScanCard {
    pub id: usize,
    pub name: String,
    pub image: Option<ImageData>,
    pub status: CardStatus,
    pub show_details: bool,
}

/// Scanner screen state.
#[derive(Debug, Default)]
pub struct State {
    cards: Vec<ScanCard>,
    next_id: usize,
    /// A collection task is running.
    pub collecting: bool,
    /// A drag is hovering the window.
    pub drop_hover: bool,
}

impl State {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new card for a collected file and returns its id.
    pub fn add_card(&mut self, name: String) -> usize {
        let id = self.next_id;
        self.next_id += 1;
        self.cards.push(ScanCard {
            id,
            name,
            image: None,
            status: CardStatus::Loading,
            show_details: false,
        });
        id
    }

    /// Stores the rasterized image for a card. The card waits for the
    /// engine until a decode task is dispatched.
    pub fn set_image(&mut self, id: usize, image: ImageData) {
        if let Some(card) = self.card_mut(id) {
            card.image = Some(image);
            card.status = CardStatus::AwaitingEngine;
        }
    }

    /// Marks a card as undisplayable.
    pub fn set_load_failed(&mut self, id: usize) {
        if let Some(card) = self.card_mut(id) {
            card.status = CardStatus::LoadFailed;
        }
    }

    /// Marks a card's decode task as dispatched.
    pub fn set_decoding(&mut self, id: usize) {
        if let Some(card) = self.card_mut(id) {
            if matches!(card.status, CardStatus::AwaitingEngine) {
                card.status = CardStatus::Decoding;
            }
        }
    }

    /// Records a decode outcome.
    pub fn set_decode_outcome(
        &mut self,
        id: usize,
        outcome: Result<Vec<DecodeResult>, String>,
    ) {
        if let Some(card) = self.card_mut(id) {
            card.status = match outcome {
                Ok(results) => CardStatus::Decoded(results),
                Err(message) => CardStatus::DecodeFailed(message),
            };
        }
    }

    /// Cards that are displayable but have not been decoded yet, with
    /// their shared pixel data for dispatching decode tasks.
    #[must_use]
    pub fn awaiting_engine(&self) -> Vec<(usize, ImageData)> {
        self.cards
            .iter()
            .filter(|card| matches!(card.status, CardStatus::AwaitingEngine))
            .filter_map(|card| card.image.clone().map(|image| (card.id, image)))
            .collect()
    }

    /// Expands or collapses a card's raw-results panel.
    pub fn toggle_details(&mut self, id: usize) {
        if let Some(card) = self.card_mut(id) {
            card.show_details = !card.show_details;
        }
    }

    /// Removes every card.
    pub fn clear(&mut self) {
        self.cards.clear();
    }

    #[must_use]
    pub fn cards(&self) -> &[ScanCard] {
        &self.cards
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    fn card_mut(&mut self, id: usize) -> Option<&mut ScanCard> {
        self.cards.iter_mut().find(|card| card.id == id)
    }

    /// Handles scanner-local messages. Picker messages are routed by the
    /// application because they spawn dialogs.
    pub fn handle_message(&mut self, message: Message) {
        match message {
            Message::ToggleDetails(id) => self.toggle_details(id),
            Message::Clear => self.clear(),
            Message::PickFiles | Message::PickFolder => {}
        }
    }
}

/// Renders the scanner screen.
pub fn view<'a>(
    state: &'a State,
    i18n: &'a I18n,
    engine_status: &'a EngineStatus,
) -> Element<'a, Message> {
    let mut content = Column::new()
        .spacing(spacing::MD)
        .padding(spacing::MD)
        .push(drop_zone::view(i18n, state.drop_hover, state.collecting));

    let mut actions = Row::new()
        .spacing(spacing::SM)
        .align_y(alignment::Vertical::Center)
        .push(
            button(Text::new(i18n.tr("scanner-open-folder")).size(typography::BODY_SM))
                .style(styles::button::subtle)
                .on_press(Message::PickFolder),
        );
    if !state.is_empty() {
        actions = actions.push(
            button(Text::new(i18n.tr("scanner-clear")).size(typography::BODY_SM))
                .style(styles::button::subtle)
                .on_press(Message::Clear),
        );
    }
    actions = actions.push(
        Container::new(
            Text::new(engine_status_line(engine_status, i18n))
                .size(typography::CAPTION)
                .color(palette::GRAY_400),
        )
        .width(Length::Fill)
        .align_x(alignment::Horizontal::Right),
    );
    content = content.push(actions);

    if state.is_empty() {
        content = content.push(empty_state(i18n));
    } else {
        let mut grid = Column::new().spacing(spacing::SM);
        for chunk in state.cards().chunks(GRID_COLUMNS) {
            let mut row = Row::new().spacing(spacing::SM);
            for scan_card in chunk {
                row = row.push(card::view(scan_card, i18n));
            }
            grid = grid.push(row);
        }
        content = content.push(grid);
    }

    scrollable(content).width(Length::Fill).height(Length::Fill).into()
}

/// The placeholder shown before anything has been scanned.
fn empty_state(i18n: &I18n) -> Element<'_, Message> {
    let title = Text::new(i18n.tr("scanner-empty-title"))
        .size(typography::TITLE_SM)
        .color(palette::GRAY_400);
    let subtitle = Text::new(i18n.tr("scanner-empty-subtitle"))
        .size(typography::BODY)
        .color(palette::GRAY_400);

    Container::new(
        Column::new()
            .spacing(spacing::SM)
            .align_x(alignment::Horizontal::Center)
            .push(title)
            .push(subtitle),
    )
    .width(Length::Fill)
    .padding(spacing::XL)
    .align_x(alignment::Horizontal::Center)
    .into()
}

fn engine_status_line(status: &EngineStatus, i18n: &I18n) -> String {
    match status {
        EngineStatus::Ready => i18n.tr("engine-status-ready"),
        EngineStatus::Missing => i18n.tr("engine-status-missing"),
        EngineStatus::Downloading(progress) => {
            let percent = (progress * 100.0).round() as u32;
            i18n.tr_with_args("engine-status-downloading", &[("percent", &percent.to_string())])
        }
        EngineStatus::Failed(_) => i18n.tr("engine-status-failed"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_image() -> ImageData {
        ImageData::from_rgba(1, 1, vec![255, 255, 255, 255])
    }

    #[test]
    fn add_card_assigns_increasing_ids() {
        let mut state = State::new();
        let a = state.add_card("a.png".into());
        let b = state.add_card("b.png".into());
        assert!(b > a);
        assert_eq!(state.cards().len(), 2);
    }

    #[test]
    fn card_lifecycle_reaches_decoded() {
        let mut state = State::new();
        let id = state.add_card("a.png".into());

        state.set_image(id, sample_image());
        assert!(matches!(
            state.cards()[0].status,
            CardStatus::AwaitingEngine
        ));

        state.set_decoding(id);
        assert!(matches!(state.cards()[0].status, CardStatus::Decoding));

        state.set_decode_outcome(id, Ok(Vec::new()));
        assert!(matches!(state.cards()[0].status, CardStatus::Decoded(_)));
    }

    #[test]
    fn awaiting_engine_lists_only_undecoded_displayable_cards() {
        let mut state = State::new();
        let a = state.add_card("a.png".into());
        let b = state.add_card("b.png".into());
        let c = state.add_card("c.png".into());

        state.set_image(a, sample_image());
        state.set_image(b, sample_image());
        state.set_decoding(b);
        state.set_load_failed(c);

        let pending = state.awaiting_engine();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].0, a);
    }

    #[test]
    fn set_decoding_only_applies_to_waiting_cards() {
        let mut state = State::new();
        let id = state.add_card("a.png".into());
        state.set_decoding(id);
        assert!(matches!(state.cards()[0].status, CardStatus::Loading));
    }

    #[test]
    fn toggle_details_flips_the_flag() {
        let mut state = State::new();
        let id = state.add_card("a.png".into());
        state.handle_message(Message::ToggleDetails(id));
        assert!(state.cards()[0].show_details);
        state.handle_message(Message::ToggleDetails(id));
        assert!(!state.cards()[0].show_details);
    }

    #[test]
    fn clear_removes_all_cards() {
        let mut state = State::new();
        state.add_card("a.png".into());
        state.handle_message(Message::Clear);
        assert!(state.is_empty());
    }

    #[test]
    fn decode_failure_is_recorded_per_card() {
        let mut state = State::new();
        let id = state.add_card("a.png".into());
        state.set_image(id, sample_image());
        state.set_decode_outcome(id, Err("engine returned status 3".into()));
        assert!(matches!(
            state.cards()[0].status,
            CardStatus::DecodeFailed(_)
        ));
    }

    #[test]
    fn view_renders_empty_and_populated_states() {
        let i18n = I18n::default();
        let mut state = State::new();
        let _ = view(&state, &i18n, &EngineStatus::Missing);

        let id = state.add_card("a.png".into());
        state.set_image(id, sample_image());
        let _ = view(&state, &i18n, &EngineStatus::Ready);
    }
}
