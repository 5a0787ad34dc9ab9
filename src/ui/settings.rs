// SPDX-License-Identifier: MPL-2.0
//! Settings screen: the decode options form, engine location, intake and
//! appearance preferences.
//!
//! Numeric fields follow an edit/commit cycle: keystrokes land in a text
//! buffer, submission parses and clamps the value, and an invalid buffer
//! shows an error and blocks leaving the screen until corrected.

use crate::decode::{
    options, BarcodeFormat, Binarizer, CharacterSet, DecodeOptions, EanAddOnSymbol, TextMode,
};
use crate::engine::EngineLocation;
use crate::i18n::fluent::I18n;
use crate::ui::design_tokens::{palette, spacing, typography};
use crate::ui::styles;
use crate::ui::theming::ThemeMode;
use iced::widget::{
    button, checkbox, pick_list, scrollable, text_input, toggler, Column, Container, Row, Space,
    Text,
};
use iced::{alignment, Element, Length};
use unic_langid::LanguageIdentifier;

/// Error key for a buffer that does not parse as a whole number.
pub const INPUT_INVALID_KEY: &str = "settings-input-invalid";

/// The boolean decode switches, used to route toggle messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Switch {
    TryHarder,
    TryRotate,
    TryInvert,
    TryDownscale,
    IsPure,
    ReturnErrors,
    ReturnCodabarStartEnd,
    TryCode39Extended,
    ValidateCode39CheckSum,
    ValidateItfCheckSum,
}

/// The numeric fields, used to route input/submit messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberField {
    MaxSymbols,
    MinLineCount,
    DownscaleThreshold,
    DownscaleFactor,
}

/// Messages emitted by the settings form.
#[derive(Debug, Clone)]
pub enum Message {
    LocationSelected(EngineLocation),
    FormatToggled(BarcodeFormat),
    BinarizerSelected(Binarizer),
    CharacterSetSelected(CharacterSet),
    TextModeSelected(TextMode),
    EanAddOnSelected(EanAddOnSymbol),
    SwitchToggled(Switch, bool),
    NumberInputChanged(NumberField, String),
    NumberSubmitted(NumberField),
    RecurseToggled(bool),
    ThemeModeSelected(ThemeMode),
    LanguageSelected(LanguageIdentifier),
}

/// What the application must react to after a settings update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    None,
    /// Decode or intake options changed; persist the config.
    OptionsChanged,
    /// The engine location changed; persist and reload the engine.
    EngineLocationChanged,
    /// Theme mode changed; persist and re-theme.
    AppearanceChanged,
    /// Language changed; persist and switch bundles.
    LanguageChanged(LanguageIdentifier),
}

#[derive(Debug, Clone, Default)]
struct NumberBuffer {
    input: String,
    error_key: Option<&'static str>,
}

impl NumberBuffer {
    fn synced(value: impl ToString) -> Self {
        Self {
            input: value.to_string(),
            error_key: None,
        }
    }
}

/// Initial values handed to [`State::new`].
#[derive(Debug, Clone, Default)]
pub struct StateConfig {
    pub options: DecodeOptions,
    pub engine_location: EngineLocation,
    pub recurse_directories: bool,
    pub theme_mode: ThemeMode,
}

/// Settings form state.
#[derive(Debug, Clone)]
pub struct State {
    pub options: DecodeOptions,
    pub engine_location: EngineLocation,
    pub recurse_directories: bool,
    pub theme_mode: ThemeMode,
    max_symbols: NumberBuffer,
    min_line_count: NumberBuffer,
    downscale_threshold: NumberBuffer,
    downscale_factor: NumberBuffer,
}

impl Default for State {
    fn default() -> Self {
        Self::new(StateConfig {
            recurse_directories: true,
            ..StateConfig::default()
        })
    }
}

impl State {
    #[must_use]
    pub fn new(config: StateConfig) -> Self {
        Self {
            max_symbols: NumberBuffer::synced(config.options.max_number_of_symbols),
            min_line_count: NumberBuffer::synced(config.options.min_line_count),
            downscale_threshold: NumberBuffer::synced(config.options.downscale_threshold),
            downscale_factor: NumberBuffer::synced(config.options.downscale_factor),
            options: config.options,
            engine_location: config.engine_location,
            recurse_directories: config.recurse_directories,
            theme_mode: config.theme_mode,
        }
    }

    /// Applies a form message, returning what the application must react
    /// to.
    pub fn update(&mut self, message: Message) -> Event {
        match message {
            Message::LocationSelected(location) => {
                if self.engine_location == location {
                    return Event::None;
                }
                self.engine_location = location;
                Event::EngineLocationChanged
            }
            Message::FormatToggled(format) => {
                self.options.toggle_format(format);
                Event::OptionsChanged
            }
            Message::BinarizerSelected(binarizer) => {
                self.options.binarizer = binarizer;
                Event::OptionsChanged
            }
            Message::CharacterSetSelected(set) => {
                self.options.character_set = set;
                Event::OptionsChanged
            }
            Message::TextModeSelected(mode) => {
                self.options.text_mode = mode;
                Event::OptionsChanged
            }
            Message::EanAddOnSelected(symbol) => {
                self.options.ean_add_on_symbol = symbol;
                Event::OptionsChanged
            }
            Message::SwitchToggled(switch, value) => {
                self.set_switch(switch, value);
                Event::OptionsChanged
            }
            Message::NumberInputChanged(field, value) => {
                self.buffer_mut(field).input = value;
                Event::None
            }
            Message::NumberSubmitted(field) => {
                if self.commit_number(field) {
                    Event::OptionsChanged
                } else {
                    Event::None
                }
            }
            Message::RecurseToggled(value) => {
                self.recurse_directories = value;
                Event::OptionsChanged
            }
            Message::ThemeModeSelected(mode) => {
                if self.theme_mode == mode {
                    return Event::None;
                }
                self.theme_mode = mode;
                Event::AppearanceChanged
            }
            Message::LanguageSelected(locale) => Event::LanguageChanged(locale),
        }
    }

    /// Commits every numeric buffer. Returns `false` while any buffer is
    /// invalid; the application blocks leaving the screen in that case.
    pub fn commit_all(&mut self) -> bool {
        let mut ok = true;
        for field in [
            NumberField::MaxSymbols,
            NumberField::MinLineCount,
            NumberField::DownscaleThreshold,
            NumberField::DownscaleFactor,
        ] {
            ok &= self.commit_number(field);
        }
        ok
    }

    /// Returns the error key of any invalid numeric buffer.
    #[must_use]
    pub fn first_error_key(&self) -> Option<&'static str> {
        [
            &self.max_symbols,
            &self.min_line_count,
            &self.downscale_threshold,
            &self.downscale_factor,
        ]
        .into_iter()
        .find_map(|buffer| buffer.error_key)
    }

    fn set_switch(&mut self, switch: Switch, value: bool) {
        match switch {
            Switch::TryHarder => self.options.try_harder = value,
            Switch::TryRotate => self.options.try_rotate = value,
            Switch::TryInvert => self.options.try_invert = value,
            Switch::TryDownscale => self.options.try_downscale = value,
            Switch::IsPure => self.options.is_pure = value,
            Switch::ReturnErrors => self.options.return_errors = value,
            Switch::ReturnCodabarStartEnd => self.options.return_codabar_start_end = value,
            Switch::TryCode39Extended => self.options.try_code39_extended_mode = value,
            Switch::ValidateCode39CheckSum => self.options.validate_code39_check_sum = value,
            Switch::ValidateItfCheckSum => self.options.validate_itf_check_sum = value,
        }
    }

    fn switch_value(&self, switch: Switch) -> bool {
        match switch {
            Switch::TryHarder => self.options.try_harder,
            Switch::TryRotate => self.options.try_rotate,
            Switch::TryInvert => self.options.try_invert,
            Switch::TryDownscale => self.options.try_downscale,
            Switch::IsPure => self.options.is_pure,
            Switch::ReturnErrors => self.options.return_errors,
            Switch::ReturnCodabarStartEnd => self.options.return_codabar_start_end,
            Switch::TryCode39Extended => self.options.try_code39_extended_mode,
            Switch::ValidateCode39CheckSum => self.options.validate_code39_check_sum,
            Switch::ValidateItfCheckSum => self.options.validate_itf_check_sum,
        }
    }

    fn buffer(&self, field: NumberField) -> &NumberBuffer {
        match field {
            NumberField::MaxSymbols => &self.max_symbols,
            NumberField::MinLineCount => &self.min_line_count,
            NumberField::DownscaleThreshold => &self.downscale_threshold,
            NumberField::DownscaleFactor => &self.downscale_factor,
        }
    }

    fn buffer_mut(&mut self, field: NumberField) -> &mut NumberBuffer {
        match field {
            NumberField::MaxSymbols => &mut self.max_symbols,
            NumberField::MinLineCount => &mut self.min_line_count,
            NumberField::DownscaleThreshold => &mut self.downscale_threshold,
            NumberField::DownscaleFactor => &mut self.downscale_factor,
        }
    }

    /// Parses and clamps a numeric buffer into its options field.
    fn commit_number(&mut self, field: NumberField) -> bool {
        let raw = self.buffer(field).input.trim().to_string();
        let Ok(value) = raw.parse::<u32>() else {
            self.buffer_mut(field).error_key = Some(INPUT_INVALID_KEY);
            return false;
        };

        let committed: u32 = match field {
            NumberField::MaxSymbols => {
                let clamped = value
                    .min(u32::from(u8::MAX))
                    .max(u32::from(options::MIN_MAX_NUMBER_OF_SYMBOLS));
                self.options.max_number_of_symbols = clamped as u8;
                clamped
            }
            NumberField::MinLineCount => {
                let clamped = value.max(options::MIN_MIN_LINE_COUNT);
                self.options.min_line_count = clamped;
                clamped
            }
            NumberField::DownscaleThreshold => {
                self.options.downscale_threshold = value;
                value
            }
            NumberField::DownscaleFactor => {
                let clamped = value
                    .clamp(
                        u32::from(options::MIN_DOWNSCALE_FACTOR),
                        u32::from(options::MAX_DOWNSCALE_FACTOR),
                    );
                self.options.downscale_factor = clamped as u8;
                clamped
            }
        };

        *self.buffer_mut(field) = NumberBuffer::synced(committed);
        true
    }
}

/// Renders the settings screen.
pub fn view<'a>(state: &'a State, i18n: &'a I18n) -> Element<'a, Message> {
    let content = Column::new()
        .spacing(spacing::LG)
        .padding(spacing::LG)
        .max_width(760.0)
        .push(Text::new(i18n.tr("settings-title")).size(typography::TITLE_LG))
        .push(appearance_section(state, i18n))
        .push(engine_section(state, i18n))
        .push(scan_section(state, i18n))
        .push(decode_section(state, i18n));

    scrollable(
        Container::new(content)
            .width(Length::Fill)
            .align_x(alignment::Horizontal::Center),
    )
    .width(Length::Fill)
    .height(Length::Fill)
    .into()
}

fn section_title<'a>(i18n: &I18n, key: &str) -> Element<'a, Message> {
    Text::new(i18n.tr(key))
        .size(typography::TITLE_SM)
        .into()
}

fn appearance_section<'a>(state: &'a State, i18n: &'a I18n) -> Element<'a, Message> {
    let mut theme_row = Row::new()
        .spacing(spacing::XS)
        .align_y(alignment::Vertical::Center)
        .push(Text::new(i18n.tr("settings-theme-label")).size(typography::BODY));
    for mode in ThemeMode::ALL {
        let mut entry = button(Text::new(i18n.tr(mode.i18n_key())).size(typography::BODY_SM));
        entry = if *mode == state.theme_mode {
            entry.style(styles::button::primary)
        } else {
            entry
                .style(styles::button::subtle)
                .on_press(Message::ThemeModeSelected(*mode))
        };
        theme_row = theme_row.push(entry);
    }

    let mut language_row = Row::new()
        .spacing(spacing::XS)
        .align_y(alignment::Vertical::Center)
        .push(Text::new(i18n.tr("select-language-label")).size(typography::BODY));
    for locale in &i18n.available_locales {
        let label_key = format!("language-name-{locale}");
        let translated = i18n.tr(&label_key);
        let label = if translated.starts_with("MISSING:") {
            locale.to_string()
        } else {
            translated
        };

        let mut entry = button(Text::new(label).size(typography::BODY_SM));
        entry = if locale == i18n.current_locale() {
            entry.style(styles::button::primary)
        } else {
            entry
                .style(styles::button::subtle)
                .on_press(Message::LanguageSelected(locale.clone()))
        };
        language_row = language_row.push(entry);
    }

    Column::new()
        .spacing(spacing::SM)
        .push(section_title(i18n, "settings-section-appearance"))
        .push(theme_row)
        .push(language_row)
        .into()
}

fn engine_section<'a>(state: &'a State, i18n: &'a I18n) -> Element<'a, Message> {
    let location = Row::new()
        .spacing(spacing::SM)
        .align_y(alignment::Vertical::Center)
        .push(Text::new(i18n.tr("settings-engine-location-label")).size(typography::BODY))
        .push(pick_list(
            EngineLocation::ALL,
            Some(state.engine_location),
            Message::LocationSelected,
        ));

    Column::new()
        .spacing(spacing::SM)
        .push(section_title(i18n, "settings-section-engine"))
        .push(location)
        .into()
}

fn scan_section<'a>(state: &'a State, i18n: &'a I18n) -> Element<'a, Message> {
    let recurse = Row::new()
        .align_y(alignment::Vertical::Center)
        .push(Text::new(i18n.tr("settings-recurse-label")).size(typography::BODY))
        .push(Space::new().width(Length::Fill))
        .push(
            toggler(state.recurse_directories)
                .on_toggle(Message::RecurseToggled)
                .size(20.0),
        )
        .width(Length::Fixed(360.0));

    Column::new()
        .spacing(spacing::SM)
        .push(section_title(i18n, "settings-section-scan"))
        .push(recurse)
        .into()
}

fn decode_section<'a>(state: &'a State, i18n: &'a I18n) -> Element<'a, Message> {
    let mut section = Column::new()
        .spacing(spacing::SM)
        .push(section_title(i18n, "settings-section-decode"));

    // Formats: an empty selection means every format.
    section = section.push(
        Text::new(i18n.tr("settings-formats-label")).size(typography::BODY),
    );
    if state.options.formats.is_empty() {
        section = section.push(
            Text::new(i18n.tr("settings-formats-all"))
                .size(typography::CAPTION)
                .color(palette::GRAY_400),
        );
    }
    let mut formats_grid = Column::new().spacing(spacing::XXS);
    for chunk in BarcodeFormat::ALL.chunks(4) {
        let mut row = Row::new().spacing(spacing::SM);
        for format in chunk {
            row = row.push(
                checkbox(state.options.formats.contains(format))
                    .label(format.label())
                    .size(typography::BODY)
                    .on_toggle(move |_| Message::FormatToggled(*format))
                    .width(Length::Fixed(160.0)),
            );
        }
        formats_grid = formats_grid.push(row);
    }
    section = section.push(formats_grid);

    // Enumerated options.
    section = section.push(
        Row::new()
            .spacing(spacing::MD)
            .push(labeled_pick_list(
                i18n,
                "settings-binarizer-label",
                Binarizer::ALL,
                state.options.binarizer,
                Message::BinarizerSelected,
            ))
            .push(labeled_pick_list(
                i18n,
                "settings-character-set-label",
                CharacterSet::ALL,
                state.options.character_set,
                Message::CharacterSetSelected,
            )),
    );
    section = section.push(
        Row::new()
            .spacing(spacing::MD)
            .push(labeled_pick_list(
                i18n,
                "settings-text-mode-label",
                TextMode::ALL,
                state.options.text_mode,
                Message::TextModeSelected,
            ))
            .push(labeled_pick_list(
                i18n,
                "settings-ean-addon-label",
                EanAddOnSymbol::ALL,
                state.options.ean_add_on_symbol,
                Message::EanAddOnSelected,
            )),
    );

    // Numeric fields.
    section = section.push(
        Row::new()
            .spacing(spacing::MD)
            .push(number_input(
                state,
                i18n,
                "settings-max-symbols-label",
                NumberField::MaxSymbols,
            ))
            .push(number_input(
                state,
                i18n,
                "settings-min-line-count-label",
                NumberField::MinLineCount,
            )),
    );

    // Simple switches.
    let simple_switches = [
        (Switch::TryHarder, "settings-try-harder"),
        (Switch::TryRotate, "settings-try-rotate"),
        (Switch::TryInvert, "settings-try-invert"),
        (Switch::IsPure, "settings-is-pure"),
        (Switch::ReturnErrors, "settings-return-errors"),
        (Switch::TryDownscale, "settings-try-downscale"),
    ];
    let mut switch_grid = Column::new().spacing(spacing::XXS);
    for chunk in simple_switches.chunks(2) {
        let mut row = Row::new().spacing(spacing::MD);
        for (switch, key) in chunk {
            row = row.push(switch_toggler(state, i18n, *switch, key, true));
        }
        switch_grid = switch_grid.push(row);
    }
    section = section.push(switch_grid);

    // Downscale numbers, gated on the downscale switch.
    let downscale_enabled = state.options.try_downscale;
    section = section.push(
        Row::new()
            .spacing(spacing::MD)
            .push(gated_number_input(
                state,
                i18n,
                "settings-downscale-threshold-label",
                NumberField::DownscaleThreshold,
                downscale_enabled,
            ))
            .push(gated_number_input(
                state,
                i18n,
                "settings-downscale-factor-label",
                NumberField::DownscaleFactor,
                downscale_enabled,
            )),
    );

    // Format-gated switches.
    let gated_switches = [
        (
            Switch::TryCode39Extended,
            "settings-try-code39-extended",
            state.options.code39_controls_enabled(),
        ),
        (
            Switch::ValidateCode39CheckSum,
            "settings-validate-code39-checksum",
            state.options.code39_controls_enabled(),
        ),
        (
            Switch::ValidateItfCheckSum,
            "settings-validate-itf-checksum",
            state.options.itf_controls_enabled(),
        ),
        (
            Switch::ReturnCodabarStartEnd,
            "settings-return-codabar-start-end",
            state.options.codabar_controls_enabled(),
        ),
    ];
    let mut gated_grid = Column::new().spacing(spacing::XXS);
    for chunk in gated_switches.chunks(2) {
        let mut row = Row::new().spacing(spacing::MD);
        for (switch, key, enabled) in chunk {
            row = row.push(switch_toggler(state, i18n, *switch, key, *enabled));
        }
        gated_grid = gated_grid.push(row);
    }
    section = section.push(gated_grid);

    section.into()
}

fn labeled_pick_list<'a, T>(
    i18n: &'a I18n,
    label_key: &str,
    choices: &'static [T],
    selected: T,
    on_select: impl Fn(T) -> Message + 'a,
) -> Element<'a, Message>
where
    T: Clone + Copy + PartialEq + std::fmt::Display + 'static,
{
    Column::new()
        .spacing(spacing::XXS)
        .width(Length::FillPortion(1))
        .push(Text::new(i18n.tr(label_key)).size(typography::BODY_SM))
        .push(pick_list(choices, Some(selected), on_select).width(Length::Fill))
        .into()
}

fn number_input<'a>(
    state: &'a State,
    i18n: &'a I18n,
    label_key: &str,
    field: NumberField,
) -> Element<'a, Message> {
    gated_number_input(state, i18n, label_key, field, true)
}

fn gated_number_input<'a>(
    state: &'a State,
    i18n: &'a I18n,
    label_key: &str,
    field: NumberField,
    enabled: bool,
) -> Element<'a, Message> {
    let buffer = state.buffer(field);

    let mut input = text_input("", &buffer.input);
    if enabled {
        input = input
            .on_input(move |value| Message::NumberInputChanged(field, value))
            .on_submit(Message::NumberSubmitted(field));
    }

    let mut column = Column::new()
        .spacing(spacing::XXS)
        .width(Length::FillPortion(1))
        .push(Text::new(i18n.tr(label_key)).size(typography::BODY_SM))
        .push(input.width(Length::Fill));

    if let Some(error_key) = buffer.error_key {
        column = column.push(
            Text::new(i18n.tr(error_key))
                .size(typography::CAPTION)
                .color(palette::ERROR_500),
        );
    }

    column.into()
}

fn switch_toggler<'a>(
    state: &'a State,
    i18n: &'a I18n,
    switch: Switch,
    label_key: &str,
    enabled: bool,
) -> Element<'a, Message> {
    let label_color = if enabled {
        None
    } else {
        Some(palette::GRAY_400)
    };
    let mut label = Text::new(i18n.tr(label_key)).size(typography::BODY);
    if let Some(color) = label_color {
        label = label.color(color);
    }

    let mut widget = toggler(state.switch_value(switch)).size(20.0);
    if enabled {
        widget = widget.on_toggle(move |value| Message::SwitchToggled(switch, value));
    }

    Row::new()
        .align_y(alignment::Vertical::Center)
        .push(label)
        .push(Space::new().width(Length::Fill))
        .push(widget)
        .width(Length::FillPortion(1))
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_state_mirrors_default_options() {
        let state = State::default();
        assert_eq!(state.options, DecodeOptions::default());
        assert!(state.recurse_directories);
        assert_eq!(state.buffer(NumberField::MaxSymbols).input, "255");
        assert_eq!(state.buffer(NumberField::DownscaleFactor).input, "3");
    }

    #[test]
    fn switch_toggle_reports_options_changed() {
        let mut state = State::default();
        let event = state.update(Message::SwitchToggled(Switch::TryHarder, false));
        assert_eq!(event, Event::OptionsChanged);
        assert!(!state.options.try_harder);
    }

    #[test]
    fn valid_number_submission_commits_and_clears_errors() {
        let mut state = State::default();
        state.update(Message::NumberInputChanged(
            NumberField::MaxSymbols,
            "4".into(),
        ));
        let event = state.update(Message::NumberSubmitted(NumberField::MaxSymbols));
        assert_eq!(event, Event::OptionsChanged);
        assert_eq!(state.options.max_number_of_symbols, 4);
        assert!(state.first_error_key().is_none());
    }

    #[test]
    fn out_of_range_numbers_are_clamped_and_echoed() {
        let mut state = State::default();
        state.update(Message::NumberInputChanged(
            NumberField::DownscaleFactor,
            "9".into(),
        ));
        state.update(Message::NumberSubmitted(NumberField::DownscaleFactor));
        assert_eq!(state.options.downscale_factor, 4);
        assert_eq!(state.buffer(NumberField::DownscaleFactor).input, "4");
    }

    #[test]
    fn invalid_numbers_set_an_error_and_block_commit_all() {
        let mut state = State::default();
        state.update(Message::NumberInputChanged(
            NumberField::MinLineCount,
            "not-a-number".into(),
        ));
        state.update(Message::NumberSubmitted(NumberField::MinLineCount));
        assert_eq!(state.first_error_key(), Some(INPUT_INVALID_KEY));
        assert!(!state.commit_all());

        state.update(Message::NumberInputChanged(
            NumberField::MinLineCount,
            "2".into(),
        ));
        assert!(state.commit_all());
        assert!(state.first_error_key().is_none());
    }

    #[test]
    fn location_change_reports_engine_event_only_when_different() {
        let mut state = State::default();
        assert_eq!(
            state.update(Message::LocationSelected(EngineLocation::Bundled)),
            Event::None
        );
        assert_eq!(
            state.update(Message::LocationSelected(EngineLocation::Jsdelivr)),
            Event::EngineLocationChanged
        );
    }

    #[test]
    fn format_toggle_reports_options_changed() {
        let mut state = State::default();
        let event = state.update(Message::FormatToggled(BarcodeFormat::QrCode));
        assert_eq!(event, Event::OptionsChanged);
        assert_eq!(state.options.formats, [BarcodeFormat::QrCode]);
    }

    #[test]
    fn view_renders_default_state() {
        let state = State::default();
        let i18n = I18n::default();
        let _element = view(&state, &i18n);
    }
}
