// SPDX-License-Identifier: MPL-2.0
//! The decode options record: every knob the settings form exposes,
//! persisted in the `[decode]` section of `settings.toml`.

use serde::{Deserialize, Serialize};

/// Smallest accepted downscale factor.
pub const MIN_DOWNSCALE_FACTOR: u8 = 2;
/// Largest accepted downscale factor.
pub const MAX_DOWNSCALE_FACTOR: u8 = 4;
/// Smallest accepted symbol limit per image.
pub const MIN_MAX_NUMBER_OF_SYMBOLS: u8 = 1;
/// Smallest accepted line count for linear codes.
pub const MIN_MIN_LINE_COUNT: u32 = 1;

/// Barcode formats the engine can be restricted to.
///
/// An empty format set means "all formats".
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum BarcodeFormat {
    Aztec,
    Codabar,
    Code39,
    Code93,
    Code128,
    DataBar,
    DataBarExpanded,
    DataBarLimited,
    DataMatrix,
    DxFilmEdge,
    Ean8,
    Ean13,
    Itf,
    MaxiCode,
    MicroQrCode,
    Pdf417,
    QrCode,
    RMQrCode,
    UpcA,
    UpcE,
    /// Umbrella for every one-dimensional format.
    LinearCodes,
    /// Umbrella for every two-dimensional format.
    MatrixCodes,
}

impl BarcodeFormat {
    /// All formats offered in the settings form, in display order.
    pub const ALL: &'static [BarcodeFormat] = &[
        BarcodeFormat::Aztec,
        BarcodeFormat::Codabar,
        BarcodeFormat::Code39,
        BarcodeFormat::Code93,
        BarcodeFormat::Code128,
        BarcodeFormat::DataBar,
        BarcodeFormat::DataBarExpanded,
        BarcodeFormat::DataBarLimited,
        BarcodeFormat::DataMatrix,
        BarcodeFormat::DxFilmEdge,
        BarcodeFormat::Ean8,
        BarcodeFormat::Ean13,
        BarcodeFormat::Itf,
        BarcodeFormat::MaxiCode,
        BarcodeFormat::MicroQrCode,
        BarcodeFormat::Pdf417,
        BarcodeFormat::QrCode,
        BarcodeFormat::RMQrCode,
        BarcodeFormat::UpcA,
        BarcodeFormat::UpcE,
        BarcodeFormat::LinearCodes,
        BarcodeFormat::MatrixCodes,
    ];

    /// The display label used in the settings form and result details.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            BarcodeFormat::Aztec => "Aztec",
            BarcodeFormat::Codabar => "Codabar",
            BarcodeFormat::Code39 => "Code39",
            BarcodeFormat::Code93 => "Code93",
            BarcodeFormat::Code128 => "Code128",
            BarcodeFormat::DataBar => "DataBar",
            BarcodeFormat::DataBarExpanded => "DataBarExpanded",
            BarcodeFormat::DataBarLimited => "DataBarLimited",
            BarcodeFormat::DataMatrix => "DataMatrix",
            BarcodeFormat::DxFilmEdge => "DXFilmEdge",
            BarcodeFormat::Ean8 => "EAN-8",
            BarcodeFormat::Ean13 => "EAN-13",
            BarcodeFormat::Itf => "ITF",
            BarcodeFormat::MaxiCode => "MaxiCode",
            BarcodeFormat::MicroQrCode => "MicroQRCode",
            BarcodeFormat::Pdf417 => "PDF417",
            BarcodeFormat::QrCode => "QRCode",
            BarcodeFormat::RMQrCode => "rMQRCode",
            BarcodeFormat::UpcA => "UPC-A",
            BarcodeFormat::UpcE => "UPC-E",
            BarcodeFormat::LinearCodes => "Linear-Codes",
            BarcodeFormat::MatrixCodes => "Matrix-Codes",
        }
    }
}

/// Binarization strategy applied before symbol detection.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Binarizer {
    #[default]
    LocalAverage,
    GlobalHistogram,
    FixedThreshold,
    BoolCast,
}

impl Binarizer {
    pub const ALL: &'static [Binarizer] = &[
        Binarizer::LocalAverage,
        Binarizer::GlobalHistogram,
        Binarizer::FixedThreshold,
        Binarizer::BoolCast,
    ];

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Binarizer::LocalAverage => "Local Average",
            Binarizer::GlobalHistogram => "Global Histogram",
            Binarizer::FixedThreshold => "Fixed Threshold",
            Binarizer::BoolCast => "Bool Cast",
        }
    }
}

/// Character set assumed for byte-to-text conversion.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum CharacterSet {
    Ascii,
    Iso8859_1,
    Iso8859_2,
    Iso8859_5,
    Iso8859_9,
    ShiftJis,
    Gb18030,
    EucJp,
    EucKr,
    Big5,
    #[default]
    Utf8,
    Utf16Be,
    Utf16Le,
    Binary,
}

impl CharacterSet {
    pub const ALL: &'static [CharacterSet] = &[
        CharacterSet::Ascii,
        CharacterSet::Iso8859_1,
        CharacterSet::Iso8859_2,
        CharacterSet::Iso8859_5,
        CharacterSet::Iso8859_9,
        CharacterSet::ShiftJis,
        CharacterSet::Gb18030,
        CharacterSet::EucJp,
        CharacterSet::EucKr,
        CharacterSet::Big5,
        CharacterSet::Utf8,
        CharacterSet::Utf16Be,
        CharacterSet::Utf16Le,
        CharacterSet::Binary,
    ];

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            CharacterSet::Ascii => "ASCII",
            CharacterSet::Iso8859_1 => "ISO-8859-1",
            CharacterSet::Iso8859_2 => "ISO-8859-2",
            CharacterSet::Iso8859_5 => "ISO-8859-5",
            CharacterSet::Iso8859_9 => "ISO-8859-9",
            CharacterSet::ShiftJis => "Shift_JIS",
            CharacterSet::Gb18030 => "GB18030",
            CharacterSet::EucJp => "EUC-JP",
            CharacterSet::EucKr => "EUC-KR",
            CharacterSet::Big5 => "Big5",
            CharacterSet::Utf8 => "UTF-8",
            CharacterSet::Utf16Be => "UTF-16BE",
            CharacterSet::Utf16Le => "UTF-16LE",
            CharacterSet::Binary => "Binary",
        }
    }
}

/// How decoded payloads are rendered into the `text` field.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum TextMode {
    #[default]
    Plain,
    Eci,
    Hri,
    Hex,
    Escaped,
}

impl TextMode {
    pub const ALL: &'static [TextMode] = &[
        TextMode::Plain,
        TextMode::Eci,
        TextMode::Hri,
        TextMode::Hex,
        TextMode::Escaped,
    ];

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            TextMode::Plain => "Plain",
            TextMode::Eci => "ECI",
            TextMode::Hri => "HRI",
            TextMode::Hex => "Hex",
            TextMode::Escaped => "Escaped",
        }
    }
}

/// Handling of EAN-2/EAN-5 add-on symbols.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum EanAddOnSymbol {
    Ignore,
    #[default]
    Read,
    Require,
}

impl EanAddOnSymbol {
    pub const ALL: &'static [EanAddOnSymbol] = &[
        EanAddOnSymbol::Ignore,
        EanAddOnSymbol::Read,
        EanAddOnSymbol::Require,
    ];

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            EanAddOnSymbol::Ignore => "Ignore",
            EanAddOnSymbol::Read => "Read",
            EanAddOnSymbol::Require => "Require",
        }
    }
}

impl std::fmt::Display for Binarizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::fmt::Display for CharacterSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::fmt::Display for TextMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::fmt::Display for EanAddOnSymbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// The full decode options record handed to the engine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DecodeOptions {
    /// Formats to look for; empty means all.
    pub formats: Vec<BarcodeFormat>,
    pub binarizer: Binarizer,
    pub character_set: CharacterSet,
    pub text_mode: TextMode,
    pub ean_add_on_symbol: EanAddOnSymbol,
    pub try_harder: bool,
    pub try_rotate: bool,
    pub try_invert: bool,
    pub try_downscale: bool,
    pub downscale_factor: u8,
    pub downscale_threshold: u32,
    pub is_pure: bool,
    pub return_errors: bool,
    pub return_codabar_start_end: bool,
    pub try_code39_extended_mode: bool,
    pub validate_code39_check_sum: bool,
    pub validate_itf_check_sum: bool,
    pub max_number_of_symbols: u8,
    pub min_line_count: u32,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            formats: Vec::new(),
            binarizer: Binarizer::default(),
            character_set: CharacterSet::default(),
            text_mode: TextMode::default(),
            ean_add_on_symbol: EanAddOnSymbol::default(),
            try_harder: true,
            try_rotate: true,
            try_invert: true,
            try_downscale: true,
            downscale_factor: 3,
            downscale_threshold: 500,
            is_pure: false,
            return_errors: false,
            return_codabar_start_end: false,
            try_code39_extended_mode: false,
            validate_code39_check_sum: false,
            validate_itf_check_sum: false,
            max_number_of_symbols: 255,
            min_line_count: 2,
        }
    }
}

impl DecodeOptions {
    /// Clamps every numeric field into its supported range. Applied after
    /// loading persisted options and after form input.
    #[must_use]
    pub fn clamped(mut self) -> Self {
        self.downscale_factor = self
            .downscale_factor
            .clamp(MIN_DOWNSCALE_FACTOR, MAX_DOWNSCALE_FACTOR);
        self.max_number_of_symbols = self.max_number_of_symbols.max(MIN_MAX_NUMBER_OF_SYMBOLS);
        self.min_line_count = self.min_line_count.max(MIN_MIN_LINE_COUNT);
        self
    }

    /// Adds or removes a format from the restriction set.
    pub fn toggle_format(&mut self, format: BarcodeFormat) {
        if let Some(position) = self.formats.iter().position(|f| *f == format) {
            self.formats.remove(position);
        } else {
            self.formats.push(format);
        }
    }

    /// Returns `true` when the restriction set admits `format`: the set is
    /// empty, names the format, or names its umbrella.
    #[must_use]
    pub fn allows_format(&self, format: BarcodeFormat) -> bool {
        self.formats.is_empty()
            || self.formats.contains(&format)
            || self.formats.contains(&BarcodeFormat::LinearCodes)
    }

    /// Whether the Code39-specific switches are meaningful.
    #[must_use]
    pub fn code39_controls_enabled(&self) -> bool {
        self.allows_format(BarcodeFormat::Code39)
    }

    /// Whether the ITF checksum switch is meaningful.
    #[must_use]
    pub fn itf_controls_enabled(&self) -> bool {
        self.allows_format(BarcodeFormat::Itf)
    }

    /// Whether the Codabar start/end switch is meaningful.
    #[must_use]
    pub fn codabar_controls_enabled(&self) -> bool {
        self.allows_format(BarcodeFormat::Codabar)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_demo_defaults() {
        let options = DecodeOptions::default();
        assert!(options.formats.is_empty());
        assert_eq!(options.binarizer, Binarizer::LocalAverage);
        assert_eq!(options.character_set, CharacterSet::Utf8);
        assert_eq!(options.text_mode, TextMode::Plain);
        assert_eq!(options.ean_add_on_symbol, EanAddOnSymbol::Read);
        assert!(options.try_harder);
        assert!(options.try_rotate);
        assert!(options.try_invert);
        assert!(options.try_downscale);
        assert_eq!(options.downscale_factor, 3);
        assert_eq!(options.downscale_threshold, 500);
        assert!(!options.is_pure);
        assert_eq!(options.max_number_of_symbols, 255);
        assert_eq!(options.min_line_count, 2);
    }

    #[test]
    fn clamping_pulls_numeric_fields_into_range() {
        let options = DecodeOptions {
            downscale_factor: 9,
            max_number_of_symbols: 0,
            min_line_count: 0,
            ..DecodeOptions::default()
        }
        .clamped();

        assert_eq!(options.downscale_factor, MAX_DOWNSCALE_FACTOR);
        assert_eq!(options.max_number_of_symbols, MIN_MAX_NUMBER_OF_SYMBOLS);
        assert_eq!(options.min_line_count, MIN_MIN_LINE_COUNT);

        let options = DecodeOptions {
            downscale_factor: 1,
            ..DecodeOptions::default()
        }
        .clamped();
        assert_eq!(options.downscale_factor, MIN_DOWNSCALE_FACTOR);
    }

    #[test]
    fn toggle_format_adds_and_removes() {
        let mut options = DecodeOptions::default();
        options.toggle_format(BarcodeFormat::QrCode);
        assert_eq!(options.formats, [BarcodeFormat::QrCode]);
        options.toggle_format(BarcodeFormat::QrCode);
        assert!(options.formats.is_empty());
    }

    #[test]
    fn empty_format_set_allows_everything() {
        let options = DecodeOptions::default();
        assert!(options.code39_controls_enabled());
        assert!(options.itf_controls_enabled());
        assert!(options.codabar_controls_enabled());
    }

    #[test]
    fn restricted_format_set_gates_the_conditional_switches() {
        let mut options = DecodeOptions::default();
        options.toggle_format(BarcodeFormat::QrCode);
        assert!(!options.code39_controls_enabled());
        assert!(!options.itf_controls_enabled());
        assert!(!options.codabar_controls_enabled());

        options.toggle_format(BarcodeFormat::Code39);
        assert!(options.code39_controls_enabled());
        assert!(!options.itf_controls_enabled());
    }

    #[test]
    fn linear_codes_umbrella_enables_all_linear_switches() {
        let mut options = DecodeOptions::default();
        options.toggle_format(BarcodeFormat::LinearCodes);
        assert!(options.code39_controls_enabled());
        assert!(options.itf_controls_enabled());
        assert!(options.codabar_controls_enabled());
    }

    #[test]
    fn options_round_trip_through_toml() {
        let mut options = DecodeOptions::default();
        options.toggle_format(BarcodeFormat::Ean13);
        options.binarizer = Binarizer::FixedThreshold;
        options.max_number_of_symbols = 4;

        let serialized = toml::to_string(&options).expect("serialize options");
        let loaded: DecodeOptions = toml::from_str(&serialized).expect("parse options");
        assert_eq!(loaded, options);
    }

    #[test]
    fn format_labels_are_unique() {
        let mut labels: Vec<_> = BarcodeFormat::ALL.iter().map(|f| f.label()).collect();
        labels.sort_unstable();
        labels.dedup();
        assert_eq!(labels.len(), BarcodeFormat::ALL.len());
    }
}
