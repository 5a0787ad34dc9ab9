// SPDX-License-Identifier: MPL-2.0
//! Application-wide error type and result alias.

use std::fmt;

/// Errors surfaced by configuration, file, and image handling.
///
/// Engine and collection failures carry their own taxonomies (see
/// [`crate::engine::EngineError`] and [`crate::collector::CollectError`]);
/// this type covers everything else.
#[derive(Debug, Clone)]
pub enum Error {
    /// Reading or writing a file failed.
    Io(String),
    /// The settings file could not be parsed or written.
    Config(String),
    /// Collected bytes could not be rasterized for display.
    Image(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O error: {e}"),
            Error::Config(e) => write!(f, "config error: {e}"),
            Error::Image(e) => write!(f, "image error: {e}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<image_rs::ImageError> for Error {
    fn from(err: image_rs::ImageError) -> Self {
        Error::Image(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_the_domain_and_message() {
        assert_eq!(
            Error::Io("disk failure".into()).to_string(),
            "I/O error: disk failure"
        );
        assert_eq!(
            Error::Config("bad field".into()).to_string(),
            "config error: bad field"
        );
        assert_eq!(
            Error::Image("truncated png".into()).to_string(),
            "image error: truncated png"
        );
    }

    #[test]
    fn io_errors_convert_into_the_io_variant() {
        let err: Error = std::io::Error::other("boom").into();
        assert!(matches!(err, Error::Io(message) if message.contains("boom")));
    }

    #[test]
    fn toml_parse_errors_convert_into_the_config_variant() {
        let parse_error = toml::from_str::<toml::Value>("not = valid = toml").unwrap_err();
        let err: Error = parse_error.into();
        assert!(matches!(err, Error::Config(_)));
    }
}
