// SPDX-License-Identifier: MPL-2.0
//! Shared-library adapter implementing the [`Decoder`] port.
//!
//! The engine exposes a two-symbol C ABI:
//!
//! ```c
//! int32_t zxing_reader_decode(const uint8_t *rgba, uint32_t width,
//!                             uint32_t height, const char *options_json,
//!                             char **out_json);
//! void zxing_reader_string_free(char *ptr);
//! ```
//!
//! Options go in as JSON, results come back as a JSON array owned by the
//! engine until released through the free symbol.

use super::{Decoder, EngineError};
use crate::decode::{DecodeOptions, DecodeResult};
use std::ffi::{c_char, CStr, CString};
use std::path::Path;

type DecodeFn = unsafe extern "C" fn(
    rgba: *const u8,
    width: u32,
    height: u32,
    options_json: *const c_char,
    out_json: *mut *mut c_char,
) -> i32;

type StringFreeFn = unsafe extern "C" fn(ptr: *mut c_char);

const DECODE_SYMBOL: &[u8] = b"zxing_reader_decode\0";
const STRING_FREE_SYMBOL: &[u8] = b"zxing_reader_string_free\0";

/// [`Decoder`] backed by a dynamically loaded engine library.
pub struct LibraryDecoder {
    library: libloading::Library,
}

impl LibraryDecoder {
    /// Loads the engine from `path` and verifies both ABI symbols exist.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NotFound`] when the file is missing and
    /// [`EngineError::LoadFailed`] when the library cannot be loaded or
    /// lacks a required symbol.
    pub fn load(path: &Path) -> Result<Self, EngineError> {
        if !path.exists() {
            return Err(EngineError::NotFound(path.display().to_string()));
        }

        // SAFETY: the library is trusted once its checksum has been
        // verified by the download pipeline; loading runs no init code
        // beyond the platform loader.
        let library = unsafe { libloading::Library::new(path) }
            .map_err(|e| EngineError::LoadFailed(e.to_string()))?;

        // Resolve both symbols up front so a broken binary is rejected at
        // load time, not mid-scan.
        unsafe {
            library
                .get::<DecodeFn>(DECODE_SYMBOL)
                .map_err(|e| EngineError::LoadFailed(e.to_string()))?;
            library
                .get::<StringFreeFn>(STRING_FREE_SYMBOL)
                .map_err(|e| EngineError::LoadFailed(e.to_string()))?;
        }

        Ok(Self { library })
    }

    fn decode_raw(
        &self,
        width: u32,
        height: u32,
        rgba: &[u8],
        options_json: &CStr,
    ) -> Result<String, EngineError> {
        // SAFETY: symbol presence was verified in `load`; the engine only
        // reads `rgba` within the advertised dimensions and `out` is
        // released through the paired free symbol below.
        unsafe {
            let decode = self
                .library
                .get::<DecodeFn>(DECODE_SYMBOL)
                .map_err(|e| EngineError::LoadFailed(e.to_string()))?;
            let free = self
                .library
                .get::<StringFreeFn>(STRING_FREE_SYMBOL)
                .map_err(|e| EngineError::LoadFailed(e.to_string()))?;

            let mut out: *mut c_char = std::ptr::null_mut();
            let status = decode(
                rgba.as_ptr(),
                width,
                height,
                options_json.as_ptr(),
                &mut out,
            );

            if status != 0 || out.is_null() {
                if !out.is_null() {
                    free(out);
                }
                return Err(EngineError::DecodeFailed(format!(
                    "engine returned status {status}"
                )));
            }

            let payload = CStr::from_ptr(out).to_string_lossy().into_owned();
            free(out);
            Ok(payload)
        }
    }
}

impl Decoder for LibraryDecoder {
    fn decode(
        &self,
        width: u32,
        height: u32,
        rgba: &[u8],
        options: &DecodeOptions,
    ) -> Result<Vec<DecodeResult>, EngineError> {
        let expected = width as usize * height as usize * 4;
        if rgba.len() != expected {
            return Err(EngineError::DecodeFailed(format!(
                "pixel buffer is {} bytes, expected {expected}",
                rgba.len()
            )));
        }

        let options_json = CString::new(options_to_wire_json(options))
            .map_err(|e| EngineError::DecodeFailed(e.to_string()))?;

        let payload = self.decode_raw(width, height, rgba, &options_json)?;
        serde_json::from_str(&payload).map_err(|e| EngineError::MalformedPayload(e.to_string()))
    }

    fn is_ready(&self) -> bool {
        true
    }
}

/// Serializes options into the engine's camel-cased wire form.
fn options_to_wire_json(options: &DecodeOptions) -> String {
    let formats: Vec<&str> = options.formats.iter().map(|f| f.label()).collect();
    serde_json::json!({
        "formats": formats,
        "binarizer": options.binarizer.label().replace(' ', ""),
        "characterSet": options.character_set.label(),
        "textMode": options.text_mode.label(),
        "eanAddOnSymbol": options.ean_add_on_symbol.label(),
        "tryHarder": options.try_harder,
        "tryRotate": options.try_rotate,
        "tryInvert": options.try_invert,
        "tryDownscale": options.try_downscale,
        "downscaleFactor": options.downscale_factor,
        "downscaleThreshold": options.downscale_threshold,
        "isPure": options.is_pure,
        "returnErrors": options.return_errors,
        "returnCodabarStartEnd": options.return_codabar_start_end,
        "tryCode39ExtendedMode": options.try_code39_extended_mode,
        "validateCode39CheckSum": options.validate_code39_check_sum,
        "validateITFCheckSum": options.validate_itf_check_sum,
        "maxNumberOfSymbols": options.max_number_of_symbols,
        "minLineCount": options.min_line_count,
    })
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::BarcodeFormat;

    #[test]
    fn load_rejects_a_missing_library() {
        let result = LibraryDecoder::load(Path::new("/nonexistent/libzxing_reader.so"));
        assert!(matches!(result, Err(EngineError::NotFound(_))));
    }

    #[test]
    fn load_rejects_a_file_that_is_not_a_library() {
        let temp_dir = tempfile::tempdir().expect("temp dir");
        let path = temp_dir.path().join("libzxing_reader.so");
        std::fs::write(&path, b"not a shared library").expect("write file");

        let result = LibraryDecoder::load(&path);
        assert!(matches!(result, Err(EngineError::LoadFailed(_))));
    }

    #[test]
    fn wire_json_uses_engine_field_names() {
        let mut options = DecodeOptions::default();
        options.toggle_format(BarcodeFormat::Ean13);
        options.toggle_format(BarcodeFormat::QrCode);

        let json = options_to_wire_json(&options);
        let value: serde_json::Value = serde_json::from_str(&json).expect("valid json");

        assert_eq!(value["binarizer"], "LocalAverage");
        assert_eq!(value["characterSet"], "UTF-8");
        assert_eq!(value["tryHarder"], true);
        assert_eq!(value["maxNumberOfSymbols"], 255);
        assert_eq!(value["formats"][0], "EAN-13");
        assert_eq!(value["formats"][1], "QRCode");
    }
}
