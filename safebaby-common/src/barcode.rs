//! Barcode normalization
//!
//! UPC-A/EAN barcodes arrive from scanners, photo extraction and manual
//! entry with spaces, dashes and the occasional stray character. We keep
//! only digits and accept 8-14 of them (EAN-8 through GTIN-14).

/// Minimum digits in a valid barcode
pub const MIN_BARCODE_LEN: usize = 8;
/// Maximum digits in a valid barcode
pub const MAX_BARCODE_LEN: usize = 14;

/// Strip non-digits and validate length
///
/// Returns the normalized digit string, or None when the input cannot be a
/// barcode. Callers reject invalid input synchronously, before touching the
/// database or the network.
pub fn normalize_barcode(raw: &str) -> Option<String> {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();

    if (MIN_BARCODE_LEN..=MAX_BARCODE_LEN).contains(&digits.len()) {
        Some(digits)
    } else {
        None
    }
}
