//! QR code rendering for short links
//!
//! The QR encodes the public short URL (`{api}/{path}`) at the highest
//! error-correction level, rendered as a unicode block grid for the
//! terminal.

use qrcode::render::unicode;
use qrcode::types::QrError;
use qrcode::{EcLevel, QrCode};

/// Builds the public short URL a mapping resolves under
pub fn short_link(api_url: &str, path: &str) -> String {
    format!("{}/{}", api_url.trim_end_matches('/'), path)
}

/// Renders `data` as a terminal-printable QR code
pub fn qr_unicode(data: &str) -> Result<String, QrError> {
    let code = QrCode::with_error_correction_level(data, EcLevel::H)?;
    Ok(code
        .render::<unicode::Dense1x2>()
        .quiet_zone(true)
        .build())
}
