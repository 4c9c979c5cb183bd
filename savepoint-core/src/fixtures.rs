//! Minimal resource payloads for tests.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

const PNG: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
const JPEG: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10];
const GIF: &[u8] = b"GIF89a\x01\x00\x01\x00";
const OTF: &[u8] = b"OTTO\x00\x0A\x00\x80";
const TTF: &[u8] = &[0x00, 0x01, 0x00, 0x00, 0x00, 0x0A];

pub fn png_base64() -> String {
    STANDARD.encode(PNG)
}

pub fn png_data_uri() -> String {
    format!("data:image/png;base64,{}", png_base64())
}

pub fn jpeg_data_uri() -> String {
    format!("data:image/jpeg;base64,{}", STANDARD.encode(JPEG))
}

pub fn gif_data_uri() -> String {
    format!("data:image/gif;base64,{}", STANDARD.encode(GIF))
}

pub fn otf_base64() -> String {
    STANDARD.encode(OTF)
}

pub fn ttf_base64() -> String {
    STANDARD.encode(TTF)
}
