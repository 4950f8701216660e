use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{imageops, DynamicImage, ImageBuffer, ImageFormat, Rgb};
use qrcode::{EcLevel, QrCode};
use serde::Serialize;
use std::io::Cursor;
use thiserror::Error;
use url::{form_urlencoded, Url};

use crate::models::{KontrolConfig, BILINEN_TIPLER};

pub const SINGLE_QR_WIDTH: u32 = 400;
pub const PAGE_QR_WIDTH: u32 = 300;
/// Quiet zone around the code, in modules.
pub const QR_MARGIN: u32 = 2;
const DARK: Rgb<u8> = Rgb([0x1a, 0x1a, 0x2e]);
const LIGHT: Rgb<u8> = Rgb([0xff, 0xff, 0xff]);

#[derive(Error, Debug)]
pub enum QrError {
    #[error("QR encoding error: {0}")]
    Encode(#[from] qrcode::types::QrError),
    #[error("PNG encoding error: {0}")]
    Image(#[from] image::ImageError),
}

#[derive(Serialize, Debug)]
pub struct QrKod {
    pub tip: String,
    pub baslik: String,
    pub icon: Option<String>,
    pub qr: String,
    pub url: String,
}

/// `<base>/form/<tip>` with `tip` percent-encoded as a single path segment.
pub fn form_url(base_url: &str, tip: &str) -> String {
    let base = base_url.trim_end_matches('/');
    if let Ok(mut url) = Url::parse(base) {
        let pushed = match url.path_segments_mut() {
            Ok(mut segments) => {
                segments.pop_if_empty().push("form").push(tip);
                true
            }
            Err(()) => false,
        };
        if pushed {
            return url.to_string();
        }
    }
    let tip: String = form_urlencoded::byte_serialize(tip.as_bytes()).collect();
    format!("{}/form/{}", base, tip.replace('+', "%20"))
}

/// Renders `data` as a square PNG at least `width` pixels wide and returns it as a data URL.
pub fn qr_data_url(data: &str, width: u32) -> Result<String, QrError> {
    let code = QrCode::with_error_correction_level(data.as_bytes(), EcLevel::M)?;
    let modules = code.width() as u32;
    let module_px = (width / (modules + 2 * QR_MARGIN)).max(1);

    let symbol = code
        .render::<Rgb<u8>>()
        .quiet_zone(false)
        .module_dimensions(module_px, module_px)
        .dark_color(DARK)
        .light_color(LIGHT)
        .build();

    let side = width.max(symbol.width() + 2 * QR_MARGIN * module_px);
    let mut canvas = ImageBuffer::from_pixel(side, side, LIGHT);
    let offset = i64::from((side - symbol.width()) / 2);
    imageops::overlay(&mut canvas, &symbol, offset, offset);

    let mut png = Vec::new();
    DynamicImage::ImageRgb8(canvas).write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
    Ok(format!("data:image/png;base64,{}", STANDARD.encode(&png)))
}

/// Codes for every known checklist type present in `config`, in the fixed display order.
pub fn qr_kodlar(config: &KontrolConfig, base_url: &str) -> Result<Vec<QrKod>, QrError> {
    BILINEN_TIPLER
        .iter()
        .filter_map(|(tip, _)| config.kontrol(tip).map(|kontrol| (*tip, kontrol)))
        .map(|(tip, kontrol)| {
            let url = form_url(base_url, tip);
            Ok(QrKod {
                tip: tip.to_string(),
                baslik: kontrol.baslik.clone(),
                icon: kontrol.icon.clone(),
                qr: qr_data_url(&url, PAGE_QR_WIDTH)?,
                url,
            })
        })
        .collect()
}
