use crate::models::{Cevap, Kayit, KontrolConfig, BILINEN_TIPLER};
use chrono::{NaiveDate, Utc};
use rust_xlsxwriter::{Color, DocProperties, Format, FormatPattern, Workbook, XlsxError};

pub const XLSX_CONTENT_TYPE: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
const WORKBOOK_AUTHOR: &str = "Mega Yıldız QR Kontrol Sistemi";
const COLUMN_WIDTH: f64 = 15.0;
const MADDE_PREVIEW_CHARS: usize = 50;

/// A data cell and whether it holds a negative answer.
#[derive(Debug, Clone, PartialEq)]
pub struct Hucre {
    pub deger: String,
    pub hayir: bool,
}

impl Hucre {
    fn plain(deger: impl Into<String>) -> Self {
        Hucre { deger: deger.into(), hayir: false }
    }
}

/// Everything that goes on one sheet, before any formatting.
#[derive(Debug, Clone, PartialEq)]
pub struct SayfaPlani {
    pub ad: String,
    pub baslik_satiri: Vec<String>,
    /// Shortened item texts under the header; absent when the type is not configured.
    pub madde_satiri: Option<Vec<String>>,
    pub satirlar: Vec<Vec<Hucre>>,
}

fn dash_if_empty(value: &str) -> String {
    if value.is_empty() {
        "-".to_string()
    } else {
        value.to_string()
    }
}

/// Lays out one sheet per known checklist type, in the fixed order.
pub fn plan_sheets(config: &KontrolConfig, kayitlar: &[Kayit]) -> Vec<SayfaPlani> {
    BILINEN_TIPLER
        .iter()
        .map(|(tip, ad)| {
            let kontrol = config.kontrol(tip);

            let mut baslik_satiri = vec!["Tarih".to_string(), "Saat".to_string(), "Personel".to_string()];
            if let Some(kontrol) = kontrol {
                baslik_satiri.extend((1..=kontrol.maddeler.len()).map(|i| format!("Madde {}", i)));
            }
            baslik_satiri.push("Not".to_string());

            let madde_satiri = kontrol.map(|kontrol| {
                let mut satir = vec![String::new(); 3];
                satir.extend(
                    kontrol
                        .maddeler
                        .iter()
                        .map(|m| m.chars().take(MADDE_PREVIEW_CHARS).collect::<String>()),
                );
                satir.push(String::new());
                satir
            });

            let satirlar = kayitlar
                .iter()
                .filter(|k| k.kontrol_tipi == *tip)
                .map(|kayit| {
                    let mut satir = vec![
                        Hucre::plain(kayit.tarih.as_str()),
                        Hucre::plain(kayit.saat.as_str()),
                        Hucre::plain(dash_if_empty(&kayit.personel)),
                    ];
                    satir.extend(kayit.cevaplar.iter().map(|c| Hucre {
                        deger: c.cevap.as_str().to_string(),
                        hayir: c.cevap == Cevap::Hayir,
                    }));
                    satir.push(Hucre::plain(dash_if_empty(&kayit.not)));
                    satir
                })
                .collect();

            SayfaPlani {
                ad: ad.to_string(),
                baslik_satiri,
                madde_satiri,
                satirlar,
            }
        })
        .collect()
}

pub struct Bicimler {
    pub baslik: Format,
    pub madde: Format,
    pub hayir: Format,
}

impl Bicimler {
    pub fn new() -> Self {
        Bicimler {
            baslik: Format::new()
                .set_bold()
                .set_font_color(Color::White)
                .set_background_color(Color::RGB(0x1A1A2E))
                .set_pattern(FormatPattern::Solid),
            madde: Format::new().set_italic().set_font_size(9),
            hayir: Format::new()
                .set_background_color(Color::RGB(0xFF6B6B))
                .set_pattern(FormatPattern::Solid),
        }
    }

    /// Negative answers are highlighted; every other data cell is written plain.
    pub fn hucre(&self, hucre: &Hucre) -> Option<&Format> {
        hucre.hayir.then_some(&self.hayir)
    }
}

impl Default for Bicimler {
    fn default() -> Self {
        Self::new()
    }
}

/// Writes the planned sheets into an XLSX workbook and returns its bytes.
pub fn build_workbook(sayfalar: &[SayfaPlani]) -> Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();
    workbook.set_properties(&DocProperties::new().set_author(WORKBOOK_AUTHOR));
    let bicimler = Bicimler::new();

    for sayfa in sayfalar {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&sayfa.ad)?;

        for (col, baslik) in sayfa.baslik_satiri.iter().enumerate() {
            worksheet.write_string_with_format(0, col as u16, baslik, &bicimler.baslik)?;
        }

        let mut row: u32 = 1;
        if let Some(madde_satiri) = &sayfa.madde_satiri {
            for (col, madde) in madde_satiri.iter().enumerate() {
                worksheet.write_string_with_format(row, col as u16, madde, &bicimler.madde)?;
            }
            row += 1;
        }

        let mut widest = sayfa.baslik_satiri.len();
        for satir in &sayfa.satirlar {
            widest = widest.max(satir.len());
            for (col, hucre) in satir.iter().enumerate() {
                match bicimler.hucre(hucre) {
                    Some(format) => worksheet.write_string_with_format(row, col as u16, &hucre.deger, format)?,
                    None => worksheet.write_string(row, col as u16, &hucre.deger)?,
                };
            }
            row += 1;
        }

        for col in 0..widest {
            worksheet.set_column_width(col as u16, COLUMN_WIDTH)?;
        }
    }

    workbook.save_to_buffer()
}

pub fn export_filename(date: NaiveDate) -> String {
    format!("Kontrol_Kayitlari_{}.xlsx", date.format("%Y-%m-%d"))
}

pub fn export_filename_today() -> String {
    export_filename(Utc::now().date_naive())
}
