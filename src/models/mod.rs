use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;

/// The checklist types that get a sheet in the export and a code on the QR page, in display order.
pub const BILINEN_TIPLER: [(&str, &str); 3] = [
    ("sabah_acilis", "Sabah Açılış"),
    ("aksam_kapanis", "Akşam Kapanış"),
    ("tuvalet_kontrol", "Tuvalet Kontrol"),
];

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Ayarlar {
    pub lokanta_adi: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bildirim_email: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct KontrolTanimi {
    pub baslik: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub maddeler: Vec<String>,
}

/// The whole `config.json` document. Checklist definitions live at the top level
/// next to the reserved `ayarlar` and `personeller` keys.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct KontrolConfig {
    pub ayarlar: Ayarlar,
    #[serde(default)]
    pub personeller: Vec<String>,
    #[serde(flatten)]
    pub kontroller: BTreeMap<String, KontrolTanimi>,
}

impl KontrolConfig {
    pub fn kontrol(&self, tip: &str) -> Option<&KontrolTanimi> {
        self.kontroller.get(tip)
    }

    /// Returns the first checklist key whose item list is empty, if any.
    pub fn bos_kontrol(&self) -> Option<&str> {
        self.kontroller
            .iter()
            .find(|(_, tanim)| tanim.maddeler.is_empty())
            .map(|(tip, _)| tip.as_str())
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum Cevap {
    Evet,
    Hayir,
}

impl Cevap {
    pub fn as_str(&self) -> &'static str {
        match self {
            Cevap::Evet => "EVET",
            Cevap::Hayir => "HAYIR",
        }
    }

    /// Parses a submitted answer; accepts any casing and surrounding whitespace.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_uppercase().as_str() {
            "EVET" => Some(Cevap::Evet),
            "HAYIR" => Some(Cevap::Hayir),
            _ => None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CevapKaydi {
    pub madde: String,
    pub cevap: Cevap,
}

/// One completed checklist. Written once, never changed.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Kayit {
    pub id: i64,
    pub kontrol_tipi: String,
    pub kontrol_tipi_baslik: String,
    #[serde(default)]
    pub personel: String,
    pub tarih: String,
    pub saat: String,
    #[serde(serialize_with = "serialize_millis")]
    pub timestamp: DateTime<Utc>,
    pub cevaplar: Vec<CevapKaydi>,
    #[serde(default)]
    pub not: String,
}

/// Always three fractional digits and a `Z` suffix, e.g. `2026-03-07T05:06:40.000Z`.
fn serialize_millis<S: Serializer>(timestamp: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&timestamp.to_rfc3339_opts(SecondsFormat::Millis, true))
}

impl Kayit {
    pub fn hayir_sayisi(&self) -> usize {
        self.cevaplar.iter().filter(|c| c.cevap == Cevap::Hayir).count()
    }
}

pub mod db_operations;
