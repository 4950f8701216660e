use crate::helper::form_helpers::{self, FormError};
use crate::models::{Kayit, KontrolTanimi};
use chrono::{DateTime, Local, TimeZone, Utc};
use std::collections::HashMap;

/// Builds a record for `tip` from submitted fields, stamped at `now`.
///
/// `tarih`/`saat` follow Turkish formatting in server local time; `timestamp`
/// is the same instant in UTC at millisecond precision, and `id` its epoch millis.
pub fn build_kayit<Tz: TimeZone>(
    tip: &str,
    kontrol: &KontrolTanimi,
    fields: &HashMap<String, String>,
    now: DateTime<Tz>,
) -> Result<Kayit, FormError>
where
    Tz::Offset: std::fmt::Display,
{
    let cevaplar = form_helpers::build_cevaplar(kontrol, fields)?;
    let not = form_helpers::read_not(fields)?;

    let id = now.timestamp_millis();
    let timestamp = Utc
        .timestamp_millis_opt(id)
        .single()
        .unwrap_or_else(|| now.with_timezone(&Utc));

    Ok(Kayit {
        id,
        kontrol_tipi: tip.to_string(),
        kontrol_tipi_baslik: kontrol.baslik.clone(),
        personel: form_helpers::read_personel(fields),
        tarih: now.format("%d.%m.%Y").to_string(),
        saat: now.format("%H:%M").to_string(),
        timestamp,
        cevaplar,
        not,
    })
}

pub fn build_kayit_now(
    tip: &str,
    kontrol: &KontrolTanimi,
    fields: &HashMap<String, String>,
) -> Result<Kayit, FormError> {
    build_kayit(tip, kontrol, fields, Local::now())
}
