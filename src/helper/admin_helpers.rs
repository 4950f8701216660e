use crate::models::db_operations::{config_db_operations, DataStore, StoreError};
use crate::models::{Kayit, KontrolConfig, KontrolTanimi, BILINEN_TIPLER};
use chrono::Local;
use serde::Serialize;

#[derive(Serialize, Debug, PartialEq)]
pub struct DashboardStats {
    pub toplam: usize,
    pub bugun: usize,
    pub eksikli: usize,
}

/// Adds `isim` to the roster unless it is blank or already present. Returns the roster.
pub fn add_personel(store: &DataStore, isim: &str) -> Result<Vec<String>, StoreError> {
    let isim = isim.trim();
    let config = config_db_operations::update_config(store, |config| {
        if isim.is_empty() || config.personeller.iter().any(|p| p == isim) {
            return false;
        }
        config.personeller.push(isim.to_string());
        true
    })?;
    Ok(config.personeller)
}

/// Removes `isim` from the roster. Unknown names leave the file untouched.
pub fn remove_personel(store: &DataStore, isim: &str) -> Result<Vec<String>, StoreError> {
    let isim = isim.trim();
    let config = config_db_operations::update_config(store, |config| {
        let before = config.personeller.len();
        config.personeller.retain(|p| p != isim);
        config.personeller.len() != before
    })?;
    Ok(config.personeller)
}

pub fn dashboard_stats(kayitlar: &[Kayit], bugun: &str) -> DashboardStats {
    DashboardStats {
        toplam: kayitlar.len(),
        bugun: kayitlar.iter().filter(|k| k.tarih == bugun).count(),
        eksikli: kayitlar.iter().filter(|k| k.hayir_sayisi() > 0).count(),
    }
}

pub fn today() -> String {
    Local::now().format("%d.%m.%Y").to_string()
}

/// Checklist definitions in the order they are shown on the dashboard: known types first.
pub fn ordered_kontroller(config: &KontrolConfig) -> Vec<(&str, &KontrolTanimi)> {
    let mut ordered: Vec<(&str, &KontrolTanimi)> = BILINEN_TIPLER
        .iter()
        .filter_map(|(tip, _)| config.kontrol(tip).map(|k| (*tip, k)))
        .collect();
    for (tip, kontrol) in &config.kontroller {
        if !ordered.iter().any(|(t, _)| *t == tip.as_str()) {
            ordered.push((tip.as_str(), kontrol));
        }
    }
    ordered
}
