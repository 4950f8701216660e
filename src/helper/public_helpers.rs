use crate::models::db_operations::{kayit_db_operations, DataStore, StoreError};
use crate::models::Kayit;

pub const DEFAULT_RECENT_LIMIT: usize = 10;

/// All records, or only those of checklist type `tip`, in insertion order.
pub fn fetch_kayitlar(store: &DataStore, tip: Option<&str>) -> Result<Vec<Kayit>, StoreError> {
    let kayitlar = kayit_db_operations::read_all_kayitlar(store)?;
    Ok(match tip {
        Some(tip) => filter_by_tip(kayitlar, tip),
        None => kayitlar,
    })
}

/// The last `limit` records, newest first.
pub fn fetch_son_kayitlar(store: &DataStore, limit: usize) -> Result<Vec<Kayit>, StoreError> {
    let kayitlar = kayit_db_operations::read_all_kayitlar(store)?;
    Ok(latest(kayitlar, limit))
}

pub fn filter_by_tip(kayitlar: Vec<Kayit>, tip: &str) -> Vec<Kayit> {
    kayitlar.into_iter().filter(|k| k.kontrol_tipi == tip).collect()
}

pub fn latest(kayitlar: Vec<Kayit>, limit: usize) -> Vec<Kayit> {
    kayitlar.into_iter().rev().take(limit).collect()
}
