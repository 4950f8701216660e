use super::{read_json, write_json_atomic, DataStore, StoreError};
use crate::models::Kayit;
use std::path::Path;

fn ensure_log_exists(store: &DataStore, path: &Path) -> Result<(), StoreError> {
    if path.exists() {
        return Ok(());
    }
    let _guard = store.lock_writes();
    if !path.exists() {
        log::info!("Creating empty submission log at {}", path.display());
        write_json_atomic(path, &Vec::<Kayit>::new())?;
    }
    Ok(())
}

/// Returns every stored submission in insertion order, creating an empty log first if needed.
pub fn read_all_kayitlar(store: &DataStore) -> Result<Vec<Kayit>, StoreError> {
    let path = store.kayitlar_path();
    ensure_log_exists(store, &path)?;
    read_json(&path)
}

/// Appends one record and returns it as stored.
///
/// Ids are kept strictly increasing: a record whose id is not greater than the
/// last stored id is moved to `last + 1`.
pub fn append_kayit(store: &DataStore, mut kayit: Kayit) -> Result<Kayit, StoreError> {
    let path = store.kayitlar_path();
    ensure_log_exists(store, &path)?;

    let _guard = store.lock_writes();
    let mut kayitlar: Vec<Kayit> = read_json(&path)?;
    if let Some(last) = kayitlar.last() {
        if kayit.id <= last.id {
            kayit.id = last.id + 1;
        }
    }
    kayitlar.push(kayit.clone());
    write_json_atomic(&path, &kayitlar)?;
    Ok(kayit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Cevap, CevapKaydi};
    use chrono::Utc;

    fn kayit(id: i64, tip: &str) -> Kayit {
        Kayit {
            id,
            kontrol_tipi: tip.to_string(),
            kontrol_tipi_baslik: tip.to_uppercase(),
            personel: String::new(),
            tarih: "19.10.2026".to_string(),
            saat: "09:30".to_string(),
            timestamp: Utc::now(),
            cevaplar: vec![CevapKaydi { madde: "Kapı".to_string(), cevap: Cevap::Evet }],
            not: String::new(),
        }
    }

    #[test]
    fn missing_log_is_created_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = DataStore::new(dir.path());
        assert!(read_all_kayitlar(&store).unwrap().is_empty());
        assert!(dir.path().join("kayitlar.json").exists());
    }

    #[test]
    fn append_grows_by_one_and_keeps_prior_records() {
        let dir = tempfile::tempdir().unwrap();
        let store = DataStore::new(dir.path());

        let first = append_kayit(&store, kayit(100, "sabah_acilis")).unwrap();
        append_kayit(&store, kayit(200, "aksam_kapanis")).unwrap();

        let all = read_all_kayitlar(&store).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0], first);
        assert_eq!(all[1].kontrol_tipi, "aksam_kapanis");
    }

    #[test]
    fn colliding_ids_are_bumped() {
        let dir = tempfile::tempdir().unwrap();
        let store = DataStore::new(dir.path());

        append_kayit(&store, kayit(500, "sabah_acilis")).unwrap();
        let second = append_kayit(&store, kayit(500, "sabah_acilis")).unwrap();
        let third = append_kayit(&store, kayit(10, "sabah_acilis")).unwrap();
        assert_eq!(second.id, 501);
        assert_eq!(third.id, 502);
    }
}
