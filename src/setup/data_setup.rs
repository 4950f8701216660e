use crate::models::db_operations::{
    config_db_operations, kayit_db_operations, write_json_atomic, DataStore, StoreError,
};
use crate::models::{Ayarlar, Kayit, KontrolConfig, KontrolTanimi};
use std::collections::BTreeMap;
use std::fs;

fn tanim(baslik: &str, icon: &str, maddeler: &[&str]) -> KontrolTanimi {
    KontrolTanimi {
        baslik: baslik.to_string(),
        icon: Some(icon.to_string()),
        maddeler: maddeler.iter().map(|m| m.to_string()).collect(),
    }
}

/// The document written by `setup_cli data init`.
pub fn default_config() -> KontrolConfig {
    let mut kontroller = BTreeMap::new();
    kontroller.insert(
        "sabah_acilis".to_string(),
        tanim(
            "Sabah Açılış Kontrolü",
            "🌅",
            &[
                "Işıklar ve havalandırma açıldı",
                "Mutfak ocakları ve fırınlar kontrol edildi",
                "Buzdolabı ve derin dondurucu sıcaklıkları kontrol edildi",
                "Masalar ve sandalyeler temizlendi",
                "Kasa açılışı yapıldı",
            ],
        ),
    );
    kontroller.insert(
        "aksam_kapanis".to_string(),
        tanim(
            "Akşam Kapanış Kontrolü",
            "🌙",
            &[
                "Ocaklar ve gaz vanaları kapatıldı",
                "Buzdolabı kapakları kapalı",
                "Çöpler çıkarıldı",
                "Zeminler temizlendi",
                "Kasa kapanışı yapıldı",
                "Kapılar ve pencereler kilitlendi",
            ],
        ),
    );
    kontroller.insert(
        "tuvalet_kontrol".to_string(),
        tanim(
            "Tuvalet Kontrolü",
            "🚻",
            &[
                "Zemin temiz ve kuru",
                "Sabun dolu",
                "Kağıt havlu ve tuvalet kağıdı dolu",
                "Çöp kutusu boşaltıldı",
            ],
        ),
    );

    KontrolConfig {
        ayarlar: Ayarlar {
            lokanta_adi: "Mega Yıldız Aile Lokantası".to_string(),
            bildirim_email: None,
        },
        personeller: Vec::new(),
        kontroller,
    }
}

/// Creates the data directory with a default config and an empty submission log.
/// An existing config is kept unless `force` is set; an existing log is never touched.
/// Returns whether a config was written.
pub fn init_data_dir(store: &DataStore, force: bool) -> Result<bool, StoreError> {
    fs::create_dir_all(store.data_dir()).map_err(|source| StoreError::Io {
        path: store.data_dir().to_path_buf(),
        source,
    })?;

    let wrote_config = force || !store.config_path().exists();
    if wrote_config {
        config_db_operations::write_config(store, &default_config())?;
    }
    if !store.kayitlar_path().exists() {
        write_json_atomic(&store.kayitlar_path(), &Vec::<Kayit>::new())?;
    }
    // Validates the result either way.
    config_db_operations::validate_config(&config_db_operations::read_config(store)?)?;
    kayit_db_operations::read_all_kayitlar(store)?;
    Ok(wrote_config)
}
