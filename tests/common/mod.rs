#![allow(dead_code)]

use actix_web::body::MessageBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{web, App};
use chrono::Utc;
use kontrol_backend::helper::notification_helpers::Notifier;
use kontrol_backend::models::db_operations::{kayit_db_operations, DataStore};
use kontrol_backend::models::{Cevap, CevapKaydi, Kayit};
use kontrol_backend::{routes, AppState};
use std::fs;
use tempfile::TempDir;
use tera::Tera;

pub const CONFIG: &str = r#"{
  "ayarlar": { "lokanta_adi": "Test Lokantası", "bildirim_email": "patron@example.com" },
  "personeller": ["Ali", "Ayşe"],
  "sabah_acilis": {
    "baslik": "Sabah Açılış",
    "icon": "🌅",
    "maddeler": ["Işıklar açıldı", "Ocaklar kontrol edildi", "Masalar temizlendi"]
  },
  "tuvalet_kontrol": {
    "baslik": "Tuvalet Kontrol",
    "maddeler": ["Sabun dolu"]
  }
}"#;

pub struct TestEnv {
    pub dir: TempDir,
    pub store: web::Data<DataStore>,
    pub tera: web::Data<Tera>,
    pub state: web::Data<AppState>,
}

impl TestEnv {
    pub fn new() -> Self {
        Self::with_config(CONFIG)
    }

    pub fn with_config(config: &str) -> Self {
        Self::with_state(config, AppState { notifier: None, public_base_url: None })
    }

    /// Like `with_config`, with submissions handed to `notifier`.
    pub fn with_notifier(config: &str, notifier: Notifier) -> Self {
        Self::with_state(config, AppState { notifier: Some(notifier), public_base_url: None })
    }

    fn with_state(config: &str, state: AppState) -> Self {
        let dir = tempfile::tempdir().expect("temp dir");
        fs::write(dir.path().join("config.json"), config).expect("write config");
        let tera = Tera::new(concat!(env!("CARGO_MANIFEST_DIR"), "/templates/**/*.html")).expect("templates");
        TestEnv {
            store: web::Data::new(DataStore::new(dir.path())),
            tera: web::Data::new(tera),
            state: web::Data::new(state),
            dir,
        }
    }

    pub fn app(
        &self,
    ) -> App<
        impl ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse<impl MessageBody>,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(self.tera.clone())
            .app_data(self.store.clone())
            .app_data(self.state.clone())
            .configure(routes::config_app)
    }

    pub fn kayitlar(&self) -> Vec<Kayit> {
        kayit_db_operations::read_all_kayitlar(&self.store).expect("read log")
    }

    /// Appends a record directly, bypassing the HTTP layer.
    pub fn seed(&self, id: i64, tip: &str) -> Kayit {
        let kayit = Kayit {
            id,
            kontrol_tipi: tip.to_string(),
            kontrol_tipi_baslik: tip.to_string(),
            personel: "Ali".to_string(),
            tarih: "19.10.2026".to_string(),
            saat: "10:00".to_string(),
            timestamp: Utc::now(),
            cevaplar: vec![CevapKaydi { madde: "Sabun dolu".to_string(), cevap: Cevap::Evet }],
            not: String::new(),
        };
        kayit_db_operations::append_kayit(&self.store, kayit).expect("append")
    }
}
