use crate::helper::{admin_helpers, export_helpers, form_helpers, qr_helpers};
use crate::models::db_operations::{config_db_operations, kayit_db_operations, DataStore};
use crate::models::KontrolTanimi;
use crate::routes::{base_url, render, store_failure, store_failure_json};
use crate::AppState;
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tera::{Context, Tera};

#[derive(Deserialize)]
struct QrPageQuery {
    url: Option<String>,
}

#[derive(Serialize)]
struct KontrolView<'a> {
    tip: &'a str,
    #[serde(flatten)]
    kontrol: &'a KontrolTanimi,
}

pub fn config_admin(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(show_admin_dashboard))
        .route("/qr-kodlar", web::get().to(show_qr_page))
        .route("/export/excel", web::get().to(export_excel))
        .route("/personel/ekle", web::post().to(add_personel_action))
        .route("/personel/sil", web::post().to(remove_personel_action));
}

async fn show_admin_dashboard(store: web::Data<DataStore>, tera: web::Data<Tera>) -> impl Responder {
    let config = match config_db_operations::read_config(&store) {
        Ok(config) => config,
        Err(e) => return store_failure(e),
    };
    let mut kayitlar = match kayit_db_operations::read_all_kayitlar(&store) {
        Ok(kayitlar) => kayitlar,
        Err(e) => return store_failure(e),
    };

    let stats = admin_helpers::dashboard_stats(&kayitlar, &admin_helpers::today());
    kayitlar.reverse();
    let kontroller: Vec<KontrolView> = admin_helpers::ordered_kontroller(&config)
        .into_iter()
        .map(|(tip, kontrol)| KontrolView { tip, kontrol })
        .collect();

    let mut ctx = Context::new();
    ctx.insert("lokanta_adi", &config.ayarlar.lokanta_adi);
    ctx.insert("bildirim_email", &config.ayarlar.bildirim_email);
    ctx.insert("kontroller", &kontroller);
    ctx.insert("personeller", &config.personeller);
    ctx.insert("kayitlar", &kayitlar);
    ctx.insert("stats", &stats);
    render(&tera, "admin.html", &ctx)
}

async fn show_qr_page(
    req: HttpRequest,
    query: web::Query<QrPageQuery>,
    store: web::Data<DataStore>,
    tera: web::Data<Tera>,
    app_state: web::Data<AppState>,
) -> impl Responder {
    let config = match config_db_operations::read_config(&store) {
        Ok(config) => config,
        Err(e) => return store_failure(e),
    };
    let base = base_url(&req, query.url.as_deref(), &app_state);

    let qr_kodlar = match qr_helpers::qr_kodlar(&config, &base) {
        Ok(kodlar) => kodlar,
        Err(e) => {
            log::error!("Failed to generate QR page: {}", e);
            return HttpResponse::InternalServerError().body("QR kodları oluşturulamadı");
        }
    };

    let mut ctx = Context::new();
    ctx.insert("qr_kodlar", &qr_kodlar);
    ctx.insert("lokanta_adi", &config.ayarlar.lokanta_adi);
    ctx.insert("base_url", &base);
    render(&tera, "qr_kodlar.html", &ctx)
}

async fn export_excel(store: web::Data<DataStore>) -> impl Responder {
    let config = match config_db_operations::read_config(&store) {
        Ok(config) => config,
        Err(e) => return store_failure(e),
    };
    let kayitlar = match kayit_db_operations::read_all_kayitlar(&store) {
        Ok(kayitlar) => kayitlar,
        Err(e) => return store_failure(e),
    };

    let sayfalar = export_helpers::plan_sheets(&config, &kayitlar);
    match export_helpers::build_workbook(&sayfalar) {
        Ok(bytes) => {
            let filename = export_helpers::export_filename_today();
            log::info!("Exporting {} submissions as {}", kayitlar.len(), filename);
            HttpResponse::Ok()
                .content_type(export_helpers::XLSX_CONTENT_TYPE)
                .insert_header(ContentDisposition {
                    disposition: DispositionType::Attachment,
                    parameters: vec![DispositionParam::Filename(filename)],
                })
                .body(bytes)
        }
        Err(e) => {
            log::error!("Failed to build workbook: {}", e);
            HttpResponse::InternalServerError().body("Excel dosyası oluşturulamadı")
        }
    }
}

/// `isim` from a JSON or urlencoded body. A missing name is an empty one, which both actions ignore.
fn personel_isim(req: &HttpRequest, body: &web::Bytes) -> Result<String, form_helpers::FormError> {
    let fields = form_helpers::request_fields(req, body)?;
    Ok(fields.get("isim").cloned().unwrap_or_default())
}

async fn add_personel_action(
    req: HttpRequest,
    body: web::Bytes,
    store: web::Data<DataStore>,
) -> impl Responder {
    let isim = match personel_isim(&req, &body) {
        Ok(isim) => isim,
        Err(e) => return e.to_response(),
    };
    match admin_helpers::add_personel(&store, &isim) {
        Ok(personeller) => HttpResponse::Ok().json(json!({ "success": true, "personeller": personeller })),
        Err(e) => store_failure_json(e),
    }
}

async fn remove_personel_action(
    req: HttpRequest,
    body: web::Bytes,
    store: web::Data<DataStore>,
) -> impl Responder {
    let isim = match personel_isim(&req, &body) {
        Ok(isim) => isim,
        Err(e) => return e.to_response(),
    };
    match admin_helpers::remove_personel(&store, &isim) {
        Ok(personeller) => HttpResponse::Ok().json(json!({ "success": true, "personeller": personeller })),
        Err(e) => store_failure_json(e),
    }
}
