use crate::helper::{public_helpers, qr_helpers};
use crate::models::db_operations::{config_db_operations, DataStore};
use crate::routes::{base_url, store_failure_json};
use crate::AppState;
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use serde::Deserialize;
use serde_json::json;

#[derive(Deserialize)]
pub struct KayitQuery {
    tip: Option<String>,
}

#[derive(Deserialize)]
pub struct RecentQuery {
    limit: Option<usize>,
}

#[derive(Deserialize)]
pub struct QrQuery {
    url: Option<String>,
}

pub fn config_api(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/kayitlar", web::get().to(get_kayitlar))
            .route("/son-kayitlar", web::get().to(get_son_kayitlar)),
    );
}

pub fn config_qr(cfg: &mut web::ServiceConfig) {
    cfg.route("/qr/{tip}", web::get().to(get_qr));
}

async fn get_kayitlar(store: web::Data<DataStore>, query: web::Query<KayitQuery>) -> impl Responder {
    let tip = query.tip.as_deref().filter(|t| !t.is_empty());
    match public_helpers::fetch_kayitlar(&store, tip) {
        Ok(kayitlar) => HttpResponse::Ok().json(kayitlar),
        Err(e) => store_failure_json(e),
    }
}

async fn get_son_kayitlar(store: web::Data<DataStore>, query: web::Query<RecentQuery>) -> impl Responder {
    let limit = query.limit.unwrap_or(public_helpers::DEFAULT_RECENT_LIMIT);
    match public_helpers::fetch_son_kayitlar(&store, limit) {
        Ok(kayitlar) => HttpResponse::Ok().json(kayitlar),
        Err(e) => store_failure_json(e),
    }
}

async fn get_qr(
    req: HttpRequest,
    tip: web::Path<String>,
    query: web::Query<QrQuery>,
    store: web::Data<DataStore>,
    app_state: web::Data<AppState>,
) -> impl Responder {
    let tip = tip.into_inner();
    let config = match config_db_operations::read_config(&store) {
        Ok(config) => config,
        Err(e) => return store_failure_json(e),
    };
    let form_url = qr_helpers::form_url(&base_url(&req, query.url.as_deref(), &app_state), &tip);
    let baslik = config
        .kontrol(&tip)
        .map(|k| k.baslik.clone())
        .unwrap_or_else(|| tip.clone());

    match qr_helpers::qr_data_url(&form_url, qr_helpers::SINGLE_QR_WIDTH) {
        Ok(qr) => HttpResponse::Ok().json(json!({
            "success": true,
            "qr": qr,
            "url": form_url,
            "baslik": baslik,
        })),
        Err(e) => {
            log::error!("Failed to generate QR code for '{}': {}", tip, e);
            HttpResponse::InternalServerError().json(json!({ "success": false, "message": e.to_string() }))
        }
    }
}
