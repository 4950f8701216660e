use crate::models::db_operations::StoreError;
use crate::AppState;
use actix_web::{web, HttpRequest, HttpResponse};
use serde_json::json;
use tera::{Context, Tera};

pub mod admin;
pub mod form;
pub mod public;

/// Registers every route of the service.
pub fn config_app(cfg: &mut web::ServiceConfig) {
    cfg.configure(admin::config_admin)
        .configure(form::config_form)
        .configure(public::config_api)
        .configure(public::config_qr);
}

pub(crate) fn render(tera: &Tera, template: &str, ctx: &Context) -> HttpResponse {
    match tera.render(template, ctx) {
        Ok(rendered) => HttpResponse::Ok().content_type("text/html; charset=utf-8").body(rendered),
        Err(e) => {
            log::error!("Template rendering error in '{}': {:?}", template, e);
            HttpResponse::InternalServerError().body("Template error")
        }
    }
}

pub(crate) fn store_failure(e: StoreError) -> HttpResponse {
    log::error!("Data store failure: {}", e);
    HttpResponse::InternalServerError().body("Veri dosyaları okunamadı")
}

pub(crate) fn store_failure_json(e: StoreError) -> HttpResponse {
    log::error!("Data store failure: {}", e);
    HttpResponse::InternalServerError().json(json!({ "success": false, "message": "Veri dosyaları okunamadı" }))
}

/// Base URL for QR targets: `?url=` wins, then the configured public URL, then the request's own origin.
pub(crate) fn base_url(req: &HttpRequest, query_url: Option<&str>, state: &AppState) -> String {
    if let Some(url) = query_url.map(str::trim).filter(|u| !u.is_empty()) {
        return url.trim_end_matches('/').to_string();
    }
    if let Some(url) = &state.public_base_url {
        return url.clone();
    }
    let info = req.connection_info();
    format!("{}://{}", info.scheme(), info.host())
}
