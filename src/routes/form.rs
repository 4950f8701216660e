use crate::helper::notification_helpers::{self, Bildirim};
use crate::helper::{form_helpers, kayit_helpers};
use crate::models::db_operations::{config_db_operations, kayit_db_operations, DataStore};
use crate::routes::{render, store_failure, store_failure_json};
use crate::AppState;
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use serde_json::json;
use tera::{Context, Tera};

const NOT_FOUND_MESSAGE: &str = "Kontrol tipi bulunamadı";

fn bos_kontrol_message(tip: &str) -> String {
    format!("'{}' kontrolünde tanımlı madde yok", tip)
}

pub fn config_form(cfg: &mut web::ServiceConfig) {
    cfg.route("/form/{tip}", web::get().to(show_form))
        .route("/form/{tip}/gonder", web::post().to(submit_form));
}

async fn show_form(
    tip: web::Path<String>,
    store: web::Data<DataStore>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let tip = tip.into_inner();
    let config = match config_db_operations::read_config(&store) {
        Ok(config) => config,
        Err(e) => return store_failure(e),
    };
    let Some(kontrol) = config.kontrol(&tip) else {
        log::warn!("Form requested for unknown checklist type '{}'", tip);
        return HttpResponse::NotFound().content_type("text/plain; charset=utf-8").body(NOT_FOUND_MESSAGE);
    };
    if kontrol.maddeler.is_empty() {
        log::error!("Refusing to render form for '{}': checklist has no items", tip);
        return HttpResponse::InternalServerError()
            .content_type("text/plain; charset=utf-8")
            .body(bos_kontrol_message(&tip));
    }

    let mut ctx = Context::new();
    ctx.insert("tip", &tip);
    ctx.insert("kontrol", kontrol);
    ctx.insert("lokanta_adi", &config.ayarlar.lokanta_adi);
    ctx.insert("personeller", &config.personeller);
    render(&tera, "form.html", &ctx)
}

async fn submit_form(
    req: HttpRequest,
    tip: web::Path<String>,
    body: web::Bytes,
    store: web::Data<DataStore>,
    app_state: web::Data<AppState>,
) -> impl Responder {
    let tip = tip.into_inner();
    let config = match config_db_operations::read_config(&store) {
        Ok(config) => config,
        Err(e) => return store_failure_json(e),
    };
    let Some(kontrol) = config.kontrol(&tip) else {
        return HttpResponse::NotFound().json(json!({ "success": false, "message": NOT_FOUND_MESSAGE }));
    };
    if kontrol.maddeler.is_empty() {
        log::error!("Refusing submission for '{}': checklist has no items", tip);
        return HttpResponse::InternalServerError()
            .json(json!({ "success": false, "message": bos_kontrol_message(&tip) }));
    }

    let fields = match form_helpers::request_fields(&req, &body) {
        Ok(fields) => fields,
        Err(e) => return e.to_response(),
    };
    let kayit = match kayit_helpers::build_kayit_now(&tip, kontrol, &fields) {
        Ok(kayit) => kayit,
        Err(e) => {
            log::warn!("Rejected submission for '{}': {}", tip, e);
            return e.to_response();
        }
    };

    let kayit = match kayit_db_operations::append_kayit(&store, kayit) {
        Ok(kayit) => kayit,
        Err(e) => return store_failure_json(e),
    };
    log::info!(
        "Stored submission {} for '{}' ({} negative answers)",
        kayit.id,
        tip,
        kayit.hayir_sayisi()
    );

    let bildirim = notification_helpers::compose_text(&config, &kayit);
    let alici = config
        .ayarlar
        .bildirim_email
        .as_deref()
        .map(str::trim)
        .filter(|a| !a.is_empty());
    if let (Some(notifier), Some(alici)) = (&app_state.notifier, alici) {
        notifier.enqueue(Bildirim {
            alici: alici.to_string(),
            konu: notification_helpers::compose_subject(&config, &kayit),
            govde: bildirim.clone(),
        });
    }

    HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Kontrol kaydedildi!",
        "bildirim": bildirim,
    }))
}
