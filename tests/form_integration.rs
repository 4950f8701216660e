mod common;

use actix_web::http::{header, StatusCode};
use actix_web::test;
use common::TestEnv;
use kontrol_backend::models::Cevap;
use serde_json::{json, Value};

#[actix_web::test]
async fn form_renders_for_configured_types_only() {
    let env = TestEnv::new();
    let app = test::init_service(env.app()).await;

    for tip in ["sabah_acilis", "tuvalet_kontrol"] {
        let req = test::TestRequest::get().uri(&format!("/form/{}", tip)).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK, "form {}", tip);
    }

    let req = test::TestRequest::get().uri("/form/aksam_kapanis").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body = test::read_body(resp).await;
    assert_eq!(std::str::from_utf8(&body).unwrap(), "Kontrol tipi bulunamadı");
}

#[actix_web::test]
async fn form_lists_items_and_staff() {
    let env = TestEnv::new();
    let app = test::init_service(env.app()).await;

    let req = test::TestRequest::get().uri("/form/sabah_acilis").to_request();
    let body = test::call_and_read_body(&app, req).await;
    let html = std::str::from_utf8(&body).unwrap();
    assert!(html.contains("Sabah Açılış"));
    assert!(html.contains("Ocaklar kontrol edildi"));
    assert!(html.contains("name=\"madde_2\""));
    assert!(html.contains("Ayşe"));
    assert!(html.contains("Test Lokantası"));
}

#[actix_web::test]
async fn submission_defaults_missing_answers_to_hayir() {
    let env = TestEnv::new();
    let app = test::init_service(env.app()).await;

    let req = test::TestRequest::post()
        .uri("/form/sabah_acilis/gonder")
        .insert_header((header::CONTENT_TYPE, "application/x-www-form-urlencoded"))
        .set_payload("personel=Ali&madde_0=EVET&madde_2=EVET&not=ok")
        .to_request();
    let resp: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(resp["success"], json!(true));
    assert_eq!(resp["message"], json!("Kontrol kaydedildi!"));
    assert!(resp["bildirim"].as_str().unwrap().contains("Personel: Ali"));

    let kayitlar = env.kayitlar();
    assert_eq!(kayitlar.len(), 1);
    let kayit = &kayitlar[0];
    assert_eq!(kayit.kontrol_tipi, "sabah_acilis");
    assert_eq!(kayit.kontrol_tipi_baslik, "Sabah Açılış");
    assert_eq!(kayit.personel, "Ali");
    assert_eq!(kayit.not, "ok");
    let cevaplar: Vec<Cevap> = kayit.cevaplar.iter().map(|c| c.cevap).collect();
    assert_eq!(cevaplar, vec![Cevap::Evet, Cevap::Hayir, Cevap::Evet]);
    assert_eq!(kayit.cevaplar[1].madde, "Ocaklar kontrol edildi");
}

#[actix_web::test]
async fn json_submission_is_accepted() {
    let env = TestEnv::new();
    let app = test::init_service(env.app()).await;

    let req = test::TestRequest::post()
        .uri("/form/tuvalet_kontrol/gonder")
        .set_json(json!({ "personel": "Ayşe", "madde_0": "EVET" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let kayitlar = env.kayitlar();
    assert_eq!(kayitlar[0].personel, "Ayşe");
    assert_eq!(kayitlar[0].cevaplar[0].cevap, Cevap::Evet);
    assert_eq!(kayitlar[0].not, "");
}

#[actix_web::test]
async fn each_submission_appends_exactly_one_record() {
    let env = TestEnv::new();
    let app = test::init_service(env.app()).await;

    let mut previous = Vec::new();
    for i in 0..3 {
        let req = test::TestRequest::post()
            .uri("/form/tuvalet_kontrol/gonder")
            .insert_header((header::CONTENT_TYPE, "application/x-www-form-urlencoded"))
            .set_payload(format!("madde_0=EVET&not=tur+{}", i))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let now = env.kayitlar();
        assert_eq!(now.len(), previous.len() + 1);
        assert_eq!(&now[..previous.len()], &previous[..]);
        assert_eq!(now.last().unwrap().not, format!("tur {}", i));
        previous = now;
    }

    let ids: Vec<i64> = previous.iter().map(|k| k.id).collect();
    assert!(ids.windows(2).all(|w| w[0] < w[1]));
}

#[actix_web::test]
async fn unknown_type_submission_is_not_found() {
    let env = TestEnv::new();
    let app = test::init_service(env.app()).await;

    let req = test::TestRequest::post()
        .uri("/form/yok/gonder")
        .insert_header((header::CONTENT_TYPE, "application/x-www-form-urlencoded"))
        .set_payload("madde_0=EVET")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], json!(false));
    assert!(env.kayitlar().is_empty());
}

#[actix_web::test]
async fn invalid_answer_is_rejected_without_writing() {
    let env = TestEnv::new();
    let app = test::init_service(env.app()).await;

    let req = test::TestRequest::post()
        .uri("/form/sabah_acilis/gonder")
        .insert_header((header::CONTENT_TYPE, "application/x-www-form-urlencoded"))
        .set_payload("madde_0=belki")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], json!(false));
    assert!(env.kayitlar().is_empty());
}

#[actix_web::test]
async fn broken_config_is_a_server_error() {
    let env = TestEnv::with_config("{ broken");
    let app = test::init_service(env.app()).await;

    let req = test::TestRequest::get().uri("/form/sabah_acilis").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
