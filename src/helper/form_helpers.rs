use crate::models::{Cevap, CevapKaydi, KontrolTanimi};
use actix_web::{http::header, web, HttpRequest, HttpResponse};
use serde_json::{json, Value};
use std::collections::HashMap;
use thiserror::Error;
use url::form_urlencoded;

pub const MAX_NOT_LENGTH: usize = 2000;

#[derive(Error, Debug, PartialEq)]
pub enum FormError {
    #[error("Geçersiz istek gövdesi: {0}")]
    Body(String),
    #[error("Madde {index} için geçersiz cevap: '{value}' (EVET veya HAYIR olmalı)")]
    InvalidAnswer { index: usize, value: String },
    #[error("Not en fazla {} karakter olabilir", MAX_NOT_LENGTH)]
    NotTooLong,
}

impl FormError {
    pub fn to_response(&self) -> HttpResponse {
        HttpResponse::BadRequest().json(json!({ "success": false, "message": self.to_string() }))
    }
}

/// Parses URL-encoded form data from bytes, handling potential UTF-8 errors gracefully.
pub fn parse_form(form_bytes: &web::Bytes) -> Result<HashMap<String, String>, FormError> {
    let body = std::str::from_utf8(form_bytes)
        .map_err(|_| FormError::Body("Invalid UTF-8 in request body.".to_string()))?;
    Ok(form_urlencoded::parse(body.as_bytes()).into_owned().collect())
}

/// Flattens a JSON object body into the same string map a form post produces.
/// Scalars are stringified, `null` is treated as absent.
pub fn parse_json_fields(body: &web::Bytes) -> Result<HashMap<String, String>, FormError> {
    let value: Value = serde_json::from_slice(body).map_err(|e| FormError::Body(e.to_string()))?;
    let Value::Object(map) = value else {
        return Err(FormError::Body("Expected a JSON object.".to_string()));
    };
    Ok(map
        .into_iter()
        .filter_map(|(key, value)| match value {
            Value::Null => None,
            Value::String(s) => Some((key, s)),
            other => Some((key, other.to_string())),
        })
        .collect())
}

/// Reads the body as JSON when the content type says so, as a urlencoded form otherwise.
pub fn parse_fields(content_type: Option<&str>, body: &web::Bytes) -> Result<HashMap<String, String>, FormError> {
    let is_json = content_type
        .map(|ct| ct.to_ascii_lowercase().starts_with("application/json"))
        .unwrap_or(false);
    if is_json {
        parse_json_fields(body)
    } else {
        parse_form(body)
    }
}

/// Fields of a request body, typed by its `Content-Type`. An empty body yields no fields.
pub fn request_fields(req: &HttpRequest, body: &web::Bytes) -> Result<HashMap<String, String>, FormError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(HashMap::new());
    }
    let content_type = req.headers().get(header::CONTENT_TYPE).and_then(|v| v.to_str().ok());
    parse_fields(content_type, body)
}

/// Pairs every configured item with the answer posted as `madde_<index>`.
/// Omitted or blank answers count as `HAYIR`; anything other than EVET/HAYIR is rejected.
pub fn build_cevaplar(
    kontrol: &KontrolTanimi,
    fields: &HashMap<String, String>,
) -> Result<Vec<CevapKaydi>, FormError> {
    kontrol
        .maddeler
        .iter()
        .enumerate()
        .map(|(index, madde)| {
            let cevap = match fields.get(&format!("madde_{}", index)).map(|v| v.trim()) {
                None | Some("") => Cevap::Hayir,
                Some(value) => Cevap::parse(value).ok_or_else(|| FormError::InvalidAnswer {
                    index,
                    value: value.to_string(),
                })?,
            };
            Ok(CevapKaydi { madde: madde.clone(), cevap })
        })
        .collect()
}

/// The trimmed note; rejects overly long input.
pub fn read_not(fields: &HashMap<String, String>) -> Result<String, FormError> {
    let not = fields.get("not").map(|s| s.trim()).unwrap_or("");
    if not.chars().count() > MAX_NOT_LENGTH {
        return Err(FormError::NotTooLong);
    }
    Ok(not.to_string())
}

pub fn read_personel(fields: &HashMap<String, String>) -> String {
    fields.get("personel").map(|s| s.trim().to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kontrol(n: usize) -> KontrolTanimi {
        KontrolTanimi {
            baslik: "Sabah Açılış".to_string(),
            icon: None,
            maddeler: (0..n).map(|i| format!("Madde metni {}", i)).collect(),
        }
    }

    fn fields(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn omitted_answers_default_to_hayir() {
        let cevaplar = build_cevaplar(&kontrol(3), &fields(&[("madde_0", "EVET"), ("madde_2", "EVET")])).unwrap();
        let values: Vec<Cevap> = cevaplar.iter().map(|c| c.cevap).collect();
        assert_eq!(values, vec![Cevap::Evet, Cevap::Hayir, Cevap::Evet]);
        assert_eq!(cevaplar[1].madde, "Madde metni 1");
    }

    #[test]
    fn unknown_answer_is_rejected() {
        let err = build_cevaplar(&kontrol(2), &fields(&[("madde_1", "belki")])).unwrap_err();
        assert_eq!(err, FormError::InvalidAnswer { index: 1, value: "belki".to_string() });
    }

    #[test]
    fn extra_indices_are_ignored() {
        let cevaplar = build_cevaplar(&kontrol(1), &fields(&[("madde_0", "evet"), ("madde_7", "EVET")])).unwrap();
        assert_eq!(cevaplar.len(), 1);
        assert_eq!(cevaplar[0].cevap, Cevap::Evet);
    }

    #[test]
    fn form_and_json_bodies_parse_alike() {
        let form = web::Bytes::from_static(b"personel=Ay%C5%9Fe&madde_0=EVET&not=temiz");
        let parsed = parse_fields(Some("application/x-www-form-urlencoded"), &form).unwrap();
        assert_eq!(parsed.get("personel").map(String::as_str), Some("Ayşe"));

        let json = web::Bytes::from(r#"{"personel":"Ayşe","madde_0":"EVET","not":"temiz","x":null}"#);
        let parsed_json = parse_fields(Some("application/json; charset=utf-8"), &json).unwrap();
        assert_eq!(parsed, parsed_json);
    }

    #[test]
    fn empty_body_has_no_fields() {
        let req = actix_web::test::TestRequest::default()
            .insert_header((header::CONTENT_TYPE, "application/json"))
            .to_http_request();
        assert!(request_fields(&req, &web::Bytes::new()).unwrap().is_empty());
        assert!(request_fields(&req, &web::Bytes::from_static(b"{oops")).is_err());

        let untyped = actix_web::test::TestRequest::default().to_http_request();
        let fields = request_fields(&untyped, &web::Bytes::from_static(b"isim=Veli")).unwrap();
        assert_eq!(fields.get("isim").map(String::as_str), Some("Veli"));
    }

    #[test]
    fn long_note_is_rejected() {
        let long = "x".repeat(MAX_NOT_LENGTH + 1);
        assert_eq!(read_not(&fields(&[("not", &long)])), Err(FormError::NotTooLong));
        assert_eq!(read_not(&fields(&[("not", "  ok ")])), Ok("ok".to_string()));
    }
}
