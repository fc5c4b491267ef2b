use axum::http::HeaderMap;
use serde_json::{Map, Value};

pub type RawFields = Map<String, Value>;

/// Decode an inbound body into loose key/value fields based on Content-Type.
pub fn parse_body(content_type: Option<&str>, body: &[u8]) -> Result<RawFields, String> {
    match content_type {
        Some(ct) if ct.contains("application/json") => parse_json(body),
        Some(ct) if ct.contains("application/x-www-form-urlencoded") => parse_form_urlencoded(body),
        Some(ct) if ct.contains("multipart/form-data") => Err("multipart".to_string()),
        // Try JSON first, then form-urlencoded
        _ => parse_json(body)
            .or_else(|_| parse_form_urlencoded(body))
            .map_err(|e| format!("Unable to parse body: {e}")),
    }
}

fn parse_json(body: &[u8]) -> Result<RawFields, String> {
    match serde_json::from_slice(body).map_err(|e| format!("Invalid JSON: {e}"))? {
        Value::Object(map) => Ok(map),
        _ => Err("Expected a JSON object".to_string()),
    }
}

fn parse_form_urlencoded(body: &[u8]) -> Result<RawFields, String> {
    let body_str = std::str::from_utf8(body).map_err(|e| format!("Invalid UTF-8: {e}"))?;

    // Repeated keys: last one wins
    let mut map = Map::new();
    for (k, v) in form_urlencoded::parse(body_str.as_bytes()) {
        map.insert(k.into_owned(), Value::String(v.into_owned()));
    }
    Ok(map)
}

/// Parse the text fields of a multipart form using multer. File parts are skipped.
pub async fn parse_multipart(headers: &HeaderMap, body: bytes::Bytes) -> Result<RawFields, String> {
    let boundary = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .and_then(|ct| multer::parse_boundary(ct).ok())
        .ok_or_else(|| "Missing multipart boundary".to_string())?;

    let stream = futures_util::stream::once(async { Ok::<_, std::io::Error>(body) });
    let mut multipart = multer::Multipart::new(stream, boundary);

    let mut map = Map::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| format!("Multipart error: {e}"))?
    {
        if field.file_name().is_some() {
            continue;
        }
        let Some(name) = field.name().map(|n| n.to_string()) else {
            continue;
        };
        let value = field
            .text()
            .await
            .map_err(|e| format!("Field read error: {e}"))?;
        map.insert(name, Value::String(value));
    }

    Ok(map)
}
