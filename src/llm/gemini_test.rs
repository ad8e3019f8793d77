use super::*;
use crate::llm::types::{InlineData, Role};

fn make_response(parts: serde_json::Value) -> String {
    serde_json::json!({
        "candidates": [{
            "content": { "role": "model", "parts": parts },
            "finishReason": "STOP"
        }],
        "usageMetadata": { "promptTokenCount": 12, "candidatesTokenCount": 7 },
        "modelVersion": "gemini-2.0-flash-001"
    })
    .to_string()
}

// ===== parsing =====

#[test]
fn parse_text_response() {
    let json = make_response(serde_json::json!([{ "text": "¡Hola!" }]));
    let resp = parse_response(&json, "gemini-2.0-flash").unwrap();
    assert_eq!(resp.text, "¡Hola!");
    assert_eq!(resp.model, "gemini-2.0-flash-001");
    assert_eq!(resp.finish_reason, "STOP");
    assert_eq!(resp.input_tokens, 12);
    assert_eq!(resp.output_tokens, 7);
}

#[test]
fn parse_concatenates_text_parts() {
    let json = make_response(serde_json::json!([{ "text": "Bon" }, { "text": "jour" }]));
    let resp = parse_response(&json, "m").unwrap();
    assert_eq!(resp.text, "Bonjour");
}

#[test]
fn parse_ignores_non_text_parts() {
    let json = make_response(serde_json::json!([
        { "functionCall": { "name": "x", "args": {} } },
        { "text": "ok" }
    ]));
    let resp = parse_response(&json, "m").unwrap();
    assert_eq!(resp.text, "ok");
}

#[test]
fn parse_no_candidates_yields_empty_text() {
    let json = serde_json::json!({ "promptFeedback": { "blockReason": "SAFETY" } }).to_string();
    let resp = parse_response(&json, "gemini-2.0-flash").unwrap();
    assert!(resp.text().is_none());
    assert_eq!(resp.finish_reason, "NO_CANDIDATES");
    assert_eq!(resp.model, "gemini-2.0-flash");
}

#[test]
fn parse_invalid_json_errors() {
    let err = parse_response("not json", "m").unwrap_err();
    assert!(matches!(err, LlmError::ApiParse(_)));
}

// ===== request building =====

#[test]
fn request_includes_system_instruction_and_config() {
    let request = GenerateRequest {
        system: Some("  Be kind.  ".into()),
        contents: vec![Content::text(Role::User, "hi")],
        config: GenerationConfig { temperature: Some(0.8), ..GenerationConfig::default() },
    };
    let body = serde_json::to_value(build_request(&request)).unwrap();
    assert_eq!(body["systemInstruction"]["parts"][0]["text"], "Be kind.");
    assert_eq!(body["contents"][0]["role"], "user");
    assert!((body["generationConfig"]["temperature"].as_f64().unwrap() - 0.8).abs() < 1e-6);
}

#[test]
fn request_omits_empty_system_and_default_config() {
    let request = GenerateRequest {
        system: Some("   ".into()),
        contents: vec![Content {
            role: Role::User,
            parts: vec![
                Part::InlineData { inline_data: InlineData { mime_type: "audio/wav".into(), data: "UklG".into() } },
                Part::text("Transcribe"),
            ],
        }],
        config: GenerationConfig::default(),
    };
    let body = serde_json::to_value(build_request(&request)).unwrap();
    assert!(body.get("systemInstruction").is_none());
    assert!(body.get("generationConfig").is_none());
    assert_eq!(body["contents"][0]["parts"][0]["inlineData"]["mimeType"], "audio/wav");
}
