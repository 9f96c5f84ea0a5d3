//! Gemini generateContent 客户端
//!
//! 通过 REST 端点 {base_url}/models/{model}:generateContent 发送 system 指令、
//! 完整历史与工具声明（functionDeclarations + googleSearch grounding）。
//! 响应按 JSON 防御式解析：缺字段不恐慌，未知分片种类跳过。

use reqwest::Client;
use serde_json::{json, Value};

use crate::decision::traits::{
    Content, DecisionClient, DecisionTurn, FunctionCall, Part, Role,
};

/// Gemini 客户端：持有 HTTP 客户端、端点、凭证、system 指令与目录声明
pub struct GeminiClient {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
    system_instruction: String,
    /// 发给服务的 tools 数组（能力目录声明 + googleSearch）
    tools: Value,
}

impl GeminiClient {
    pub fn new(
        api_key: &str,
        model: &str,
        base_url: &str,
        system_instruction: &str,
        function_declarations: Value,
    ) -> Self {
        let client = Client::builder()
            .build()
            .unwrap_or_default();
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: api_key.to_string(),
            system_instruction: system_instruction.to_string(),
            tools: json!([
                { "functionDeclarations": function_declarations },
                { "googleSearch": {} }
            ]),
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        )
    }

    fn request_body(&self, history: &[Content]) -> Value {
        json!({
            "systemInstruction": { "parts": [{ "text": self.system_instruction }] },
            "contents": history,
            "tools": self.tools,
        })
    }
}

/// 从候选内容解析分片：text / functionCall；其它种类（如 inlineData）跳过
fn parse_parts(candidate: &Value) -> Vec<Part> {
    let mut parts = Vec::new();
    let Some(raw_parts) = candidate
        .pointer("/content/parts")
        .and_then(Value::as_array)
    else {
        return parts;
    };
    for raw in raw_parts {
        if let Some(text) = raw.get("text").and_then(Value::as_str) {
            parts.push(Part::Text(text.to_string()));
        } else if let Some(call) = raw.get("functionCall") {
            let Some(name) = call.get("name").and_then(Value::as_str) else {
                continue;
            };
            parts.push(Part::FunctionCall(FunctionCall {
                name: name.to_string(),
                args: call.get("args").cloned().unwrap_or_else(|| json!({})),
            }));
        }
    }
    parts
}

/// 提取 groundingMetadata 中的来源 URL，保持到达顺序（去重交给 dispatch 层）
fn parse_grounding_urls(candidate: &Value) -> Vec<String> {
    candidate
        .pointer("/groundingMetadata/groundingChunks")
        .and_then(Value::as_array)
        .map(|chunks| {
            chunks
                .iter()
                .filter_map(|c| c.pointer("/web/uri").and_then(Value::as_str))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

#[async_trait::async_trait]
impl DecisionClient for GeminiClient {
    async fn request(&self, history: &[Content]) -> Result<DecisionTurn, String> {
        let response = self
            .client
            .post(self.endpoint())
            .json(&self.request_body(history))
            .send()
            .await
            .map_err(|e| format!("Request failed: {}", e))?;

        let status = response.status();
        let body: Value = response
            .json()
            .await
            .map_err(|e| format!("Read body: {}", e))?;

        if !status.is_success() {
            let detail = body
                .pointer("/error/message")
                .and_then(Value::as_str)
                .unwrap_or("(no detail)");
            return Err(format!("HTTP {}: {}", status, detail));
        }

        let Some(candidate) = body.pointer("/candidates/0") else {
            return Err("No candidates in response".to_string());
        };

        Ok(DecisionTurn {
            content: Content {
                role: Role::Model,
                parts: parse_parts(candidate),
            },
            grounding_urls: parse_grounding_urls(candidate),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_client() -> GeminiClient {
        GeminiClient::new(
            "test-key",
            "gemini-2.5-flash",
            "https://generativelanguage.googleapis.com/v1beta/",
            "Anda adalah koordinator.",
            json!([{ "name": "getPatientInfo" }]),
        )
    }

    #[test]
    fn test_endpoint_includes_model_and_key() {
        let client = sample_client();
        let url = client.endpoint();
        assert!(url.starts_with(
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash"
        ));
        assert!(url.ends_with("key=test-key"));
    }

    #[test]
    fn test_request_body_shape() {
        let client = sample_client();
        let body = client.request_body(&[Content::user_text("Cek tagihan pasien P002")]);
        assert_eq!(
            body["systemInstruction"]["parts"][0]["text"],
            "Anda adalah koordinator."
        );
        assert_eq!(body["contents"][0]["role"], "user");
        assert!(body["tools"][0]["functionDeclarations"].is_array());
        assert!(body["tools"][1]["googleSearch"].is_object());
    }

    #[test]
    fn test_parse_parts_skips_unknown_kinds() {
        let candidate = json!({
            "content": {
                "parts": [
                    { "text": "Sebentar, saya cek." },
                    { "functionCall": { "name": "getBillingInfo", "args": { "patientId": "P002" } } },
                    { "inlineData": { "mimeType": "image/png" } },
                    { "functionCall": { "args": {} } }
                ]
            }
        });
        let parts = parse_parts(&candidate);
        assert_eq!(parts.len(), 2);
        assert!(matches!(&parts[0], Part::Text(t) if t.contains("Sebentar")));
        assert!(matches!(&parts[1], Part::FunctionCall(c) if c.name == "getBillingInfo"));
    }

    #[test]
    fn test_parse_grounding_urls() {
        let candidate = json!({
            "groundingMetadata": {
                "groundingChunks": [
                    { "web": { "uri": "https://a.example/flu" } },
                    { "retrievedContext": {} },
                    { "web": { "uri": "https://b.example/batuk" } }
                ]
            }
        });
        assert_eq!(
            parse_grounding_urls(&candidate),
            vec!["https://a.example/flu", "https://b.example/batuk"]
        );
        assert!(parse_grounding_urls(&json!({})).is_empty());
    }
}
