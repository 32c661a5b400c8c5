use crate::backend::project_backend::{ChatTurn, Role};
use crate::config::GenerationConfig;
use crate::constant::{ANTHROPIC_VERSION, DEFAULT_API_URL, DEFAULT_MAX_TOKENS, DEFAULT_MODEL};
use crate::messages::ResponseMessage;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::sync::mpsc::Sender;
use std::thread;
use thiserror::Error;

const DEFAULT_EXPLANATION: &str = "I made something cool for you!";

const SYSTEM_PROMPT: &str = r#"You are a friendly coding helper for kids aged 8 to 13 who make art and games with p5.js.

Be cheerful and encouraging, use simple words, and celebrate their ideas.

Always answer in exactly this format:

EXPLANATION: [one or two short sentences, written for a kid, about what you made or changed]

CODE:
[the complete p5.js program]

Rules for the code:
1. Always include both setup() and draw().
2. Use createCanvas(400, 400) unless they ask for another size.
3. Keep it simple, with clear variable names.
4. Add short comments for the tricky parts.
5. When they ask for a change, keep every existing feature and add the new one.
6. Make it colorful and fun!

If a request is unkind or makes no sense for drawing with code, gently suggest something fun instead (a colorful shape, a bouncing ball, falling stars) and return a small program that writes "What would you like to create?" in the middle of the canvas.

Handy p5.js patterns:
- Bouncing: when x > width or x < 0, reverse the speed.
- Following the mouse: mouseX and mouseY.
- Random colors: fill(random(255), random(255), random(255)).
- Animation: change variables inside draw().
- Keyboard: keyIsPressed with key or keyCode."#;

static EXPLANATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)EXPLANATION:\s*(.+?)(?:\n\nCODE:|$)").expect("explanation regex")
});
static CODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)CODE:\s*\n?(.*)$").expect("code regex"));
static OPENING_FENCE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^```(?:javascript|js)?\n?").expect("opening fence regex"));
static CLOSING_FENCE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n?```$").expect("closing fence regex"));

#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Please type what you'd like to make first")]
    EmptyPrompt,

    #[error("API key is invalid. Please check your ANTHROPIC_API_KEY.")]
    InvalidApiKey,

    #[error("API error {0}: {1}")]
    Api(StatusCode, String),

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("No text response from AI")]
    NoTextResponse,
}

/// What the studio asks for
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub prompt: String,
    pub history: Vec<ChatTurn>,
    pub current_code: String,
}

/// What comes back: a kid-friendly explanation and the new program
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generation {
    pub explanation: String,
    pub code: String,
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<ApiMessage>,
}

#[derive(Serialize)]
struct ApiMessage {
    role: Role,
    content: String,
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Clone)]
pub struct AiBackend {
    model: String,
    api_url: String,
    api_key: String,
    max_tokens: u32,
}

impl Default for AiBackend {
    fn default() -> Self {
        AiBackend {
            model: DEFAULT_MODEL.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            api_key: String::new(),
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

impl AiBackend {
    pub fn new(model: Option<String>, api_url: Option<String>, api_key: Option<String>) -> Self {
        // 1. Model
        let model = model
            .or_else(|| std::env::var("ANTHROPIC_MODEL").ok())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        // 2. API URL
        let api_url = api_url
            .or_else(|| std::env::var("ANTHROPIC_API_URL").ok())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        // 3. API Key
        let api_key = api_key
            .or_else(|| std::env::var("ANTHROPIC_API_KEY").ok())
            .unwrap_or_else(|| {
                tracing::warn!("ANTHROPIC_API_KEY not found, using empty string");
                String::new()
            });

        Self {
            model,
            api_url,
            api_key,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    /// Build from settings; blank settings defer to the environment
    pub fn from_config(config: &GenerationConfig) -> Self {
        let non_blank = |s: &str| (!s.trim().is_empty()).then(|| s.to_string());
        let mut backend = Self::new(
            non_blank(&config.model_name),
            non_blank(&config.api_url),
            non_blank(&config.api_key),
        );
        if config.max_tokens > 0 {
            backend.max_tokens = config.max_tokens;
        }
        backend
    }

    /// Run the request on a background thread and report through `sender`,
    /// tagged with `request_id` so the caller can match the reply
    pub fn generate(
        &self,
        request_id: u64,
        request: GenerationRequest,
        sender: Sender<ResponseMessage>,
    ) {
        let backend = self.clone();

        thread::spawn(move || {
            let result = backend.blocking_generate(&request);
            if let Err(e) = &result {
                tracing::error!("Generation {} failed: {}", request_id, e);
            }
            let _ = sender.send(ResponseMessage::Generated { request_id, result });
        });
    }

    pub fn blocking_generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<Generation, GenerationError> {
        let messages = build_messages(request)?;
        let body = MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            system: SYSTEM_PROMPT,
            messages,
        };

        tracing::info!("Requesting sketch from {}", self.model);
        let response = Client::new()
            .post(&self.api_url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(GenerationError::InvalidApiKey);
        }
        if !status.is_success() {
            let error_text = response
                .text()
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(GenerationError::Api(status, error_text));
        }

        let parsed: MessagesResponse = response.json()?;
        let text = parsed
            .content
            .into_iter()
            .find(|block| block.kind == "text")
            .and_then(|block| block.text)
            .ok_or(GenerationError::NoTextResponse)?;

        Ok(parse_generation(&text))
    }
}

fn build_messages(request: &GenerationRequest) -> Result<Vec<ApiMessage>, GenerationError> {
    if request.prompt.trim().is_empty() {
        return Err(GenerationError::EmptyPrompt);
    }

    let mut messages: Vec<ApiMessage> = request
        .history
        .iter()
        .map(|turn| ApiMessage {
            role: turn.role,
            content: turn.content.clone(),
        })
        .collect();

    let content = if request.current_code.trim().is_empty() {
        request.prompt.clone()
    } else {
        format!(
            "Current code:\n```javascript\n{}\n```\n\nUser request: {}",
            request.current_code, request.prompt
        )
    };
    messages.push(ApiMessage {
        role: Role::User,
        content,
    });

    Ok(messages)
}

/// Split a reply into its explanation and code sections
pub fn parse_generation(reply: &str) -> Generation {
    let explanation = EXPLANATION_RE
        .captures(reply)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_else(|| DEFAULT_EXPLANATION.to_string());

    let code = CODE_RE
        .captures(reply)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .unwrap_or_default();
    let code = OPENING_FENCE_RE.replace(code, "");
    let code = CLOSING_FENCE_RE.replace(&code, "").into_owned();

    Generation { explanation, code }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_explanation_and_fenced_code() {
        let reply = "EXPLANATION: I made a bouncy ball!\n\nCODE:\n```javascript\nfunction setup() {\n  createCanvas(400, 400);\n}\n```";
        let generation = parse_generation(reply);
        assert_eq!(generation.explanation, "I made a bouncy ball!");
        assert_eq!(
            generation.code,
            "function setup() {\n  createCanvas(400, 400);\n}"
        );
    }

    #[test]
    fn multi_line_explanation_stops_at_code() {
        let reply = "EXPLANATION: Stars now fall.\nThey twinkle too!\n\nCODE:\nlet stars = [];";
        let generation = parse_generation(reply);
        assert_eq!(generation.explanation, "Stars now fall.\nThey twinkle too!");
        assert_eq!(generation.code, "let stars = [];");
    }

    #[test]
    fn missing_sections_fall_back() {
        let generation = parse_generation("Sorry, I got confused.");
        assert_eq!(generation.explanation, DEFAULT_EXPLANATION);
        assert_eq!(generation.code, "");
    }

    #[test]
    fn unlabeled_fence_is_stripped() {
        let generation = parse_generation("EXPLANATION: ok\n\nCODE:\n```\nbackground(0);\n```");
        assert_eq!(generation.code, "background(0);");
    }

    #[test]
    fn current_code_is_embedded_in_last_message() {
        let request = GenerationRequest {
            prompt: "make it red".to_string(),
            history: vec![ChatTurn {
                role: Role::User,
                content: "draw a circle".to_string(),
            }],
            current_code: "circle(200, 200, 50);".to_string(),
        };
        let messages = build_messages(&request).unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].content, "draw a circle");
        assert_eq!(
            messages[1].content,
            "Current code:\n```javascript\ncircle(200, 200, 50);\n```\n\nUser request: make it red"
        );
    }

    #[test]
    fn blank_code_sends_plain_prompt() {
        let request = GenerationRequest {
            prompt: "draw a tree".to_string(),
            history: Vec::new(),
            current_code: "  \n".to_string(),
        };
        let messages = build_messages(&request).unwrap();
        assert_eq!(messages[0].content, "draw a tree");
    }

    #[test]
    fn empty_prompt_is_rejected() {
        let request = GenerationRequest {
            prompt: "   ".to_string(),
            history: Vec::new(),
            current_code: String::new(),
        };
        assert!(matches!(
            build_messages(&request),
            Err(GenerationError::EmptyPrompt)
        ));
    }

    #[test]
    fn request_body_serializes_roles_lowercase() {
        let body = MessagesRequest {
            model: "m",
            max_tokens: 10,
            system: "s",
            messages: vec![ApiMessage {
                role: Role::Assistant,
                content: "hi".to_string(),
            }],
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["messages"][0]["role"], "assistant");
        assert_eq!(json["max_tokens"], 10);
    }
}
