use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

use crate::config::SuggestConfig;

/// Fixed answer surfaced to the client whenever the upstream call fails.
/// No error detail is leaked.
pub const FALLBACK_ANSWER: &str = "Couldn't Fetch Response.";

/// Body of `POST /suggest`.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SuggestRequest {
    pub question: String,
    pub code: String,
    pub language: String,
}

/// Body of the `POST /suggest` response.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SuggestResponse {
    pub answer: String,
}

// -- Gemini generateContent types -------------------------------------------

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}

/// Thin client for the external text-generation API. One instance lives in
/// the server state; requests run on the caller's task and never hold any
/// room lock, so a slow upstream cannot stall the relay. No timeout is
/// applied; a hung call leaves only the requesting client waiting.
#[derive(Clone)]
pub struct SuggestClient {
    http: reqwest::Client,
    api_url: String,
    api_key: Option<String>,
    model: String,
}

impl SuggestClient {
    pub fn new(config: &SuggestConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        }
    }

    /// Forward a question to the upstream model and return its text answer.
    pub async fn complete(&self, request: &SuggestRequest) -> Result<String> {
        let key = self
            .api_key
            .as_deref()
            .ok_or_else(|| anyhow!("missing_api_key"))?;
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.api_url.trim_end_matches('/'),
            self.model
        );
        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: build_prompt(request),
                }],
            }],
        };
        let response = self
            .http
            .post(&url)
            .query(&[("key", key)])
            .json(&body)
            .send()
            .await?
            .error_for_status()?;
        let parsed: GenerateContentResponse = response.json().await?;
        parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or_else(|| anyhow!("empty_response"))
    }
}

/// Prompt template. Question, code and language are embedded verbatim.
fn build_prompt(request: &SuggestRequest) -> String {
    format!(
        "You are a coding assistant inside a collaborative {} editor.\n\
         The user is working on the following code:\n\n{}\n\n\
         Question: {}\n\n\
         Answer the question about the code above. Keep the answer short and \
         include code snippets where useful.",
        request.language, request.code, request.question
    )
}
