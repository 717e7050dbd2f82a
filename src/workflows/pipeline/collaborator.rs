use crate::workflows::scoring::Occupation;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

pub const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(180);

/// Built-in system prompt describing the ten-attribute rubric. Operators can
/// replace it with a maintained skill file via configuration.
const SCORING_GUIDE: &str = "\
You are an occupational analyst rating how resilient occupations are to AI \
automation. For each occupation, rate ten attributes on an integer 1-5 scale \
(1 = weakest, 5 = strongest), in this exact order:
A1 physical presence and manual dexterity required on the job
A2 depth of human judgment and ethical reasoning involved
A3 interpersonal trust, care, or relationship-building at the core of the work
A4 exposure to unpredictable real-world environments
A5 regulatory or licensing barriers to automating the role
A6 scarcity of training data covering the role's key decisions
A7 economic cost of automating relative to human labor
A8 personal accountability or liability carried by the worker
A9 how much AI tooling amplifies the worker's productivity
A10 how much AI adoption expands demand for the occupation
A1-A8 explain why automation is resisted; A9-A10 explain how the role \
benefits from AI. Rate each attribute independently; do not compute any \
composite yourself.";

/// Attribute ratings for one occupation as returned by the scoring service,
/// before range validation.
#[derive(Debug, Clone, Deserialize)]
pub struct RawOccupationScores {
    pub onet_code: String,
    pub attributes: Vec<u8>,
    #[serde(default)]
    pub key_drivers: String,
}

#[derive(Debug, thiserror::Error)]
pub enum CollaboratorError {
    #[error("scoring request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("scoring service returned status {status}: {body}")]
    Api { status: u16, body: String },
    #[error("malformed scoring response: {0}")]
    MalformedResponse(String),
}

/// Narrow seam to the external scoring service so the deterministic core can
/// be exercised against a stub. One call covers one batch.
#[async_trait]
pub trait ScoreCollaborator: Send + Sync {
    async fn score_batch(
        &self,
        batch: &[Occupation],
    ) -> Result<Vec<RawOccupationScores>, CollaboratorError>;
}

/// Live collaborator backed by the Anthropic Messages API.
pub struct AnthropicScorer {
    client: Client,
    model: String,
    api_key: String,
    max_tokens: u32,
    system_prompt: String,
}

impl AnthropicScorer {
    pub fn new(
        model: impl Into<String>,
        api_key: impl Into<String>,
        max_tokens: u32,
        system_prompt: Option<String>,
    ) -> Result<Self, CollaboratorError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            model: model.into(),
            api_key: api_key.into(),
            max_tokens,
            system_prompt: system_prompt.unwrap_or_else(|| SCORING_GUIDE.to_string()),
        })
    }
}

#[async_trait]
impl ScoreCollaborator for AnthropicScorer {
    async fn score_batch(
        &self,
        batch: &[Occupation],
    ) -> Result<Vec<RawOccupationScores>, CollaboratorError> {
        let payload = json!({
            "model": self.model,
            "max_tokens": self.max_tokens,
            "system": self.system_prompt,
            "messages": [{ "role": "user", "content": build_prompt(batch) }],
        });

        let response = self
            .client
            .post(ANTHROPIC_API_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(CollaboratorError::Api { status, body });
        }

        let parsed: MessagesResponse = response.json().await?;
        let text = parsed
            .content
            .first()
            .map(|block| block.text.as_str())
            .ok_or_else(|| {
                CollaboratorError::MalformedResponse("response content is empty".to_string())
            })?;

        parse_response(text)
    }
}

pub(crate) fn build_prompt(batch: &[Occupation]) -> String {
    let mut listing = String::new();
    for (position, occupation) in batch.iter().enumerate() {
        listing.push_str(&format!(
            "{}. {} (O*NET: {}, Job Zone: {})\n",
            position + 1,
            occupation.title,
            occupation.code,
            occupation.job_zone
        ));
    }

    format!(
        "Score the following {} occupations using the rubric above.\n\n\
OCCUPATIONS TO SCORE:\n{listing}\n\
Respond ONLY with a valid JSON array. Each element must be:\n\
{{\n  \"onet_code\": \"XX-XXXX.XX\",\n  \"attributes\": [ten integers 1-5, ordered A1..A10],\n  \"key_drivers\": \"2-3 sentences\"\n}}",
        batch.len()
    )
}

/// Parses the model's reply, tolerating markdown code fences around the JSON
/// array. Wrong-arity attribute lists are rejected here; range validation
/// happens in the scoring core.
pub(crate) fn parse_response(text: &str) -> Result<Vec<RawOccupationScores>, CollaboratorError> {
    let stripped = text.replace("```json", "").replace("```", "");
    let stripped = stripped.trim();

    let scores: Vec<RawOccupationScores> = serde_json::from_str(stripped)
        .map_err(|err| CollaboratorError::MalformedResponse(err.to_string()))?;

    for score in &scores {
        if score.attributes.len() != 10 {
            return Err(CollaboratorError::MalformedResponse(format!(
                "occupation {} has {} attribute ratings, expected 10",
                score.onet_code,
                score.attributes.len()
            )));
        }
    }

    Ok(scores)
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::scoring::OccupationCode;

    fn occupation(code: &str, title: &str) -> Occupation {
        Occupation {
            code: OccupationCode(code.to_string()),
            title: title.to_string(),
            job_zone: 3,
            data_level: "Y".to_string(),
            url: None,
            median_wage: None,
            growth: None,
            openings: None,
        }
    }

    #[test]
    fn prompt_enumerates_the_batch() {
        let batch = vec![
            occupation("29-1141.00", "Registered Nurses"),
            occupation("15-1252.00", "Software Developers"),
        ];
        let prompt = build_prompt(&batch);
        assert!(prompt.contains("Score the following 2 occupations"));
        assert!(prompt.contains("1. Registered Nurses (O*NET: 29-1141.00, Job Zone: 3)"));
        assert!(prompt.contains("2. Software Developers (O*NET: 15-1252.00, Job Zone: 3)"));
    }

    #[test]
    fn parse_strips_code_fences() {
        let reply = "```json\n[{\"onet_code\":\"29-1141.00\",\"attributes\":[5,4,5,4,4,3,3,4,3,4],\"key_drivers\":\"Hands-on care.\"}]\n```";
        let scores = parse_response(reply).expect("parse");
        assert_eq!(scores.len(), 1);
        assert_eq!(scores[0].onet_code, "29-1141.00");
        assert_eq!(scores[0].attributes, vec![5, 4, 5, 4, 4, 3, 3, 4, 3, 4]);
    }

    #[test]
    fn parse_rejects_wrong_attribute_arity() {
        let reply = "[{\"onet_code\":\"29-1141.00\",\"attributes\":[5,4,5]}]";
        let error = parse_response(reply).expect_err("arity");
        assert!(matches!(error, CollaboratorError::MalformedResponse(_)));
    }

    #[test]
    fn parse_rejects_non_json_replies() {
        let error = parse_response("I could not score these occupations.")
            .expect_err("not json");
        assert!(matches!(error, CollaboratorError::MalformedResponse(_)));
    }
}
