use crate::{
    error::Result,
    services::{
        openai_client::{message_content, ChatCompletionRequest, OpenAIClient},
        prompts::{
            extraction_prompt, filter_prompt, EXTRACTION_SYSTEM_PROMPT, FILTER_SYSTEM_PROMPT,
        },
    },
    types::{
        decode_model_answer, ExtractedParameters, HotelProjection, MatchedIds,
        ParameterExtraction,
    },
};
use serde_json::{json, Value};
use std::collections::HashSet;
use std::time::Duration;

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
const TEMPERATURE: f32 = 0.3;
const EXTRACTION_MAX_TOKENS: u32 = 200;
const FILTER_MAX_TOKENS: u32 = 500;

/// Hosted language model used for parameter extraction and hotel filtering.
#[derive(Debug, Clone)]
pub struct LanguageModel {
    client: OpenAIClient,
    model: String,
    timeout: Duration,
}

impl LanguageModel {
    pub fn new(api_key: String) -> Self {
        Self {
            client: OpenAIClient::new(api_key),
            model: DEFAULT_MODEL.to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.client.set_base_url(base_url);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_retries(mut self, max_retries: usize) -> Self {
        self.client.set_max_retries(max_retries);
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Turn a free-text demand into search parameters.
    pub async fn extract_parameters(&self, demand: &str) -> Result<ExtractedParameters> {
        let content = self
            .complete(
                EXTRACTION_SYSTEM_PROMPT,
                extraction_prompt(demand),
                EXTRACTION_MAX_TOKENS,
            )
            .await?;

        tracing::debug!(target: "recommender::schema", %content, "extraction answer");
        let raw: ParameterExtraction = decode_model_answer(&content, ParameterExtraction::repair)?;
        Ok(ExtractedParameters::from(raw))
    }

    /// Rank candidates against the demand and return the matching ids.
    ///
    /// Ids that name no candidate are dropped before the list is
    /// de-duplicated and capped at the candidate count.
    pub async fn filter_hotels(
        &self,
        demand: &str,
        candidates: &[HotelProjection],
    ) -> Result<Vec<String>> {
        if candidates.is_empty() {
            return Ok(Vec::new());
        }

        let content = self
            .complete(
                FILTER_SYSTEM_PROMPT,
                filter_prompt(demand, candidates),
                FILTER_MAX_TOKENS,
            )
            .await?;

        tracing::debug!(target: "recommender::schema", %content, "filter answer");
        let answer: MatchedIds = decode_model_answer(&content, MatchedIds::repair)?;

        Ok(known_ids(answer.matched_ids, candidates))
    }

    async fn complete(&self, system: &str, user: String, max_tokens: u32) -> Result<String> {
        let messages: Vec<Value> = vec![
            json!({ "role": "system", "content": system }),
            json!({ "role": "user", "content": user }),
        ];

        let body = ChatCompletionRequest::new(&self.model, messages)
            .with_temperature(TEMPERATURE)
            .with_max_tokens(Some(max_tokens))
            .json_object()
            .into_value();

        let response = self.client.chat_completion(&body, self.timeout).await?;
        message_content(&response).map(str::to_string)
    }
}

/// Keep the ids that name a candidate, first occurrence only, in answer order.
fn known_ids(ids: Vec<String>, candidates: &[HotelProjection]) -> Vec<String> {
    let known: HashSet<&str> = candidates.iter().map(|hotel| hotel.id.as_str()).collect();
    let mut seen = HashSet::new();

    ids.into_iter()
        .filter(|id| known.contains(id.as_str()))
        .filter(|id| seen.insert(id.clone()))
        .take(candidates.len())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn projection(id: &str) -> HotelProjection {
        HotelProjection {
            id: id.to_string(),
            name: format!("Hotel {id}"),
            city: "Rome".to_string(),
            price: None,
            rating: None,
        }
    }

    fn ids(values: &[&str]) -> Vec<String> {
        values.iter().map(|id| id.to_string()).collect()
    }

    #[test]
    fn invented_ids_do_not_use_up_the_cap() {
        let candidates = [projection("a"), projection("b")];
        let kept = known_ids(ids(&["ghost-1", "ghost-2", "ghost-3", "b", "a"]), &candidates);
        assert_eq!(kept, vec!["b", "a"]);
    }

    #[test]
    fn repeated_ids_keep_their_first_position() {
        let candidates = [projection("a"), projection("b"), projection("c")];
        let kept = known_ids(ids(&["c", "a", "c", "a"]), &candidates);
        assert_eq!(kept, vec!["c", "a"]);
    }
}
