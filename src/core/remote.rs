//! Pricing through a generative-language service (Gemini `generateContent`).
//!
//! The model is asked to answer with a JSON object; the first `{` through the
//! last `}` of its reply text is parsed and checked against the estimate
//! schema before being returned.

use crate::config::toml_config::{GenerationConfig, RemoteConfig};
use crate::core::{EstimateSource, LineItem, PriceBreakdown, PriceEstimate, RequestDescriptor};
use crate::domain::ports::RemoteEstimator;
use crate::utils::error::{RemoteEstimationError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

type RemoteResult<T> = std::result::Result<T, RemoteEstimationError>;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: WireGenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WireGenerationConfig {
    temperature: f64,
    top_k: u32,
    top_p: f64,
    max_output_tokens: u32,
}

impl From<&GenerationConfig> for WireGenerationConfig {
    fn from(config: &GenerationConfig) -> Self {
        Self {
            temperature: config.temperature,
            top_k: config.top_k,
            top_p: config.top_p,
            max_output_tokens: config.max_output_tokens,
        }
    }
}

/// Shape the model is instructed to reply with.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PricingReply {
    base_price: f64,
    service_price: f64,
    total_price: f64,
    breakdown: ReplyBreakdown,
}

#[derive(Debug, Deserialize)]
struct ReplyBreakdown {
    items: Vec<ReplyItem>,
}

#[derive(Debug, Deserialize)]
struct ReplyItem {
    name: String,
    amount: f64,
}

pub struct GeminiEstimator {
    client: Client,
    url: String,
    generation: GenerationConfig,
}

impl GeminiEstimator {
    pub fn new(remote: &RemoteConfig, generation: GenerationConfig) -> Result<Self> {
        let client = Client::builder().timeout(remote.timeout()).build()?;
        Ok(Self {
            client,
            url: remote.generate_content_url(),
            generation,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl RemoteEstimator for GeminiEstimator {
    async fn estimate_remote(
        &self,
        request: &RequestDescriptor,
        credential: &str,
    ) -> RemoteResult<PriceEstimate> {
        let prompt = build_prompt(request);
        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: &prompt }],
            }],
            generation_config: WireGenerationConfig::from(&self.generation),
        };

        tracing::debug!("Requesting remote price from: {}", self.url);
        let response = self
            .client
            .post(&self.url)
            .query(&[("key", credential)])
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("Pricing service response status: {}", status);
        if !status.is_success() {
            return Err(RemoteEstimationError::HttpError {
                status: status.as_u16(),
            });
        }

        let text = response.text().await.map_err(|e| {
            RemoteEstimationError::NetworkFailure(format!(
                "Failed to read response body: {}",
                e.without_url()
            ))
        })?;

        parse_response_body(&text)
    }
}

pub fn build_prompt(request: &RequestDescriptor) -> String {
    let category = match request.category() {
        Some(c) => format!("{} (id {})", c.name, c.id),
        None => "general".to_string(),
    };

    format!(
        r#"Analyze this service request and provide pricing recommendation in Indonesian Rupiah:

Title: {title}
Description: {description}
Urgency: {urgency}
People needed: {people}
Category: {category}

Consider:
- Base service cost
- Urgency multiplier (urgent: +50%, normal: +0%, relaxed: -20%)
- People multiplier
- Complexity based on description
- Indonesian market rates

Respond with JSON format:
{{
  "basePrice": number,
  "servicePrice": number,
  "totalPrice": number,
  "breakdown": {{
    "items": [
      {{"name": "item description", "amount": number}}
    ]
  }}
}}"#,
        title = request.title(),
        description = request.description(),
        urgency = request.urgency(),
        people = request.people_needed(),
        category = category,
    )
}

/// Parses a full `generateContent` response body into an estimate.
pub fn parse_response_body(body: &str) -> RemoteResult<PriceEstimate> {
    let envelope: serde_json::Value = serde_json::from_str(body).map_err(|e| {
        RemoteEstimationError::MalformedBody(format!("Response is not JSON: {}", e))
    })?;

    let text = envelope
        .pointer("/candidates/0/content/parts/0/text")
        .and_then(serde_json::Value::as_str)
        .ok_or_else(|| {
            RemoteEstimationError::MalformedBody("No candidate text in response".to_string())
        })?;

    parse_pricing_text(text)
}

/// Span from the first `{` to the last `}`. Braces inside string values are
/// not taken into account.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

/// Parses the model's free-form reply text into an estimate.
pub fn parse_pricing_text(text: &str) -> RemoteResult<PriceEstimate> {
    let json = extract_json_object(text).ok_or_else(|| {
        RemoteEstimationError::MalformedBody("No JSON object in reply text".to_string())
    })?;

    let value: serde_json::Value = serde_json::from_str(json).map_err(|e| {
        RemoteEstimationError::MalformedBody(format!("Reply object is not valid JSON: {}", e))
    })?;

    let reply: PricingReply = serde_json::from_value(value)
        .map_err(|e| RemoteEstimationError::SchemaViolation(e.to_string()))?;

    let items = reply
        .breakdown
        .items
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            let amount = to_amount(&format!("breakdown.items[{}].amount", i), item.amount)?;
            Ok(LineItem::new(item.name, amount))
        })
        .collect::<RemoteResult<Vec<_>>>()?;

    let estimate = PriceEstimate {
        base_price: to_amount("basePrice", reply.base_price)?,
        service_price: to_amount("servicePrice", reply.service_price)?,
        total_price: to_amount("totalPrice", reply.total_price)?,
        breakdown: PriceBreakdown::new(items),
        source: EstimateSource::Remote,
    };

    let breakdown_total = estimate.breakdown.checked_total().ok_or_else(|| {
        RemoteEstimationError::SchemaViolation("breakdown amounts overflow".to_string())
    })?;
    if breakdown_total != estimate.total_price {
        return Err(RemoteEstimationError::SchemaViolation(format!(
            "breakdown sums to {} but totalPrice is {}",
            breakdown_total, estimate.total_price
        )));
    }

    Ok(estimate)
}

/// 2^64, the first integer a `u64` cannot hold.
const AMOUNT_LIMIT: f64 = 18_446_744_073_709_551_616.0;

fn to_amount(field: &str, value: f64) -> RemoteResult<u64> {
    if !value.is_finite() || value < 0.0 {
        return Err(RemoteEstimationError::SchemaViolation(format!(
            "{} must be a non-negative number, got {}",
            field, value
        )));
    }
    let rounded = value.round();
    if rounded >= AMOUNT_LIMIT {
        return Err(RemoteEstimationError::SchemaViolation(format!(
            "{} is out of range, got {}",
            field, value
        )));
    }
    Ok(rounded as u64)
}
