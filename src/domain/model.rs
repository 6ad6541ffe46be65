use crate::utils::error::{PricingError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Base price used when a request has no category or an unknown one.
pub const DEFAULT_BASE_PRICE: u64 = 15000;

/// Fixed category table: (id, display name, base price).
pub const CATEGORIES: [(u32, &str, u64); 6] = [
    (1, "Print & Fotokopi", 5000),
    (2, "Antar Barang", 10000),
    (3, "Belanja", 15000),
    (4, "Bantuan Tugas", 20000),
    (5, "Bantuan Pindah", 30000),
    (6, "Bantuan Teknis", 25000),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    #[serde(alias = "santai")]
    Relaxed,
    Normal,
    Urgent,
}

impl Urgency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Urgency::Relaxed => "relaxed",
            Urgency::Normal => "normal",
            Urgency::Urgent => "urgent",
        }
    }
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Urgency {
    type Err = PricingError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "relaxed" | "santai" => Ok(Urgency::Relaxed),
            "normal" => Ok(Urgency::Normal),
            "urgent" => Ok(Urgency::Urgent),
            other => Err(PricingError::invalid_request(
                "urgency",
                format!("unknown urgency '{}', expected relaxed, normal or urgent", other),
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Category {
    pub id: u32,
    pub name: &'static str,
    pub base_price: u64,
}

impl Category {
    pub fn lookup(id: Option<u32>) -> Option<Category> {
        let id = id?;
        CATEGORIES
            .iter()
            .find(|(cid, _, _)| *cid == id)
            .map(|&(id, name, base_price)| Category {
                id,
                name,
                base_price,
            })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRequest {
    title: String,
    #[serde(default)]
    description: String,
    urgency: Urgency,
    people_needed: i64,
    #[serde(default)]
    category_id: Option<u32>,
}

impl TryFrom<RawRequest> for RequestDescriptor {
    type Error = PricingError;

    fn try_from(raw: RawRequest) -> Result<Self> {
        RequestDescriptor::new(
            raw.title,
            raw.description,
            raw.urgency,
            raw.people_needed,
            raw.category_id,
        )
    }
}

/// A validated task request. Instances always have a non-blank title and at
/// least one person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawRequest", rename_all = "camelCase")]
pub struct RequestDescriptor {
    title: String,
    description: String,
    urgency: Urgency,
    people_needed: u32,
    category_id: Option<u32>,
}

impl RequestDescriptor {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        urgency: Urgency,
        people_needed: i64,
        category_id: Option<u32>,
    ) -> Result<Self> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(PricingError::invalid_request("title", "must not be empty"));
        }

        let people_needed = u32::try_from(people_needed)
            .ok()
            .filter(|n| *n >= 1)
            .ok_or_else(|| {
                PricingError::invalid_request(
                    "peopleNeeded",
                    format!("must be at least 1, got {}", people_needed),
                )
            })?;

        Ok(Self {
            title,
            description: description.into(),
            urgency,
            people_needed,
            category_id,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn urgency(&self) -> Urgency {
        self.urgency
    }

    pub fn people_needed(&self) -> u32 {
        self.people_needed
    }

    pub fn category_id(&self) -> Option<u32> {
        self.category_id
    }

    pub fn category(&self) -> Option<Category> {
        Category::lookup(self.category_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    #[serde(rename = "name")]
    pub label: String,
    pub amount: u64,
}

impl LineItem {
    pub fn new(label: impl Into<String>, amount: u64) -> Self {
        Self {
            label: label.into(),
            amount,
        }
    }
}

/// Ordered cost components. Serialized as `{"items": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceBreakdown {
    items: Vec<LineItem>,
}

impl PriceBreakdown {
    pub fn new(items: Vec<LineItem>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Sum of all amounts, saturating at `u64::MAX`.
    pub fn total(&self) -> u64 {
        self.items
            .iter()
            .fold(0u64, |sum, item| sum.saturating_add(item.amount))
    }

    /// Sum of all amounts, or `None` when it does not fit in a `u64`.
    pub fn checked_total(&self) -> Option<u64> {
        self.items
            .iter()
            .try_fold(0u64, |sum, item| sum.checked_add(item.amount))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EstimateSource {
    Remote,
    Heuristic,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceEstimate {
    pub base_price: u64,
    pub service_price: u64,
    pub total_price: u64,
    pub breakdown: PriceBreakdown,
    pub source: EstimateSource,
}

impl PriceEstimate {
    /// True when the breakdown adds up to the total.
    pub fn is_consistent(&self) -> bool {
        self.breakdown.checked_total() == Some(self.total_price)
    }
}
