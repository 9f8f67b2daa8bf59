#![allow(dead_code)]

use serde::{Deserialize, Serialize};

/// A person helping run the bake sale.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub id: String,
    pub name: String,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    #[default]
    Todo,
    Done,
}

impl TaskStatus {
    pub fn toggled(self) -> Self {
        match self {
            TaskStatus::Todo => TaskStatus::Done,
            TaskStatus::Done => TaskStatus::Todo,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::Done => "done",
        }
    }

    pub fn from_str(value: &str) -> Self {
        match value {
            "done" => TaskStatus::Done,
            _ => TaskStatus::Todo,
        }
    }
}

/// A planning task pinned to one of the four timeline phases.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub phase_id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Member name, not id, so assignments survive a member being re-added.
    #[serde(default)]
    pub assignee: Option<String>,
    #[serde(default)]
    pub status: TaskStatus,
}

/// Who advanced the money for a cost. Only used to report the two subtotals
/// separately; the pricing math treats both sides the same.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FundingSource {
    #[default]
    #[serde(rename = "business")]
    Business,
    #[serde(rename = "self")]
    SelfFunded,
}

impl FundingSource {
    pub fn label(&self) -> &'static str {
        match self {
            FundingSource::Business => "💰 Business",
            FundingSource::SelfFunded => "🏠 Out of pocket",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FundingSource::Business => "business",
            FundingSource::SelfFunded => "self",
        }
    }

    pub fn from_str(value: &str) -> Self {
        match value {
            "self" => FundingSource::SelfFunded,
            _ => FundingSource::Business,
        }
    }
}

/// An ingredient line: price is quoted per kilogram, usage in grams.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub id: String,
    pub name: String,
    pub price_per_kg: f64,
    pub grams: f64,
    #[serde(default)]
    pub source: FundingSource,
}

/// A miscellaneous cost that is not tied to a weight (packaging, gas, fees).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExtraCost {
    pub id: String,
    pub name: String,
    pub amount: f64,
    #[serde(default)]
    pub source: FundingSource,
}

/// Knobs of the pricing calculator that are not cost lines.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProductionParams {
    /// Units planned for the production run. Denominator for the unit cost.
    pub target_quantity: f64,
    /// Additive markup on unit cost, in percent. May legally go negative.
    pub margin_percent: f64,
    pub units_per_package: u32,
    /// Units actually (or expectedly) sold. Denominator for break-even.
    pub units_sold: f64,
}

impl Default for ProductionParams {
    fn default() -> Self {
        Self {
            target_quantity: 12.0,
            margin_percent: 20.0,
            units_per_package: 1,
            units_sold: 0.0,
        }
    }
}
