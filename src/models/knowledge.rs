use serde::{ Deserialize, Serialize };
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum KnowledgeError {
    #[error("Knowledge document IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Knowledge document JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FundingSource {
    pub name: String,
    pub amount: f64,
    pub percentage: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Expenditure {
    pub category: String,
    pub amount: f64,
    pub percentage: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StudentPopulation {
    pub total_enrollment: u64,
    /// Breakdowns (grade bands, program participation, ...) vary per district.
    #[serde(flatten)]
    pub other_stats: BTreeMap<String, JsonValue>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UnfundedNeed {
    pub name: String,
    pub estimated_cost: f64,
    pub description: String,
}

/// Static budget data the answering backend grounds its replies in.
///
/// Loaded once and never mutated; nothing in this crate writes it back.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeDocument {
    #[serde(default)]
    pub district_name: Option<String>,
    #[serde(default)]
    pub fiscal_year: Option<String>,
    pub total_budget: f64,
    pub funding_sources: Vec<FundingSource>,
    pub major_expenditures: Vec<Expenditure>,
    pub student_population: StudentPopulation,
    pub strategic_priorities: Vec<String>,
    pub financial_narrative: String,
    pub unfunded_needs: Vec<UnfundedNeed>,
}

impl KnowledgeDocument {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, KnowledgeError> {
        let raw = fs::read_to_string(path.as_ref())?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, KnowledgeError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Pretty-printed JSON, in the form a backend embeds as grounding context.
    pub fn context_json(&self) -> Result<String, KnowledgeError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn total_unfunded(&self) -> f64 {
        self.unfunded_needs
            .iter()
            .map(|n| n.estimated_cost)
            .sum()
    }

    pub fn summary(&self) -> String {
        format!(
            "{} ({}): total budget {}, {} funding sources, {} expenditure categories, {} students, {} unfunded needs totalling {}",
            self.district_name.as_deref().unwrap_or("district"),
            self.fiscal_year.as_deref().unwrap_or("fiscal year unknown"),
            format_currency(self.total_budget),
            self.funding_sources.len(),
            self.major_expenditures.len(),
            self.student_population.total_enrollment,
            self.unfunded_needs.len(),
            format_currency(self.total_unfunded())
        )
    }
}

/// Whole-dollar amount with thousands separators, e.g. `$5,500,000`.
pub fn format_currency(amount: f64) -> String {
    let rounded = amount.round() as i64;
    let digits = rounded.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if rounded < 0 { format!("-${}", grouped) } else { format!("${}", grouped) }
}
