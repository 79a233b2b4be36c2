//! Local reductions over API data.
//!
//! Nothing here scores risk; the backend does that. These helpers only decide
//! how already-computed numbers are banded, summarised and formatted.

use crate::error::ValidationError;
use crate::types::{CostSimulationRequest, CostSimulationResponse, Trend};

/// Policy alert category filters, in button order. `"all"` means no filter.
pub const ALERT_CATEGORIES: [&str; 6] = [
    "all",
    "Export Control",
    "Tariff",
    "Subsidy",
    "Policy",
    "Regulation",
];

/// Tariff prefilled in the cost simulator when no country is selected.
pub const DEFAULT_TARIFF: f64 = 15.0;

/// Converts a category filter button into the query value.
pub fn category_filter(category: &str) -> Option<&str> {
    if category == "all" {
        None
    } else {
        Some(category)
    }
}

/// Colour band of a 0-100 risk score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskBand {
    /// 0..=40
    Low,
    /// 41..=70
    Elevated,
    /// above 70
    Severe,
}

impl RiskBand {
    pub fn from_score(score: i32) -> Self {
        if score <= 40 {
            RiskBand::Low
        } else if score <= 70 {
            RiskBand::Elevated
        } else {
            RiskBand::Severe
        }
    }
}

/// Whether the high-risk banner applies.
pub fn is_high_risk(score: i32) -> bool {
    score > 70
}

/// Friend-shoring partner rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FriendShoreRating {
    Excellent,
    Good,
    Evaluate,
}

impl FriendShoreRating {
    pub fn from_score(score: i32) -> Self {
        if score >= 80 {
            FriendShoreRating::Excellent
        } else if score >= 60 {
            FriendShoreRating::Good
        } else {
            FriendShoreRating::Evaluate
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            FriendShoreRating::Excellent => "Excellent partner for friend-shoring",
            FriendShoreRating::Good => "Good partner with some considerations",
            FriendShoreRating::Evaluate => "Evaluate carefully for strategic partnerships",
        }
    }
}

/// Alternative supplier suitability band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuitabilityBand {
    Strong,
    Moderate,
    Weak,
}

impl SuitabilityBand {
    pub fn from_score(score: i32) -> Self {
        if score >= 80 {
            SuitabilityBand::Strong
        } else if score >= 60 {
            SuitabilityBand::Moderate
        } else {
            SuitabilityBand::Weak
        }
    }
}

/// Forecast score minus the current score.
pub fn score_change(forecast: i32, current: i32) -> i32 {
    forecast - current
}

/// Signed change label, or `None` when there is no change to show.
pub fn format_score_change(change: i32) -> Option<String> {
    match change {
        0 => None,
        c if c > 0 => Some(format!("+{}", c)),
        c => Some(c.to_string()),
    }
}

/// Percentage the final cost exceeds the base cost.
pub fn cost_increase_pct(response: &CostSimulationResponse) -> Option<f64> {
    if response.base_cost == 0.0 {
        return None;
    }
    Some((response.final_cost / response.base_cost - 1.0) * 100.0)
}

/// Base cost under the predicted future tariff.
pub fn estimated_future_cost(base_cost: f64, estimated_future_tariff: f64) -> f64 {
    base_cost * (1.0 + estimated_future_tariff / 100.0)
}

/// Sourcing advice for a predicted trend.
pub fn recommendation(trend: Trend) -> &'static str {
    match trend {
        Trend::Increasing => "diversifying suppliers or negotiating long-term contracts",
        Trend::Decreasing | Trend::Stable => "maintaining current supplier relationships",
    }
}

/// Joins the first `limit` industries and counts the rest.
///
/// ```
/// use riskatlas_core::analysis::summarize_industries;
///
/// let list = vec!["A".to_string(), "B".to_string(), "C".to_string(), "D".to_string()];
/// assert_eq!(summarize_industries(&list, 3), ("A, B, C".to_string(), Some(1)));
/// ```
pub fn summarize_industries(industries: &[String], limit: usize) -> (String, Option<usize>) {
    let shown = industries
        .iter()
        .take(limit)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    let hidden = industries.len().saturating_sub(limit);
    (shown, (hidden > 0).then_some(hidden))
}

/// Upper-cases the first character.
pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Formats a currency amount with thousands separators and at most two decimals.
pub fn format_money(amount: f64) -> String {
    let negative = amount < 0.0;
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = cents / 100;
    let frac = cents % 100;

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if negative { "-" } else { "" };
    if frac == 0 {
        format!("{}${}", sign, grouped)
    } else if frac % 10 == 0 {
        format!("{}${}.{}", sign, grouped, frac / 10)
    } else {
        format!("{}${}.{:02}", sign, grouped, frac)
    }
}

/// Raw cost simulator form values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CostForm {
    pub base_cost: String,
    pub tariff_percentage: String,
    pub industry: String,
}

impl CostForm {
    pub fn with_tariff(tariff: f64) -> Self {
        Self {
            tariff_percentage: format_number(tariff),
            ..Default::default()
        }
    }

    /// Parses the form into a request for `country_id`.
    pub fn validate(&self, country_id: Option<&str>) -> Result<CostSimulationRequest, ValidationError> {
        let base_cost = parse_number(&self.base_cost)
            .filter(|v| *v > 0.0)
            .ok_or(ValidationError::InvalidBaseCost)?;
        let tariff_percentage = parse_number(&self.tariff_percentage)
            .filter(|v| *v >= 0.0)
            .ok_or(ValidationError::InvalidTariff)?;

        let industry = self.industry.trim();
        Ok(CostSimulationRequest {
            base_cost,
            tariff_percentage,
            country_id: country_id.map(str::to_string),
            industry: (!industry.is_empty()).then(|| industry.to_string()),
        })
    }
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Formats a number without a trailing `.0` for whole values.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}
