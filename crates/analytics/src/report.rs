use chrono::NaiveDate;
use core_types::AnalyticsSection;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use serde_json::Value;
use std::str::FromStr;

// The backend is loose about numeric types: counts and money arrive as JSON
// numbers or as numeric strings. Anything missing or unparsable reads as zero.

/// Reads a count, truncating fractional values the way integer parsing does.
/// Negative values clamp to zero.
fn count(value: Option<&Value>) -> u64 {
    match value {
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f.trunc() as u64))
            .unwrap_or(0),
        Some(Value::String(s)) => {
            let s = s.trim();
            if s.starts_with('-') {
                return 0;
            }
            let digits: String = s
                .trim_start_matches('+')
                .chars()
                .take_while(|c| c.is_ascii_digit())
                .collect();
            digits.parse().unwrap_or(0)
        }
        _ => 0,
    }
}

fn amount(value: Option<&Value>) -> Decimal {
    match value {
        Some(Value::Number(n)) => Decimal::from_str(&n.to_string())
            .or_else(|_| Decimal::from_scientific(&n.to_string()))
            .unwrap_or(Decimal::ZERO),
        Some(Value::String(s)) => Decimal::from_str(s.trim()).unwrap_or(Decimal::ZERO),
        _ => Decimal::ZERO,
    }
}

fn text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

fn rows<'a>(section: &'a AnalyticsSection, field: &str) -> impl Iterator<Item = &'a Value> + use<'a> {
    section
        .field(field)
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
}

/// Headline cards of the overview tab.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverviewSummary {
    pub total_events: u64,
    pub approved_events: u64,
    pub completed_events: u64,
    pub pending_events: u64,
    pub total_revenue: Decimal,
}

impl OverviewSummary {
    pub fn from_section(section: &AnalyticsSection) -> Self {
        Self {
            total_events: count(section.field("totalEvents")),
            approved_events: count(section.field("approvedEvents")),
            completed_events: count(section.field("completedEvents")),
            pending_events: count(section.field("pendingEvents")),
            total_revenue: amount(section.field("totalRevenue")),
        }
    }
}

/// One slice of a count breakdown, e.g. events per status or per category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountBreakdown {
    pub label: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventsSummary {
    pub total_events: u64,
    pub total_tickets_sold: u64,
    pub avg_tickets_per_event: Decimal,
    pub total_revenue: Decimal,
    pub by_status: Vec<CountBreakdown>,
    pub by_category: Vec<CountBreakdown>,
}

impl EventsSummary {
    pub fn from_section(section: &AnalyticsSection) -> Self {
        let breakdown = |field: &str, key: &str| -> Vec<CountBreakdown> {
            rows(section, field)
                .map(|row| CountBreakdown {
                    label: text(row.get(key)),
                    count: count(row.get("count")),
                })
                .collect()
        };

        Self {
            total_events: count(section.field("totalEvents")),
            total_tickets_sold: count(section.field("totalTicketsSold")),
            avg_tickets_per_event: amount(section.field("avgTicketsPerEvent")),
            total_revenue: amount(section.field("totalRevenue")),
            by_status: breakdown("eventsByStatus", "status"),
            by_category: breakdown("eventsByCategory", "category"),
        }
    }
}

/// Revenue for one reporting period, split between organizer and platform.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodRevenue {
    pub period: String,
    pub total_revenue: Decimal,
    pub admin_revenue: Decimal,
    pub organizer_revenue: Decimal,
    pub transaction_count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventRevenue {
    pub event_name: String,
    pub total_revenue: Decimal,
    pub transaction_count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RevenueSummary {
    pub by_period: Vec<PeriodRevenue>,
    pub top_events: Vec<EventRevenue>,
}

impl RevenueSummary {
    pub fn from_section(section: &AnalyticsSection) -> Self {
        let by_period = rows(section, "revenueByPeriod")
            .map(|row| PeriodRevenue {
                period: text(row.get("period")),
                total_revenue: amount(row.get("totalRevenue")),
                admin_revenue: amount(row.get("adminRevenue")),
                organizer_revenue: amount(row.get("organizerRevenue")),
                transaction_count: count(row.get("transactionCount")),
            })
            .collect();

        let top_events = rows(section, "topEvents")
            .map(|row| EventRevenue {
                event_name: text(row.get("event_name")),
                total_revenue: amount(row.get("totalRevenue")),
                transaction_count: count(row.get("transactionCount")),
            })
            .collect();

        Self { by_period, top_events }
    }

    /// Sum of the organizer's share over all periods.
    pub fn organizer_total(&self) -> Decimal {
        self.by_period.iter().map(|p| p.organizer_revenue).sum()
    }
}

/// Formats an amount in Kenyan shillings with thousands separators,
/// e.g. `KSh 1,234,567.5`. Trailing fractional zeros are dropped.
pub fn format_currency(value: Decimal) -> String {
    let normalized = value
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        .normalize();
    let raw = normalized.abs().to_string();
    let (whole, fraction) = match raw.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (raw.as_str(), None),
    };

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if normalized.is_sign_negative() && !normalized.is_zero() { "-" } else { "" };
    match fraction {
        Some(fraction) => format!("KSh {}{}.{}", sign, grouped, fraction),
        None => format!("KSh {}{}", sign, grouped),
    }
}

/// `dd/mm/yyyy`, the display format of the date range picker.
pub fn format_display_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}
