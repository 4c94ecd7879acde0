//! Number and date formatting for price cards, axes and tooltips.

use chrono::{DateTime, Utc};

/// Direction of a 24h change, used for the arrow and colour of the change pill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeDirection {
    Up,
    Down,
}

impl ChangeDirection {
    pub fn from_change(pct: f64) -> Self {
        if pct >= 0.0 {
            ChangeDirection::Up
        } else {
            ChangeDirection::Down
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            ChangeDirection::Up => "↑",
            ChangeDirection::Down => "↓",
        }
    }
}

/// Format a USD price.
///
/// Prices of at least 1 get two decimals; smaller prices keep between four and
/// eight decimals so sub-cent assets stay readable. Integer digits are grouped
/// with commas in both cases.
pub fn format_price(price: f64) -> String {
    if !price.is_finite() {
        return "0.00".to_string();
    }

    let raw = if price >= 1.0 {
        format!("{:.2}", price)
    } else {
        trim_decimals(format!("{:.8}", price), 4)
    };

    group_thousands(&raw)
}

/// Compact axis label: `1.2B`, `3.4M`, `5.6K`, or the rounded integer.
pub fn format_compact(value: f64) -> String {
    if value >= 1_000_000_000.0 {
        format!("{:.1}B", value / 1_000_000_000.0)
    } else if value >= 1_000_000.0 {
        format!("{:.1}M", value / 1_000_000.0)
    } else if value >= 1_000.0 {
        format!("{:.1}K", value / 1_000.0)
    } else {
        format!("{:.0}", value)
    }
}

/// `↑ 2.35%` / `↓ 1.20%`.
pub fn format_change(pct: f64) -> String {
    let direction = ChangeDirection::from_change(pct);
    format!("{} {:.2}%", direction.arrow(), pct.abs())
}

/// `+3.10%` / `-0.50%`. Zero has no sign.
pub fn format_signed_pct(pct: f64) -> String {
    if pct > 0.0 {
        format!("+{:.2}%", pct)
    } else {
        format!("{:.2}%", pct)
    }
}

/// `dd/mm` label for chart ticks.
pub fn chart_label(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%d/%m").to_string()
}

fn trim_decimals(mut raw: String, min_decimals: usize) -> String {
    let Some(dot) = raw.find('.') else {
        return raw;
    };
    let keep = dot + 1 + min_decimals;
    while raw.len() > keep && raw.ends_with('0') {
        raw.pop();
    }
    raw
}

fn group_thousands(raw: &str) -> String {
    let (sign, unsigned) = match raw.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", raw),
    };
    let (int_part, frac_part) = match unsigned.find('.') {
        Some(dot) => unsigned.split_at(dot),
        None => (unsigned, ""),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{}{}{}", sign, grouped, frac_part)
}
