//! Terminal rendering: currency formatting and aligned breakdown tables.

use std::fmt::Write;

use budgewiser_core::{CostBreakdown, CostCategory, PercentageTable};
use budgewiser_runner::Settings;

const CATEGORY_WIDTH: usize = 24;
const PERCENT_WIDTH: usize = 10;
const AMOUNT_WIDTH: usize = 18;

/// `2658.48` → `$2,658.48`
pub fn format_usd(amount: f64) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount < 0.0 { "-" } else { "" };
    format!("{sign}${grouped}.{cents}")
}

pub fn render_breakdown(breakdown: &CostBreakdown) -> String {
    let mut out = String::new();
    let rule = "-".repeat(CATEGORY_WIDTH + PERCENT_WIDTH + AMOUNT_WIDTH + 2);

    let _ = writeln!(
        out,
        "{:<CATEGORY_WIDTH$} {:>PERCENT_WIDTH$} {:>AMOUNT_WIDTH$}",
        "Category", "Percent", "Cost (USD)"
    );
    let _ = writeln!(out, "{rule}");

    let last = breakdown.len().saturating_sub(1);
    for (i, line) in breakdown.lines().iter().enumerate() {
        if i == last {
            let _ = writeln!(out, "{rule}");
        }
        let percent = line
            .percentage
            .map_or_else(|| "-".to_string(), |p| format!("{p:.2}%"));
        let _ = writeln!(
            out,
            "{:<CATEGORY_WIDTH$} {:>PERCENT_WIDTH$} {:>AMOUNT_WIDTH$}",
            line.category,
            percent,
            format_usd(line.amount)
        );
    }
    out
}

fn render_table<C: CostCategory>(out: &mut String, title: &str, table: &PercentageTable<C>) {
    let _ = writeln!(out, "{title}");
    for (category, percent) in table.iter() {
        let _ = writeln!(
            out,
            "  {:<CATEGORY_WIDTH$} {:>PERCENT_WIDTH$}",
            category.key(),
            format!("{percent:.2}%")
        );
    }
}

pub fn render_settings(settings: &Settings) -> String {
    let mut out = String::new();
    render_table(&mut out, "Direct", &settings.direct);
    render_table(&mut out, "Contractor indirects", &settings.contractor_indirects);
    render_table(&mut out, "Client indirects", &settings.client_indirects);
    let _ = writeln!(
        out,
        "Contingency\n  {:<CATEGORY_WIDTH$} {:>PERCENT_WIDTH$}",
        "contingency_percent",
        format!("{:.2}%", settings.contingency_percent)
    );
    out
}
