//! CSV rendering for estimate inputs, outputs, and breakdown ledgers.
//!
//! Every function returns the CSV text; writing to disk is the caller's job.

use anyhow::{Context, Result};
use budgewiser_core::{CostBreakdown, CostCategory};

use crate::estimate::{Estimate, EstimateInput};

/// Placeholder for an absent percentage (base and total rows).
pub const NO_PERCENTAGE: &str = "-";

fn finish(wtr: csv::Writer<Vec<u8>>) -> Result<String> {
    let bytes = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(bytes).context("CSV output is not valid UTF-8")
}

/// One breakdown as `category,percentage,amount_usd`, rows in ledger order.
pub fn breakdown_csv(breakdown: &CostBreakdown) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["category", "percentage", "amount_usd"])?;

    for line in breakdown.lines() {
        let percentage = line
            .percentage
            .map_or_else(|| NO_PERCENTAGE.to_string(), |p| p.to_string());
        let amount = format!("{:.2}", line.amount);
        wtr.write_record([line.category.as_str(), percentage.as_str(), amount.as_str()])?;
    }

    finish(wtr)
}

/// Header plus one row: project, generated_at, run_id.
pub fn meta_input_csv(estimate: &Estimate) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["project", "generated_at", "run_id"])?;
    let generated_at = estimate.meta.generated_at.to_rfc3339();
    wtr.write_record([
        estimate.meta.project.as_str(),
        generated_at.as_str(),
        estimate.meta.run_id.as_str(),
    ])?;
    finish(wtr)
}

/// Header plus one row: material cost, every coefficient prefixed by its
/// table name, and the contingency percentage.
pub fn estimation_input_csv(input: &EstimateInput) -> Result<String> {
    let settings = &input.settings;
    let mut header = vec!["material_cost".to_string()];
    let mut row = vec![input.material_cost.to_string()];

    push_table(&mut header, &mut row, "direct", settings.direct.iter());
    push_table(
        &mut header,
        &mut row,
        "contractor_indirects",
        settings.contractor_indirects.iter(),
    );
    push_table(
        &mut header,
        &mut row,
        "client_indirects",
        settings.client_indirects.iter(),
    );
    header.push("contingency_percent".to_string());
    row.push(settings.contingency_percent.to_string());

    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(&header)?;
    wtr.write_record(&row)?;
    finish(wtr)
}

fn push_table<C: CostCategory>(
    header: &mut Vec<String>,
    row: &mut Vec<String>,
    prefix: &str,
    entries: impl Iterator<Item = (C, f64)>,
) {
    for (category, percent) in entries {
        header.push(format!("{prefix}.{}", category.key()));
        row.push(percent.to_string());
    }
}

/// Header plus one row with the three stage totals.
pub fn estimation_output_csv(estimate: &Estimate) -> Result<String> {
    let output = &estimate.output;
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["direct_cost", "epc_cost", "total_installed_cost"])?;
    wtr.write_record([
        format!("{:.2}", output.direct_cost),
        format!("{:.2}", output.epc_cost),
        format!("{:.2}", output.total_installed_cost),
    ])?;
    finish(wtr)
}
