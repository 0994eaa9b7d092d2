//! Cost breakdown — the auditable ledger each cascade stage produces.

use serde::Serialize;

use super::percentages::Stage;

/// One row of a breakdown: a category, the percentage that produced it (absent
/// for base and total rows), and the resulting amount in USD.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostLineItem {
    pub category: String,
    pub percentage: Option<f64>,
    pub amount: f64,
}

impl CostLineItem {
    pub fn base(category: impl Into<String>, amount: f64) -> Self {
        Self {
            category: category.into(),
            percentage: None,
            amount,
        }
    }

    /// `amount = base * percent / 100`.
    pub fn percent_of(category: impl Into<String>, percent: f64, base: f64) -> Self {
        Self {
            category: category.into(),
            percentage: Some(percent),
            amount: base * percent / 100.0,
        }
    }
}

/// Ordered ledger of line items closed by exactly one total row.
///
/// Row order is computation order: the base row first, the stage's
/// percentage rows next, and the `Total <Stage> Cost` row last. The fields
/// are private so a breakdown can only be produced by a stage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostBreakdown {
    stage: Stage,
    lines: Vec<CostLineItem>,
}

impl CostBreakdown {
    /// Close a ledger by appending the total row.
    pub(crate) fn close(stage: Stage, mut lines: Vec<CostLineItem>, total: f64) -> Self {
        lines.push(CostLineItem::base(stage.total_label(), total));
        Self { stage, lines }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Every row, including the base row and the trailing total row.
    pub fn lines(&self) -> &[CostLineItem] {
        &self.lines
    }

    /// The row the stage started from (material cost, direct cost, or EPC cost).
    pub fn base(&self) -> &CostLineItem {
        &self.lines[0]
    }

    /// Rows between the base row and the total row.
    pub fn components(&self) -> &[CostLineItem] {
        &self.lines[1..self.lines.len() - 1]
    }

    pub fn total(&self) -> &CostLineItem {
        &self.lines[self.lines.len() - 1]
    }

    pub fn total_amount(&self) -> f64 {
        self.total().amount
    }

    /// Find a row by its label.
    pub fn line(&self, category: &str) -> Option<&CostLineItem> {
        self.lines.iter().find(|line| line.category == category)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CostBreakdown {
        let lines = vec![
            CostLineItem::base("Direct Cost", 200.0),
            CostLineItem::percent_of("Freight", 5.0, 200.0),
            CostLineItem::percent_of("TPIA", 1.0, 200.0),
        ];
        CostBreakdown::close(Stage::Epc, lines, 212.0)
    }

    #[test]
    fn percent_of_computes_share_of_base() {
        let line = CostLineItem::percent_of("Piping", 12.5, 1000.0);
        assert_eq!(line.percentage, Some(12.5));
        assert_eq!(line.amount, 125.0);
    }

    #[test]
    fn total_row_is_last_and_has_no_percentage() {
        let breakdown = sample();
        let total = breakdown.total();
        assert_eq!(total.category, "Total EPC Cost");
        assert_eq!(total.percentage, None);
        assert_eq!(breakdown.total_amount(), 212.0);
        assert_eq!(breakdown.lines().last(), Some(total));
    }

    #[test]
    fn components_exclude_base_and_total() {
        let breakdown = sample();
        assert_eq!(breakdown.len(), 4);
        assert_eq!(breakdown.base().category, "Direct Cost");
        let names: Vec<_> = breakdown.components().iter().map(|l| l.category.as_str()).collect();
        assert_eq!(names, ["Freight", "TPIA"]);
    }

    #[test]
    fn line_lookup_by_label() {
        let breakdown = sample();
        assert_eq!(breakdown.line("TPIA").map(|l| l.amount), Some(2.0));
        assert!(breakdown.line("Insurance").is_none());
    }
}
