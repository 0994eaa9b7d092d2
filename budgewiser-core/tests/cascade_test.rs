//! End-to-end cascade scenarios through the public API.

use budgewiser_core::{
    run_cascade, CascadeError, CascadeRunner, ClientIndirect, ContractorIndirect, CostCategory,
    DirectCategory, PercentageTable, Stage,
};

const EPS: f64 = 1e-9;

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < EPS
}

#[test]
fn worked_example_from_material_to_installed_cost() {
    let result = run_cascade(
        1000.0,
        &PercentageTable::uniform(10.0).unwrap(),
        &PercentageTable::uniform(5.0).unwrap(),
        &PercentageTable::uniform(2.0).unwrap(),
        10.0,
    )
    .unwrap();

    // Direct: 9 × 100 on top of 1000
    assert_eq!(result.direct.components().len(), 9);
    assert!(result.direct.components().iter().all(|l| close(l.amount, 100.0)));
    assert!(close(result.direct_cost, 1900.0));

    // EPC: 4 × 95 on top of 1900
    assert_eq!(result.epc.components().len(), 4);
    assert!(result.epc.components().iter().all(|l| close(l.amount, 95.0)));
    assert!(close(result.epc_cost, 2280.0));

    // Installed: 3 × 45.6, then 10% of 2416.8
    let installed = result.installed.components();
    assert_eq!(installed.len(), 4);
    assert!(installed[..3].iter().all(|l| close(l.amount, 45.6)));
    assert_eq!(installed[3].category, "Contingency");
    assert!(close(installed[3].amount, 241.68));
    assert!(close(result.total_installed_cost, 2658.48));
}

#[test]
fn every_breakdown_ends_with_one_total_row() {
    let result = run_cascade(
        500.0,
        &PercentageTable::uniform(3.0).unwrap(),
        &PercentageTable::uniform(4.0).unwrap(),
        &PercentageTable::uniform(1.0).unwrap(),
        20.0,
    )
    .unwrap();

    let totals = [
        result.direct_cost,
        result.epc_cost,
        result.total_installed_cost,
    ];
    for (breakdown, total) in result.breakdowns().into_iter().zip(totals) {
        let total_rows = breakdown
            .lines()
            .iter()
            .filter(|l| l.category.starts_with("Total "))
            .count();
        assert_eq!(total_rows, 1);
        assert_eq!(breakdown.total().category, breakdown.stage().total_label());
        assert_eq!(breakdown.total().percentage, None);
        assert_eq!(breakdown.total_amount(), total);
    }
}

#[test]
fn missing_contractor_key_fails_before_arithmetic() {
    let partial: Vec<(&str, f64)> = ContractorIndirect::ALL
        .iter()
        .filter(|c| **c != ContractorIndirect::Tpia)
        .map(|c| (c.key(), 5.0))
        .collect();

    let err = PercentageTable::<ContractorIndirect>::from_named(partial).unwrap_err();
    assert_eq!(
        err,
        CascadeError::MissingCoefficient {
            stage: Stage::Epc,
            category: "tpia",
        }
    );
    assert_eq!(
        err.to_string(),
        "EPC cost table is missing required coefficient 'tpia'"
    );
}

#[test]
fn negative_material_cost_produces_no_result() {
    let runner = CascadeRunner::new(
        PercentageTable::<DirectCategory>::uniform(10.0).unwrap(),
        PercentageTable::<ContractorIndirect>::uniform(5.0).unwrap(),
        PercentageTable::<ClientIndirect>::uniform(2.0).unwrap(),
        10.0,
    )
    .unwrap();

    let err = runner.run(-1.0).unwrap_err();
    assert_eq!(
        err,
        CascadeError::InvalidInput {
            stage: Stage::Direct,
            field: "material_cost",
            value: -1.0,
        }
    );
}

#[test]
fn overflow_is_reported_by_the_stage_that_overflowed() {
    let runner = CascadeRunner::new(
        PercentageTable::<DirectCategory>::uniform(10.0).unwrap(),
        PercentageTable::<ContractorIndirect>::uniform(5.0).unwrap(),
        PercentageTable::<ClientIndirect>::uniform(2.0).unwrap(),
        10.0,
    )
    .unwrap();

    let err = runner.run(1e308).unwrap_err();
    assert_eq!(
        err,
        CascadeError::Overflow {
            stage: Stage::Direct,
            base: 1e308,
        }
    );
}

#[test]
fn runner_is_reusable_across_threads() {
    let runner = CascadeRunner::new(
        PercentageTable::uniform(10.0).unwrap(),
        PercentageTable::uniform(5.0).unwrap(),
        PercentageTable::uniform(2.0).unwrap(),
        10.0,
    )
    .unwrap();
    let expected = runner.run(1000.0).unwrap();

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4).map(|_| scope.spawn(|| runner.run(1000.0))).collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap().unwrap(), expected);
        }
    });
}
