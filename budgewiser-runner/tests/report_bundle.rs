use std::io::Read;

use budgewiser_runner::{run_estimate, ReportWriter, Settings};

fn estimate() -> budgewiser_runner::Estimate {
    let settings = Settings::default_settings().unwrap();
    run_estimate("Bundle test", 250_000.0, &settings).unwrap()
}

#[test]
fn test_report_writer_exports_every_file() {
    let temp_dir = tempfile::tempdir().unwrap();
    let writer = ReportWriter::new(temp_dir.path()).unwrap();
    let estimate = estimate();

    let paths = writer.write(&estimate).unwrap();
    assert_eq!(paths.run_dir, temp_dir.path().join(&estimate.meta.run_id));
    for file in paths.files() {
        assert!(file.exists(), "missing {}", file.display());
        assert!(file.starts_with(&paths.run_dir));
    }
}

#[test]
fn test_breakdown_files_end_with_total_row() {
    let temp_dir = tempfile::tempdir().unwrap();
    let writer = ReportWriter::new(temp_dir.path()).unwrap();
    let paths = writer.write(&estimate()).unwrap();

    let expected = [
        (&paths.direct_breakdown, "Total Direct Cost,-,"),
        (&paths.epc_breakdown, "Total EPC Cost,-,"),
        (&paths.installed_breakdown, "Total Installed Cost,-,"),
    ];
    for (path, prefix) in expected {
        let content = std::fs::read_to_string(path).unwrap();
        let last = content.lines().last().unwrap();
        assert!(last.starts_with(prefix), "{} ends with {last}", path.display());
    }
}

#[test]
fn test_estimate_json_contains_totals() {
    let temp_dir = tempfile::tempdir().unwrap();
    let writer = ReportWriter::new(temp_dir.path().join("nested/reports")).unwrap();
    let estimate = estimate();
    let paths = writer.write(&estimate).unwrap();

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&paths.estimate_json).unwrap()).unwrap();
    assert_eq!(json["schema_version"], 1);
    assert_eq!(json["meta"]["run_id"], estimate.meta.run_id.as_str());
    let tic = json["output"]["total_installed_cost"].as_f64().unwrap();
    assert!((tic - estimate.output.total_installed_cost).abs() < 1e-6);
    assert_eq!(json["input"]["settings"]["direct"]["piping"], 30.0);
    assert_eq!(json["output"]["installed"]["stage"], "installed");
}

#[test]
fn test_identical_inputs_share_run_directory() {
    let temp_dir = tempfile::tempdir().unwrap();
    let writer = ReportWriter::new(temp_dir.path()).unwrap();

    let first = writer.write(&estimate()).unwrap();
    let second = writer.write(&estimate()).unwrap();
    assert_eq!(first.run_dir, second.run_dir);
    assert_eq!(first.archive, second.archive);
    // run directory plus its archive
    assert_eq!(std::fs::read_dir(temp_dir.path()).unwrap().count(), 2);
}

#[test]
fn test_projects_with_identical_inputs_keep_separate_bundles() {
    let temp_dir = tempfile::tempdir().unwrap();
    let writer = ReportWriter::new(temp_dir.path()).unwrap();
    let settings = Settings::default_settings().unwrap();

    let plant_a = writer
        .write(&run_estimate("Plant A", 1000.0, &settings).unwrap())
        .unwrap();
    let plant_b = writer
        .write(&run_estimate("Plant B", 1000.0, &settings).unwrap())
        .unwrap();

    assert_ne!(plant_a.run_dir, plant_b.run_dir);
    let meta_a = std::fs::read_to_string(&plant_a.meta_input).unwrap();
    let meta_b = std::fs::read_to_string(&plant_b.meta_input).unwrap();
    assert!(meta_a.contains("Plant A"));
    assert!(meta_b.contains("Plant B"));
}

#[test]
fn test_zip_archive_holds_the_bundle() {
    let temp_dir = tempfile::tempdir().unwrap();
    let writer = ReportWriter::new(temp_dir.path()).unwrap();
    let estimate = estimate();
    let paths = writer.write(&estimate).unwrap();

    assert_eq!(
        paths.archive,
        temp_dir.path().join(format!("{}.zip", estimate.meta.run_id))
    );
    let file = std::fs::File::open(&paths.archive).unwrap();
    let mut archive = zip::ZipArchive::new(file).unwrap();

    let mut names: Vec<_> = archive.file_names().map(str::to_string).collect();
    names.sort();
    assert_eq!(
        names,
        [
            "direct_cost.csv",
            "epc_cost.csv",
            "estimate.json",
            "estimation_input.csv",
            "estimation_output.csv",
            "installed_cost.csv",
            "meta_input.csv",
        ]
    );

    let mut zipped = String::new();
    archive
        .by_name("installed_cost.csv")
        .unwrap()
        .read_to_string(&mut zipped)
        .unwrap();
    let on_disk = std::fs::read_to_string(&paths.installed_breakdown).unwrap();
    assert_eq!(zipped, on_disk);
    assert!(zipped.starts_with("category,percentage,amount_usd\nEPC Cost,-,"));
    assert!(zipped.trim_end().lines().last().unwrap().starts_with("Total Installed Cost,-,"));
}
