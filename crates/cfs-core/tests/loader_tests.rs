#[cfg(feature = "xlsx")]
use cfs_core::dataset::cell::SignPolicy;
use cfs_core::dataset::grid::InputFormat;
use cfs_core::{load, load_companies, CfsError, LoaderOptions};
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;
#[cfg(feature = "xlsx")]
use rust_xlsxwriter::Workbook;

// ===========================================================================
// Helpers
// ===========================================================================

/// A workbook shaped like the published CFS list: a title row, a blank
/// spacer, the header row, then company rows mixing text and numbers.
#[cfg(feature = "xlsx")]
fn sample_workbook(sheet_name: &str) -> Vec<u8> {
    let mut workbook = Workbook::new();

    let notes = workbook.add_worksheet();
    notes.set_name("Notes").unwrap();
    notes.write_string(0, 0, "Company").unwrap();

    let sheet = workbook.add_worksheet();
    sheet.set_name(sheet_name).unwrap();
    sheet.write_string(0, 0, "CFS Universe — FY24").unwrap();

    let headers = ["Company", "5Y Sales  Mean", "5Y Mean ROE", "Current PE Ratio", "CFS Final"];
    for (col, h) in headers.iter().enumerate() {
        sheet.write_string(2, col as u16, *h).unwrap();
    }

    sheet.write_string(3, 0, "Acme Corp").unwrap();
    sheet.write_number(3, 1, 12.5).unwrap();
    sheet.write_string(3, 2, "18.2%").unwrap();
    sheet.write_number(3, 3, 22.0).unwrap();
    sheet.write_number(3, 4, 0.81).unwrap();

    sheet.write_string(4, 0, "Beta Industries").unwrap();
    sheet.write_string(4, 1, "1,050").unwrap();
    sheet.write_string(4, 2, "-3.5%").unwrap();
    sheet.write_number(4, 3, 9.5).unwrap();
    sheet.write_number(4, 4, 0.92).unwrap();

    // Row with only a stray note and no company: dropped.
    sheet.write_string(5, 2, "see notes").unwrap();

    sheet.write_string(6, 0, "Gamma Ltd").unwrap();
    sheet.write_string(6, 1, "-").unwrap();
    sheet.write_number(6, 4, 0.45).unwrap();

    workbook.save_to_buffer().unwrap()
}

// ===========================================================================
// Workbook loading
// ===========================================================================

#[cfg(feature = "xlsx")]
#[test]
fn test_workbook_loads_named_sheet() {
    let bytes = sample_workbook("Total Score");
    let ds = load(&bytes, &LoaderOptions::default()).unwrap();

    let names: Vec<&str> = ds.records.iter().map(|r| r.identifier.as_str()).collect();
    assert_eq!(names, vec!["Beta Industries", "Acme Corp", "Gamma Ltd"]);
    assert_eq!(
        ds.columns,
        vec![
            "5Y Sales Mean".to_string(),
            "5Y Mean ROE".to_string(),
            "Current PE Ratio".to_string()
        ]
    );
    assert_eq!(ds.final_score_column.as_deref(), Some("CFS Final"));
}

#[cfg(feature = "xlsx")]
#[test]
fn test_workbook_values_are_normalized() {
    let bytes = sample_workbook("Total Score");
    let ds = load(&bytes, &LoaderOptions::default()).unwrap();

    let acme = ds.records.iter().find(|r| r.identifier == "Acme Corp").unwrap();
    assert_eq!(acme.final_score, dec!(0.81));
    assert_eq!(acme.metric("5Y Sales Mean"), Some(dec!(12.5)));
    assert_eq!(acme.metric("5Y Mean ROE"), Some(dec!(18.2)));

    let beta = ds.records.iter().find(|r| r.identifier == "Beta Industries").unwrap();
    assert_eq!(beta.metric("5Y Sales Mean"), Some(dec!(1050)));
    // Default policy drops the minus sign.
    assert_eq!(beta.metric("5Y Mean ROE"), Some(dec!(3.5)));

    let gamma = ds.records.iter().find(|r| r.identifier == "Gamma Ltd").unwrap();
    assert_eq!(gamma.metric("5Y Sales Mean"), Some(dec!(0)));
    assert_eq!(gamma.metric("Current PE Ratio"), Some(dec!(0)));
}

#[cfg(feature = "xlsx")]
#[test]
fn test_workbook_preserve_sign_policy() {
    let bytes = sample_workbook("Total Score");
    let opts = LoaderOptions {
        sign_policy: SignPolicy::Preserve,
        ..LoaderOptions::default()
    };
    let ds = load(&bytes, &opts).unwrap();
    let beta = ds.records.iter().find(|r| r.identifier == "Beta Industries").unwrap();
    assert_eq!(beta.metric("5Y Mean ROE"), Some(dec!(-3.5)));
}

#[cfg(feature = "xlsx")]
#[test]
fn test_workbook_missing_sheet() {
    let bytes = sample_workbook("Scores");
    let err = load(&bytes, &LoaderOptions::default()).unwrap_err();
    match err {
        CfsError::SheetNotFound { sheet, available } => {
            assert_eq!(sheet, "Total Score");
            assert_eq!(available, vec!["Notes".to_string(), "Scores".to_string()]);
        }
        other => panic!("expected SheetNotFound, got {other:?}"),
    }
}

#[cfg(feature = "xlsx")]
#[test]
fn test_workbook_custom_sheet_name() {
    let bytes = sample_workbook("Scores");
    let opts = LoaderOptions {
        sheet_name: "Scores".into(),
        ..LoaderOptions::default()
    };
    let ds = load(&bytes, &opts).unwrap();
    assert_eq!(ds.len(), 3);
}

#[cfg(feature = "xlsx")]
#[test]
fn test_workbook_failure_degrades_to_empty_dataset() {
    let bytes = sample_workbook("Scores");
    let outcome = load_companies(&bytes, &LoaderOptions::default());
    assert!(outcome.dataset.is_empty());
    assert!(matches!(outcome.error, Some(CfsError::SheetNotFound { .. })));
}

#[cfg(feature = "xlsx")]
#[test]
fn test_truncated_workbook_is_malformed() {
    let bytes = sample_workbook("Total Score");
    let truncated = &bytes[..bytes.len() / 3];
    let outcome = load_companies(truncated, &LoaderOptions::default());
    assert!(outcome.dataset.is_empty());
    assert!(matches!(
        outcome.error,
        Some(CfsError::EmptyOrMalformedInput(_))
    ));
}

// ===========================================================================
// Delimited text
// ===========================================================================

#[test]
fn test_csv_with_title_block() {
    let csv = "\
CFS list,,
,,
Company,5Y Mean ROA,Total Score
Delta,4.1,0.66
Echo,\"2,000\",0.71
,,
";
    let ds = load(csv.as_bytes(), &LoaderOptions::default()).unwrap();
    assert_eq!(ds.len(), 2);
    assert_eq!(ds.records[0].identifier, "Echo");
    assert_eq!(ds.records[0].metric("5Y Mean ROA"), Some(dec!(2000)));
    assert_eq!(ds.final_score_column.as_deref(), Some("Total Score"));
}

#[test]
fn test_tsv_with_explicit_format() {
    let tsv = "Company\tROE\tCFS\nFoxtrot\t12\t0.3\n";
    let opts = LoaderOptions {
        format: InputFormat::Csv,
        delimiter: '\t',
        ..LoaderOptions::default()
    };
    let ds = load(tsv.as_bytes(), &opts).unwrap();
    assert_eq!(ds.records[0].metric("ROE"), Some(dec!(12)));
}

#[test]
fn test_empty_bytes() {
    let outcome = load_companies(b"", &LoaderOptions::default());
    assert!(matches!(
        outcome.error,
        Some(CfsError::EmptyOrMalformedInput(_))
    ));
}

#[test]
fn test_ranking_is_non_increasing() {
    let mut csv = String::from("Company,CFS\n");
    for (i, score) in ["0.3", "0.9", "0.1", "0.9", "0.55", "n/a", "0.72"].iter().enumerate() {
        csv.push_str(&format!("C{i},{score}\n"));
    }
    let ds = load(csv.as_bytes(), &LoaderOptions::default()).unwrap();
    assert!(ds
        .records
        .windows(2)
        .all(|w| w[0].final_score >= w[1].final_score));
    // Equal scores keep sheet order.
    assert_eq!(ds.records[0].identifier, "C1");
    assert_eq!(ds.records[1].identifier, "C3");
}
