//! End-to-end tests: every income source through the engine and the report.

use std::path::PathBuf;

use itr_core::{AgeGroup, Regime, RegimeRules, TaxEngine, TaxpayerProfile, compute_tax};
use itr_data::{
    DocumentUpload, ExtractedFields, ExtractionError, aggregate, extract_fields,
    extract_with_patterns, income_csv, load_rules, parse_model_response, process_uploads, report,
    rules_from_toml_str,
};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

const INCOME_CSV: &str = include_str!("../test-data/income_fy2025.csv");
const FORM16_RESPONSE: &str = include_str!("../test-data/form16_response.txt");
const PAYSLIP_TEXT: &str = include_str!("../test-data/payslip_march.txt");
const RULES_TOML: &str = include_str!("../test-data/rules_fy2025.toml");

fn test_data(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("test-data")
        .join(name)
}

fn below_60() -> TaxpayerProfile {
    TaxpayerProfile::new(AgeGroup::Below60, "2025-26")
}

// =============================================================================
// Each source reproduces the reference comparison
// =============================================================================

#[test]
fn csv_source_gives_reference_comparison() {
    let inputs = income_csv::load_from_str(INCOME_CSV).expect("fixture CSV parses");

    let comparison = compute_tax(&inputs, &below_60()).unwrap();

    assert_eq!(comparison.gross_income, dec!(1200000));
    assert_eq!(comparison.old_regime.tax, dec!(117000));
    assert_eq!(comparison.new_regime.tax, dec!(54600));
    assert_eq!(comparison.recommended_regime, Regime::New);
    assert_eq!(comparison.savings, dec!(62400));
}

#[test]
fn model_response_source_gives_reference_comparison() {
    let fields = parse_model_response(FORM16_RESPONSE).expect("fixture response parses");
    assert_eq!(fields.summary, "Form 16 issued by employer for FY 2025-26");

    let comparison = compute_tax(&fields.into_inputs(), &below_60()).unwrap();

    assert_eq!(comparison.old_regime.tax, dec!(117000));
    assert_eq!(comparison.new_regime.tax, dec!(54600));
}

#[test]
fn pattern_source_gives_reference_comparison() {
    let fields = extract_with_patterns(PAYSLIP_TEXT, "Salary Slip");

    assert_eq!(fields.salary_components.len(), 3);
    assert_eq!(fields.deductions["section 80c"], dec!(100000));
    assert_eq!(fields.deductions["medical insurance"], dec!(50000));

    let comparison = compute_tax(&fields.into_inputs(), &below_60()).unwrap();

    assert_eq!(comparison.old_regime.tax, dec!(117000));
    assert_eq!(comparison.new_regime.tax, dec!(54600));
}

#[test]
fn unusable_model_response_falls_back_to_document_text() {
    let fields = extract_fields(PAYSLIP_TEXT, "I'm unable to read this scan.");

    assert_eq!(fields.salary_components["basic"], dec!(800000));
    assert_eq!(fields.summary, "I'm unable to read this scan.");
}

// =============================================================================
// Aggregation across documents
// =============================================================================

#[test]
fn later_document_overwrites_earlier_keys() {
    let csv_inputs = income_csv::load_from_str(INCOME_CSV).unwrap();
    let from_csv = ExtractedFields {
        salary_components: csv_inputs.salary_components,
        other_income: csv_inputs.other_income,
        deductions: csv_inputs.deductions,
        summary: String::new(),
    };
    let correction = parse_model_response(
        r#"{"salary_components": {"basic": 900000}, "other_income": {"fd interest": 40000}}"#,
    )
    .unwrap();

    let inputs = aggregate([&from_csv, &correction]).unwrap();

    assert_eq!(inputs.salary_components["basic"], dec!(900000));
    assert_eq!(inputs.salary_components["hra"], dec!(300000));
    assert_eq!(inputs.gross_income().unwrap(), dec!(1340000));
}

#[test]
fn malformed_response_is_skipped_and_the_rest_still_compare() {
    let uploads = [
        DocumentUpload {
            file_name: "bank_statement.pdf".to_string(),
            content: None,
            model_response: Some(r#"{"salary_components": {"basic": "#.to_string()),
        },
        DocumentUpload {
            file_name: "form16.pdf".to_string(),
            content: None,
            model_response: Some(FORM16_RESPONSE.to_string()),
        },
    ];

    let processed = process_uploads(&uploads);
    assert_eq!(processed.len(), 1);
    assert_eq!(processed[0].file_name, "form16.pdf");

    let inputs = aggregate(processed.iter().map(|document| &document.fields)).unwrap();
    let comparison = compute_tax(&inputs, &below_60()).unwrap();

    assert_eq!(comparison.old_regime.tax, dec!(117000));
    assert_eq!(comparison.new_regime.tax, dec!(54600));
}

#[test]
fn malformed_response_with_document_text_uses_the_text() {
    let uploads = [DocumentUpload {
        file_name: "payslip_march.txt".to_string(),
        content: Some(PAYSLIP_TEXT.to_string()),
        model_response: Some("not json at all".to_string()),
    }];

    let processed = process_uploads(&uploads);
    let inputs = aggregate(processed.iter().map(|document| &document.fields)).unwrap();

    assert_eq!(compute_tax(&inputs, &below_60()).unwrap().new_regime.tax, dec!(54600));
}

#[test]
fn only_malformed_responses_leave_nothing_to_aggregate() {
    let uploads = [DocumentUpload {
        file_name: "form16.pdf".to_string(),
        content: None,
        model_response: Some("{ broken".to_string()),
    }];

    let processed = process_uploads(&uploads);

    assert!(processed.is_empty());
    assert!(matches!(
        aggregate(processed.iter().map(|document| &document.fields)),
        Err(ExtractionError::NoDocuments)
    ));
}

// =============================================================================
// Rules files
// =============================================================================

#[test]
fn rules_fixture_matches_defaults() {
    let rules = rules_from_toml_str(RULES_TOML).unwrap();

    assert_eq!(rules, RegimeRules::default());
}

#[test]
fn rules_file_loads_from_disk() {
    let rules = load_rules(Some(test_data("rules_fy2025.toml").as_path())).unwrap();

    let engine = TaxEngine::new(rules).unwrap();
    let inputs = income_csv::load_from_file(&test_data("income_fy2025.csv")).unwrap();
    let comparison = engine.compute(&inputs, &below_60()).unwrap();

    assert_eq!(comparison.new_regime.tax, dec!(54600));
}

#[test]
fn rules_without_rebate_change_small_incomes() {
    let without_rebates = RULES_TOML.split("[[rebates]]").next().unwrap();
    let engine = TaxEngine::new(rules_from_toml_str(without_rebates).unwrap()).unwrap();
    let inputs = income_csv::load_from_str("category,name,amount\nsalary,basic,700000\n").unwrap();

    let with_rebate = compute_tax(&inputs, &below_60()).unwrap();
    let without_rebate = engine.compute(&inputs, &below_60()).unwrap();

    // new regime taxable 625000 -> slab tax 11250, fully rebated by default
    assert_eq!(with_rebate.new_regime.tax, dec!(0));
    assert_eq!(without_rebate.new_regime.slab_tax, dec!(11250));
    assert_eq!(without_rebate.new_regime.tax, dec!(11700));
}

// =============================================================================
// Age groups and reporting
// =============================================================================

#[test]
fn senior_pays_nothing_under_old_regime_at_ceiling() {
    let inputs =
        income_csv::load_from_str("category,name,amount\nsalary,pension,350000\n").unwrap();
    let profile = TaxpayerProfile::parse("senior", "2024-25").unwrap();

    let comparison = compute_tax(&inputs, &profile).unwrap();

    assert_eq!(comparison.old_regime.taxable_income, dec!(300000));
    assert_eq!(comparison.old_regime.tax, dec!(0));
    assert_eq!(comparison.new_regime.tax, dec!(0));
    assert_eq!(comparison.recommended_regime, Regime::Old);
}

#[test]
fn report_renders_csv_comparison() {
    let inputs = income_csv::load_from_str(INCOME_CSV).unwrap();
    let comparison = compute_tax(&inputs, &below_60()).unwrap();

    let text = report::render(&comparison);

    assert!(text.contains("Recommended: new regime (saves 62400.00)"), "{text}");
}

#[test]
fn comparison_serializes_to_json() {
    let inputs = income_csv::load_from_str(INCOME_CSV).unwrap();
    let comparison = compute_tax(&inputs, &below_60()).unwrap();

    let json: serde_json::Value = serde_json::to_value(&comparison).unwrap();

    assert_eq!(json["recommended_regime"], "new");
    let old_tax: Decimal = json["old_regime"]["tax"]
        .as_str()
        .expect("decimals serialize as strings")
        .parse()
        .unwrap();
    assert_eq!(old_tax, dec!(117000));
}
