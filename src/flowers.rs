use log::{debug, info, warn};

use flower_ranking::*;
use snafu::prelude::*;

use std::path::{Path, PathBuf};

use serde_json::json;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::Args;
use crate::flowers::config_reader::*;
use crate::flowers::io_common::*;

pub mod config_reader;
pub mod io_common;
pub mod io_csv;
pub mod io_export;
pub mod io_xlsx;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum FlowerError {
    #[snafu(display("Error opening file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("The file {path} has no worksheet or no header row"))]
    EmptyExcel { path: String },
    #[snafu(display("The worksheet {name:?} could not be found in {path}"))]
    MissingWorksheet { name: String, path: String },
    #[snafu(display("Unexpected cell in {path} at row {lineno}: {content}"))]
    ExcelWrongCellType {
        path: String,
        lineno: usize,
        content: String,
    },
    #[snafu(display("Error opening CSV file {path}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display("Error parsing line {lineno} of {path}"))]
    CsvLineParse {
        source: csv::Error,
        path: String,
        lineno: usize,
    },
    #[snafu(display("Error writing {path}"))]
    CsvWrite { source: csv::Error, path: String },
    #[snafu(display("Error opening JSON file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Error writing {path}"))]
    WritingOutput {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Cannot determine the type of the input {path:?}, use --input-type"))]
    UnknownInputType { path: String },
    #[snafu(display("No {what} was provided, use the command line or the configuration file"))]
    MissingInput { what: String },
    #[snafu(display("The configuration file {path} has no parent directory"))]
    MissingParentDir { path: String },
    #[snafu(display("{source}"))]
    Schema { source: SchemaError },
    #[snafu(display("{source}"))]
    InvalidRules { source: RulesError },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type FlowerResult<T> = Result<T, FlowerError>;

/// Everything needed for one run, after merging the command line and the configuration file.
#[derive(PartialEq, Debug, Clone)]
pub struct RunSettings {
    pub grants_path: String,
    pub grants_type: InputType,
    pub roster_path: String,
    pub roster_type: InputType,
    pub grants_worksheet: Option<String>,
    pub roster_worksheet: Option<String>,
    pub names: SchemaNames,
    pub weight_rules: WeightRules,
    pub report_rules: ReportRules,
    pub out_dir: Option<PathBuf>,
    pub reference: Option<String>,
}

pub fn settings_from_args(args: &Args) -> FlowerResult<RunSettings> {
    let (config, root_p) = match &args.config {
        Some(config_path) => {
            let config = read_config(config_path)?;
            info!("config: {:?}", config);
            let root_p = Path::new(config_path)
                .parent()
                .context(MissingParentDirSnafu {
                    path: config_path.clone(),
                })?
                .to_path_buf();
            (config, root_p)
        }
        None => (FlowerConfig::default(), PathBuf::new()),
    };
    let inputs = config.inputs.clone().unwrap_or_default();
    let rules = config.rules.clone().unwrap_or_default();

    // The paths from the command line are taken as they are, the paths from the
    // configuration are relative to the configuration file.
    let grants_path = match (&args.grants, &inputs.grants_file_path) {
        (Some(p), _) => p.clone(),
        (None, Some(p)) => resolve_path(&root_p, p),
        (None, None) => {
            return MissingInputSnafu { what: "grant log" }.fail();
        }
    };
    let roster_path = match (&args.roster, &inputs.roster_file_path) {
        (Some(p), _) => p.clone(),
        (None, Some(p)) => resolve_path(&root_p, p),
        (None, None) => {
            return MissingInputSnafu { what: "roster" }.fail();
        }
    };

    let forced_type = args.input_type.clone().or(inputs.provider.clone());
    let grants_type = input_type(&grants_path, forced_type.as_deref())?;
    let roster_type = input_type(&roster_path, forced_type.as_deref())?;

    let weight = args.weight.or(rules.same_org_weight).unwrap_or(1.0);
    let weight_rules = WeightRules::with_labels(
        weight,
        rules.hq_label.as_deref().unwrap_or(DEFAULT_HQ_LABEL),
        rules.city_label.as_deref().unwrap_or(DEFAULT_CITY_LABEL),
    )
    .context(InvalidRulesSnafu {})?;

    let default_report = ReportRules::default();
    let report_rules = ReportRules::new(
        rules
            .minimum_amount
            .unwrap_or_else(|| default_report.minimum_amount.as_f64()),
        rules.amount_unit.as_deref().unwrap_or(&default_report.unit),
    )
    .context(InvalidRulesSnafu {})?;

    // The command line comes first, then the worksheet of each input, then the shared one.
    let grants_worksheet = args
        .grants_worksheet_name
        .clone()
        .or(args.excel_worksheet_name.clone())
        .or(inputs.grants_worksheet_name.clone())
        .or(inputs.excel_worksheet_name.clone());
    let roster_worksheet = args
        .roster_worksheet_name
        .clone()
        .or(args.excel_worksheet_name.clone())
        .or(inputs.roster_worksheet_name.clone())
        .or(inputs.excel_worksheet_name.clone());

    let out_dir = match (&args.out, config.output_settings.as_ref()) {
        (Some(o), _) => Some(PathBuf::from(o)),
        (
            None,
            Some(OutputSettings {
                output_directory: Some(o),
                ..
            }),
        ) => Some(root_p.join(o)),
        _ => None,
    };

    Ok(RunSettings {
        grants_path,
        grants_type,
        roster_path,
        roster_type,
        grants_worksheet,
        roster_worksheet,
        names: config
            .columns
            .map(|c| c.schema_names())
            .unwrap_or_default(),
        weight_rules,
        report_rules,
        out_dir,
        reference: args.reference.clone(),
    })
}

fn read_table(path: &str, input: InputType, worksheet: Option<&str>) -> FlowerResult<Table> {
    info!(
        "Attempting to read {:?} ({:?})",
        simplify_file_name(path),
        input
    );
    let table = match input {
        InputType::Csv => io_csv::read_csv_table(path)?,
        InputType::Xlsx => io_xlsx::read_xlsx_table(path, worksheet)?,
    };
    debug!(
        "read_table: {:?}: columns: {:?}, {} rows",
        path,
        table.columns,
        table.rows.len()
    );
    Ok(table)
}

fn report_rows_to_json(rows: &[ReportRow]) -> Vec<JSValue> {
    rows.iter()
        .map(|row| {
            json!({
                "totalAmount": row.total_amount.to_string(),
                "amountLabel": row.amount_label,
                "recipients": row.recipient_text,
            })
        })
        .collect()
}

fn build_report_js(settings: &RunSettings, output: &PipelineOutput) -> JSValue {
    let c = RulesSummary {
        same_org_weight: settings.weight_rules.weight(),
        hq_label: settings.weight_rules.hq_label.clone(),
        city_label: settings.weight_rules.city_label.clone(),
        minimum_amount: settings.report_rules.minimum_amount.to_string(),
        amount_unit: settings.report_rules.unit.clone(),
    };
    json!({
        "config": c,
        "receivers": output.summary.len(),
        "results": report_rows_to_json(&output.report) })
}

/// Reads the inputs, runs the pipeline and writes the outputs.
pub fn run_flowers(settings: &RunSettings) -> FlowerResult<PipelineOutput> {
    let grants = read_table(
        &settings.grants_path,
        settings.grants_type,
        settings.grants_worksheet.as_deref(),
    )?;
    let roster = read_table(
        &settings.roster_path,
        settings.roster_type,
        settings.roster_worksheet.as_deref(),
    )?;

    let output = run_pipeline(
        &grants,
        &roster,
        &settings.names,
        &settings.weight_rules,
        &settings.report_rules,
    )
    .context(SchemaSnafu {})?;

    for row in output.report.iter() {
        info!("{}  {}", row.amount_label, row.recipient_text);
    }

    let result_js = build_report_js(settings, &output);
    let pretty_js_report = serde_json::to_string_pretty(&result_js).context(ParsingJsonSnafu {})?;

    if let Some(out_dir) = &settings.out_dir {
        io_export::write_all(out_dir, &grants.columns, &output, &pretty_js_report)?;
    } else {
        println!("report:{}", pretty_js_report);
    }

    // The reference report, if provided for comparison
    if let Some(reference_p) = &settings.reference {
        let report_ref = read_reference(reference_p)?;
        let pretty_js_report_ref =
            serde_json::to_string_pretty(&report_ref).context(ParsingJsonSnafu {})?;
        if pretty_js_report_ref != pretty_js_report {
            warn!("Found differences with the reference report");
            print_diff(
                pretty_js_report_ref.as_str(),
                pretty_js_report.as_str(),
                "\n",
            );
            whatever!("Difference detected between calculated report and reference report")
        }
    }

    Ok(output)
}

pub fn run_from_args(args: &Args) -> FlowerResult<()> {
    let settings = settings_from_args(args)?;
    debug!("settings: {:?}", settings);
    run_flowers(&settings)?;
    Ok(())
}

#[cfg(test)]
fn run_flowers_test(test_name: &str, config_lpath: &str, report_lpath: &str) -> FlowerResult<()> {
    let test_dir = option_env!("FLOWERS_TEST_DIR")
        .unwrap_or(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/data"));
    info!("Running test {}", test_name);
    let args = Args {
        config: Some(format!("{}/{}/{}", test_dir, test_name, config_lpath)),
        reference: Some(format!("{}/{}/{}", test_dir, test_name, report_lpath)),
        ..Args::default()
    };
    run_from_args(&args)
}

#[cfg(test)]
pub fn test_wrapper(test_name: &str) -> FlowerResult<()> {
    run_flowers_test(
        test_name,
        format!("{}_config.json", test_name).as_str(),
        format!("{}_expected_report.json", test_name).as_str(),
    )
}

#[cfg(test)]
mod tests {

    use super::*;
    use std::fs;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn check(test_name: &str) {
        init();
        let res = test_wrapper(test_name);
        if let Err(e) = &res {
            eprintln!("An error occured {}", e);
        }
        assert!(res.is_ok());
    }

    #[test]
    fn hq_weighted() {
        check("hq_weighted");
    }

    #[test]
    fn city_departments() {
        check("city_departments");
    }

    #[test]
    fn localized_headers() {
        check("localized_headers");
    }

    #[test]
    fn missing_columns() {
        init();
        let res = test_wrapper("missing_columns");
        match res {
            Err(FlowerError::Schema { source }) => {
                assert_eq!(
                    source.to_string(),
                    "grant table is missing required columns: sender_id"
                );
            }
            x => panic!("expected a schema error, got {:?}", x),
        }
    }

    #[test]
    fn command_line_overrides_the_configuration() {
        let test_dir = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/data/hq_weighted");
        let args = Args {
            config: Some(format!("{}/hq_weighted_config.json", test_dir)),
            weight: Some(0.0),
            roster: Some("other_roster.csv".to_string()),
            ..Args::default()
        };
        let settings = settings_from_args(&args).unwrap();
        assert_eq!(settings.weight_rules.weight(), 0.0);
        assert_eq!(settings.weight_rules.hq_label, "HQ");
        assert_eq!(settings.roster_path, "other_roster.csv");
        assert_eq!(settings.grants_path, format!("{}/grants.csv", test_dir));
        assert_eq!(settings.grants_type, InputType::Csv);
        assert_eq!(settings.out_dir, None);
    }

    #[test]
    fn worksheets_are_chosen_per_input() {
        let config_path = std::env::temp_dir().join(format!(
            "flowerboard-worksheets-{}.json",
            std::process::id()
        ));
        fs::write(
            &config_path,
            r#"{"inputs": {
                "grantsFilePath": "grants.xlsx",
                "rosterFilePath": "roster.xlsx",
                "excelWorksheetName": "Sheet1",
                "rosterWorksheetName": "员工"
            }}"#,
        )
        .unwrap();
        let mut args = Args {
            config: Some(config_path.display().to_string()),
            ..Args::default()
        };
        let settings = settings_from_args(&args).unwrap();
        assert_eq!(settings.grants_worksheet.as_deref(), Some("Sheet1"));
        assert_eq!(settings.roster_worksheet.as_deref(), Some("员工"));

        args.grants_worksheet_name = Some("导出".to_string());
        let settings = settings_from_args(&args).unwrap();
        let _ = fs::remove_file(&config_path);
        assert_eq!(settings.grants_worksheet.as_deref(), Some("导出"));
        assert_eq!(settings.roster_worksheet.as_deref(), Some("员工"));
    }

    #[test]
    fn long_grant_rows_are_exported() {
        init();
        let dir = std::env::temp_dir().join(format!("flowerboard-long-rows-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let grants_p = dir.join("grants.csv");
        let roster_p = dir.join("roster.csv");
        fs::write(&grants_p, "sender_id,receiver_id\nE2,E1,extra note\nE2,E1\n").unwrap();
        fs::write(
            &roster_p,
            "employee_id,top_org,third_org,fourth_org,display_name\nE1,HQ,A,A1,Alice\nE2,HQ,B,B1,Bob\n",
        )
        .unwrap();
        let out_dir = dir.join("out");
        let args = Args {
            grants: Some(grants_p.display().to_string()),
            roster: Some(roster_p.display().to_string()),
            out: Some(out_dir.display().to_string()),
            ..Args::default()
        };
        let res = run_from_args(&args);
        let enriched = fs::read_to_string(out_dir.join(io_export::ENRICHED_CSV));
        let _ = fs::remove_dir_all(&dir);
        assert!(res.is_ok(), "{:?}", res);
        let enriched = enriched.unwrap();
        let lines: Vec<&str> = enriched.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("E2,E1,HQ,A,A1,Alice,HQ,B,B1,"));
        assert_eq!(lines[1].split(',').count(), lines[0].split(',').count());
    }

    #[test]
    fn out_of_range_weight_is_rejected() {
        let args = Args {
            grants: Some("grants.csv".to_string()),
            roster: Some("roster.xlsx".to_string()),
            weight: Some(2.0),
            ..Args::default()
        };
        assert!(matches!(
            settings_from_args(&args),
            Err(FlowerError::InvalidRules { .. })
        ));
    }

    #[test]
    fn inputs_are_required() {
        let args = Args {
            grants: Some("grants.csv".to_string()),
            ..Args::default()
        };
        let err = settings_from_args(&args).unwrap_err();
        assert_eq!(
            err.to_string(),
            "No roster was provided, use the command line or the configuration file"
        );
    }

    #[test]
    fn writes_the_three_tables() {
        init();
        let test_dir = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/data/hq_weighted");
        let out_dir = std::env::temp_dir().join(format!("flowerboard-test-{}", std::process::id()));
        let args = Args {
            config: Some(format!("{}/hq_weighted_config.json", test_dir)),
            out: Some(out_dir.display().to_string()),
            ..Args::default()
        };
        run_from_args(&args).unwrap();
        let report = fs::read_to_string(out_dir.join(io_export::REPORT_CSV)).unwrap();
        assert_eq!(
            report.lines().next(),
            Some("total_amount,amount_label,recipient_text")
        );
        let summary = fs::read_to_string(out_dir.join(io_export::SUMMARY_CSV)).unwrap();
        assert_eq!(summary.lines().count(), 5);
        let enriched = fs::read_to_string(out_dir.join(io_export::ENRICHED_CSV)).unwrap();
        assert!(enriched
            .lines()
            .next()
            .unwrap()
            .ends_with("sender_fourth_org,effective_weight"));
        assert!(out_dir.join(io_export::REPORT_JSON).exists());
        let _ = fs::remove_dir_all(out_dir);
    }
}
