use crate::flowers::*;

use serde::{Deserialize, Serialize};
use std::fs;

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(rename = "outputDirectory")]
    pub output_directory: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct InputSources {
    #[serde(rename = "grantsFilePath")]
    pub grants_file_path: Option<String>,
    #[serde(rename = "rosterFilePath")]
    pub roster_file_path: Option<String>,
    pub provider: Option<String>,
    #[serde(rename = "excelWorksheetName")]
    pub excel_worksheet_name: Option<String>,
    #[serde(rename = "grantsWorksheetName")]
    pub grants_worksheet_name: Option<String>,
    #[serde(rename = "rosterWorksheetName")]
    pub roster_worksheet_name: Option<String>,
}

#[derive(PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct FlowerRules {
    #[serde(rename = "sameOrgWeight")]
    pub same_org_weight: Option<f64>,
    #[serde(rename = "hqLabel")]
    pub hq_label: Option<String>,
    #[serde(rename = "cityLabel")]
    pub city_label: Option<String>,
    #[serde(rename = "minimumAmount")]
    pub minimum_amount: Option<f64>,
    #[serde(rename = "amountUnit")]
    pub amount_unit: Option<String>,
}

/// The headers of the input tables, when they differ from the default names.
#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct ColumnLabels {
    #[serde(rename = "receiverId")]
    pub receiver_id: Option<String>,
    #[serde(rename = "senderId")]
    pub sender_id: Option<String>,
    #[serde(rename = "employeeId")]
    pub employee_id: Option<String>,
    #[serde(rename = "topOrg")]
    pub top_org: Option<String>,
    #[serde(rename = "thirdOrg")]
    pub third_org: Option<String>,
    #[serde(rename = "fourthOrg")]
    pub fourth_org: Option<String>,
    #[serde(rename = "displayName")]
    pub display_name: Option<String>,
    pub nickname: Option<String>,
}

impl ColumnLabels {
    pub fn schema_names(&self) -> SchemaNames {
        let mut names = SchemaNames::default();
        let overrides: [(&Option<String>, &mut String); 8] = [
            (&self.receiver_id, &mut names.grants.receiver_id),
            (&self.sender_id, &mut names.grants.sender_id),
            (&self.employee_id, &mut names.roster.employee_id),
            (&self.top_org, &mut names.roster.top_org),
            (&self.third_org, &mut names.roster.third_org),
            (&self.fourth_org, &mut names.roster.fourth_org),
            (&self.display_name, &mut names.roster.display_name),
            (&self.nickname, &mut names.roster.nickname),
        ];
        for (label, name) in overrides {
            if let Some(l) = label {
                *name = l.clone();
            }
        }
        names
    }
}

#[derive(PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct FlowerConfig {
    #[serde(rename = "outputSettings")]
    pub output_settings: Option<OutputSettings>,
    pub inputs: Option<InputSources>,
    pub rules: Option<FlowerRules>,
    pub columns: Option<ColumnLabels>,
}

/// The rules of a run, as written at the top of the JSON report.
#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct RulesSummary {
    #[serde(rename = "sameOrgWeight")]
    pub same_org_weight: f64,
    #[serde(rename = "hqLabel")]
    pub hq_label: String,
    #[serde(rename = "cityLabel")]
    pub city_label: String,
    #[serde(rename = "minimumAmount")]
    pub minimum_amount: String,
    #[serde(rename = "amountUnit")]
    pub amount_unit: String,
}

pub fn parse_config(contents: &str) -> FlowerResult<FlowerConfig> {
    serde_json::from_str(contents).context(ParsingJsonSnafu {})
}

pub fn read_config(path: &str) -> FlowerResult<FlowerConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    parse_config(&contents)
}

pub fn read_reference(path: &str) -> FlowerResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    debug!("read_reference: {:?}", js);
    Ok(js)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_sections_but_inputs_are_optional() {
        let config = parse_config(r#"{"inputs": {"grantsFilePath": "g.xlsx"}}"#).unwrap();
        assert_eq!(config.rules, None);
        assert_eq!(
            config.inputs.unwrap().grants_file_path,
            Some("g.xlsx".to_string())
        );
    }

    #[test]
    fn column_labels_override_the_defaults() {
        let config = parse_config(
            r#"{
                "rules": {"sameOrgWeight": 0.3},
                "columns": {"receiverId": "收花人系统号", "nickname": "花名"}
            }"#,
        )
        .unwrap();
        assert_eq!(config.rules.unwrap().same_org_weight, Some(0.3));
        let names = config.columns.unwrap().schema_names();
        assert_eq!(names.grants.receiver_id, "收花人系统号");
        assert_eq!(names.grants.sender_id, "sender_id");
        assert_eq!(names.roster.nickname, "花名");
    }

    #[test]
    fn malformed_config_is_an_error() {
        assert!(matches!(
            parse_config(r#"{"rules": {"sameOrgWeight": "half"}}"#),
            Err(FlowerError::ParsingJson { .. })
        ));
    }
}
