// ********* Input data structures ***********

use snafu::prelude::*;
use std::fmt::Display;

/// An in-memory table, as handed over by the readers.
///
/// The first element of each row corresponds to the first column of the header.
/// Rows may be shorter than the header: the missing cells read as empty strings.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(columns: &[&str]) -> Table {
        Table {
            columns: columns.iter().map(|s| s.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: &[&str]) {
        self.rows.push(row.iter().map(|s| s.to_string()).collect());
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub(crate) fn cell(row: &[String], col: usize) -> String {
        row.get(col).map(|s| s.trim().to_string()).unwrap_or_default()
    }
}

/// The names of the columns of the grant log.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct GrantColumns {
    pub receiver_id: String,
    pub sender_id: String,
}

/// The names of the columns of the roster.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct RosterColumns {
    pub employee_id: String,
    pub top_org: String,
    pub third_org: String,
    pub fourth_org: String,
    pub display_name: String,
    /// Optional in the input: when the column is absent, nobody has a nickname.
    pub nickname: String,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct SchemaNames {
    pub grants: GrantColumns,
    pub roster: RosterColumns,
}

impl Default for SchemaNames {
    fn default() -> Self {
        SchemaNames {
            grants: GrantColumns {
                receiver_id: "receiver_id".to_string(),
                sender_id: "sender_id".to_string(),
            },
            roster: RosterColumns {
                employee_id: "employee_id".to_string(),
                top_org: "top_org".to_string(),
                third_org: "third_org".to_string(),
                fourth_org: "fourth_org".to_string(),
                display_name: "display_name".to_string(),
                nickname: "nickname".to_string(),
            },
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum TableKind {
    Grants,
    Roster,
}

impl Display for TableKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TableKind::Grants => write!(f, "grant"),
            TableKind::Roster => write!(f, "roster"),
        }
    }
}

/// The placement of an employee in the organization.
#[derive(Eq, PartialEq, Debug, Clone, Default, Hash)]
pub struct OrgPlacement {
    pub top_org: String,
    pub third_org: String,
    pub fourth_org: String,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct EmployeeRecord {
    pub employee_id: String,
    pub org: OrgPlacement,
    pub display_name: String,
    /// Empty when the employee has no nickname.
    pub nickname: String,
}

impl EmployeeRecord {
    /// The name as printed in the announcements: `name` or `name（nickname）`.
    pub fn label(&self) -> String {
        display_label(&self.display_name, &self.nickname)
    }
}

pub(crate) fn display_label(name: &str, nickname: &str) -> String {
    if nickname.is_empty() {
        name.to_string()
    } else {
        format!("{}（{}）", name, nickname)
    }
}

/// One row of the grant log.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct GrantRecord {
    pub sender_id: String,
    pub receiver_id: String,
    /// All the cells of the original row, aligned with `GrantLog::columns`.
    pub cells: Vec<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct GrantLog {
    pub columns: Vec<String>,
    pub grants: Vec<GrantRecord>,
}

#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct Roster {
    pub employees: Vec<EmployeeRecord>,
}

// ******** Output data structures *********

/// A grant with the organization of both parties attached.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct EnrichedRecord {
    pub grant: GrantRecord,
    pub receiver: OrgPlacement,
    pub receiver_name: String,
    pub receiver_nickname: String,
    /// None when the sender is not in the roster.
    pub sender: Option<OrgPlacement>,
}

impl EnrichedRecord {
    pub fn receiver_label(&self) -> String {
        display_label(&self.receiver_name, &self.receiver_nickname)
    }

    /// The organization of the sender, empty when the sender is unknown.
    pub fn sender_org(&self) -> OrgPlacement {
        self.sender.clone().unwrap_or_default()
    }
}

#[derive(PartialEq, Debug, Clone)]
pub struct EffectiveGrant {
    pub record: EnrichedRecord,
    pub effective_weight: f64,
}

/// A number of flowers, counted in tenths of a flower.
///
/// All the totals are rounded to one decimal place, which makes it possible to
/// group and compare them exactly.
#[derive(Eq, PartialEq, Debug, Clone, Copy, PartialOrd, Ord, Hash, Default)]
pub struct Amount(i64);

impl Amount {
    pub fn from_tenths(tenths: i64) -> Amount {
        Amount(tenths)
    }

    /// Rounds to one decimal place, ties to even (`2.25 -> 2.2`, `2.35 -> 2.4`),
    /// the same as the usual dataframe rounding on the scaled value.
    pub fn round_from(value: f64) -> Amount {
        Amount((value * 10.0).round_ties_even() as i64)
    }

    pub fn tenths(&self) -> i64 {
        self.0
    }

    pub fn as_f64(&self) -> f64 {
        self.0 as f64 / 10.0
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.1}", self.as_f64())
    }
}

/// The leaderboard entry of one receiver.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct SummaryRecord {
    pub receiver_id: String,
    pub org: OrgPlacement,
    pub display_name: String,
    pub nickname: String,
    pub total_amount: Amount,
}

impl SummaryRecord {
    pub fn label(&self) -> String {
        display_label(&self.display_name, &self.nickname)
    }
}

/// One award tier of the announcement.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ReportRow {
    pub total_amount: Amount,
    pub amount_label: String,
    pub recipient_text: String,
}

// ********* Errors **********

#[derive(Debug, Snafu, PartialEq, Eq, Clone)]
#[snafu(visibility(pub(crate)))]
pub enum SchemaError {
    #[snafu(display("{table} table is missing required columns: {}", missing.join(", ")))]
    MissingColumns {
        table: TableKind,
        missing: Vec<String>,
    },
}

#[derive(Debug, Snafu, PartialEq, Clone)]
#[snafu(visibility(pub(crate)))]
pub enum RulesError {
    #[snafu(display("the same-organization weight must be between 0.0 and 1.0, got {weight}"))]
    InvalidWeight { weight: f64 },
    #[snafu(display("the minimum amount may not be negative, got {amount}"))]
    NegativeMinimum { amount: f64 },
}

// ********* Configuration **********

/// The top-level organization of the headquarters in the original roster.
pub const DEFAULT_HQ_LABEL: &str = "贝好家总部";
/// The top-level organization of the city branches in the original roster.
pub const DEFAULT_CITY_LABEL: &str = "贝好家城市";

/// How much a grant between two members of the same organization is worth.
///
/// - Headquarters: a grant inside the same third-level org (center) counts `weight`.
/// - City: a grant inside the same third- and fourth-level org (department) counts `weight`.
/// - Everything else counts one full flower.
#[derive(PartialEq, Debug, Clone)]
pub struct WeightRules {
    weight: f64,
    pub hq_label: String,
    pub city_label: String,
}

impl WeightRules {
    pub fn new(weight: f64) -> Result<WeightRules, RulesError> {
        WeightRules::with_labels(weight, DEFAULT_HQ_LABEL, DEFAULT_CITY_LABEL)
    }

    pub fn with_labels(
        weight: f64,
        hq_label: &str,
        city_label: &str,
    ) -> Result<WeightRules, RulesError> {
        ensure!(
            weight.is_finite() && (0.0..=1.0).contains(&weight),
            InvalidWeightSnafu { weight }
        );
        Ok(WeightRules {
            weight,
            hq_label: hq_label.to_string(),
            city_label: city_label.to_string(),
        })
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }
}

impl Default for WeightRules {
    fn default() -> Self {
        WeightRules {
            weight: 1.0,
            hq_label: DEFAULT_HQ_LABEL.to_string(),
            city_label: DEFAULT_CITY_LABEL.to_string(),
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ReportRules {
    /// Receivers below this amount are left out of the announcement.
    pub minimum_amount: Amount,
    /// Appended to the amount in the label.
    pub unit: String,
}

impl ReportRules {
    pub fn new(minimum_amount: f64, unit: &str) -> Result<ReportRules, RulesError> {
        ensure!(
            minimum_amount.is_finite() && minimum_amount >= 0.0,
            NegativeMinimumSnafu {
                amount: minimum_amount
            }
        );
        Ok(ReportRules {
            minimum_amount: Amount::round_from(minimum_amount),
            unit: unit.to_string(),
        })
    }
}

impl Default for ReportRules {
    fn default() -> Self {
        ReportRules {
            minimum_amount: Amount::from_tenths(30),
            unit: "flowers".to_string(),
        }
    }
}
