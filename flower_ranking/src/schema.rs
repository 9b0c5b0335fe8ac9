//! Column checks and conversion of the raw tables into records.

use log::{debug, warn};
use snafu::prelude::*;
use std::collections::HashSet;

use crate::config::*;

/// Checks that both tables carry the columns the pipeline needs.
///
/// The grant table is checked first. Nothing in the rows is looked at.
pub fn validate(grants: &Table, roster: &Table, names: &SchemaNames) -> Result<(), SchemaError> {
    check_columns(
        grants,
        TableKind::Grants,
        &[&names.grants.receiver_id, &names.grants.sender_id],
    )?;
    check_columns(
        roster,
        TableKind::Roster,
        &[
            &names.roster.employee_id,
            &names.roster.top_org,
            &names.roster.third_org,
            &names.roster.fourth_org,
            &names.roster.display_name,
        ],
    )
}

fn check_columns(table: &Table, kind: TableKind, required: &[&String]) -> Result<(), SchemaError> {
    let present: HashSet<&str> = table.columns.iter().map(|s| s.as_str()).collect();
    let missing: Vec<String> = required
        .iter()
        .filter(|c| !present.contains(c.as_str()))
        .map(|c| c.to_string())
        .collect();
    debug!("check_columns: {} table, missing: {:?}", kind, missing);
    ensure!(
        missing.is_empty(),
        MissingColumnsSnafu {
            table: kind,
            missing
        }
    );
    Ok(())
}

fn require_index(table: &Table, kind: TableKind, name: &str) -> Result<usize, SchemaError> {
    table.column_index(name).context(MissingColumnsSnafu {
        table: kind,
        missing: vec![name.to_string()],
    })
}

impl GrantLog {
    pub fn from_table(table: &Table, names: &SchemaNames) -> Result<GrantLog, SchemaError> {
        let receiver_idx = require_index(table, TableKind::Grants, &names.grants.receiver_id)?;
        let sender_idx = require_index(table, TableKind::Grants, &names.grants.sender_id)?;

        let grants: Vec<GrantRecord> = table
            .rows
            .iter()
            .map(|row| {
                let mut cells = row.clone();
                // The passthrough cells are the ones named by the header: short rows are
                // padded, cells past the last column are dropped.
                if cells.len() > table.columns.len() {
                    debug!(
                        "GrantLog::from_table: dropping {} cells past the header",
                        cells.len() - table.columns.len()
                    );
                }
                cells.resize(table.columns.len(), String::new());
                GrantRecord {
                    receiver_id: Table::cell(row, receiver_idx),
                    sender_id: Table::cell(row, sender_idx),
                    cells,
                }
            })
            .collect();
        debug!("GrantLog::from_table: {} grants", grants.len());
        Ok(GrantLog {
            columns: table.columns.clone(),
            grants,
        })
    }
}

impl Roster {
    pub fn from_table(table: &Table, names: &SchemaNames) -> Result<Roster, SchemaError> {
        let cols = &names.roster;
        let id_idx = require_index(table, TableKind::Roster, &cols.employee_id)?;
        let top_idx = require_index(table, TableKind::Roster, &cols.top_org)?;
        let third_idx = require_index(table, TableKind::Roster, &cols.third_org)?;
        let fourth_idx = require_index(table, TableKind::Roster, &cols.fourth_org)?;
        let name_idx = require_index(table, TableKind::Roster, &cols.display_name)?;
        let nickname_idx = table.column_index(&cols.nickname);
        if nickname_idx.is_none() {
            warn!(
                "Roster::from_table: no column {:?}, nicknames will be left out",
                cols.nickname
            );
        }

        let employees: Vec<EmployeeRecord> = table
            .rows
            .iter()
            .map(|row| EmployeeRecord {
                employee_id: Table::cell(row, id_idx),
                org: OrgPlacement {
                    top_org: Table::cell(row, top_idx),
                    third_org: Table::cell(row, third_idx),
                    fourth_org: Table::cell(row, fourth_idx),
                },
                display_name: Table::cell(row, name_idx),
                nickname: nickname_idx
                    .map(|idx| Table::cell(row, idx))
                    .unwrap_or_default(),
            })
            .collect();
        debug!("Roster::from_table: {} employees", employees.len());
        Ok(Roster { employees })
    }
}
