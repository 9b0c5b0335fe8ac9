// Writing the result tables.

use std::fs;
use std::path::Path;

use crate::flowers::*;

pub const ENRICHED_CSV: &str = "1.enriched_grants.csv";
pub const SUMMARY_CSV: &str = "2.summary.csv";
pub const REPORT_CSV: &str = "3.report.csv";
pub const REPORT_JSON: &str = "report.json";

/// The columns added to the grant log by the enrichment.
pub const ENRICHED_COLUMNS: [&str; 8] = [
    "receiver_top_org",
    "receiver_third_org",
    "receiver_fourth_org",
    "receiver_name",
    "sender_top_org",
    "sender_third_org",
    "sender_fourth_org",
    "effective_weight",
];

pub const SUMMARY_COLUMNS: [&str; 7] = [
    "receiver_id",
    "top_org",
    "third_org",
    "fourth_org",
    "display_name",
    "nickname",
    "total_amount",
];

pub const REPORT_COLUMNS: [&str; 3] = ["total_amount", "amount_label", "recipient_text"];

pub fn write_all(
    out_dir: &Path,
    grant_columns: &[String],
    output: &PipelineOutput,
    report_js: &str,
) -> FlowerResult<()> {
    fs::create_dir_all(out_dir).context(WritingOutputSnafu {
        path: out_dir.display().to_string(),
    })?;
    write_enriched(
        &out_dir.join(ENRICHED_CSV),
        grant_columns,
        &output.effective_grants,
    )?;
    write_summary(&out_dir.join(SUMMARY_CSV), &output.summary)?;
    write_report(&out_dir.join(REPORT_CSV), &output.report)?;

    let json_p = out_dir.join(REPORT_JSON);
    fs::write(&json_p, report_js).context(WritingOutputSnafu {
        path: json_p.display().to_string(),
    })?;
    info!("Results written to {:?}", out_dir);
    Ok(())
}

fn write_rows<I>(path: &Path, header: Vec<String>, rows: I) -> FlowerResult<()>
where
    I: IntoIterator<Item = Vec<String>>,
{
    let p = path.display().to_string();
    let mut wtr = csv::Writer::from_path(path).context(CsvWriteSnafu { path: p.clone() })?;
    wtr.write_record(&header)
        .context(CsvWriteSnafu { path: p.clone() })?;
    for row in rows {
        wtr.write_record(&row)
            .context(CsvWriteSnafu { path: p.clone() })?;
    }
    wtr.flush().map_err(csv::Error::from).context(CsvWriteSnafu { path: p.clone() })?;
    debug!("write_rows: {:?} written", p);
    Ok(())
}

pub fn write_enriched(
    path: &Path,
    grant_columns: &[String],
    effective: &[EffectiveGrant],
) -> FlowerResult<()> {
    let mut header: Vec<String> = grant_columns.to_vec();
    header.extend(ENRICHED_COLUMNS.iter().map(|s| s.to_string()));
    let rows = effective.iter().map(|eg| {
        let r = &eg.record;
        let sender = r.sender_org();
        let mut row = r.grant.cells.clone();
        row.extend([
            r.receiver.top_org.clone(),
            r.receiver.third_org.clone(),
            r.receiver.fourth_org.clone(),
            r.receiver_label(),
            sender.top_org,
            sender.third_org,
            sender.fourth_org,
            format!("{:.1}", eg.effective_weight),
        ]);
        row
    });
    write_rows(path, header, rows)
}

pub fn write_summary(path: &Path, summary: &[SummaryRecord]) -> FlowerResult<()> {
    let header = SUMMARY_COLUMNS.iter().map(|s| s.to_string()).collect();
    let rows = summary.iter().map(|s| {
        vec![
            s.receiver_id.clone(),
            s.org.top_org.clone(),
            s.org.third_org.clone(),
            s.org.fourth_org.clone(),
            s.display_name.clone(),
            s.nickname.clone(),
            s.total_amount.to_string(),
        ]
    });
    write_rows(path, header, rows)
}

pub fn write_report(path: &Path, report: &[ReportRow]) -> FlowerResult<()> {
    let header = REPORT_COLUMNS.iter().map(|s| s.to_string()).collect();
    let rows = report.iter().map(|r| {
        vec![
            r.total_amount.to_string(),
            r.amount_label.clone(),
            r.recipient_text.clone(),
        ]
    });
    write_rows(path, header, rows)
}
