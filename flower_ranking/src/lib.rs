mod config;
use log::{debug, info, warn};

use std::collections::{BTreeMap, HashMap};

pub use crate::config::*;
pub use crate::schema::validate;

pub mod builder;
pub mod manual;
mod schema;

/// All the tables produced by one run of the pipeline.
#[derive(PartialEq, Debug, Clone)]
pub struct PipelineOutput {
    pub effective_grants: Vec<EffectiveGrant>,
    pub summary: Vec<SummaryRecord>,
    pub report: Vec<ReportRow>,
}

/// Runs the whole pipeline on the raw tables.
///
/// Both tables are checked before any row is read: a missing column aborts the run
/// and nothing else is computed.
pub fn run_pipeline(
    grants: &Table,
    roster: &Table,
    names: &SchemaNames,
    weight_rules: &WeightRules,
    report_rules: &ReportRules,
) -> Result<PipelineOutput, SchemaError> {
    validate(grants, roster, names)?;
    let grant_log = GrantLog::from_table(grants, names)?;
    let roster = Roster::from_table(roster, names)?;

    let enriched = enrich(&grant_log, &roster);
    let effective_grants = weigh(&enriched, weight_rules);
    let summary = summarize(&effective_grants);
    let tiers = report(&summary, report_rules);
    Ok(PipelineOutput {
        effective_grants,
        summary,
        report: tiers,
    })
}

/// Attaches the organization of the sender and of the receiver to each grant.
///
/// Grants to someone who is not in the roster are dropped. An unknown sender is
/// kept, without organization. The order of the grants is preserved.
pub fn enrich(grants: &GrantLog, roster: &Roster) -> Vec<EnrichedRecord> {
    let mut lookup: HashMap<&str, &EmployeeRecord> = HashMap::new();
    for e in roster.employees.iter() {
        if lookup.insert(e.employee_id.as_str(), e).is_some() {
            warn!(
                "enrich: employee {:?} appears several times in the roster, keeping the last entry",
                e.employee_id
            );
        }
    }

    let res: Vec<EnrichedRecord> = grants
        .grants
        .iter()
        .filter_map(|g| {
            let receiver = match lookup.get(g.receiver_id.as_str()) {
                Some(r) => r,
                None => {
                    debug!("enrich: dropping grant to unknown receiver {:?}", g.receiver_id);
                    return None;
                }
            };
            let sender = lookup.get(g.sender_id.as_str()).map(|s| s.org.clone());
            Some(EnrichedRecord {
                grant: g.clone(),
                receiver: receiver.org.clone(),
                receiver_name: receiver.display_name.clone(),
                receiver_nickname: receiver.nickname.clone(),
                sender,
            })
        })
        .collect();
    info!(
        "enrich: kept {} of {} grants ({} employees in the roster)",
        res.len(),
        grants.grants.len(),
        lookup.len()
    );
    res
}

/// The credit given by a single grant.
///
/// An unknown sender has empty organization fields, and an empty field never
/// matches, even against another empty field.
pub fn effective_weight(record: &EnrichedRecord, rules: &WeightRules) -> f64 {
    let receiver = &record.receiver;
    let sender = record.sender_org();
    let same_org = if receiver.top_org == rules.hq_label {
        same_unit(&sender.third_org, &receiver.third_org)
    } else if receiver.top_org == rules.city_label {
        same_unit(&sender.third_org, &receiver.third_org)
            && same_unit(&sender.fourth_org, &receiver.fourth_org)
    } else {
        false
    };
    if same_org {
        rules.weight()
    } else {
        1.0
    }
}

fn same_unit(sender: &str, receiver: &str) -> bool {
    !receiver.is_empty() && sender == receiver
}

pub fn weigh(enriched: &[EnrichedRecord], rules: &WeightRules) -> Vec<EffectiveGrant> {
    debug!("weigh: {} grants, rules: {:?}", enriched.len(), rules);
    enriched
        .iter()
        .map(|r| EffectiveGrant {
            record: r.clone(),
            effective_weight: effective_weight(r, rules),
        })
        .collect()
}

/// Computes the leaderboard: the weighted grants are summed per receiver and
/// sorted by amount (descending), then by top-level and third-level organization.
pub fn aggregate(enriched: &[EnrichedRecord], rules: &WeightRules) -> Vec<SummaryRecord> {
    summarize(&weigh(enriched, rules))
}

pub fn summarize(effective: &[EffectiveGrant]) -> Vec<SummaryRecord> {
    // The descriptive fields come from the first grant of each receiver.
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut totals: Vec<(&EnrichedRecord, f64)> = Vec::new();
    for eg in effective.iter() {
        let receiver_id = eg.record.grant.receiver_id.as_str();
        match positions.get(receiver_id).copied() {
            Some(idx) => totals[idx].1 += eg.effective_weight,
            None => {
                positions.insert(receiver_id, totals.len());
                totals.push((&eg.record, eg.effective_weight));
            }
        }
    }

    let mut res: Vec<SummaryRecord> = totals
        .into_iter()
        .map(|(first, total)| SummaryRecord {
            receiver_id: first.grant.receiver_id.clone(),
            org: first.receiver.clone(),
            display_name: first.receiver_name.clone(),
            nickname: first.receiver_nickname.clone(),
            total_amount: Amount::round_from(total),
        })
        .collect();

    res.sort_by(|a, b| {
        b.total_amount
            .cmp(&a.total_amount)
            .then_with(|| a.org.top_org.cmp(&b.org.top_org))
            .then_with(|| a.org.third_org.cmp(&b.org.third_org))
    });
    info!("summarize: {} receivers", res.len());
    res
}

/// Builds the announcement: one row per distinct amount at or above the minimum,
/// highest amount first.
pub fn report(summary: &[SummaryRecord], rules: &ReportRules) -> Vec<ReportRow> {
    let mut tiers: BTreeMap<Amount, Vec<&SummaryRecord>> = BTreeMap::new();
    for s in summary.iter().filter(|s| s.total_amount >= rules.minimum_amount) {
        tiers.entry(s.total_amount).or_default().push(s);
    }

    let res: Vec<ReportRow> = tiers
        .into_iter()
        .rev()
        .map(|(amount, mut members)| {
            members.sort_by(|a, b| {
                a.org
                    .top_org
                    .cmp(&b.org.top_org)
                    .then_with(|| a.org.third_org.cmp(&b.org.third_org))
                    .then_with(|| a.display_name.cmp(&b.display_name))
            });
            ReportRow {
                total_amount: amount,
                amount_label: format!("{}{}", amount, rules.unit),
                recipient_text: recipient_text(&members),
            }
        })
        .collect();
    info!(
        "report: {} award tiers (minimum {})",
        res.len(),
        rules.minimum_amount
    );
    res
}

// The members are expected to be sorted already.
fn recipient_text(members: &[&SummaryRecord]) -> String {
    members
        .chunk_by(|a, b| a.org.third_org == b.org.third_org)
        .map(|group| {
            let names: Vec<String> = group.iter().map(|s| s.label()).collect();
            format!("{}：{}", group[0].org.third_org, names.join("、"))
        })
        .collect::<Vec<String>>()
        .join("；")
}
