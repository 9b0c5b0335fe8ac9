pub use crate::config::*;

/// A builder for assembling a roster and a grant log without going through tables.
///
/// ```
/// use flower_ranking::builder::Builder;
/// use flower_ranking::{aggregate, enrich, WeightRules};
/// # use flower_ranking::RulesError;
///
/// let (grants, roster) = Builder::new()
///     .employee("E1", "HQ", "Tech", "Backend", "Anna", "")
///     .employee("E2", "HQ", "Tech", "Frontend", "Bob", "Bobby")
///     .grant("E2", "E1")
///     .build();
///
/// let rules = WeightRules::with_labels(0.5, "HQ", "City")?;
/// let summary = aggregate(&enrich(&grants, &roster), &rules);
/// assert_eq!(summary[0].total_amount.to_string(), "0.5");
///
/// # Ok::<(), RulesError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Builder {
    pub(crate) _employees: Vec<EmployeeRecord>,
    pub(crate) _grants: Vec<GrantRecord>,
}

/// The columns of the grant logs created by the builder.
pub const BUILDER_GRANT_COLUMNS: [&str; 2] = ["sender_id", "receiver_id"];

impl Builder {
    pub fn new() -> Builder {
        Builder::default()
    }

    /// Adds an employee to the roster. An empty nickname means no nickname.
    pub fn employee(
        self,
        employee_id: &str,
        top_org: &str,
        third_org: &str,
        fourth_org: &str,
        display_name: &str,
        nickname: &str,
    ) -> Builder {
        let mut employees = self._employees;
        employees.push(EmployeeRecord {
            employee_id: employee_id.to_string(),
            org: OrgPlacement {
                top_org: top_org.to_string(),
                third_org: third_org.to_string(),
                fourth_org: fourth_org.to_string(),
            },
            display_name: display_name.to_string(),
            nickname: nickname.to_string(),
        });
        Builder {
            _employees: employees,
            _grants: self._grants,
        }
    }

    /// Adds a grant of one flower from the sender to the receiver.
    pub fn grant(self, sender_id: &str, receiver_id: &str) -> Builder {
        let mut grants = self._grants;
        grants.push(GrantRecord {
            sender_id: sender_id.to_string(),
            receiver_id: receiver_id.to_string(),
            cells: vec![sender_id.to_string(), receiver_id.to_string()],
        });
        Builder {
            _employees: self._employees,
            _grants: grants,
        }
    }

    pub fn build(self) -> (GrantLog, Roster) {
        let grants = GrantLog {
            columns: BUILDER_GRANT_COLUMNS.iter().map(|s| s.to_string()).collect(),
            grants: self._grants,
        };
        let roster = Roster {
            employees: self._employees,
        };
        (grants, roster)
    }
}
