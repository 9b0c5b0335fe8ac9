/*!

This is the long-form manual for `flower_ranking` and `flowerboard`.

## Input formats

Two tables are needed: the export of the flower grants and the employee roster.
Both can be provided as Excel files (`xlsx`) or as Comma Separated Values (`csv`).
The first row of each table is the header. The order of the columns does not matter
and additional columns are allowed.

### Grant log

| column        | content                                  |
|---------------|------------------------------------------|
| `sender_id`   | the employee who gave the flower          |
| `receiver_id` | the employee who received the flower      |

All the other columns (date, message, ...) are carried over to the enriched table
without being interpreted.

```text
date,sender_id,receiver_id,message
2025-04-01,E2,E1,thanks for the review
2025-04-01,E3,E1,great demo
```

### Roster

| column         | content                                            |
|----------------|----------------------------------------------------|
| `employee_id`  | the key used by the grant log                      |
| `top_org`      | top-level organization                             |
| `third_org`    | third-level organization (center or department)    |
| `fourth_org`   | fourth-level organization                          |
| `display_name` | the name printed in the announcement               |
| `nickname`     | optional, printed as `name（nickname）`             |

A missing column stops the run before anything is computed. Grants to people
that are not in the roster are ignored. A sender that is not in the roster is
accepted, the grant then always counts as a full flower.

## Weighting

To encourage collaboration across teams, a flower given inside one's own team
can be worth less than a full flower. The same-organization weight is a number
between `0.0` (such flowers do not count) and `1.0` (no discount).

- for the headquarters (`hqLabel`), a flower between two members of the same
  third-level organization counts the weight;
- for the cities (`cityLabel`), a flower between two members of the same
  third-level and fourth-level organization counts the weight;
- every other flower counts `1.0`.

An empty organization cell never matches, so a flower from a sender who is not
in the roster, or to a receiver whose organization is blank, is a full flower.

The totals per receiver are rounded to one decimal place. Ties are rounded to
the even digit: `2.25` becomes `2.2` and `2.35` becomes `2.4`.

## Outputs

| file                    | content                                                        |
|-------------------------|----------------------------------------------------------------|
| `1.enriched_grants.csv` | the grants with the organizations and the effective weight     |
| `2.summary.csv`         | one line per receiver, highest total first                     |
| `3.report.csv`          | one line per award tier (total of at least `minimumAmount`)    |
| `report.json`           | the award tiers, used to compare with a reference              |

In the report, the recipients of a tier are grouped by third-level organization:

```text
4.5flowers  Finance：Max；Tech：Abe、Zoe
```

## Configuration

All the options can be passed on the command line. A configuration file in JSON
makes it possible to store them, and to rename the columns when the exports use
other headers. The paths are relative to the configuration file.

```json
{
  "outputSettings": { "outputDirectory": "out" },
  "inputs": {
    "grantsFilePath": "grants.xlsx",
    "rosterFilePath": "roster.xlsx",
    "provider": "xlsx",
    "excelWorksheetName": "Sheet1",
    "rosterWorksheetName": "员工"
  },
  "rules": {
    "sameOrgWeight": 0.5,
    "hqLabel": "贝好家总部",
    "cityLabel": "贝好家城市",
    "minimumAmount": 3.0,
    "amountUnit": "flowers"
  },
  "columns": {
    "receiverId": "收花人系统号",
    "senderId": "送花人系统号",
    "employeeId": "员工系统号",
    "topOrg": "一级组织",
    "thirdOrg": "三级组织",
    "fourthOrg": "四级组织",
    "displayName": "姓名",
    "nickname": "花名"
  }
}
```

Command line flags take precedence over the configuration file.
`excelWorksheetName` applies to both workbooks, `grantsWorksheetName` and
`rosterWorksheetName` select a different worksheet for one of them.

 */
