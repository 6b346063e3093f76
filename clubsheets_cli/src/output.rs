use std::io::Write;
use std::str::FromStr;

use anyhow::{bail, Result};
use chrono::NaiveDateTime;
use clubsheets_lib::{
    Account, AccountLite, AccountSummary, Member, MemberLite, OverdueFee, PrefetchOutcome,
    SignIn, SignInLite,
};
use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Clone, Debug, PartialEq)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
    Markdown,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            other => bail!("Unknown output format '{}': use table, json, csv or markdown", other),
        }
    }
}

#[derive(Tabled, Serialize)]
pub struct MemberRow {
    #[tabled(rename = "ID")]
    #[serde(rename = "ID")]
    id: String,
    #[tabled(rename = "Last Name")]
    #[serde(rename = "Last Name")]
    last_name: String,
    #[tabled(rename = "Type")]
    #[serde(rename = "Type")]
    member_type: String,
    #[tabled(rename = "Membership")]
    #[serde(rename = "Membership")]
    membership: String,
    #[tabled(rename = "Email")]
    #[serde(rename = "Email")]
    email: String,
    #[tabled(rename = "Phone")]
    #[serde(rename = "Phone")]
    phone: String,
    #[tabled(rename = "Members")]
    #[serde(rename = "Members")]
    number_of_members: String,
}

#[derive(Tabled, Serialize)]
pub struct MemberLiteRow {
    #[tabled(rename = "ID")]
    #[serde(rename = "ID")]
    id: String,
    #[tabled(rename = "Last Name")]
    #[serde(rename = "Last Name")]
    last_name: String,
    #[tabled(rename = "Certificate")]
    #[serde(rename = "Certificate")]
    certificate_number: String,
    #[tabled(rename = "Type")]
    #[serde(rename = "Type")]
    member_type: String,
}

#[derive(Tabled, Serialize)]
pub struct AccountRow {
    #[tabled(rename = "ID")]
    #[serde(rename = "ID")]
    id: String,
    #[tabled(rename = "Last Name")]
    #[serde(rename = "Last Name")]
    last_name: String,
    #[tabled(rename = "Type")]
    #[serde(rename = "Type")]
    member_type: String,
    #[tabled(rename = "Owes")]
    #[serde(rename = "Owes")]
    money_owed: String,
    #[tabled(rename = "Can Reserve")]
    #[serde(rename = "Can Reserve")]
    eligible_to_reserve: String,
}

#[derive(Tabled, Serialize)]
pub struct AccountLiteRow {
    #[tabled(rename = "ID")]
    #[serde(rename = "ID")]
    id: String,
    #[tabled(rename = "Owes")]
    #[serde(rename = "Owes")]
    money_owed: String,
    #[tabled(rename = "Can Reserve")]
    #[serde(rename = "Can Reserve")]
    eligible_to_reserve: String,
}

#[derive(Tabled, Serialize)]
pub struct OverdueRow {
    #[tabled(rename = "ID")]
    #[serde(rename = "ID")]
    id: String,
    #[tabled(rename = "Total Owed")]
    #[serde(rename = "Total Owed")]
    total_owed: String,
    #[tabled(rename = "Breakdown")]
    #[serde(rename = "Breakdown")]
    breakdown: String,
}

#[derive(Tabled, Serialize)]
pub struct SignInRow {
    #[tabled(rename = "Time")]
    #[serde(rename = "Time")]
    time: String,
    #[tabled(rename = "ID")]
    #[serde(rename = "ID")]
    id: String,
    #[tabled(rename = "Last Name")]
    #[serde(rename = "Last Name")]
    last_name: String,
    #[tabled(rename = "Members")]
    #[serde(rename = "Members")]
    number_of_members: String,
    #[tabled(rename = "Guests")]
    #[serde(rename = "Guests")]
    number_of_guests: String,
    #[tabled(rename = "Kids")]
    #[serde(rename = "Kids")]
    dropped_off_kids: String,
}

#[derive(Tabled, Serialize)]
pub struct SignInLiteRow {
    #[tabled(rename = "Time")]
    #[serde(rename = "Time")]
    time: String,
    #[tabled(rename = "ID")]
    #[serde(rename = "ID")]
    id: String,
    #[tabled(rename = "Members")]
    #[serde(rename = "Members")]
    number_of_members: String,
    #[tabled(rename = "Guests")]
    #[serde(rename = "Guests")]
    number_of_guests: String,
    #[tabled(rename = "Kids")]
    #[serde(rename = "Kids")]
    dropped_off_kids: String,
}

#[derive(Tabled, Serialize)]
pub struct SummaryRow {
    #[tabled(rename = "ID")]
    #[serde(rename = "ID")]
    id: String,
    #[tabled(rename = "Owes")]
    #[serde(rename = "Owes")]
    money_owed: String,
    #[tabled(rename = "Can Reserve")]
    #[serde(rename = "Can Reserve")]
    eligible_to_reserve: String,
    #[tabled(rename = "Total Owed")]
    #[serde(rename = "Total Owed")]
    total_owed: String,
    #[tabled(rename = "Breakdown")]
    #[serde(rename = "Breakdown")]
    breakdown: String,
}

#[derive(Tabled, Serialize)]
pub struct PrefetchRow {
    #[tabled(rename = "Dataset")]
    #[serde(rename = "Dataset")]
    dataset: String,
    #[tabled(rename = "Range")]
    #[serde(rename = "Range")]
    range: String,
    #[tabled(rename = "Status")]
    #[serde(rename = "Status")]
    status: String,
    #[tabled(rename = "Rows")]
    #[serde(rename = "Rows")]
    rows: String,
}

// -- Row builders --

pub fn build_member_rows<'a>(members: impl IntoIterator<Item = &'a Member>) -> Vec<MemberRow> {
    members
        .into_iter()
        .map(|m| MemberRow {
            id: m.id.clone(),
            last_name: m.last_name.clone(),
            member_type: m.member_type.clone(),
            membership: m.membership().label().to_string(),
            email: m.primary_email.clone(),
            phone: m.primary_phone.clone(),
            number_of_members: m.number_of_members.clone(),
        })
        .collect()
}

pub fn build_member_lite_rows<'a>(
    members: impl IntoIterator<Item = &'a MemberLite>,
) -> Vec<MemberLiteRow> {
    members
        .into_iter()
        .map(|m| MemberLiteRow {
            id: m.id.clone(),
            last_name: m.last_name.clone(),
            certificate_number: m.certificate_number.clone(),
            member_type: m.member_type.clone(),
        })
        .collect()
}

pub fn build_account_rows<'a>(accounts: impl IntoIterator<Item = &'a Account>) -> Vec<AccountRow> {
    accounts
        .into_iter()
        .map(|a| AccountRow {
            id: a.id.clone(),
            last_name: a.last_name.clone(),
            member_type: a.member_type.clone(),
            money_owed: yes_no(a.money_owed),
            eligible_to_reserve: yes_no(a.eligible_to_reserve),
        })
        .collect()
}

pub fn build_account_lite_rows<'a>(
    accounts: impl IntoIterator<Item = &'a AccountLite>,
) -> Vec<AccountLiteRow> {
    accounts
        .into_iter()
        .map(|a| AccountLiteRow {
            id: a.id.clone(),
            money_owed: yes_no(a.money_owed),
            eligible_to_reserve: yes_no(a.eligible_to_reserve),
        })
        .collect()
}

pub fn build_overdue_rows<'a>(fees: impl IntoIterator<Item = &'a OverdueFee>) -> Vec<OverdueRow> {
    fees.into_iter()
        .map(|f| OverdueRow {
            id: f.id.clone(),
            total_owed: f.total_owed.clone(),
            breakdown: format_breakdown(f),
        })
        .collect()
}

pub fn build_sign_in_rows<'a>(sign_ins: impl IntoIterator<Item = &'a SignIn>) -> Vec<SignInRow> {
    sign_ins
        .into_iter()
        .map(|s| SignInRow {
            time: format_timestamp(s.timestamp),
            id: s.id.clone(),
            last_name: s.last_name.clone(),
            number_of_members: s.number_of_members.clone(),
            number_of_guests: s.number_of_guests.clone(),
            dropped_off_kids: s.dropped_off_kids.clone(),
        })
        .collect()
}

pub fn build_sign_in_lite_rows<'a>(
    sign_ins: impl IntoIterator<Item = &'a SignInLite>,
) -> Vec<SignInLiteRow> {
    sign_ins
        .into_iter()
        .map(|s| SignInLiteRow {
            time: format_timestamp(s.timestamp),
            id: s.id.clone(),
            number_of_members: s.number_of_members.clone(),
            number_of_guests: s.number_of_guests.clone(),
            dropped_off_kids: s.dropped_off_kids.clone(),
        })
        .collect()
}

pub fn build_summary_row(summary: &AccountSummary) -> SummaryRow {
    SummaryRow {
        id: summary.account.id.clone(),
        money_owed: yes_no(summary.account.money_owed),
        eligible_to_reserve: yes_no(summary.account.eligible_to_reserve),
        total_owed: summary
            .dues
            .as_ref()
            .map(|d| d.total_owed.clone())
            .unwrap_or_default(),
        breakdown: summary.dues.as_ref().map(format_breakdown).unwrap_or_default(),
    }
}

pub fn build_prefetch_rows(outcomes: &[(PrefetchOutcome, String)]) -> Vec<PrefetchRow> {
    outcomes
        .iter()
        .map(|(outcome, range)| {
            let (status, rows) = match &outcome.result {
                Ok(count) => ("ok".to_string(), count.to_string()),
                Err(e) => (format!("failed: {}", e), String::new()),
            };
            PrefetchRow {
                dataset: outcome.dataset.to_string(),
                range: range.clone(),
                status,
                rows,
            }
        })
        .collect()
}

// -- Rendering --

/// Prints rows as a table, markdown table, or CSV. JSON output of rows is
/// only a fallback; commands print the records themselves for JSON.
pub fn print_rows<R: Tabled + Serialize>(rows: &[R], format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => println!("{}", Table::new(rows)),
        OutputFormat::Markdown => println!("{}", render_markdown(rows)),
        OutputFormat::Csv => write_csv(std::io::stdout(), rows)?,
        OutputFormat::Json => print_json(&rows),
    }
    Ok(())
}

fn render_markdown<R: Tabled>(rows: &[R]) -> String {
    let mut table = Table::new(rows);
    table.with(Style::markdown());
    table.to_string()
}

fn write_csv<W: Write, R: Serialize>(writer: W, rows: &[R]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn print_json<T: Serialize + ?Sized>(data: &T) {
    match serde_json::to_string_pretty(data) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize to JSON: {}", e),
    }
}

fn yes_no(flag: bool) -> String {
    let text = if flag { "yes" } else { "no" };
    text.to_string()
}

fn format_timestamp(ts: Option<NaiveDateTime>) -> String {
    ts.map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default()
}

/// Non-empty fee lines as "Name amount", joined with "; ".
fn format_breakdown(fee: &OverdueFee) -> String {
    fee.dues
        .iter()
        .filter(|line| !line.amount.trim().is_empty())
        .map(|line| format!("{} {}", line.name, line.amount))
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use clubsheets_lib::{Dataset, FeeLine, UpstreamError, FEE_CATEGORIES};

    fn member(id: &str, last_name: &str) -> Member {
        Member {
            id: id.to_string(),
            last_name: last_name.to_string(),
            certificate_number: id.trim_end_matches(char::is_alphabetic).to_string(),
            member_type: id.trim_start_matches(char::is_numeric).to_string(),
            salutation: String::new(),
            address: String::new(),
            location: String::new(),
            zip: String::new(),
            primary_phone: "555-0100".to_string(),
            secondary_phone: String::new(),
            primary_email: "a@x.com".to_string(),
            secondary_email: String::new(),
            director_name: String::new(),
            director_email: String::new(),
            director_phone: String::new(),
            family_members: String::new(),
            notes: String::new(),
            number_of_members: "2".to_string(),
        }
    }

    fn fee(id: &str, amounts: &[(&str, &str)]) -> OverdueFee {
        OverdueFee {
            id: id.to_string(),
            certificate_number: id.trim_end_matches(char::is_alphabetic).to_string(),
            total_owed: "$150.00".to_string(),
            dues: FEE_CATEGORIES
                .iter()
                .map(|name| FeeLine {
                    name: name.to_string(),
                    amount: amounts
                        .iter()
                        .find(|(n, _)| n == name)
                        .map(|(_, a)| a.to_string())
                        .unwrap_or_default(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_output_format_parsing() {
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("CSV".parse::<OutputFormat>().unwrap(), OutputFormat::Csv);
        assert_eq!("md".parse::<OutputFormat>().unwrap(), OutputFormat::Markdown);
        assert!("xml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_build_member_rows_mapping() {
        let members = vec![member("1023PM", "Smith")];
        let rows = build_member_rows(&members);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, "1023PM");
        assert_eq!(rows[0].email, "a@x.com");
        assert_eq!(rows[0].membership, "Permanent");
        assert_eq!(rows[0].number_of_members, "2");
    }

    #[test]
    fn test_build_rows_from_map_values() {
        let mut map = std::collections::BTreeMap::new();
        map.insert("2PM".to_string(), member("2PM", "Baker"));
        map.insert("1PM".to_string(), member("1PM", "Able"));
        let rows = build_member_rows(map.values());
        let ids: Vec<&str> = rows.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["1PM", "2PM"]);
    }

    #[test]
    fn test_breakdown_skips_empty_amounts() {
        let f = fee("1023PM", &[("Late Fee", "$50.00"), ("Membership Dues", "$100.00")]);
        assert_eq!(
            format_breakdown(&f),
            "Membership Dues $100.00; Late Fee $50.00"
        );
        assert_eq!(format_breakdown(&fee("1PM", &[])), "");
    }

    #[test]
    fn test_summary_row_without_dues() {
        let summary = AccountSummary {
            account: AccountLite {
                id: "1023PM".to_string(),
                money_owed: false,
                eligible_to_reserve: true,
            },
            dues: None,
        };
        let row = build_summary_row(&summary);
        assert_eq!(row.eligible_to_reserve, "yes");
        assert_eq!(row.total_owed, "");
        assert_eq!(row.breakdown, "");
    }

    #[test]
    fn test_sign_in_time_formatting() {
        let ts = NaiveDateTime::parse_from_str("2021-03-14 10:22:33", "%Y-%m-%d %H:%M:%S").ok();
        assert_eq!(format_timestamp(ts), "2021-03-14 10:22");
        assert_eq!(format_timestamp(None), "");
    }

    #[test]
    fn test_prefetch_rows_show_failures() {
        let outcomes = vec![
            (
                PrefetchOutcome {
                    dataset: Dataset::Members,
                    result: Ok(12),
                },
                "Members!A2:S".to_string(),
            ),
            (
                PrefetchOutcome {
                    dataset: Dataset::Overdue,
                    result: Err(UpstreamError::Timeout {
                        dataset: Dataset::Overdue,
                        timeout: std::time::Duration::from_secs(20),
                    }),
                },
                "Over-Due!A4:R".to_string(),
            ),
        ];
        let rows = build_prefetch_rows(&outcomes);
        assert_eq!(rows[0].status, "ok");
        assert_eq!(rows[0].rows, "12");
        assert!(rows[1].status.starts_with("failed: "));
        assert!(rows[1].status.contains("timed out"));
    }

    #[test]
    fn test_csv_has_header_and_rows() {
        let rows = build_member_lite_rows(&[MemberLite {
            id: "1023PM".to_string(),
            last_name: "Smith".to_string(),
            certificate_number: "1023".to_string(),
            member_type: "PM".to_string(),
        }]);
        let mut buf = Vec::new();
        write_csv(&mut buf, &rows).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("ID,Last Name,Certificate,Type"));
        assert_eq!(lines.next(), Some("1023PM,Smith,1023,PM"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_markdown_has_pipe_headers() {
        let accounts = vec![AccountLite {
            id: "1023PM".to_string(),
            money_owed: true,
            eligible_to_reserve: false,
        }];
        let md = render_markdown(&build_account_lite_rows(&accounts));
        let header = md.lines().next().unwrap();
        assert!(header.starts_with('|'));
        assert!(header.contains("Can Reserve"));
        assert!(md.contains("| yes"));
    }

    #[test]
    fn test_markdown_empty_produces_headers_only() {
        let rows = build_overdue_rows(&Vec::<OverdueFee>::new());
        let md = render_markdown(&rows);
        let lines: Vec<&str> = md.lines().collect();
        assert!(lines.len() <= 2, "expected at most 2 lines for empty table, got {}", lines.len());
    }
}
