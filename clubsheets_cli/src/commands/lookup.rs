use anyhow::{bail, Result};
use clap::Args;
use clubsheets_lib::{ClubData, EmailMatch, SheetsRowSource};

use crate::output::{build_member_rows, print_json, print_rows, OutputFormat};

#[derive(Args)]
pub struct LookupArgs {
    /// Email address to match against primary and secondary emails
    pub email: String,
}

pub async fn run(
    args: &LookupArgs,
    data: &ClubData<SheetsRowSource>,
    format: &OutputFormat,
) -> Result<()> {
    match data.find_member_by_email(&args.email).await? {
        EmailMatch::Unique(member) => match format {
            OutputFormat::Json => print_json(&member),
            _ => print_rows(&build_member_rows([&member]), format)?,
        },
        EmailMatch::NotFound => {
            bail!("No member with an account lists '{}'", args.email.trim())
        }
        EmailMatch::Ambiguous(ids) => bail!(
            "Multiple members list '{}': {}",
            args.email.trim(),
            ids.join(", ")
        ),
    }
    Ok(())
}
