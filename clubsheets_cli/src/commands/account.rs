use anyhow::{bail, Result};
use clap::Args;
use clubsheets_lib::{ClubData, SheetsRowSource};

use crate::output::{build_summary_row, print_json, print_rows, OutputFormat};

#[derive(Args)]
pub struct AccountArgs {
    /// Member id: certificate number followed by membership type (e.g. 1023PM)
    pub id: String,
}

pub async fn run(
    args: &AccountArgs,
    data: &ClubData<SheetsRowSource>,
    format: &OutputFormat,
) -> Result<()> {
    let id = args.id.trim();
    if id.is_empty() {
        bail!("Member id must not be empty");
    }

    let Some(summary) = data.account_summary(id).await? else {
        bail!("Could not find account with id '{}'", id);
    };

    match format {
        OutputFormat::Json => print_json(&summary),
        _ => print_rows(&[build_summary_row(&summary)], format)?,
    }
    Ok(())
}
