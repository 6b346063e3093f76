use anyhow::Result;
use clap::Args;
use clubsheets_lib::{ClubData, Keyed, Listing, SheetsRowSource};

use crate::output::{
    build_account_lite_rows, build_account_rows, print_json, print_rows, OutputFormat,
};

#[derive(Args)]
pub struct AccountsArgs {
    /// Only id and status flags
    #[arg(long)]
    pub lite: bool,

    /// Key the output by account id (last row wins on duplicates)
    #[arg(long)]
    pub keyed: bool,
}

pub async fn run(
    args: &AccountsArgs,
    data: &ClubData<SheetsRowSource>,
    format: &OutputFormat,
) -> Result<()> {
    if args.keyed {
        let accounts = data.accounts_keyed(args.lite).await?;
        if *format == OutputFormat::Json {
            print_json(&accounts);
            return Ok(());
        }
        return match &accounts {
            Keyed::Full(map) => print_rows(&build_account_rows(map.values()), format),
            Keyed::Lite(map) => print_rows(&build_account_lite_rows(map.values()), format),
        };
    }

    let accounts = data.accounts(args.lite).await?;
    if *format == OutputFormat::Json {
        print_json(&accounts);
        return Ok(());
    }
    match &accounts {
        Listing::Full(items) => print_rows(&build_account_rows(items), format),
        Listing::Lite(items) => print_rows(&build_account_lite_rows(items), format),
    }
}
