use anyhow::Result;
use clap::Args;
use clubsheets_lib::{ClubData, SheetsRowSource};

use crate::output::{build_overdue_rows, print_json, print_rows, OutputFormat};

#[derive(Args)]
pub struct OverdueArgs {
    /// Key the output by member id
    #[arg(long)]
    pub keyed: bool,
}

pub async fn run(
    args: &OverdueArgs,
    data: &ClubData<SheetsRowSource>,
    format: &OutputFormat,
) -> Result<()> {
    if args.keyed {
        let fees = data.overdue_keyed().await?;
        return match format {
            OutputFormat::Json => {
                print_json(&fees);
                Ok(())
            }
            _ => print_rows(&build_overdue_rows(fees.values()), format),
        };
    }

    let fees = data.overdue().await?;
    match format {
        OutputFormat::Json => {
            print_json(&fees);
            Ok(())
        }
        _ => print_rows(&build_overdue_rows(&fees), format),
    }
}
