use anyhow::Result;
use clap::Args;
use clubsheets_lib::{ClubData, Keyed, Listing, SheetsRowSource};

use crate::output::{
    build_sign_in_lite_rows, build_sign_in_rows, print_json, print_rows, OutputFormat,
};

#[derive(Args)]
pub struct SignInsArgs {
    /// Only time, id and head counts
    #[arg(long)]
    pub lite: bool,

    /// Key the output by member id (latest sign-in per member)
    #[arg(long)]
    pub keyed: bool,
}

pub async fn run(
    args: &SignInsArgs,
    data: &ClubData<SheetsRowSource>,
    format: &OutputFormat,
) -> Result<()> {
    if args.keyed {
        let sign_ins = data.sign_ins_keyed(args.lite).await?;
        if *format == OutputFormat::Json {
            print_json(&sign_ins);
            return Ok(());
        }
        return match &sign_ins {
            Keyed::Full(map) => print_rows(&build_sign_in_rows(map.values()), format),
            Keyed::Lite(map) => print_rows(&build_sign_in_lite_rows(map.values()), format),
        };
    }

    let sign_ins = data.sign_ins(args.lite).await?;
    if *format == OutputFormat::Json {
        print_json(&sign_ins);
        return Ok(());
    }
    match &sign_ins {
        Listing::Full(items) => print_rows(&build_sign_in_rows(items), format),
        Listing::Lite(items) => print_rows(&build_sign_in_lite_rows(items), format),
    }
}
