use anyhow::Result;
use clap::Args;
use clubsheets_lib::{ClubData, Keyed, Listing, Member, MemberLite, SheetsRowSource};

use crate::output::{build_member_lite_rows, build_member_rows, print_json, print_rows, OutputFormat};

#[derive(Args)]
pub struct MembersArgs {
    /// Only identity and display fields
    #[arg(long)]
    pub lite: bool,

    /// Only members whose account is eligible to reserve
    #[arg(long, conflicts_with = "all")]
    pub paid: bool,

    /// Every row of the members sheet, with or without an account
    #[arg(long)]
    pub all: bool,

    /// Key the output by member id (last row wins on duplicates)
    #[arg(long)]
    pub keyed: bool,
}

pub async fn run(
    args: &MembersArgs,
    data: &ClubData<SheetsRowSource>,
    format: &OutputFormat,
) -> Result<()> {
    if args.keyed {
        let members = if args.paid {
            data.paid_members_keyed(args.lite).await?
        } else if args.all {
            data.roster(args.lite).await?.into()
        } else {
            data.members_keyed(args.lite).await?
        };
        return print_keyed(&members, format);
    }

    let members = if args.paid {
        data.paid_members(args.lite).await?
    } else if args.all {
        data.roster(args.lite).await?
    } else {
        data.members(args.lite).await?
    };
    print_listing(&members, format)
}

fn print_listing(members: &Listing<Member, MemberLite>, format: &OutputFormat) -> Result<()> {
    if *format == OutputFormat::Json {
        print_json(members);
        return Ok(());
    }
    match members {
        Listing::Full(items) => print_rows(&build_member_rows(items), format),
        Listing::Lite(items) => print_rows(&build_member_lite_rows(items), format),
    }
}

fn print_keyed(members: &Keyed<Member, MemberLite>, format: &OutputFormat) -> Result<()> {
    if *format == OutputFormat::Json {
        print_json(members);
        return Ok(());
    }
    match members {
        Keyed::Full(map) => print_rows(&build_member_rows(map.values()), format),
        Keyed::Lite(map) => print_rows(&build_member_lite_rows(map.values()), format),
    }
}
