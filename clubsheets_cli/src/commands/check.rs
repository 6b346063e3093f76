use anyhow::{bail, Result};
use clubsheets_lib::{ClubData, SheetsRowSource};

use crate::output::{build_prefetch_rows, print_rows, OutputFormat};

pub async fn run(data: &ClubData<SheetsRowSource>, format: &OutputFormat) -> Result<()> {
    let outcomes: Vec<_> = data
        .prefetch()
        .await
        .into_iter()
        .map(|outcome| {
            let range = data.fetcher(outcome.dataset).range().to_string();
            (outcome, range)
        })
        .collect();

    print_rows(&build_prefetch_rows(&outcomes), format)?;

    let failed = outcomes.iter().filter(|(o, _)| o.result.is_err()).count();
    if failed > 0 {
        bail!("{} of {} datasets could not be fetched", failed, outcomes.len());
    }
    Ok(())
}
