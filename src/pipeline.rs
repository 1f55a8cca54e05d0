use std::path::PathBuf;

use crate::archive::fetch::fetch_and_unpack;
use crate::config::{AppConfig, ImportPlan};
use crate::error::ImportError;
use crate::es::mapping::patch_mapping_file;
use crate::source::locator::{ContentsLocator, shares_origin};

#[derive(Debug)]
pub struct ImportReport {
    /// Archive entries written, relative to the target directory
    pub entries: Vec<PathBuf>,
    pub mapping_file: PathBuf,
}

/// locate -> download + extract -> patch. The first failure ends the run;
/// whatever was already extracted stays on disk.
pub async fn run(
    http: &reqwest::Client,
    plan: &ImportPlan,
    config: &AppConfig,
) -> Result<ImportReport, ImportError> {
    let api_url = config.source.api_url.as_str();
    let token = config.http.token.as_deref();

    let locator = ContentsLocator::new(http.clone(), api_url, token.map(str::to_owned));
    let download_url = locator.locate(plan).await?;

    // The download host comes from the metadata response; only hand it the
    // token when it is the API host itself.
    let download_token = token.filter(|_| shares_origin(api_url, &download_url));
    if token.is_some() && download_token.is_none() {
        tracing::debug!("Not sending API token to {}", download_url.origin().ascii_serialization());
    }

    let entries = fetch_and_unpack(
        http,
        &download_url,
        download_token,
        &plan.directory,
        &plan.index,
    )
    .await?;

    let mapping_file = patch_mapping_file(&plan.directory, &plan.index).await?;

    Ok(ImportReport {
        entries,
        mapping_file,
    })
}
