use futures::TryStreamExt;
use reqwest::StatusCode;
use std::path::{Path, PathBuf};
use tokio_util::io::{StreamReader, SyncIoBridge};
use url::Url;

use crate::archive::unpack::unpack_archive;
use crate::error::ImportError;
use crate::source::locator::archive_name;

/// Stream the archive at `download_url` straight into `target_dir`.
///
/// The body is never buffered whole or saved as a `.tar.gz`; bytes flow from
/// the socket through gunzip and untar on a blocking worker. `token` is sent
/// as a bearer token when given; callers decide whether the host may see it.
pub async fn fetch_and_unpack(
    http: &reqwest::Client,
    download_url: &Url,
    token: Option<&str>,
    target_dir: &Path,
    index: &str,
) -> Result<Vec<PathBuf>, ImportError> {
    let mut request = http.get(download_url.clone());
    if let Some(token) = token {
        request = request.bearer_auth(token);
    }
    let response = request.send().await?;
    let status = response.status();
    if status != StatusCode::OK {
        let body = response.text().await.unwrap_or_default();
        return Err(ImportError::UnexpectedStatus {
            what: archive_name(index),
            status: status.as_u16(),
            body,
        });
    }
    tracing::info!("Got archive for index {index}");

    let stream = response.bytes_stream().map_err(std::io::Error::other);
    let reader = SyncIoBridge::new(StreamReader::new(Box::pin(stream)));
    let target_dir = target_dir.to_path_buf();

    let written =
        tokio::task::spawn_blocking(move || unpack_archive(reader, &target_dir)).await??;
    tracing::info!("Extracted {} archive entries", written.len());
    Ok(written)
}
