use reqwest::StatusCode;
use reqwest::header::ACCEPT;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use url::Url;

use crate::config::ImportPlan;
use crate::error::ImportError;

/// Repository directory that holds the index archives.
const ARCHIVE_DIR: &str = "elasticsearch";

/// Content-metadata record returned by the contents endpoint. Only
/// `download_url` is used; the rest is kept for diagnostics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentMetadata {
    #[serde(default)]
    pub download_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ContentMetadata {
    pub fn download_url(&self) -> Result<Url, ImportError> {
        let Some(ref raw) = self.download_url else {
            let document = serde_json::to_string_pretty(self)?;
            return Err(ImportError::MissingDownloadUrl { document });
        };
        Url::parse(raw).map_err(|source| ImportError::InvalidUrl {
            url: raw.clone(),
            source,
        })
    }
}

pub fn archive_name(index: &str) -> String {
    format!("{index}.tar.gz")
}

/// Whether `url` is served from the same scheme, host and port as the API.
/// Credentials meant for the API are only ever sent to such URLs.
pub fn shares_origin(api_url: &str, url: &Url) -> bool {
    Url::parse(api_url)
        .map(|api| api.origin() == url.origin())
        .unwrap_or(false)
}

/// `<api>/repos/<org>/<repo>/contents/elasticsearch/<index>.tar.gz`
pub fn contents_url(
    api_url: &str,
    organization: &str,
    repository: &str,
    index: &str,
) -> Result<Url, ImportError> {
    let mut url = Url::parse(api_url).map_err(|source| ImportError::InvalidUrl {
        url: api_url.to_string(),
        source,
    })?;
    let archive = archive_name(index);
    url.path_segments_mut()
        .map_err(|_| ImportError::InvalidUrl {
            url: api_url.to_string(),
            source: url::ParseError::RelativeUrlWithCannotBeABaseBase,
        })?
        .pop_if_empty()
        .extend([
            "repos",
            organization,
            repository,
            "contents",
            ARCHIVE_DIR,
            archive.as_str(),
        ]);
    Ok(url)
}

pub struct ContentsLocator {
    http: reqwest::Client,
    api_url: String,
    token: Option<String>,
}

impl ContentsLocator {
    pub fn new(http: reqwest::Client, api_url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            http,
            api_url: api_url.into(),
            token,
        }
    }

    /// Look up the archive for `plan.index` and resolve its direct download URL.
    pub async fn locate(&self, plan: &ImportPlan) -> Result<Url, ImportError> {
        let metadata = self.fetch_metadata(plan).await?;
        let url = metadata.download_url()?;
        tracing::debug!(
            "Resolved {} ({} bytes) to {url}",
            metadata.name.as_deref().unwrap_or("archive"),
            metadata.size.unwrap_or_default()
        );
        Ok(url)
    }

    pub async fn fetch_metadata(&self, plan: &ImportPlan) -> Result<ContentMetadata, ImportError> {
        let url = contents_url(
            &self.api_url,
            &plan.organization,
            &plan.repository,
            &plan.index,
        )?;
        tracing::debug!("Fetching archive metadata from {url}");

        let mut request = self
            .http
            .get(url)
            .header(ACCEPT, "application/vnd.github+json");
        if let Some(ref token) = self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(ImportError::UnexpectedStatus {
                what: format!("metadata for {}", archive_name(&plan.index)),
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json::<ContentMetadata>().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_contents_url_layout() {
        let url = contents_url(
            "https://api.github.com",
            "opencybersecurityalliance",
            "data-bucket-kestrel",
            "sample",
        )
        .unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.github.com/repos/opencybersecurityalliance/data-bucket-kestrel/contents/elasticsearch/sample.tar.gz"
        );
    }

    #[test]
    fn test_contents_url_keeps_base_path_and_encodes_segments() {
        let url = contents_url("http://localhost:8080/api/", "acme", "my repo", "a/b").unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8080/api/repos/acme/my%20repo/contents/elasticsearch/a%2Fb.tar.gz"
        );
    }

    #[test]
    fn test_contents_url_rejects_garbage_base() {
        assert!(matches!(
            contents_url("not a url", "o", "r", "i"),
            Err(ImportError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn test_shares_origin() {
        let api = "https://api.github.com";
        assert!(shares_origin(
            api,
            &Url::parse("https://api.github.com/repos/x").unwrap()
        ));
        assert!(!shares_origin(
            api,
            &Url::parse("https://raw.githubusercontent.com/x/sample.tar.gz").unwrap()
        ));
        assert!(!shares_origin(
            api,
            &Url::parse("http://api.github.com/x").unwrap()
        ));
        assert!(!shares_origin(
            "http://127.0.0.1:8080",
            &Url::parse("http://127.0.0.1:9090/x").unwrap()
        ));
        assert!(!shares_origin("not a url", &Url::parse("http://x/").unwrap()));
    }

    #[test]
    fn test_missing_download_url_reports_document() {
        let metadata: ContentMetadata = serde_json::from_value(json!({
            "name": "sample.tar.gz",
            "type": "file",
            "download_url": null
        }))
        .unwrap();

        match metadata.download_url() {
            Err(ImportError::MissingDownloadUrl { document }) => {
                assert!(document.contains("\"type\": \"file\""));
                assert!(document.contains("sample.tar.gz"));
            }
            other => panic!("expected MissingDownloadUrl, got {other:?}"),
        }
    }

    #[test]
    fn test_download_url_is_parsed() {
        let metadata: ContentMetadata =
            serde_json::from_value(json!({ "download_url": "http://x/sample.tar.gz" })).unwrap();
        assert_eq!(
            metadata.download_url().unwrap().as_str(),
            "http://x/sample.tar.gz"
        );
        assert!(metadata.extra.is_empty());
    }
}
