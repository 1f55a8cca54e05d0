use std::time::Duration;

use crate::config::HttpConfig;

/// Shared HTTP client. Credentials are not attached here: the archive host
/// comes from a remote response, so auth is added per request.
pub fn create_client(config: &HttpConfig) -> anyhow::Result<reqwest::Client> {
    // GitHub rejects API requests that carry no User-Agent
    let mut builder = reqwest::Client::builder().user_agent(config.user_agent.as_str());
    if let Some(secs) = config.timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }

    Ok(builder.build()?)
}
