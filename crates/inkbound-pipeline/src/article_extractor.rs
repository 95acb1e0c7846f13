use async_trait::async_trait;

/// Article content returned by the extractor collaborator.
#[derive(Debug, Clone)]
pub struct Extracted {
    pub title: String,
    pub domain: String,
    pub author: Option<String>,
    pub html: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("extractor request failed: {0}")]
    Request(String),
    #[error("extractor returned an unparseable response: {0}")]
    Parse(String),
}

impl ExtractError {
    /// Whether this failure is worth retrying. Request-level failures
    /// (timeouts, connection resets, 5xx) are transient; a response the
    /// extractor deliberately rejected or we can't parse is not.
    pub fn is_transient(&self) -> bool {
        matches!(self, ExtractError::Request(_))
    }
}

/// External readable-article extraction service.
///
/// The core depends only on this contract, not on any specific vendor:
/// `extract(url) -> (title, domain, author?, html)`.
#[async_trait]
pub trait ArticleExtractor: Send + Sync {
    async fn extract(&self, url: &str) -> Result<Extracted, ExtractError>;

    /// Used when the caller already supplied HTML, bypassing the remote fetch.
    async fn extract_with_content(&self, url: &str, content: &str) -> Result<Extracted, ExtractError>;
}

/// Default HTTP-backed implementation, shaped like a generic
/// "readability-style" POST API.
pub struct HttpArticleExtractor {
    client: reqwest::Client,
    endpoint: String,
    token: String,
}

impl HttpArticleExtractor {
    pub fn new(client: reqwest::Client, endpoint: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            token: token.into(),
        }
    }

    async fn post(&self, body: serde_json::Value) -> Result<Extracted, ExtractError> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await
            .map_err(|err| ExtractError::Request(err.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let transient = status.is_server_error() || status == reqwest::StatusCode::REQUEST_TIMEOUT;
            return if transient {
                Err(ExtractError::Request(format!("extractor returned {status}")))
            } else {
                Err(ExtractError::Parse(format!("extractor rejected request with {status}")))
            };
        }

        let parsed: ExtractorResponse = response
            .json()
            .await
            .map_err(|err| ExtractError::Parse(err.to_string()))?;

        Ok(Extracted {
            title: parsed.title,
            domain: parsed.domain,
            author: parsed.author,
            html: parsed.content,
        })
    }
}

#[async_trait]
impl ArticleExtractor for HttpArticleExtractor {
    async fn extract(&self, url: &str) -> Result<Extracted, ExtractError> {
        self.post(serde_json::json!({ "url": url })).await
    }

    async fn extract_with_content(&self, url: &str, content: &str) -> Result<Extracted, ExtractError> {
        self.post(serde_json::json!({ "url": url, "content": content }))
            .await
    }
}

#[derive(Debug, serde::Deserialize)]
struct ExtractorResponse {
    title: String,
    domain: String,
    #[serde(default)]
    author: Option<String>,
    content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_errors_are_transient() {
        assert!(ExtractError::Request("timeout".to_string()).is_transient());
    }

    #[test]
    fn parse_errors_are_not_transient() {
        assert!(!ExtractError::Parse("bad json".to_string()).is_transient());
    }
}
