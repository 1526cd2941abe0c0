//! Client side of the branch/file data service.

use std::time::Duration;

use reqwest::blocking::Client;
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use url::Url;

use vc_base::config::constants::{HTTP_MAX_ATTEMPTS, HTTP_RETRY_DELAY_MS};
use vc_base::errors::ApiError;
use vc_base::types::{Branch, BranchEnvelope, BranchesEnvelope, FileResponse};

/// Source of branch snapshots and file contents.
///
/// Calls block; the fetcher runs them on worker threads.
pub trait VersionControlApi: Send + Sync {
    fn list_branches(&self) -> Result<Vec<Branch>, ApiError>;

    /// `id` is a branch name or `current` for the checked-out branch.
    fn get_branch(&self, id: &str) -> Result<Branch, ApiError>;

    /// Content of `path` and its content at `base_branch`. Application errors
    /// (e.g. unknown base) come back inside the response, not as `Err`.
    fn get_file(&self, path: &str, base_branch: &str) -> Result<FileResponse, ApiError>;

    /// Short label for the status bar.
    fn describe(&self) -> String;
}

/// REST client for `{base}/api/git_branches` and `{base}/api/git_files`.
pub struct HttpApi {
    client: Client,
    base: Url,
    api_key: Option<SecretString>,
}

impl HttpApi {
    pub fn new(base_url: &str, api_key: Option<SecretString>, timeout_secs: u64) -> Result<Self, ApiError> {
        let mut base = Url::parse(base_url).map_err(|e| ApiError::InvalidUrl(format!("{}: {}", base_url, e)))?;
        if base.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(base_url.to_string()));
        }
        // Treat the configured root as a directory so segments are appended to it
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        Ok(Self { client, base, api_key })
    }

    /// `{base}/api/<segments...>` with each segment percent-escaped (`/` included).
    pub fn endpoint(&self, segments: &[&str], query: &[(&str, &str)]) -> Result<Url, ApiError> {
        let mut url = self.base.clone();
        {
            let mut path = url.path_segments_mut().map_err(|_| ApiError::InvalidUrl(self.base.to_string()))?;
            path.pop_if_empty().push("api");
            for segment in segments {
                path.push(segment);
            }
        }
        {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
            if let Some(key) = &self.api_key {
                pairs.append_pair("api_key", key.expose_secret());
            }
        }
        if url.query() == Some("") {
            url.set_query(None);
        }
        Ok(url)
    }

    /// GET with 5xx retry.
    fn get_with_retry(&self, url: Url) -> Result<String, ApiError> {
        for attempt in 0..HTTP_MAX_ATTEMPTS {
            let resp = self
                .client
                .get(url.clone())
                .header("Accept", "application/json")
                .send()
                .map_err(|e| ApiError::Transport(e.to_string()))?;

            let status = resp.status().as_u16();
            let body = resp.text().map_err(|e| ApiError::Transport(e.to_string()))?;

            match status {
                200..=299 => return Ok(body),
                500..=599 if attempt + 1 < HTTP_MAX_ATTEMPTS => {
                    tracing::debug!(path = url.path(), status, attempt, "server error, retrying");
                    std::thread::sleep(Duration::from_millis(HTTP_RETRY_DELAY_MS));
                    continue;
                }
                _ => return Err(ApiError::Status { status, body: truncate(&body, 200).to_string() }),
            }
        }
        Err(ApiError::RetriesExhausted)
    }
}

impl VersionControlApi for HttpApi {
    fn list_branches(&self) -> Result<Vec<Branch>, ApiError> {
        let body = self.get_with_retry(self.endpoint(&["git_branches"], &[])?)?;
        let envelope: BranchesEnvelope =
            serde_json::from_str(&body).map_err(|source| ApiError::Decode { what: "git_branches", source })?;
        Ok(envelope.git_branches)
    }

    fn get_branch(&self, id: &str) -> Result<Branch, ApiError> {
        let body = self.get_with_retry(self.endpoint(&["git_branches", id], &[])?)?;
        let envelope: BranchEnvelope =
            serde_json::from_str(&body).map_err(|source| ApiError::Decode { what: "git_branch", source })?;
        Ok(envelope.git_branch.unwrap_or_default())
    }

    fn get_file(&self, path: &str, base_branch: &str) -> Result<FileResponse, ApiError> {
        let url = self.endpoint(&["git_files", path], &[("base_branch", base_branch)])?;
        let body = self.get_with_retry(url)?;
        let raw: Value = serde_json::from_str(&body).map_err(|source| ApiError::Decode { what: "git_file", source })?;
        FileResponse::from_value(raw).map_err(|source| ApiError::Decode { what: "git_file", source })
    }

    fn describe(&self) -> String {
        self.base.as_str().trim_end_matches('/').to_string()
    }
}

fn truncate(s: &str, max: usize) -> &str {
    if s.len() <= max { s } else { &s[..s.floor_char_boundary(max)] }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(base: &str, key: Option<&str>) -> HttpApi {
        HttpApi::new(base, key.map(|k| SecretString::from(k.to_string())), 5).unwrap()
    }

    #[test]
    fn branch_endpoints() {
        let api = api("http://localhost:6789", None);
        assert_eq!(api.endpoint(&["git_branches"], &[]).unwrap().as_str(), "http://localhost:6789/api/git_branches");
        assert_eq!(
            api.endpoint(&["git_branches", "current"], &[]).unwrap().as_str(),
            "http://localhost:6789/api/git_branches/current"
        );
    }

    #[test]
    fn file_path_is_escaped_as_one_segment() {
        let api = api("http://localhost:6789/", None);
        let url = api.endpoint(&["git_files", "/dir/a b.py"], &[("base_branch", "td--version_control")]).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:6789/api/git_files/%2Fdir%2Fa%20b.py?base_branch=td--version_control"
        );
    }

    #[test]
    fn base_path_prefix_is_kept() {
        let api = api("https://host/mage", None);
        assert_eq!(api.endpoint(&["git_branches"], &[]).unwrap().as_str(), "https://host/mage/api/git_branches");
    }

    #[test]
    fn api_key_is_appended_to_query() {
        let api = api("http://localhost:6789", Some("k3y"));
        assert_eq!(
            api.endpoint(&["git_branches"], &[]).unwrap().as_str(),
            "http://localhost:6789/api/git_branches?api_key=k3y"
        );
    }

    #[test]
    fn invalid_base_is_rejected() {
        assert!(matches!(HttpApi::new("not a url", None, 5), Err(ApiError::InvalidUrl(_))));
    }
}
