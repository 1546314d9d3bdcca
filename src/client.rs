use crate::Result;
use serde_json::Value;
use std::time::Duration;

const DEFAULT_USER_AGENT: &str = "jd-skills/0.1 (vacancy skill report)";

/// Blocking JSON-over-HTTP transport.
///
/// Implementations return `Err` on transport failures, non-success statuses
/// and bodies that are not JSON.
pub trait HttpClient {
    fn get_json(&self, url: &str, query: &[(&str, String)]) -> Result<Value>;
}

pub struct ReqwestClient {
    inner: reqwest::blocking::Client,
}

impl ReqwestClient {
    pub fn new(user_agent: Option<&str>, timeout: Duration) -> Result<Self> {
        let inner = reqwest::blocking::Client::builder()
            .user_agent(user_agent.unwrap_or(DEFAULT_USER_AGENT))
            .timeout(timeout)
            .build()?;
        Ok(Self { inner })
    }
}

impl HttpClient for ReqwestClient {
    fn get_json(&self, url: &str, query: &[(&str, String)]) -> Result<Value> {
        let value = self
            .inner
            .get(url)
            .query(query)
            .send()?
            .error_for_status()?
            .json::<Value>()?;
        Ok(value)
    }
}
