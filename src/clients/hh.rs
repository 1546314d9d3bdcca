use crate::Result;
use crate::client::{HttpClient, ReqwestClient};
use crate::crawler::VacancySource;
use crate::models::{MAX_PER_PAGE, PageResult, PostingDetail, SearchParams};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct HhCrawlConfig {
    pub base_url: String,
    pub user_agent: Option<String>,
    /// Region code, `1` is Moscow
    pub area: String,
    pub per_page: u32,
    /// Pause after every successful detail request
    pub detail_delay: Duration,
    pub timeout: Duration,
}

impl Default for HhCrawlConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.hh.ru".to_string(),
            user_agent: None,
            area: "1".to_string(),
            per_page: MAX_PER_PAGE,
            detail_delay: Duration::from_millis(500),
            timeout: Duration::from_secs(30),
        }
    }
}

impl HhCrawlConfig {
    pub fn search_params(&self, text: impl Into<String>) -> SearchParams {
        SearchParams::new(text, self.area.clone()).with_per_page(self.per_page)
    }
}

/// Vacancy search against the hh.ru public API.
pub struct HhClient<C = ReqwestClient> {
    http: C,
    config: HhCrawlConfig,
}

impl HhClient<ReqwestClient> {
    pub fn new(config: HhCrawlConfig) -> Result<Self> {
        let http = ReqwestClient::new(config.user_agent.as_deref(), config.timeout)?;
        Ok(Self::with_http(http, config))
    }
}

impl<C: HttpClient> HhClient<C> {
    pub fn with_http(http: C, config: HhCrawlConfig) -> Self {
        Self { http, config }
    }

    pub fn config(&self) -> &HhCrawlConfig {
        &self.config
    }

    fn base(&self) -> &str {
        self.config.base_url.trim_end_matches('/')
    }

    fn get<T: DeserializeOwned>(&self, url: &str, query: &[(&str, String)]) -> Result<T> {
        let value = self.http.get_json(url, query)?;
        Ok(serde_json::from_value(value)?)
    }
}

impl<C: HttpClient> VacancySource for HhClient<C> {
    fn fetch_search_page(&self, params: &SearchParams) -> Option<PageResult> {
        let url = format!("{}/vacancies", self.base());
        self.get::<PageResult>(&url, &params.to_query())
            .inspect(|page| debug!(page = params.page, items = page.items.len(), "search page"))
            .inspect_err(|e| warn!(page = params.page, "❌ search request failed: {e}"))
            .ok()
    }

    fn fetch_detail(&self, posting_id: &str) -> Option<PostingDetail> {
        let url = format!("{}/vacancies/{}", self.base(), posting_id);
        let detail = self
            .get::<PostingDetail>(&url, &[])
            .inspect_err(|e| warn!(posting_id, "❌ vacancy request failed: {e}"))
            .ok()?;

        std::thread::sleep(self.config.detail_delay);
        Some(detail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use serde_json::{Value, json};
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::time::Instant;

    #[derive(Default)]
    struct FakeHttp {
        responses: HashMap<String, Value>,
        calls: RefCell<Vec<(String, Vec<(String, String)>)>>,
    }

    impl FakeHttp {
        fn respond(mut self, url: &str, body: Value) -> Self {
            self.responses.insert(url.to_string(), body);
            self
        }
    }

    impl HttpClient for FakeHttp {
        fn get_json(&self, url: &str, query: &[(&str, String)]) -> Result<Value> {
            self.calls.borrow_mut().push((
                url.to_string(),
                query.iter().map(|(k, v)| (k.to_string(), v.clone())).collect(),
            ));
            self.responses
                .get(url)
                .cloned()
                .ok_or_else(|| Error::NotFound(url.into()))
        }
    }

    fn config(delay: Duration) -> HhCrawlConfig {
        HhCrawlConfig {
            base_url: "http://hh.test/".to_string(),
            detail_delay: delay,
            ..Default::default()
        }
    }

    #[test]
    fn search_page_sends_all_parameters() {
        let http = FakeHttp::default().respond(
            "http://hh.test/vacancies",
            json!({"found": 250, "pages": 3, "items": [{"id": "1"}, {"id": "2"}]}),
        );
        let client = HhClient::with_http(http, config(Duration::ZERO));

        let mut params = client.config().search_params("rust бэкенд");
        params.page = 2;
        let page = client.fetch_search_page(&params).unwrap();

        assert_eq!((page.found, page.pages, page.items.len()), (250, 3, 2));
        let calls = client.http.calls.borrow();
        let query: HashMap<_, _> = calls[0].1.iter().cloned().collect();
        assert_eq!(query["text"], "rust бэкенд");
        assert_eq!(query["page"], "2");
        assert_eq!(query["per_page"], "100");
        assert_eq!(query["area"], "1");
    }

    #[test]
    fn failed_or_malformed_calls_come_back_empty() {
        let http = FakeHttp::default().respond("http://hh.test/vacancies", json!({"items": "nope"}));
        let client = HhClient::with_http(http, config(Duration::ZERO));

        assert!(client.fetch_search_page(&client.config().search_params("x")).is_none());
        assert!(client.fetch_detail("42").is_none());
    }

    #[test]
    fn delay_applies_only_after_successful_detail() {
        let http = FakeHttp::default().respond(
            "http://hh.test/vacancies/7",
            json!({"name": "Dev", "description": "<p>Rust</p>"}),
        );
        let client = HhClient::with_http(http, config(Duration::from_millis(200)));

        let started = Instant::now();
        assert!(client.fetch_detail("404").is_none());
        assert!(started.elapsed() < Duration::from_millis(200));

        let started = Instant::now();
        let detail = client.fetch_detail("7").unwrap();
        assert!(started.elapsed() >= Duration::from_millis(200));
        assert_eq!(detail.name.as_deref(), Some("Dev"));
    }
}
