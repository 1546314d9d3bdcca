use crate::Result;
use crate::classifier::{classify, description_text};
use crate::crawler::VacancySource;
use crate::key_skills;
use crate::models::{PostingDetail, PostingRecord, SearchParams};
use crate::salary::normalize;
use crate::taxonomy::Taxonomy;
use crate::writer::{ReportTable, export};
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Default ceiling on pages processed in one run.
pub const PAGE_CAP: u32 = 20;

const EXPERIENCE_UNKNOWN: &str = "не указан";
const REMOTE_MARKER: &str = "удален";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlSummary {
    /// Total matches reported by the search
    pub found: u64,
    pub total_pages: u32,
    /// Pages the run set out to process after applying the cap
    pub pages_planned: u32,
    pub pages_fetched: u32,
    pub pages_failed: u32,
    pub details_attempted: usize,
    pub details_failed: usize,
    pub records: usize,
    pub elapsed: Duration,
}

pub struct CrawlPipeline {
    taxonomy: Taxonomy,
    page_cap: u32,
}

#[must_use = "crawled records are dropped unless saved or taken"]
pub struct PipelineWithRecords {
    taxonomy: Taxonomy,
    records: Vec<PostingRecord>,
    summary: CrawlSummary,
}

impl CrawlPipeline {
    pub fn new(taxonomy: Taxonomy) -> Self {
        Self {
            taxonomy,
            page_cap: PAGE_CAP,
        }
    }

    pub fn page_cap(mut self, page_cap: u32) -> Self {
        self.page_cap = page_cap;
        self
    }

    /// Walks every page of the search, one request at a time.
    ///
    /// Page 0 is requested first to learn the page count. If it fails the run
    /// ends with no records. Failed pages and postings are skipped.
    pub fn crawl(self, source: impl VacancySource, mut params: SearchParams) -> PipelineWithRecords {
        let started = Instant::now();
        let mut summary = CrawlSummary::default();
        let mut records = Vec::new();

        params.page = 0;
        let Some(first_page) = source.fetch_search_page(&params) else {
            warn!("❌ could not fetch the first search page, nothing to process");
            summary.elapsed = started.elapsed();
            return PipelineWithRecords::new(self.taxonomy, records, summary);
        };

        summary.found = first_page.found;
        summary.total_pages = first_page.pages;
        summary.pages_planned = first_page.pages.min(self.page_cap);
        info!(
            found = summary.found,
            pages = summary.total_pages,
            "search for '{}' in area {}",
            params.text,
            params.area
        );

        let mut cached_first = Some(first_page);
        for page in 0..summary.pages_planned {
            params.page = page;
            info!("page {}/{}", page + 1, summary.pages_planned);

            let fetched = match cached_first.take() {
                Some(first) => Some(first),
                None => source.fetch_search_page(&params),
            };
            let Some(result) = fetched.filter(|r| !r.items.is_empty()) else {
                summary.pages_failed += 1;
                continue;
            };
            summary.pages_fetched += 1;

            for item in &result.items {
                summary.details_attempted += 1;
                let Some(detail) = source.fetch_detail(&item.id) else {
                    summary.details_failed += 1;
                    continue;
                };
                let record = self.to_record(detail);
                debug!(id = %item.id, skills = record.skills.len(), "{}", record.title);
                records.push(record);
            }
        }

        summary.records = records.len();
        summary.elapsed = started.elapsed();
        info!(
            "✅ processed {} of {} vacancies in {:.1?}",
            summary.records, summary.details_attempted, summary.elapsed
        );

        PipelineWithRecords::new(self.taxonomy, records, summary)
    }

    fn to_record(&self, detail: PostingDetail) -> PostingRecord {
        let text = detail.description.as_deref().map(description_text);
        let remote = detail
            .schedule_name()
            .is_some_and(|s| s.to_lowercase().contains(REMOTE_MARKER));

        PostingRecord {
            skills: classify(text.as_deref(), &self.taxonomy),
            salary: normalize(detail.salary.as_ref()),
            company: detail.employer_name().unwrap_or_default().to_string(),
            experience: detail.experience_name().unwrap_or(EXPERIENCE_UNKNOWN).to_string(),
            area: detail.area_name().map(str::to_string),
            key_skills: detail.key_skill_names(),
            remote,
            title: detail.name.unwrap_or_default(),
            url: detail.alternate_url.unwrap_or_default(),
        }
    }
}

impl PipelineWithRecords {
    fn new(taxonomy: Taxonomy, records: Vec<PostingRecord>, summary: CrawlSummary) -> Self {
        Self {
            taxonomy,
            records,
            summary,
        }
    }

    pub fn records(&self) -> &[PostingRecord] {
        &self.records
    }

    pub fn summary(&self) -> &CrawlSummary {
        &self.summary
    }

    pub fn taxonomy(&self) -> &Taxonomy {
        &self.taxonomy
    }

    pub fn table(&self) -> ReportTable {
        export(&self.records, &self.taxonomy)
    }

    pub fn key_skills_table(&self, min_count: usize) -> ReportTable {
        key_skills::export(&self.records, min_count)
    }

    /// Writes the technology report and keeps the pipeline for further steps.
    pub fn save_and_then(self, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        self.table()
            .write_csv(path)
            .inspect(|_| info!("✅ report saved: {}", path.display()))
            .inspect_err(|e| warn!("❌ failed to save {}: {e}", path.display()))?;
        Ok(self)
    }

    pub fn save_key_skills_and_then(self, path: impl AsRef<Path>, min_count: usize) -> Result<Self> {
        let path = path.as_ref();
        self.key_skills_table(min_count)
            .write_csv(path)
            .inspect(|_| info!("✅ key skills saved: {}", path.display()))
            .inspect_err(|e| warn!("❌ failed to save {}: {e}", path.display()))?;
        Ok(self)
    }

    pub fn save(self, path: impl AsRef<Path>) -> Result<CrawlSummary> {
        Ok(self.save_and_then(path)?.summary)
    }

    pub fn into_parts(self) -> (Vec<PostingRecord>, CrawlSummary) {
        (self.records, self.summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Named, PageResult, PostingSummary, Salary};
    use crate::taxonomy::TechId;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::collections::{HashMap, HashSet};

    /// Serves `pages` pages of `per_page` postings, failing where told to.
    #[derive(Default)]
    struct FakeSource {
        pages: u32,
        per_page: usize,
        failing_pages: HashSet<u32>,
        failing_details: HashSet<String>,
        descriptions: HashMap<String, String>,
        page_calls: RefCell<Vec<u32>>,
        detail_calls: RefCell<Vec<String>>,
    }

    impl FakeSource {
        fn new(pages: u32, per_page: usize) -> Self {
            Self {
                pages,
                per_page,
                ..Default::default()
            }
        }
    }

    impl VacancySource for FakeSource {
        fn fetch_search_page(&self, params: &SearchParams) -> Option<PageResult> {
            self.page_calls.borrow_mut().push(params.page);
            if self.failing_pages.contains(&params.page) {
                return None;
            }
            let items = (0..self.per_page)
                .map(|i| PostingSummary {
                    id: format!("{}-{}", params.page, i),
                    name: None,
                })
                .collect();
            Some(PageResult {
                found: u64::from(self.pages) * self.per_page as u64,
                pages: self.pages,
                items,
            })
        }

        fn fetch_detail(&self, posting_id: &str) -> Option<PostingDetail> {
            self.detail_calls.borrow_mut().push(posting_id.to_string());
            if self.failing_details.contains(posting_id) {
                return None;
            }
            Some(PostingDetail {
                name: Some(format!("Vacancy {posting_id}")),
                alternate_url: Some(format!("https://hh.ru/vacancy/{posting_id}")),
                description: self.descriptions.get(posting_id).cloned(),
                ..Default::default()
            })
        }
    }

    fn taxonomy() -> Taxonomy {
        Taxonomy::builder()
            .tech("PYTHON", ["python"])
            .tech("SQL", ["sql"])
            .build()
            .unwrap()
    }

    fn titles(pipeline: &PipelineWithRecords) -> Vec<String> {
        pipeline.records().iter().map(|r| r.title.clone()).collect()
    }

    #[test]
    fn failed_page_is_skipped_and_the_rest_processed() {
        let mut source = FakeSource::new(5, 2);
        source.failing_pages.insert(2);

        let result = CrawlPipeline::new(taxonomy()).crawl(&source, SearchParams::new("q", "1"));

        assert_eq!(
            titles(&result),
            [
                "Vacancy 0-0", "Vacancy 0-1", "Vacancy 1-0", "Vacancy 1-1",
                "Vacancy 3-0", "Vacancy 3-1", "Vacancy 4-0", "Vacancy 4-1",
            ]
        );
        let summary = result.summary();
        assert_eq!((summary.pages_fetched, summary.pages_failed), (4, 1));
        assert_eq!(summary.records, 8);
    }

    #[test]
    fn failed_detail_skips_only_that_posting() {
        let mut source = FakeSource::new(1, 3);
        source.failing_details.insert("0-1".to_string());

        let result = CrawlPipeline::new(taxonomy()).crawl(&source, SearchParams::new("q", "1"));

        assert_eq!(titles(&result), ["Vacancy 0-0", "Vacancy 0-2"]);
        assert_eq!(result.summary().details_failed, 1);
        assert_eq!(result.summary().details_attempted, 3);
    }

    #[test]
    fn first_page_failure_ends_with_no_records() {
        let mut source = FakeSource::new(3, 2);
        source.failing_pages.insert(0);

        let result = CrawlPipeline::new(taxonomy()).crawl(&source, SearchParams::new("q", "1"));

        assert!(result.records().is_empty());
        assert_eq!(*source.page_calls.borrow(), [0]);
        assert!(source.detail_calls.borrow().is_empty());
    }

    #[test]
    fn page_cap_bounds_the_run_and_first_page_is_reused() {
        let source = FakeSource::new(50, 1);

        let result = CrawlPipeline::new(taxonomy())
            .page_cap(3)
            .crawl(&source, SearchParams::new("q", "1"));

        assert_eq!(result.records().len(), 3);
        assert_eq!(result.summary().pages_planned, 3);
        assert_eq!(*source.page_calls.borrow(), [0, 1, 2]);
    }

    #[test]
    fn detail_becomes_a_classified_record() {
        let pipeline = CrawlPipeline::new(taxonomy());
        let detail = PostingDetail {
            name: Some("Data engineer".into()),
            alternate_url: Some("https://hh.ru/vacancy/1".into()),
            employer: Some(Named { name: Some("Acme".into()) }),
            salary: Some(Salary {
                from: Some(100000),
                to: None,
                currency: Some("rur".into()),
            }),
            experience: Some(Named { name: Some("От 1 года до 3 лет".into()) }),
            schedule: Some(Named { name: Some("Удаленная работа".into()) }),
            area: Some(Named { name: Some("Москва".into()) }),
            description: Some("<p>Knowledge of <b>Python</b> and SQL required</p>".into()),
            key_skills: vec![Named { name: Some("Airflow".into()) }],
        };

        let record = pipeline.to_record(detail);

        assert_eq!(record.company, "Acme");
        assert_eq!(record.salary.as_deref(), Some("от 100000 RUR"));
        assert!(record.remote);
        assert_eq!(record.area.as_deref(), Some("Москва"));
        assert_eq!(record.key_skills, ["Airflow"]);
        assert_eq!(
            record.skills.iter().map(TechId::as_str).collect::<Vec<_>>(),
            ["PYTHON", "SQL"]
        );
    }

    #[test]
    fn missing_detail_fields_fall_back() {
        let record = CrawlPipeline::new(taxonomy()).to_record(PostingDetail::default());
        assert_eq!(record.experience, EXPERIENCE_UNKNOWN);
        assert_eq!(record.company, "");
        assert_eq!(record.salary, None);
        assert!(!record.remote);
        assert!(record.skills.is_empty());
    }
}
