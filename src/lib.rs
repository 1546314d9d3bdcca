pub mod classifier;
pub mod client;
pub mod clients;
pub mod crawler;
pub mod error;
pub mod importer;
pub mod key_skills;
pub mod logging;
pub mod models;
pub mod pipeline;
pub mod salary;
pub mod taxonomy;
pub mod writer;

pub use classifier::classify;
pub use client::{HttpClient, ReqwestClient};
pub use clients::{HhClient, HhCrawlConfig};
pub use crawler::VacancySource;
pub use error::Error;
pub use importer::{OrderedSchema, SqliteImporter};
pub use models::{PageResult, PostingDetail, PostingRecord, PostingSummary, Salary, SearchParams};
pub use pipeline::{CrawlPipeline, CrawlSummary, PAGE_CAP, PipelineWithRecords};
pub use taxonomy::{Specialization, Taxonomy, TechId};
pub use writer::{ReportTable, export};

pub type Result<T> = std::result::Result<T, Error>;
