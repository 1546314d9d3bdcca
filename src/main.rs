use clap::{Args, Parser, Subcommand};
use jd_skills::logging::init_logging;
use jd_skills::{
    CrawlPipeline, Error, HhClient, HhCrawlConfig, PAGE_CAP, ReportTable, Result, Specialization,
    SqliteImporter, Taxonomy,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{info, warn};

#[derive(Debug, Parser)]
#[command(
    name = "jd-skills",
    version,
    about = "Collect hh.ru vacancies and tag them with the technologies they mention"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Errors only
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Search vacancies and write the technology report
    Crawl(CrawlArgs),
    /// Load a report CSV into a SQLite table
    Import(ImportArgs),
}

#[derive(Debug, Args)]
struct CrawlArgs {
    /// Vacancy title to search for
    #[arg(long)]
    query: String,

    /// analyst, frontend, backend or security (Russian names work too)
    #[arg(long)]
    specialization: Option<Specialization>,

    /// Region code, 1 is Moscow
    #[arg(long, default_value = "1")]
    area: String,

    #[arg(long, default_value_t = PAGE_CAP)]
    page_cap: u32,

    #[arg(long, default_value_t = 100)]
    per_page: u32,

    /// Pause after each vacancy request
    #[arg(long, default_value_t = 500)]
    delay_ms: u64,

    #[arg(long, env = "JD_SKILLS_USER_AGENT")]
    user_agent: Option<String>,

    /// Report path, defaults to `<specialization>_vacancies.csv`
    #[arg(long)]
    out: Option<PathBuf>,

    /// Also write the employer key-skills report here
    #[arg(long)]
    key_skills_out: Option<PathBuf>,

    /// Key skills listed by this many vacancies or fewer are left out
    #[arg(long, default_value_t = 1)]
    min_skill_count: usize,
}

#[derive(Debug, Args)]
struct ImportArgs {
    #[arg(long)]
    csv: PathBuf,

    #[arg(long, default_value = "database.db")]
    db: PathBuf,

    #[arg(long, default_value = "vacancies")]
    table: String,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "info"
    });

    let result = match cli.command {
        Command::Crawl(args) => crawl(args),
        Command::Import(args) => import(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if e.is_not_found() => {
            eprintln!("jd-skills: {e}");
            ExitCode::from(2)
        }
        Err(e) => {
            eprintln!("jd-skills error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn crawl(args: CrawlArgs) -> Result<()> {
    let (taxonomy, text, default_out) = match args.specialization {
        Some(spec) => (
            Taxonomy::for_specialization(spec)?,
            format!("{} {}", args.query, spec.to_word()),
            format!("{}_vacancies.csv", spec.to_word()),
        ),
        None => (
            Taxonomy::general()?,
            args.query.clone(),
            "vacancies_report.csv".to_string(),
        ),
    };

    let client = HhClient::new(HhCrawlConfig {
        area: args.area,
        per_page: args.per_page,
        detail_delay: Duration::from_millis(args.delay_ms),
        user_agent: args.user_agent,
        ..Default::default()
    })?;
    let params = client.config().search_params(text);

    let mut pipeline = CrawlPipeline::new(taxonomy)
        .page_cap(args.page_cap)
        .crawl(&client, params);

    if pipeline.records().is_empty() {
        warn!("no vacancies collected, the report will only have a header");
    }
    if let Some(path) = &args.key_skills_out {
        pipeline = pipeline.save_key_skills_and_then(path, args.min_skill_count)?;
    }

    let out = args.out.unwrap_or_else(|| PathBuf::from(default_out));
    let summary = pipeline.save(&out)?;
    info!(
        "processed {} of {} vacancies ({} found, {} pages skipped)",
        summary.records, summary.details_attempted, summary.found, summary.pages_failed
    );
    Ok(())
}

fn import(args: ImportArgs) -> Result<()> {
    // Missing source must fail before the database file gets created.
    let table = ReportTable::read_csv(&args.csv)?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        let importer = SqliteImporter::open(&args.db).await?;
        let result = importer.import(&args.table, &table).await;
        importer.close().await;

        let rows = result?;
        info!(
            "imported {rows} rows from {} into {}:{}",
            args.csv.display(),
            args.db.display(),
            args.table
        );
        Ok::<(), Error>(())
    })
}
