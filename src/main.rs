use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use aidreport_pdf::publish::{
    JsonLinesMetadata, LocalDirectory, Sinks, ensure_distinct_targets, persist,
};
use aidreport_pdf::{Error, FontSource, RenderOptions, ReportRequest, render, render_all};

#[derive(Parser)]
#[command(name = "aidreport-pdf")]
#[command(version, about = "Render paginated PDF reports for orders, deliveries and stock", long_about = None)]
struct Cli {
    /// TrueType/OpenType font to embed instead of Helvetica (also AIDREPORT_FONT)
    #[arg(long, global = true)]
    font: Option<PathBuf>,

    /// Bold face for the header (also AIDREPORT_FONT_BOLD)
    #[arg(long, global = true, requires = "font")]
    bold_font: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render one JSON report request to a PDF file
    Render {
        /// Request file: {"report_type": ..., "period": {...}, "records": [...]}
        request: PathBuf,

        /// Output PDF path
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Render requests and store them under a local directory with metadata
    Publish {
        /// One or more request files
        #[arg(required = true)]
        requests: Vec<PathBuf>,

        /// Storage root; documents go under <dir>/reports/
        #[arg(short, long)]
        dir: PathBuf,

        /// Recorded as the report's generator
        #[arg(long, default_value = "cli")]
        by: String,
    },
}

fn font_source(cli: &Cli) -> Result<FontSource, Error> {
    match &cli.font {
        Some(regular) => FontSource::from_files(regular.clone(), cli.bold_font.clone()),
        None => FontSource::from_env(),
    }
}

fn read_request(path: &PathBuf) -> Result<ReportRequest, Error> {
    let input = std::fs::read_to_string(path)?;
    ReportRequest::from_json(&input)
}

fn run(cli: Cli) -> Result<(), Error> {
    let options = RenderOptions {
        fonts: font_source(&cli)?,
        render_time: None,
    };

    match cli.command {
        Commands::Render { request, output } => {
            let request = read_request(&request)?;
            let document = render(&request, &options)?;
            std::fs::write(&output, &document.bytes)?;
            println!(
                "{} -> {} ({} pages, {} records)",
                document.title,
                output.display(),
                document.page_count,
                document.record_count
            );
        }
        Commands::Publish { requests, dir, by } => {
            let generated_at = chrono::Utc::now();
            let options = RenderOptions {
                render_time: Some(generated_at),
                ..options
            };
            let parsed = requests
                .iter()
                .map(read_request)
                .collect::<Result<Vec<_>, _>>()?;
            ensure_distinct_targets(&parsed)?;

            let store = LocalDirectory::new(&dir);
            let metadata = JsonLinesMetadata::new(dir.join("reports.jsonl"));
            let sinks = Sinks {
                store: &store,
                urls: &store,
                metadata: &metadata,
            };

            let mut failures = 0;
            for (path, result) in requests.iter().zip(render_all(&parsed, &options)) {
                match result.and_then(|doc| persist(doc, &by, generated_at, sinks)) {
                    Ok(published) => println!(
                        "{} -> {}",
                        published.metadata.title, published.metadata.file_url
                    ),
                    Err(e) => {
                        failures += 1;
                        log::error!("{}: {e}", path.display());
                    }
                }
            }
            if failures > 0 {
                return Err(Error::PublishIncomplete {
                    failed: failures,
                    total: requests.len(),
                });
            }
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
