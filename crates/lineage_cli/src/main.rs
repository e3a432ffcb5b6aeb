//! `lineage` command-line entry point.
//!
//! # Responsibility
//! - Map flags (and `LINEAGE_*` environment variables) onto core configuration.
//! - Run one load cycle per invocation and report failures with an exit status.

use clap::{Args, Parser, Subcommand};
use lineage_core::{
    core_version, default_log_level, init_logging, Canvas, ConfigError, DefaultFetcher,
    LineageConfig, LineageService, LoadRequest, ParseMode, ProfilePanel, ProfileSection,
    RenderTarget,
};
use log::info;
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "lineage",
    version,
    about = "Render a family-lineage tree from people and relationship tables"
)]
struct Cli {
    /// trace|debug|info|warn|error
    #[arg(long, global = true, env = "LINEAGE_LOG_LEVEL")]
    log_level: Option<String>,
    /// Write rotating log files here instead of stderr.
    #[arg(long, global = true, env = "LINEAGE_LOG_DIR")]
    log_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Args)]
struct SourceArgs {
    /// People table: file path or http(s) URL.
    #[arg(long, env = "LINEAGE_PEOPLE")]
    people: String,
    /// Relationships table.
    #[arg(long, env = "LINEAGE_RELATIONSHIPS")]
    relationships: Option<String>,
    /// Events table (profile timeline).
    #[arg(long, env = "LINEAGE_EVENTS")]
    events: Option<String>,
    /// Extended profile records.
    #[arg(long, env = "LINEAGE_PROFILES")]
    profiles: Option<String>,
}

impl SourceArgs {
    fn to_request(&self) -> LoadRequest {
        LoadRequest {
            people: self.people.clone(),
            relationships: self.relationships.clone(),
            events: self.events.clone(),
            profiles: self.profiles.clone(),
        }
    }
}

#[derive(Debug, Args)]
struct BuildArgs {
    /// attach-under-each|first-parent-wins
    #[arg(long, env = "LINEAGE_MULTI_PARENT")]
    multi_parent: Option<String>,
    /// truncate|reject
    #[arg(long, env = "LINEAGE_CYCLES")]
    cycles: Option<String>,
    /// Fail on the first malformed row instead of skipping it.
    #[arg(long)]
    strict: bool,
    /// Label of the synthetic root.
    #[arg(long, env = "LINEAGE_ROOT_LABEL")]
    root_label: Option<String>,
}

impl BuildArgs {
    fn to_config(&self, format: Option<&str>) -> Result<LineageConfig, ConfigError> {
        let mut config = LineageConfig::default().apply_named(
            self.multi_parent.as_deref(),
            self.cycles.as_deref(),
            format,
        )?;
        if self.strict {
            config = config.with_parse_mode(ParseMode::Strict);
        }
        if let Some(label) = &self.root_label {
            config = config.with_root_label(label);
        }
        Ok(config)
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Build the tree and write it as svg, text or json.
    Render {
        #[command(flatten)]
        sources: SourceArgs,
        #[command(flatten)]
        build: BuildArgs,
        /// Output file; stdout when omitted.
        #[arg(long, short)]
        output: Option<PathBuf>,
        /// svg|text|json
        #[arg(long, env = "LINEAGE_FORMAT")]
        format: Option<String>,
        #[arg(long)]
        width: Option<u32>,
        #[arg(long)]
        height: Option<u32>,
    },
    /// Show one person's profile panel.
    Profile {
        /// Person identifier.
        id: String,
        #[command(flatten)]
        sources: SourceArgs,
        #[command(flatten)]
        build: BuildArgs,
        /// summary|socio_economic|history|migration|sources|genetic_evidence
        #[arg(long, default_value = "summary")]
        tab: String,
    },
    /// Print ingest and build counters as JSON.
    Inspect {
        #[command(flatten)]
        sources: SourceArgs,
        #[command(flatten)]
        build: BuildArgs,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| default_log_level().to_string());
    let log_dir = cli.log_dir.as_ref().map(|dir| absolute(dir));
    if let Err(err) = init_logging(&level, log_dir.as_deref()) {
        eprintln!("lineage: {err}");
        return ExitCode::FAILURE;
    }
    info!(
        "event=cli_start module=cli status=ok version={}",
        core_version()
    );

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("lineage: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> Result<(), Box<dyn Error>> {
    match command {
        Command::Render {
            sources,
            build,
            output,
            format,
            width,
            height,
        } => {
            let config = build
                .to_config(format.as_deref())?
                .with_canvas(Canvas::new(width, height));
            let target = RenderTarget::from_option(output.as_deref());
            let service = LineageService::new(DefaultFetcher, config);
            let loaded = service.run(&sources.to_request(), &target)?;
            if output.is_some() {
                let report = &loaded.ingest_report;
                eprintln!(
                    "rendered {} nodes to {} ({} rows skipped)",
                    loaded.root().node_count(),
                    target.describe(),
                    report.skipped_count()
                );
            }
            Ok(())
        }
        Command::Profile {
            id,
            sources,
            build,
            tab,
        } => {
            let section = ProfileSection::parse(&tab)?;
            let service = LineageService::new(DefaultFetcher, build.to_config(None)?);
            let loaded = service.load(&sources.to_request())?;

            let mut panel = ProfilePanel::new();
            panel.select_tab(section);
            if !panel.show(&loaded.profiles, &id) {
                info!("event=profile_missing module=cli status=skipped id={id}");
                return Ok(());
            }
            if let Some(text) = panel.render_text() {
                print!("{text}");
            }
            Ok(())
        }
        Command::Inspect { sources, build } => {
            let service = LineageService::new(DefaultFetcher, build.to_config(None)?);
            let loaded = service.load(&sources.to_request())?;
            let summary = serde_json::to_string_pretty(&loaded.summary())?;
            println!("{summary}");
            Ok(())
        }
    }
}

fn absolute(dir: &std::path::Path) -> String {
    let path = if dir.is_absolute() {
        dir.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(dir))
            .unwrap_or_else(|_| dir.to_path_buf())
    };
    path.display().to_string()
}
