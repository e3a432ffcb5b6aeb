//! Load-and-render use-case service.
//!
//! # Responsibility
//! - Run one load cycle: fetch the table batch, ingest, build the hierarchy.
//! - Render the result to a target and surface failures as an inline error document.
//!
//! # Invariants
//! - Every load builds a fresh [`LoadedLineage`]; nothing is reused across loads.
//! - A failed fetch aborts the whole load; no partial tree is rendered.
//! - A missing rendering target is reported before any fetch starts.

use crate::config::LineageConfig;
use crate::hierarchy::builder::{build_hierarchy, BuildReport, Hierarchy};
use crate::hierarchy::HierarchyError;
use crate::ingest::edges::filter_parent_edges;
use crate::ingest::events::collect_events;
use crate::ingest::normalize::{normalize_people, PersonIndex};
use crate::ingest::report::{IngestReport, TableKind};
use crate::ingest::table::Table;
use crate::ingest::IngestError;
use crate::model::edge::ParentEdge;
use crate::model::event::EventRecord;
use crate::model::tree::TreeNode;
use crate::profile::record::ProfileIndex;
use crate::render::target::RenderTarget;
use crate::render::{error_document, renderer_for, OutputFormat, RenderError};
use crate::source::{fetch_batch, SourceError, SourceFetcher, TableSource};
use log::{debug, error, info, warn};
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Errors from one load cycle.
#[derive(Debug)]
pub enum LineageError {
    Source(SourceError),
    Ingest(IngestError),
    Hierarchy(HierarchyError),
    Render(RenderError),
}

impl Display for LineageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Source(err) => write!(f, "{err}"),
            Self::Ingest(err) => write!(f, "{err}"),
            Self::Hierarchy(err) => write!(f, "{err}"),
            Self::Render(err) => write!(f, "{err}"),
        }
    }
}

impl Error for LineageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Source(err) => Some(err),
            Self::Ingest(err) => Some(err),
            Self::Hierarchy(err) => Some(err),
            Self::Render(err) => Some(err),
        }
    }
}

impl From<SourceError> for LineageError {
    fn from(value: SourceError) -> Self {
        Self::Source(value)
    }
}

impl From<IngestError> for LineageError {
    fn from(value: IngestError) -> Self {
        Self::Ingest(value)
    }
}

impl From<HierarchyError> for LineageError {
    fn from(value: HierarchyError) -> Self {
        Self::Hierarchy(value)
    }
}

impl From<RenderError> for LineageError {
    fn from(value: RenderError) -> Self {
        Self::Render(value)
    }
}

/// Source locations of one load. Only `people` is required.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadRequest {
    pub people: String,
    pub relationships: Option<String>,
    pub events: Option<String>,
    pub profiles: Option<String>,
}

impl LoadRequest {
    pub fn new(people: impl Into<String>) -> Self {
        Self {
            people: people.into(),
            ..Self::default()
        }
    }

    pub fn with_relationships(mut self, location: impl Into<String>) -> Self {
        self.relationships = Some(location.into());
        self
    }

    pub fn with_events(mut self, location: impl Into<String>) -> Self {
        self.events = Some(location.into());
        self
    }

    pub fn with_profiles(mut self, location: impl Into<String>) -> Self {
        self.profiles = Some(location.into());
        self
    }

    fn sources(&self) -> Vec<TableSource> {
        let mut sources = vec![TableSource::new(TableKind::People, &self.people)];
        let optional = [
            (TableKind::Relationships, &self.relationships),
            (TableKind::Events, &self.events),
            (TableKind::Profiles, &self.profiles),
        ];
        for (kind, location) in optional {
            if let Some(location) = location {
                sources.push(TableSource::new(kind, location));
            }
        }
        sources
    }
}

/// Decoded tables of one load, before ingest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadedTables {
    pub people: Table,
    pub relationships: Table,
    pub events: Table,
    pub profiles: Table,
}

impl LoadedTables {
    fn from_batch(sources: &[TableSource], tables: Vec<Table>) -> Self {
        let mut loaded = Self {
            people: Table::empty(TableKind::People.as_str()),
            relationships: Table::empty(TableKind::Relationships.as_str()),
            events: Table::empty(TableKind::Events.as_str()),
            profiles: Table::empty(TableKind::Profiles.as_str()),
        };
        for (source, table) in sources.iter().zip(tables) {
            match source.kind {
                TableKind::People => loaded.people = table,
                TableKind::Relationships => loaded.relationships = table,
                TableKind::Events => loaded.events = table,
                TableKind::Profiles => loaded.profiles = table,
            }
        }
        loaded
    }
}

/// Application state of one load cycle.
#[derive(Debug, Clone)]
pub struct LoadedLineage {
    /// Correlation id for log lines of this load.
    pub load_id: Uuid,
    pub people: PersonIndex,
    pub edges: Vec<ParentEdge>,
    pub events: Vec<EventRecord>,
    pub profiles: ProfileIndex,
    pub hierarchy: Hierarchy,
    pub ingest_report: IngestReport,
}

/// Serializable digest of one load, used by `inspect`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadSummary {
    pub load_id: String,
    pub root_id: String,
    pub node_count: usize,
    pub depth: usize,
    pub ingest: IngestReport,
    pub build: BuildReport,
}

impl LoadedLineage {
    /// Ingests decoded tables and builds the hierarchy.
    ///
    /// # Errors
    /// - Strict-mode row rejections and `Reject`-policy cycles.
    pub fn from_tables(tables: &LoadedTables, config: &LineageConfig) -> Result<Self, LineageError> {
        let load_id = Uuid::new_v4();
        let mode = config.parse_mode;
        let mut report = IngestReport::new();

        let people = normalize_people(&tables.people.rows, mode, &mut report)?;
        let edges = filter_parent_edges(&tables.relationships.rows, &people, mode, &mut report)?;
        let events = collect_events(&tables.events.rows, mode, &mut report)?;
        let profiles = ProfileIndex::build(
            &people,
            &tables.profiles.rows,
            &events,
            mode,
            &mut report,
        )?;
        if report.skipped_count() > 0 {
            warn!(
                "event=rows_skipped module=service status=degraded load_id={load_id} count={}",
                report.skipped_count()
            );
        }

        let hierarchy = build_hierarchy(&people, &edges, &config.build)?;
        info!(
            "event=hierarchy_built module=service status=ok load_id={load_id} people={} edges={} root={} nodes={}",
            people.len(),
            edges.len(),
            hierarchy.root.id,
            hierarchy.root.node_count()
        );

        Ok(Self {
            load_id,
            people,
            edges,
            events,
            profiles,
            hierarchy,
            ingest_report: report,
        })
    }

    pub fn root(&self) -> &TreeNode {
        &self.hierarchy.root
    }

    pub fn summary(&self) -> LoadSummary {
        LoadSummary {
            load_id: self.load_id.to_string(),
            root_id: self.hierarchy.root.id.clone(),
            node_count: self.hierarchy.root.node_count(),
            depth: self.hierarchy.root.depth(),
            ingest: self.ingest_report.clone(),
            build: self.hierarchy.report.clone(),
        }
    }
}

/// Lineage load-and-render facade.
pub struct LineageService<F: SourceFetcher> {
    fetcher: F,
    config: LineageConfig,
}

impl<F: SourceFetcher> LineageService<F> {
    pub fn new(fetcher: F, config: LineageConfig) -> Self {
        Self { fetcher, config }
    }

    pub fn config(&self) -> &LineageConfig {
        &self.config
    }

    /// Fetches every requested table together, then ingests and builds.
    ///
    /// # Errors
    /// - Any fetch or decode failure aborts the load.
    pub fn load(&self, request: &LoadRequest) -> Result<LoadedLineage, LineageError> {
        let sources = request.sources();
        info!(
            "event=load_start module=service status=ok sources={}",
            sources.len()
        );
        let tables = fetch_batch(&self.fetcher, &sources)?;
        let tables = LoadedTables::from_batch(&sources, tables);
        LoadedLineage::from_tables(&tables, &self.config)
    }

    /// Renders a loaded tree with the configured format and canvas.
    pub fn render(&self, loaded: &LoadedLineage) -> Result<String, LineageError> {
        let renderer = renderer_for(self.config.output_format, self.config.viewport);
        debug!(
            "event=render_start module=service status=ok load_id={} format={}",
            loaded.load_id,
            renderer.format().as_str()
        );
        Ok(renderer.render(loaded.root(), &self.config.canvas)?)
    }

    /// Full cycle: check target, load, render, write.
    ///
    /// On failure after the target check, an SVG target is overwritten with a
    /// standalone error document before the error is returned; no part of an
    /// earlier tree survives.
    pub fn run(
        &self,
        request: &LoadRequest,
        target: &RenderTarget,
    ) -> Result<LoadedLineage, LineageError> {
        target.ensure_available()?;

        let outcome = self.load(request).and_then(|loaded| {
            let document = self.render(&loaded)?;
            target.write_document(&document)?;
            Ok(loaded)
        });

        match outcome {
            Ok(loaded) => {
                info!(
                    "event=render_done module=service status=ok load_id={} target={} format={}",
                    loaded.load_id,
                    target.describe(),
                    self.config.output_format.as_str()
                );
                Ok(loaded)
            }
            Err(err) => {
                error!(
                    "event=load_failed module=service status=error target={} error={}",
                    target.describe(),
                    err.to_string().replace('\n', " ")
                );
                if self.config.output_format == OutputFormat::Svg {
                    let size = self.config.canvas.resolve(self.config.viewport);
                    let document = error_document(&err.to_string(), size);
                    if let Err(banner_err) = target.write_document(&document) {
                        error!(
                            "event=error_banner_failed module=service status=error error={banner_err}"
                        );
                    }
                }
                Err(err)
            }
        }
    }
}
