//! Core domain logic for Lineage Atlas.
//! Turns people/relationship tables into one rooted family tree and renders it.

pub mod config;
pub mod hierarchy;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod profile;
pub mod render;
pub mod service;
pub mod source;

pub use config::{ConfigError, LineageConfig};
pub use hierarchy::builder::{build_hierarchy, BuildReport, Hierarchy, RootDecision};
pub use hierarchy::policy::{BuildOptions, CyclePolicy, MultiParentPolicy};
pub use hierarchy::HierarchyError;
pub use ingest::normalize::PersonIndex;
pub use ingest::report::{IngestReport, ParseMode, SkipReason, SkippedRow, TableKind};
pub use ingest::IngestError;
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::edge::ParentEdge;
pub use model::person::{Person, PersonId};
pub use model::tree::{NodeKind, TreeNode, VIRTUAL_ROOT_ID, VIRTUAL_ROOT_LABEL};
pub use profile::presenter::{ProfilePanel, ProfileSection, ProfileView, PLACEHOLDER};
pub use profile::record::ProfileIndex;
pub use render::target::RenderTarget;
pub use render::{Canvas, OutputFormat, RenderError, TreeRenderer, Viewport};
pub use service::lineage_service::{
    LineageError, LineageService, LoadRequest, LoadSummary, LoadedLineage, LoadedTables,
};
pub use source::{DefaultFetcher, SourceError, SourceFetcher};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
