//! Tabular source fetching.
//!
//! # Responsibility
//! - Resolve a source location to a local file or an HTTP(S) resource.
//! - Fetch the startup batch of tables together and join on all of them.
//!
//! # Invariants
//! - A batch either yields every table or the first error in source order.
//! - No retries; a failed fetch is terminal for the load attempt.

use crate::ingest::report::TableKind;
use crate::ingest::table::{decode_table, Table, TableError, TableFormat};
use log::{debug, error};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

/// Where one table lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceLocation {
    File(PathBuf),
    Http(String),
}

impl SourceLocation {
    /// Classifies a CLI/config value. `http://` and `https://` prefixes are URLs.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        let lower = trimmed.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Self::Http(trimmed.to_string())
        } else {
            Self::File(PathBuf::from(trimmed))
        }
    }

    pub fn display_name(&self) -> String {
        match self {
            Self::File(path) => path.display().to_string(),
            Self::Http(url) => url.clone(),
        }
    }
}

/// One table in the startup batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSource {
    pub kind: TableKind,
    pub location: SourceLocation,
    pub format: TableFormat,
}

impl TableSource {
    /// Creates a source, guessing the format from the location suffix.
    pub fn new(kind: TableKind, raw_location: &str) -> Self {
        Self {
            kind,
            location: SourceLocation::parse(raw_location),
            format: TableFormat::from_location(raw_location),
        }
    }
}

/// Source fetch errors.
#[derive(Debug)]
pub enum SourceError {
    Io {
        location: String,
        source: std::io::Error,
    },
    Http {
        location: String,
        source: reqwest::Error,
    },
    Decode {
        location: String,
        source: TableError,
    },
    /// A fetch worker thread panicked.
    WorkerPanicked { location: String },
}

impl SourceError {
    pub fn location(&self) -> &str {
        match self {
            Self::Io { location, .. }
            | Self::Http { location, .. }
            | Self::Decode { location, .. }
            | Self::WorkerPanicked { location } => location,
        }
    }
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { location, source } => write!(f, "fetch failed: {location}\n{source}"),
            Self::Http { location, source } => write!(f, "fetch failed: {location}\n{source}"),
            Self::Decode { location, source } => write!(f, "fetch failed: {location}\n{source}"),
            Self::WorkerPanicked { location } => {
                write!(f, "fetch failed: {location}\nfetch worker panicked")
            }
        }
    }
}

impl Error for SourceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Http { source, .. } => Some(source),
            Self::Decode { source, .. } => Some(source),
            Self::WorkerPanicked { .. } => None,
        }
    }
}

/// Fetch seam: returns the raw body of one location.
pub trait SourceFetcher: Sync {
    fn fetch_text(&self, location: &SourceLocation) -> Result<String, SourceError>;
}

impl<T: SourceFetcher + ?Sized> SourceFetcher for &T {
    fn fetch_text(&self, location: &SourceLocation) -> Result<String, SourceError> {
        (**self).fetch_text(location)
    }
}

/// Reads local files and performs blocking HTTP GETs.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultFetcher;

impl SourceFetcher for DefaultFetcher {
    fn fetch_text(&self, location: &SourceLocation) -> Result<String, SourceError> {
        match location {
            SourceLocation::File(path) => {
                std::fs::read_to_string(path).map_err(|source| SourceError::Io {
                    location: location.display_name(),
                    source,
                })
            }
            SourceLocation::Http(url) => {
                let map_http = |source: reqwest::Error| SourceError::Http {
                    location: url.clone(),
                    source,
                };
                reqwest::blocking::get(url.as_str())
                    .and_then(|response| response.error_for_status())
                    .and_then(|response| response.text())
                    .map_err(map_http)
            }
        }
    }
}

/// Fetches and decodes one table.
pub fn fetch_table<F: SourceFetcher + ?Sized>(
    fetcher: &F,
    source: &TableSource,
) -> Result<Table, SourceError> {
    let body = fetcher.fetch_text(&source.location)?;
    decode_table(source.kind.as_str(), &body, source.format).map_err(|err| {
        SourceError::Decode {
            location: source.location.display_name(),
            source: err,
        }
    })
}

/// Fetches every source concurrently and joins on all of them.
///
/// Tables are returned in `sources` order.
///
/// # Errors
/// - Returns the first failing source's error (in `sources` order); no partial
///   result is returned.
pub fn fetch_batch<F: SourceFetcher + ?Sized>(
    fetcher: &F,
    sources: &[TableSource],
) -> Result<Vec<Table>, SourceError> {
    let results = std::thread::scope(|scope| {
        let handles = sources
            .iter()
            .map(|source| {
                let handle = scope.spawn(move || fetch_table(fetcher, source));
                (source, handle)
            })
            .collect::<Vec<_>>();

        handles
            .into_iter()
            .map(|(source, handle)| {
                handle.join().unwrap_or_else(|_| {
                    Err(SourceError::WorkerPanicked {
                        location: source.location.display_name(),
                    })
                })
            })
            .collect::<Vec<_>>()
    });

    let mut tables = Vec::with_capacity(results.len());
    for (source, result) in sources.iter().zip(results) {
        match result {
            Ok(table) => {
                debug!(
                    "event=table_fetched module=source status=ok table={} rows={}",
                    source.kind.as_str(),
                    table.len()
                );
                tables.push(table);
            }
            Err(err) => {
                error!(
                    "event=table_fetch_failed module=source status=error table={} location={}",
                    source.kind.as_str(),
                    err.location()
                );
                return Err(err);
            }
        }
    }
    Ok(tables)
}

#[cfg(test)]
mod tests {
    use super::{fetch_batch, SourceError, SourceFetcher, SourceLocation, TableSource};
    use crate::ingest::report::TableKind;
    use crate::ingest::table::TableFormat;
    use std::collections::HashMap;
    use std::path::PathBuf;

    struct MemoryFetcher {
        bodies: HashMap<String, String>,
    }

    impl SourceFetcher for MemoryFetcher {
        fn fetch_text(&self, location: &SourceLocation) -> Result<String, SourceError> {
            let key = location.display_name();
            self.bodies
                .get(&key)
                .cloned()
                .ok_or_else(|| SourceError::Io {
                    location: key,
                    source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
                })
        }
    }

    fn fetcher(entries: &[(&str, &str)]) -> MemoryFetcher {
        MemoryFetcher {
            bodies: entries
                .iter()
                .map(|(key, body)| (key.to_string(), body.to_string()))
                .collect(),
        }
    }

    #[test]
    fn classifies_locations() {
        assert_eq!(
            SourceLocation::parse(" https://example.org/p.csv "),
            SourceLocation::Http("https://example.org/p.csv".to_string())
        );
        assert_eq!(
            SourceLocation::parse("data/people.csv"),
            SourceLocation::File(PathBuf::from("data/people.csv"))
        );
    }

    #[test]
    fn batch_returns_tables_in_source_order() {
        let fetcher = fetcher(&[("people.csv", "id\nA\nB\n"), ("rels.json", "[]")]);
        let sources = vec![
            TableSource::new(TableKind::People, "people.csv"),
            TableSource::new(TableKind::Relationships, "rels.json"),
        ];
        assert_eq!(sources[1].format, TableFormat::Json);

        let tables = fetch_batch(&fetcher, &sources).unwrap();
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0].label, "people");
        assert_eq!(tables[0].len(), 2);
        assert!(tables[1].is_empty());
    }

    #[test]
    fn batch_fails_as_a_whole_when_one_source_fails() {
        let fetcher = fetcher(&[("people.csv", "id\nA\n")]);
        let sources = vec![
            TableSource::new(TableKind::People, "people.csv"),
            TableSource::new(TableKind::Relationships, "missing.csv"),
        ];
        let err = fetch_batch(&fetcher, &sources).unwrap_err();
        assert_eq!(err.location(), "missing.csv");
        assert!(err.to_string().starts_with("fetch failed: missing.csv"));
    }

    #[test]
    fn decode_errors_name_the_location() {
        let fetcher = fetcher(&[("people.json", "{\"id\": 1}")]);
        let sources = vec![TableSource::new(TableKind::People, "people.json")];
        let err = fetch_batch(&fetcher, &sources).unwrap_err();
        assert!(matches!(err, SourceError::Decode { ref location, .. } if location == "people.json"));
    }
}
