use crate::core::io::ts::{self, TsError};
use crate::core::model::record::MetadataRecord;
use crate::engine::cache::MetaCache;
use crate::engine::discovery;
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};

/// One batch-parse result: the cache key derived from the file's basename
/// stem, the file itself, and the record (absent when the file could not
/// be read at all).
#[derive(Debug, Clone, Serialize)]
pub struct ParsedTs {
    pub key: String,
    pub path: PathBuf,
    pub record: Option<MetadataRecord>,
}

/// The logical key a resource is cached under: its basename without
/// extension.
pub fn key_for_path(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

/// Parses every file matching `pattern` (a path or `*` wildcard), caching
/// each record under its basename-derived key.
///
/// A file that fails to open is kept in the results with an absent record
/// and is not cached; the batch never aborts early. A pattern matching
/// nothing at all is an error.
#[instrument(skip_all, name = "parse_workflow", fields(pattern = %pattern))]
pub fn run(
    pattern: &str,
    max_header_lines: usize,
    cache: &mut MetaCache,
    reporter: &ProgressReporter,
) -> Result<Vec<ParsedTs>, EngineError> {
    let matches = discovery::expand_pattern(pattern);
    if matches.is_empty() {
        return Err(EngineError::ResourceNotFound {
            pattern: pattern.to_string(),
        });
    }

    info!("parsing {} TS file(s)", matches.len());
    reporter.report(Progress::BatchStart {
        total_files: matches.len() as u64,
    });

    let mut results = Vec::with_capacity(matches.len());
    for path in matches {
        reporter.report(Progress::FileStart { path: path.clone() });
        let key = key_for_path(&path);
        let record = match ts::parse_path(&path, max_header_lines) {
            Ok(record) => Some(record),
            Err(TsError::Io(e)) => {
                warn!("could not parse {}: {}", path.display(), e);
                None
            }
        };
        if record.is_some() {
            cache.store(key.as_str(), record.clone());
        }
        results.push(ParsedTs { key, path, record });
        reporter.report(Progress::FileDone);
    }

    reporter.report(Progress::BatchFinish);
    Ok(results)
}
