use crate::core::io::ts;
use crate::core::model::record::MetadataRecord;
use crate::core::report;
use crate::engine::cache::MetaCache;
use crate::engine::discovery::{self, DiscoveryConfig};
use crate::engine::error::EngineError;
use crate::engine::host::HostEnvironment;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// Where the shown record came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShowSource {
    /// Already cached (including a cached absence); nothing was re-parsed.
    Cache,
    /// Parsed from an explicitly supplied resource.
    Explicit(PathBuf),
    /// Parsed from a file found by auto-discovery.
    Discovered(PathBuf),
}

#[derive(Debug, Clone)]
pub enum ShowOutcome {
    Shown {
        /// The key the record is cached under; discovery may re-key to an
        /// exact handle name.
        key: String,
        source: ShowSource,
        summary: String,
        record: Option<MetadataRecord>,
    },
    /// Nothing cached, no explicit resource, discovery found nothing.
    /// Nothing was cached, so a later explicit attach can still succeed.
    NotFound { key: String },
}

/// Resolves and shows metadata for `key`.
///
/// Cached entries (including cached absences) are rendered immediately and
/// never re-parsed. Otherwise an explicit resource, if given, is parsed and
/// cached; failing that, auto-discovery searches the configured directories
/// for a candidate whose name matches the key, preferring exact basename
/// stems over substring hits.
#[instrument(skip_all, name = "show_workflow", fields(key = %key))]
pub fn run(
    key: &str,
    explicit: Option<&Path>,
    host: &dyn HostEnvironment,
    config: &DiscoveryConfig,
    max_header_lines: usize,
    cache: &mut MetaCache,
) -> Result<ShowOutcome, EngineError> {
    if let Some(entry) = cache.lookup(key) {
        debug!("cache hit for '{key}'");
        return Ok(ShowOutcome::Shown {
            key: key.to_string(),
            source: ShowSource::Cache,
            summary: report::render_summary(key, entry.as_ref()),
            record: entry.clone(),
        });
    }

    if let Some(path) = explicit {
        if !path.is_file() {
            return Err(EngineError::ResourceNotFound {
                pattern: path.display().to_string(),
            });
        }
        let record = ts::parse_path(path, max_header_lines)?;
        let summary = report::render_summary(key, Some(&record));
        cache.store(key, Some(record.clone()));
        info!("parsed and cached {} under '{}'", path.display(), key);
        return Ok(ShowOutcome::Shown {
            key: key.to_string(),
            source: ShowSource::Explicit(path.to_path_buf()),
            summary,
            record: Some(record),
        });
    }

    let candidates = discovery::gather_candidates(config);
    let mut cache_key = key.to_string();
    let mut chosen = discovery::find_for_key(key, &candidates);
    if chosen.is_none() {
        // A registered handle matching the key may still name a candidate;
        // when it does, the record is cached under the exact handle name.
        for handle in host.list_handles() {
            if handle == key || handle.contains(key) {
                let handle_up = handle.to_uppercase();
                let hit = candidates.iter().find(|p| {
                    p.file_name()
                        .map(|n| n.to_string_lossy().to_uppercase().contains(&handle_up))
                        .unwrap_or(false)
                });
                if let Some(path) = hit {
                    chosen = Some(path.clone());
                    cache_key = handle;
                    break;
                }
            }
        }
    }

    match chosen {
        Some(path) => {
            let record = ts::parse_path(&path, max_header_lines)?;
            let summary = report::render_summary(&cache_key, Some(&record));
            cache.store(cache_key.as_str(), Some(record.clone()));
            info!("discovered {} for '{}'", path.display(), cache_key);
            Ok(ShowOutcome::Shown {
                key: cache_key,
                source: ShowSource::Discovered(path),
                summary,
                record: Some(record),
            })
        }
        None => Ok(ShowOutcome::NotFound {
            key: key.to_string(),
        }),
    }
}
