use crate::core::io::ts;
use crate::core::report;
use crate::engine::cache::MetaCache;
use crate::engine::error::EngineError;
use crate::engine::host::{self, HostEnvironment};
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

#[derive(Debug, Clone)]
pub struct AttachOutcome {
    /// The handle the record was stored under.
    pub handle: String,
    pub path: PathBuf,
    pub summary: String,
}

/// Parses `ts_path` and force-stores the record under the handle named (or
/// uniquely abbreviated) by `identifier`.
///
/// A missing file, an unknown identifier, or an ambiguous substring match
/// is an error, and in every error case the cache is left untouched.
#[instrument(skip_all, name = "attach_workflow", fields(identifier = %identifier))]
pub fn run(
    ts_path: &Path,
    identifier: &str,
    host: &dyn HostEnvironment,
    max_header_lines: usize,
    cache: &mut MetaCache,
) -> Result<AttachOutcome, EngineError> {
    if !ts_path.is_file() {
        return Err(EngineError::ResourceNotFound {
            pattern: ts_path.display().to_string(),
        });
    }

    let handles = host.list_handles();
    let mut matches = host::matching_handles(identifier, &handles);
    if matches.is_empty() {
        return Err(EngineError::HandleNotFound {
            identifier: identifier.to_string(),
            available: handles,
        });
    }
    if matches.len() > 1 {
        return Err(EngineError::AmbiguousHandle {
            identifier: identifier.to_string(),
            candidates: matches,
        });
    }
    let handle = matches.remove(0);

    let record = ts::parse_path(ts_path, max_header_lines)?;
    let summary = report::render_summary(&handle, Some(&record));
    cache.store(handle.as_str(), Some(record));
    info!("attached metadata from {} to '{}'", ts_path.display(), handle);

    Ok(AttachOutcome {
        handle,
        path: ts_path.to_path_buf(),
        summary,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::io::ts::DEFAULT_MAX_HEADER_LINES;
    use crate::engine::host::Resolution;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    struct TestHost {
        handles: Vec<String>,
    }

    impl TestHost {
        fn new(names: &[&str]) -> Self {
            Self {
                handles: names.iter().map(|s| s.to_string()).collect(),
            }
        }
    }

    impl HostEnvironment for TestHost {
        fn resolve(&self, _identifier: &str) -> Resolution {
            Resolution::None
        }

        fn list_handles(&self) -> Vec<String> {
            self.handles.clone()
        }

        fn choose_handle(&self, _candidates: &[String]) -> Option<String> {
            None
        }
    }

    fn write_ts(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(body.as_bytes()).unwrap();
        path
    }

    #[test]
    fn missing_file_reports_failure_and_leaves_cache_untouched() {
        let dir = tempdir().unwrap();
        let host = TestHost::new(&["Model_H0232"]);
        let mut cache = MetaCache::new();

        let result = run(
            &dir.path().join("nope.ts"),
            "Model_H0232",
            &host,
            DEFAULT_MAX_HEADER_LINES,
            &mut cache,
        );
        assert!(matches!(result, Err(EngineError::ResourceNotFound { .. })));
        assert!(cache.lookup("Model_H0232").is_none());
    }

    #[test]
    fn unique_substring_resolves_to_the_full_handle() {
        let dir = tempdir().unwrap();
        let ts = write_ts(dir.path(), "H0232_TS.txt", "METHOD: ab-initio\n");
        let host = TestHost::new(&["Model_H0232", "other"]);
        let mut cache = MetaCache::new();

        let outcome = run(&ts, "H0232", &host, DEFAULT_MAX_HEADER_LINES, &mut cache).unwrap();
        assert_eq!(outcome.handle, "Model_H0232");
        assert!(matches!(cache.lookup("Model_H0232"), Some(Some(_))));
        assert!(outcome.summary.contains("Method: ab-initio"));
    }

    #[test]
    fn ambiguous_substring_aborts_without_caching() {
        let dir = tempdir().unwrap();
        let ts = write_ts(dir.path(), "H0232_TS.txt", "METHOD: x\n");
        let host = TestHost::new(&["Model_H0232_v1", "Model_H0232_v2"]);
        let mut cache = MetaCache::new();

        let result = run(&ts, "H0232", &host, DEFAULT_MAX_HEADER_LINES, &mut cache);
        match result {
            Err(EngineError::AmbiguousHandle { candidates, .. }) => {
                assert_eq!(candidates.len(), 2);
            }
            other => panic!("expected AmbiguousHandle, got {other:?}"),
        }
        assert!(cache.is_empty());
    }

    #[test]
    fn unknown_identifier_lists_available_handles() {
        let dir = tempdir().unwrap();
        let ts = write_ts(dir.path(), "H0232_TS.txt", "METHOD: x\n");
        let host = TestHost::new(&["Model_A"]);
        let mut cache = MetaCache::new();

        let result = run(&ts, "Z999", &host, DEFAULT_MAX_HEADER_LINES, &mut cache);
        match result {
            Err(EngineError::HandleNotFound { available, .. }) => {
                assert_eq!(available, vec!["Model_A"]);
            }
            other => panic!("expected HandleNotFound, got {other:?}"),
        }
        assert!(cache.is_empty());
    }

    #[test]
    fn exact_handle_overwrites_previous_record() {
        let dir = tempdir().unwrap();
        let first = write_ts(dir.path(), "a.ts", "SCORE: 0.5\n");
        let second = write_ts(dir.path(), "b.ts", "SCORE: 0.9\n");
        let host = TestHost::new(&["Model_A"]);
        let mut cache = MetaCache::new();

        run(&first, "Model_A", &host, DEFAULT_MAX_HEADER_LINES, &mut cache).unwrap();
        run(&second, "Model_A", &host, DEFAULT_MAX_HEADER_LINES, &mut cache).unwrap();

        let Some(Some(record)) = cache.lookup("Model_A") else {
            panic!("record missing");
        };
        assert_eq!(record.score.as_deref(), Some("0.9"));
    }
}
