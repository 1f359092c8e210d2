use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Extensions a file must carry to count as a TS candidate.
pub const DEFAULT_EXTENSIONS: [&str; 2] = ["txt", "ts"];

/// Where and what auto-discovery is allowed to look at.
#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    /// Directories scanned for candidate TS files, in priority order.
    pub search_dirs: Vec<PathBuf>,
    /// Accepted file extensions, compared case-insensitively.
    pub extensions: Vec<String>,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            search_dirs: vec![PathBuf::from(".")],
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        }
    }
}

fn has_candidate_extension(name: &str, extensions: &[String]) -> bool {
    let lower = name.to_lowercase();
    extensions
        .iter()
        .any(|ext| lower.ends_with(&format!(".{}", ext.to_lowercase())))
}

/// Collects every candidate TS file under the configured search
/// directories. Missing or unreadable directories are skipped; entries are
/// sorted per directory so discovery order is deterministic.
pub fn gather_candidates(config: &DiscoveryConfig) -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    for dir in &config.search_dirs {
        if !dir.is_dir() {
            continue;
        }
        let Ok(read) = fs::read_dir(dir) else {
            debug!("skipping unreadable search dir {}", dir.display());
            continue;
        };
        let mut entries: Vec<PathBuf> = read.flatten().map(|e| e.path()).collect();
        entries.sort();
        for path in entries {
            let Some(name) = path.file_name().map(|n| n.to_string_lossy().to_string()) else {
                continue;
            };
            if path.is_file() && has_candidate_extension(&name, &config.extensions) {
                candidates.push(path);
            }
        }
    }
    candidates
}

/// Picks the candidate for a logical key: an exact case-insensitive
/// basename-stem match wins; otherwise the first candidate whose file name
/// contains the key as a substring.
pub fn find_for_key(key: &str, candidates: &[PathBuf]) -> Option<PathBuf> {
    let key_up = key.to_uppercase();
    let mut substring_match = None;
    for path in candidates {
        let stem_up = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_uppercase())
            .unwrap_or_default();
        if stem_up == key_up {
            return Some(path.clone());
        }
        if substring_match.is_none() {
            let name_up = path
                .file_name()
                .map(|n| n.to_string_lossy().to_uppercase())
                .unwrap_or_default();
            if name_up.contains(&key_up) {
                substring_match = Some(path.clone());
            }
        }
    }
    substring_match
}

/// Expands a path-or-pattern into matching files. Only the filename
/// component may carry `*` wildcards; a plain path expands to itself when
/// it names an existing file. Matches are sorted.
pub fn expand_pattern(pattern: &str) -> Vec<PathBuf> {
    let path = Path::new(pattern);
    let Some(name) = path.file_name().map(|n| n.to_string_lossy().to_string()) else {
        return Vec::new();
    };
    if !name.contains('*') {
        return if path.is_file() {
            vec![path.to_path_buf()]
        } else {
            Vec::new()
        };
    }

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let Ok(read) = fs::read_dir(dir) else {
        debug!("pattern dir {} is not readable", dir.display());
        return Vec::new();
    };
    let mut matches: Vec<PathBuf> = read
        .flatten()
        .map(|e| e.path())
        .filter(|p| p.is_file())
        .filter(|p| {
            p.file_name()
                .map(|n| wildcard_match(&name, &n.to_string_lossy()))
                .unwrap_or(false)
        })
        .collect();
    matches.sort();
    matches
}

/// Shell-style `*` matching over a single file name.
fn wildcard_match(pattern: &str, name: &str) -> bool {
    let mut segments = pattern.split('*');
    let first = segments.next().unwrap_or("");
    let mut rest: Vec<&str> = segments.collect();
    if rest.is_empty() {
        return name == pattern;
    }
    if !name.starts_with(first) {
        return false;
    }
    let last = rest.pop().unwrap_or("");
    let mut pos = first.len();
    for segment in rest {
        if segment.is_empty() {
            continue;
        }
        match name[pos..].find(segment) {
            Some(i) => pos += i + segment.len(),
            None => return false,
        }
    }
    if last.is_empty() {
        return true;
    }
    name.len() >= pos + last.len() && name[pos..].ends_with(last)
}

/// Looks for a TS file that belongs to a model structure file: first the
/// conventional sibling names, then any file in the same directory whose
/// name carries both the model's stem and "TS".
pub fn sibling_ts_for(model_path: &Path) -> Option<PathBuf> {
    let stem = model_path.file_stem()?.to_string_lossy().to_string();
    let dir = match model_path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };

    let probes = [
        format!("{stem}.ts"),
        format!("{stem}.TS"),
        format!("{stem}_TS.txt"),
        format!("{stem}_ts.txt"),
        format!("{stem}.txt"),
    ];
    for probe in &probes {
        let candidate = dir.join(probe);
        if candidate.is_file() {
            return Some(candidate);
        }
    }

    let default_exts: Vec<String> = DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect();
    let mut entries: Vec<PathBuf> = fs::read_dir(&dir).ok()?.flatten().map(|e| e.path()).collect();
    entries.sort();
    for path in entries {
        if !path.is_file() {
            continue;
        }
        let Some(name) = path.file_name().map(|n| n.to_string_lossy().to_string()) else {
            continue;
        };
        if name.contains(&stem)
            && name.to_uppercase().contains("TS")
            && has_candidate_extension(&name, &default_exts)
        {
            return Some(path);
        }
    }
    None
}
