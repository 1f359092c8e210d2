use crate::core::model::keys::{self, CanonicalKey, KEY_ALIASES};
use crate::core::model::record::MetadataRecord;
use regex::Regex;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use std::sync::LazyLock;
use thiserror::Error;
use tracing::debug;

/// Default cap on the number of header lines examined before giving up.
pub const DEFAULT_MAX_HEADER_LINES: usize = 2000;

/// Unstructured lines longer than this are dropped instead of captured.
const MAX_CAPTURED_LINE_CHARS: usize = 300;

const COORD_RECORD_PREFIXES: [&str; 4] = ["ATOM", "HETATM", "TER", "ENDMDL"];

static COORD_TRIPLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[-+]?\d+\.\d+\s+[-+]?\d+\.\d+\s+[-+]?\d+\.\d+").unwrap()
});

static COORD_COLUMNAR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*\d+\s+\S+\s+\S+\s+\S+\s+\S+\s+[-+]?\d+\.\d+").unwrap()
});

static NOISE_VALUE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\d+\s+[A-Z0-9]").unwrap());

static GENERIC_KV_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*([A-Za-z0-9_\- ]{1,60}?)\s*[:\-]\s*(.+)$").unwrap());

static STOICH_PAIR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([A-Za-z]+)\s*[:=]?\s*(\d+)").unwrap());

static STOICH_COMPACT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z]\d+").unwrap());

static NUMERIC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-+]?\d*\.\d+|\d+").unwrap());

#[derive(Debug, Error)]
pub enum TsError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Tests whether a line looks like coordinate or atom-record data rather
/// than header text. The first such line terminates the header scan.
pub fn looks_like_coordinate_line(line: &str) -> bool {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return false;
    }
    if COORD_TRIPLE_RE.is_match(line) {
        return true;
    }
    let upper = trimmed.to_uppercase();
    if COORD_RECORD_PREFIXES.iter().any(|p| upper.starts_with(p)) {
        return true;
    }
    COORD_COLUMNAR_RE.is_match(line)
}

/// Parses the TS file at `path`.
///
/// Failing to open the file is an error. Once open, the read is best-effort:
/// bytes are decoded lossily and a read error mid-stream is treated as
/// end-of-input, so a partially read file still yields the record built from
/// whatever came through.
pub fn parse_path(path: &Path, max_header_lines: usize) -> Result<MetadataRecord, TsError> {
    let text = read_all_lossy(path)?;
    Ok(parse_text(&text, max_header_lines))
}

/// Parses TS content already held in memory. See the module-level rules:
/// the header scan stops at the first coordinate-like line or once the line
/// index exceeds `max_header_lines`, whichever comes first; the
/// stoichiometry post-pass then scans the full content.
pub fn parse_text(text: &str, max_header_lines: usize) -> MetadataRecord {
    let mut record = MetadataRecord::default();

    for (i, line) in text.lines().enumerate() {
        if i > max_header_lines {
            break;
        }
        if line.trim().is_empty() {
            continue;
        }
        if looks_like_coordinate_line(line) {
            break;
        }

        let upper = line.to_uppercase();
        if upper.trim_start().starts_with("REMARK") {
            record.remarks.push(line.trim().to_string());
            continue;
        }

        let left_token = left_token_upper(line);
        if let Some(canon) = keys::identify_canonical_key(&upper, &left_token) {
            let value = strip_leading_alias(&extract_value(line));
            if looks_like_coordinate_line(&value) || NOISE_VALUE_RE.is_match(&value) {
                // The "value" is stray coordinate noise; treat as not found.
                continue;
            }
            if !value.is_empty() {
                record.set(canon, value);
            }
            continue;
        }

        if let Some(caps) = GENERIC_KV_RE.captures(line) {
            let key = caps[1].trim();
            let value = caps[2].trim();
            if !key.is_empty() && !value.is_empty() {
                record.other.insert_first_wins(key, value);
            }
            continue;
        }

        let trimmed = line.trim();
        if trimmed.chars().count() < MAX_CAPTURED_LINE_CHARS {
            record.other.insert_first_wins(&format!("LINE_{i}"), trimmed);
        }
    }

    if record.stoich.is_none() {
        // Scans the whole content, coordinate data included; atom-name
        // tokens can and do contribute.
        if let Some(found) = find_stoich_tokens(text) {
            record.set(CanonicalKey::Stoich, found);
        }
    }

    let numeric_score = record
        .get(CanonicalKey::Score)
        .and_then(|score| NUMERIC_RE.find(score))
        .map(|m| m.as_str().to_string());
    if let Some(numeric) = numeric_score {
        record.set(CanonicalKey::Score, numeric);
    }

    record
}

/// Reads the whole file, decoding lossily. A read error after open keeps
/// the bytes received so far.
fn read_all_lossy(path: &Path) -> Result<String, TsError> {
    let mut file = File::open(path)?;
    let mut bytes = Vec::new();
    let mut chunk = [0u8; 8192];
    loop {
        match file.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => bytes.extend_from_slice(&chunk[..n]),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                debug!(
                    "read error on {} after {} bytes, keeping partial content: {}",
                    path.display(),
                    bytes.len(),
                    e
                );
                break;
            }
        }
    }
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// The uppercased left-hand token of a header line: everything before the
/// first colon if present, otherwise the first whitespace-delimited word.
fn left_token_upper(line: &str) -> String {
    if let Some((head, _)) = line.split_once(':') {
        head.trim().to_uppercase()
    } else {
        line.split_whitespace()
            .next()
            .map(|t| t.to_uppercase())
            .unwrap_or_default()
    }
}

/// Extracts the value portion of a recognized header line: after the first
/// colon if present, otherwise after the first whitespace run following the
/// first token. Trailing spaces, periods and semicolons are stripped.
fn extract_value(line: &str) -> String {
    if let Some((_, tail)) = line.split_once(':') {
        return tail.trim().trim_end_matches([' ', '.', ';']).to_string();
    }
    let trimmed = line.trim();
    match trimmed.split_once(char::is_whitespace) {
        Some((_, rest)) => rest.trim().trim_end_matches([' ', '.', ';']).to_string(),
        None => trimmed.trim_end_matches([' ', '.', ';']).to_string(),
    }
}

/// Strips one leading doubled-key fragment from a value, e.g.
/// "SCORE: SCORE: 0.72" extracts to "SCORE: 0.72" and this pares it down
/// to "0.72". Keeps the value untouched when stripping would empty it.
fn strip_leading_alias(value: &str) -> String {
    if value.is_empty() {
        return String::new();
    }
    let upper = value.to_uppercase();
    let upper = upper.trim_start();
    for (_, aliases) in KEY_ALIASES {
        for alias in *aliases {
            if upper.starts_with(alias) {
                let stripped = value
                    .get(alias.len()..)
                    .unwrap_or("")
                    .trim_start_matches([' ', ':', '-', '.']);
                if !stripped.is_empty() {
                    return stripped.to_string();
                }
            }
        }
    }
    value.to_string()
}

/// Synthesizes a compact stoichiometry string from letter+number tokens
/// scattered anywhere in `text` ("A: 2 B: 3" becomes "A2B3"). Distinct
/// letter groups are kept in first-seen order; repeats are dropped.
fn find_stoich_tokens(text: &str) -> Option<String> {
    if text.is_empty() {
        return None;
    }
    let mut seen: Vec<String> = Vec::new();
    let mut out = String::new();
    for caps in STOICH_PAIR_RE.captures_iter(text) {
        let letters = &caps[1];
        if !seen.iter().any(|s| s == letters) {
            seen.push(letters.to_string());
            out.push_str(letters);
            out.push_str(&caps[2]);
        }
    }
    if !out.is_empty() {
        return Some(out);
    }
    let compact: String = STOICH_COMPACT_RE
        .find_iter(text)
        .map(|m| m.as_str())
        .collect();
    if compact.is_empty() { None } else { Some(compact) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const ATOM_LINE: &str =
        "ATOM      1  N   ALA A   1      11.104  13.207   2.428  1.00 20.00           N";

    #[test]
    fn coordinate_detection_catches_decimal_triples() {
        assert!(looks_like_coordinate_line("  11.104  13.207   2.428"));
        assert!(looks_like_coordinate_line(ATOM_LINE));
        assert!(!looks_like_coordinate_line("SCORE: 0.72"));
        assert!(!looks_like_coordinate_line(""));
        assert!(!looks_like_coordinate_line("   "));
    }

    #[test]
    fn coordinate_detection_catches_record_keywords() {
        assert!(looks_like_coordinate_line("TER"));
        assert!(looks_like_coordinate_line("  endmdl"));
        assert!(looks_like_coordinate_line("HETATM 2201  O   HOH A 301"));
        assert!(!looks_like_coordinate_line("REMARK atoms below"));
    }

    #[test]
    fn coordinate_detection_catches_columnar_records() {
        assert!(looks_like_coordinate_line("  12 N ALA A CA -2.5"));
        assert!(!looks_like_coordinate_line("12 N ALA"));
    }

    #[test]
    fn score_value_reduces_to_first_numeric_token() {
        let record = parse_text("SCORE: GDT 0.8231 (model 1)\n", DEFAULT_MAX_HEADER_LINES);
        assert_eq!(record.get(CanonicalKey::Score), Some("0.8231"));
    }

    #[test]
    fn doubled_key_fragment_is_stripped_from_value() {
        let record = parse_text("SCORE: SCORE: 0.72\n", DEFAULT_MAX_HEADER_LINES);
        assert_eq!(record.get(CanonicalKey::Score), Some("0.72"));
    }

    #[test]
    fn stoichiometry_is_synthesized_from_scattered_tokens() {
        let record = parse_text("A: 2\nB: 3\n", DEFAULT_MAX_HEADER_LINES);
        assert_eq!(record.get(CanonicalKey::Stoich), Some("A2B3"));
        // The constituent lines were still captured as generic pairs.
        assert_eq!(record.other.get("A"), Some("2"));
        assert_eq!(record.other.get("B"), Some("3"));
    }

    #[test]
    fn stoichiometry_tokens_deduplicate_by_letter_group() {
        let record = parse_text("A: 2 B: 3 A: 9\n", DEFAULT_MAX_HEADER_LINES);
        assert_eq!(record.get(CanonicalKey::Stoich), Some("A2B3"));
    }

    #[test]
    fn recognized_stoich_header_wins_over_synthesis() {
        let record = parse_text("STOICH: A2B2\nC: 7\n", DEFAULT_MAX_HEADER_LINES);
        assert_eq!(record.get(CanonicalKey::Stoich), Some("A2B2"));
    }

    #[test]
    fn atom_line_halts_header_parsing_permanently() {
        let text = format!("TITLE: crystal dimer\n{ATOM_LINE}\nAUTHOR: hidden\n");
        let record = parse_text(&text, DEFAULT_MAX_HEADER_LINES);
        assert_eq!(record.get(CanonicalKey::Title), Some("crystal dimer"));
        assert_eq!(record.get(CanonicalKey::Author), None);
        assert!(!record.other.contains_key("AUTHOR"));
    }

    #[test]
    fn remark_lines_never_reach_other_even_when_key_value_shaped() {
        let record = parse_text("Remarks: see supplementary\n", DEFAULT_MAX_HEADER_LINES);
        assert_eq!(record.remarks, vec!["Remarks: see supplementary"]);
        assert!(!record.other.contains_key("Remarks"));
    }

    #[test]
    fn remarks_keep_file_order() {
        let text = "REMARK first\nMETHOD: x\nremark second\n";
        let record = parse_text(text, DEFAULT_MAX_HEADER_LINES);
        assert_eq!(record.remarks, vec!["REMARK first", "remark second"]);
    }

    #[test]
    fn each_header_line_is_attributed_exactly_once() {
        let text = "REMARK a\nMETHOD: ab-initio\nTarget: H0232\nunstructured trailing words\n";
        let record = parse_text(text, DEFAULT_MAX_HEADER_LINES);
        assert_eq!(record.remarks.len(), 1);
        assert_eq!(record.get(CanonicalKey::Method), Some("ab-initio"));
        assert_eq!(record.other.get("Target"), Some("H0232"));
        assert_eq!(
            record.other.get("LINE_3"),
            Some("unstructured trailing words")
        );
        assert_eq!(record.other.len(), 2);
    }

    #[test]
    fn generic_keys_keep_their_first_value() {
        let text = "Target: H0232\nTarget: H9999\n";
        let record = parse_text(text, DEFAULT_MAX_HEADER_LINES);
        assert_eq!(record.other.get("Target"), Some("H0232"));
    }

    #[test]
    fn canonical_keys_keep_their_last_value() {
        let text = "METHOD: first\nMETHOD: second\n";
        let record = parse_text(text, DEFAULT_MAX_HEADER_LINES);
        assert_eq!(record.get(CanonicalKey::Method), Some("second"));
    }

    #[test]
    fn unstructured_lines_are_tagged_by_zero_based_index() {
        let text = "METHOD: x\n\nsome free text\n";
        let record = parse_text(text, DEFAULT_MAX_HEADER_LINES);
        assert_eq!(record.other.get("LINE_2"), Some("some free text"));
    }

    #[test]
    fn overlong_unstructured_lines_are_dropped() {
        let long = "x".repeat(MAX_CAPTURED_LINE_CHARS);
        let record = parse_text(&long, DEFAULT_MAX_HEADER_LINES);
        assert!(record.other.is_empty());
    }

    #[test]
    fn header_cap_examines_cap_plus_one_lines() {
        // Line indices 0..=cap are examined; the first line past that is not.
        let text = "L0: a\nL1: b\nL2: c\nL3: d\n";
        let record = parse_text(text, 2);
        assert!(record.other.contains_key("L2"));
        assert!(!record.other.contains_key("L3"));
    }

    #[test]
    fn coordinate_shaped_values_are_discarded_as_noise() {
        let record = parse_text("MODEL     1 N ALA\n", DEFAULT_MAX_HEADER_LINES);
        assert_eq!(record.get(CanonicalKey::Model), None);
    }

    #[test]
    fn plain_model_number_is_kept() {
        let record = parse_text("MODEL 1\n", DEFAULT_MAX_HEADER_LINES);
        assert_eq!(record.get(CanonicalKey::Model), Some("1"));
    }

    #[test]
    fn value_without_colon_follows_first_whitespace_run() {
        let record = parse_text("AUTHOR group 1138.\n", DEFAULT_MAX_HEADER_LINES);
        assert_eq!(record.get(CanonicalKey::Author), Some("group 1138"));
    }

    #[test]
    fn stoich_post_pass_reads_past_the_coordinate_boundary() {
        // Preserved quirk: the fallback scans the whole file, so coordinate
        // records can feed the synthesized stoichiometry.
        let text = format!("TITLE: t\n{ATOM_LINE}\n");
        let record = parse_text(&text, DEFAULT_MAX_HEADER_LINES);
        assert!(record.get(CanonicalKey::Stoich).is_some());
    }

    #[test]
    fn parse_path_reports_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.ts");
        assert!(matches!(
            parse_path(&missing, DEFAULT_MAX_HEADER_LINES),
            Err(TsError::Io(_))
        ));
    }

    #[test]
    fn parse_path_decodes_invalid_utf8_lossily() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garbled.ts");
        let mut file = File::create(&path).unwrap();
        file.write_all(b"REMARK \xff\xfe garbled\nAUTHOR: group-7\n")
            .unwrap();
        drop(file);

        let record = parse_path(&path, DEFAULT_MAX_HEADER_LINES).unwrap();
        assert_eq!(record.get(CanonicalKey::Author), Some("group-7"));
        assert_eq!(record.remarks.len(), 1);
    }

    #[test]
    fn empty_file_yields_empty_record() {
        let record = parse_text("", DEFAULT_MAX_HEADER_LINES);
        assert!(!record.has_recognized_fields());
        assert!(record.remarks.is_empty());
        assert!(record.other.is_empty());
    }
}
