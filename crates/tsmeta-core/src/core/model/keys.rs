use phf::{Map, phf_map};

/// The fixed set of recognized metadata fields in a TS file header.
///
/// TS headers are free-form and frequently corrupted by fixed-width
/// truncation, so each canonical key carries a set of alias substrings
/// (see [`KEY_ALIASES`]) rather than a single exact spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CanonicalKey {
    /// Copy-count composition of the modeled assembly (e.g. "A2B3").
    Stoich,
    /// Model quality estimate (GDT, TM-score, QMEAN and friends).
    Score,
    /// Modeling method description.
    Method,
    /// Depositing author or group.
    Author,
    /// Model identifier.
    Model,
    /// Declared file format.
    Format,
    /// Title line.
    Title,
    /// Compound description.
    Compnd,
}

impl CanonicalKey {
    /// All canonical keys, in declaration order. Alias matching and record
    /// iteration both follow this order, so tie-breaks between overlapping
    /// aliases are deterministic.
    pub const ALL: [CanonicalKey; 8] = [
        CanonicalKey::Stoich,
        CanonicalKey::Score,
        CanonicalKey::Method,
        CanonicalKey::Author,
        CanonicalKey::Model,
        CanonicalKey::Format,
        CanonicalKey::Title,
        CanonicalKey::Compnd,
    ];

    /// The canonical (uppercase) name of this key as it appears in records.
    pub fn name(self) -> &'static str {
        match self {
            CanonicalKey::Stoich => "STOICH",
            CanonicalKey::Score => "SCORE",
            CanonicalKey::Method => "METHOD",
            CanonicalKey::Author => "AUTHOR",
            CanonicalKey::Model => "MODEL",
            CanonicalKey::Format => "FORMAT",
            CanonicalKey::Title => "TITLE",
            CanonicalKey::Compnd => "COMPND",
        }
    }

    /// Human-readable label used by the trimmed summary, if this key is one
    /// of the displayed fields.
    pub fn friendly_label(self) -> Option<&'static str> {
        FRIENDLY_LABELS.get(self.name()).copied()
    }
}

/// Alias substrings per canonical key, in matching order.
///
/// Aliases tolerate corrupted leading characters from fixed-width truncation
/// ("ETHOD", "UTHOR", "TOICH"). A key is recognized when any of its aliases
/// occurs as a substring anywhere in the uppercased line.
pub const KEY_ALIASES: &[(CanonicalKey, &[&str])] = &[
    (
        CanonicalKey::Stoich,
        &["STOICH", "STOICHIOMETR", "TOICH", "STOI"],
    ),
    (
        CanonicalKey::Score,
        &["SCORE", "GDT", "TM_SCORE", "TM-SCORE", "TM", "QMEAN"],
    ),
    (CanonicalKey::Method, &["METHOD", "ETHOD"]),
    (CanonicalKey::Author, &["AUTHOR", "UTHOR"]),
    (CanonicalKey::Model, &["MODEL"]),
    (CanonicalKey::Format, &["FORMAT", "FRMAT", "FRM"]),
    (CanonicalKey::Title, &["TITLE", "TITL"]),
    (CanonicalKey::Compnd, &["COMPND", "COMPOUND", "COMPONENT"]),
];

static FRIENDLY_LABELS: Map<&'static str, &'static str> = phf_map! {
    "STOICH" => "Stoichiometry",
    "SCORE" => "Score(s)",
    "METHOD" => "Method",
    "AUTHOR" => "Author",
    "MODEL" => "Model",
};

/// Identifies the canonical key addressed by an (uppercased) header line.
///
/// The primary pass scans [`KEY_ALIASES`] in declaration order for an alias
/// occurring anywhere in the line. If that fails and a left-hand token is
/// available, a second pass tests the token prefixed onto the first 20
/// characters of the line against the canonical names themselves, which
/// covers headers whose keyword was split or garbled mid-word.
pub fn identify_canonical_key(
    line_upper: &str,
    left_token_upper: &str,
) -> Option<CanonicalKey> {
    for (canon, aliases) in KEY_ALIASES {
        for alias in *aliases {
            if line_upper.contains(alias) {
                return Some(*canon);
            }
        }
    }
    if !left_token_upper.is_empty() {
        let prefix: String = line_upper.chars().take(20).collect();
        let candidate = format!("{left_token_upper}{prefix}");
        for (canon, _) in KEY_ALIASES {
            if candidate.contains(canon.name()) {
                return Some(*canon);
            }
        }
    }
    None
}
