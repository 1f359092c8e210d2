use crate::core::model::keys::CanonicalKey;
use crate::core::model::record::MetadataRecord;

/// Fields shown by the trimmed summary, in display order.
pub const DISPLAY_ORDER: [CanonicalKey; 5] = [
    CanonicalKey::Stoich,
    CanonicalKey::Author,
    CanonicalKey::Method,
    CanonicalKey::Score,
    CanonicalKey::Model,
];

/// Renders the trimmed, human-readable summary for `key`.
///
/// This listing is the sole externally observable output of the toolkit:
/// a fixed-order selection of the recognized fields under friendly labels,
/// or a notice when the record is absent or carries none of them.
pub fn render_summary(key: &str, record: Option<&MetadataRecord>) -> String {
    let mut out = String::new();
    out.push_str(&format!("=== TS metadata for: {key} ===\n"));
    let Some(record) = record else {
        out.push_str("  (no TS metadata available)\n");
        return out;
    };
    let mut any_printed = false;
    for field in DISPLAY_ORDER {
        if let Some(value) = record.get(field) {
            if value.is_empty() {
                continue;
            }
            let label = field.friendly_label().unwrap_or_else(|| field.name());
            out.push_str(&format!("{label}: {value}\n"));
            any_printed = true;
        }
    }
    if !any_printed {
        out.push_str("  (no recognized metadata fields found)\n");
    }
    out
}
