//! Provider instruction and entry text composition.

use journal_core::entry::{Entry, EntryField};

/// Token budget requested for the provider's answer.
pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 1024;

/// Fixed instruction sent with every analysis.
pub const SYSTEM_PROMPT: &str = "\
You are a journal entry analyzer. Analyze the given journal entry and return a JSON object with:
- \"sentiment\": one of \"positive\", \"negative\", or \"neutral\"
- \"summary\": a 2-sentence summary of the entry
- \"topics\": an array of 2-4 key topics mentioned

Return ONLY valid JSON, no additional text.";

/// Join an entry's fields into the provider input.
///
/// Fields appear in canonical order (`work`, `struggle`, `intention`), one
/// per line, each prefixed with its label:
///
/// ```text
/// Work: <work>
/// Struggle: <struggle>
/// Intention: <intention>
/// ```
///
/// The output depends only on the field values.
pub fn compose_entry_text(entry: &Entry) -> String {
    EntryField::ALL
        .iter()
        .map(|&field| format!("{}: {}", field.label(), entry.field(field)))
        .collect::<Vec<_>>()
        .join("\n")
}
