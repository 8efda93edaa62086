//! Session title derivation from message text.
//!
//! A session keeps the default title until a message produces a non-empty
//! derived title: the first three words longer than two characters, in
//! their original order, joined by single spaces.

use parley_types::chat::DEFAULT_SESSION_TITLE;

/// Maximum number of words kept in a derived title.
const TITLE_MAX_WORDS: usize = 3;

/// Words of this many characters or fewer are skipped.
const TITLE_MIN_WORD_CHARS: usize = 2;

/// Derive a session title from the content of a user message.
///
/// Splits on single spaces (so runs of spaces yield empty words, which are
/// skipped by the length rule). Falls back to the default title when no word
/// qualifies.
pub fn derive_title(content: &str) -> String {
    let title = content
        .split(' ')
        .filter(|word| word.chars().count() > TITLE_MIN_WORD_CHARS)
        .take(TITLE_MAX_WORDS)
        .collect::<Vec<_>>()
        .join(" ");

    if title.is_empty() {
        DEFAULT_SESSION_TITLE.to_string()
    } else {
        title
    }
}
