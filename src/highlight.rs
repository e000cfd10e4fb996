//! Binding saved regions to spans of the accompanying text document.
//!
//! The document (e.g. a transcript extracted from a PDF) is held verbatim; a
//! binding is a byte range into it plus the fragment filename and time bounds.
//! Bindings are ephemeral: they are recomputed by re-matching text whenever the
//! regions are reloaded, never persisted.
//!
//! Matching degrades through three strategies, each strictly weaker than the
//! last. A miss on all three is logged and non-fatal; the region stays usable
//! for playback without a text binding.

use std::ops::Range;

use regex::Regex;
use tracing::{debug, warn};

/// Minimum text length before the leading-phrase strategy is attempted.
const PHRASE_MIN_LEN: usize = 15;
/// Minimum word count before the leading-phrase strategy is attempted.
const PHRASE_MIN_WORDS: usize = 3;
/// Number of leading words used by the phrase strategy.
const PHRASE_WORDS: usize = 5;
/// Minimum text length before the longest-word strategy is attempted.
const WORD_MIN_LEN: usize = 10;
/// Words must be longer than this to qualify for the longest-word strategy.
const WORD_MIN_CHARS: usize = 4;
/// How many candidate words the longest-word strategy tries.
const WORD_CANDIDATES: usize = 3;

/// Which strategy produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStrategy {
    Exact,
    LeadingPhrase,
    LongestWord,
}

/// Identifier for a highlight, unique within one highlighter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HighlightId(u64);

/// A bound span: document range plus the region interval it links to.
#[derive(Debug, Clone, PartialEq)]
pub struct Highlight {
    pub id: HighlightId,
    pub range: Range<usize>,
    /// Server-assigned fragment filename of the originating region.
    pub fragment: String,
    pub start: f64,
    pub end: f64,
    pub strategy: MatchStrategy,
}

/// The interval a highlight should bind to.
#[derive(Debug, Clone, PartialEq)]
pub struct HighlightTarget {
    pub fragment: String,
    pub start: f64,
    pub end: f64,
}

/// Locate an occurrence of `text` in `document`.
///
/// Strategies, in order:
/// 1. exact substring, first occurrence;
/// 2. leading phrase (first up to five words), only for texts longer than 15
///    characters with at least three words;
/// 3. whole-word match on the three longest words over four characters, only
///    for texts longer than 10 characters.
pub fn find_span(document: &str, text: &str) -> Option<(Range<usize>, MatchStrategy)> {
    let needle = text.trim();
    if needle.is_empty() {
        return None;
    }

    if let Some(pos) = document.find(needle) {
        return Some((pos..pos + needle.len(), MatchStrategy::Exact));
    }

    let words: Vec<&str> = needle.split_whitespace().collect();

    if needle.len() > PHRASE_MIN_LEN && words.len() >= PHRASE_MIN_WORDS {
        let phrase = words
            .iter()
            .take(PHRASE_WORDS)
            .copied()
            .collect::<Vec<_>>()
            .join(" ");
        if let Some(pos) = document.find(&phrase) {
            return Some((pos..pos + phrase.len(), MatchStrategy::LeadingPhrase));
        }
    }

    if needle.len() > WORD_MIN_LEN {
        let mut candidates: Vec<&str> = words
            .iter()
            .copied()
            .filter(|w| w.chars().count() > WORD_MIN_CHARS)
            .collect();
        candidates.sort_by(|a, b| b.len().cmp(&a.len()));

        for word in candidates.iter().take(WORD_CANDIDATES) {
            let pattern = format!(r"\b{}\b", regex::escape(word));
            let Ok(re) = Regex::new(&pattern) else {
                continue;
            };
            if let Some(m) = re.find(document) {
                return Some((m.range(), MatchStrategy::LongestWord));
            }
        }
    }

    None
}

/// Holds the document text and the bindings attached to it.
pub struct TextHighlighter {
    document: String,
    highlights: Vec<Highlight>,
    next_id: u64,
}

impl TextHighlighter {
    pub fn new(document: impl Into<String>) -> Self {
        Self {
            document: document.into(),
            highlights: Vec::new(),
            next_id: 0,
        }
    }

    pub fn document(&self) -> &str {
        &self.document
    }

    /// Replace the document, dropping every binding. Bindings are recomputed
    /// by the caller re-running [`TextHighlighter::bind`] per region.
    pub fn reset_document(&mut self, document: impl Into<String>) {
        self.document = document.into();
        self.highlights.clear();
    }

    /// Bind `text` to `target`, wrapping the first occurrence only.
    ///
    /// A later bind for the same fragment replaces the earlier highlight, so a
    /// region whose text changes keeps exactly one span. Returns `None` (after
    /// logging) when no strategy matches; the document is left unmodified.
    pub fn bind(&mut self, text: &str, target: &HighlightTarget) -> Option<&Highlight> {
        let Some((range, strategy)) = find_span(&self.document, text) else {
            warn!(fragment = %target.fragment, "text not found in document, leaving it unbound");
            return None;
        };

        // One binding per fragment: drop the previous span for this region.
        self.highlights.retain(|h| h.fragment != target.fragment);

        let id = HighlightId(self.next_id);
        self.next_id += 1;
        debug!(
            fragment = %target.fragment,
            ?strategy,
            start = range.start,
            end = range.end,
            "bound text span"
        );
        self.highlights.push(Highlight {
            id,
            range,
            fragment: target.fragment.clone(),
            start: target.start,
            end: target.end,
            strategy,
        });
        self.highlights.last()
    }

    pub fn get(&self, id: HighlightId) -> Option<&Highlight> {
        self.highlights.iter().find(|h| h.id == id)
    }

    pub fn find_by_fragment(&self, fragment: &str) -> Option<&Highlight> {
        self.highlights.iter().find(|h| h.fragment == fragment)
    }

    pub fn highlights(&self) -> impl Iterator<Item = &Highlight> {
        self.highlights.iter()
    }

    /// The text the highlight spans in the document.
    pub fn span_text(&self, id: HighlightId) -> Option<&str> {
        self.get(id).map(|h| &self.document[h.range.clone()])
    }
}
