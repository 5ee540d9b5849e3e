/// A sentence found in the corpus that contains the query term.
///
/// `match_start` and `match_end` are **character** offsets (Unicode scalar
/// values, not bytes) of the first match of the pattern within `text`, so
/// callers can highlight the match without re-running the pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Example {
    /// Name of the document the sentence came from.
    pub source: String,

    /// The sentence itself, trailing whitespace stripped.
    pub text: String,

    /// Number of whitespace-separated words in `text`.
    pub word_count: usize,

    /// Character offset where the first match starts.
    pub match_start: usize,

    /// Character offset one past the end of the first match.
    pub match_end: usize,
}

impl Example {
    /// The matched slice of `text`.
    ///
    /// ```rust
    /// use corpex::Example;
    ///
    /// let ex = Example {
    ///     source: "film".into(),
    ///     text: "cô gái đó rất đẹp".into(),
    ///     word_count: 5,
    ///     match_start: 3,
    ///     match_end: 6,
    /// };
    /// assert_eq!(ex.matched(), "gái");
    /// ```
    pub fn matched(&self) -> &str {
        self.split_at_match().1
    }

    /// Split `text` into the parts before, inside, and after the match.
    ///
    /// Offsets past the end of the text are clamped.
    pub fn split_at_match(&self) -> (&str, &str, &str) {
        let start = byte_offset(&self.text, self.match_start);
        let end = byte_offset(&self.text, self.match_end.max(self.match_start));
        (&self.text[..start], &self.text[start..end], &self.text[end..])
    }
}

/// Byte offset of the `chars`-th character of `text`, or `text.len()`.
fn byte_offset(text: &str, chars: usize) -> usize {
    text.char_indices()
        .nth(chars)
        .map(|(i, _)| i)
        .unwrap_or(text.len())
}

/// One query against the corpus.
///
/// An empty `term` or a zero `max_results` is not an error — it simply
/// yields no examples.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub term: String,
    pub max_results: usize,
}

impl SearchRequest {
    pub fn new(term: impl Into<String>, max_results: usize) -> Self {
        Self {
            term: term.into(),
            max_results,
        }
    }

    /// Whether this request can produce no results by construction.
    pub fn is_empty(&self) -> bool {
        self.term.is_empty() || self.max_results == 0
    }
}
