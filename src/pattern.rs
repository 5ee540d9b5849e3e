use std::ops::Range;

use regex::{Regex, RegexBuilder};

use crate::error::{CorpexError, Result};
use crate::traits::Matcher;

/// How the query term must sit inside a sentence to count as a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchMode {
    /// The term must be bounded by non-word characters or line edges:
    /// `cat` matches "a cat sat" but not "category".
    #[default]
    WholeWord,

    /// The term may appear anywhere, including inside longer words.
    Substring,
}

/// A compiled, case-insensitive literal pattern for one query term.
#[derive(Debug, Clone)]
pub struct Pattern {
    term: String,
    mode: MatchMode,
    regex: Regex,
}

impl Pattern {
    /// Compile `term` as a literal (regex metacharacters are escaped).
    ///
    /// ```rust
    /// use corpex::{MatchMode, Matcher, Pattern};
    ///
    /// let whole = Pattern::compile("cat", MatchMode::WholeWord).unwrap();
    /// assert_eq!(whole.find("a Cat sat"), Some(2..5));
    /// assert_eq!(whole.find("category"), None);
    ///
    /// let sub = Pattern::compile("cat", MatchMode::Substring).unwrap();
    /// assert_eq!(sub.find("category"), Some(0..3));
    ///
    /// let literal = Pattern::compile("a.c", MatchMode::Substring).unwrap();
    /// assert_eq!(literal.find("abc"), None);
    /// ```
    pub fn compile(term: &str, mode: MatchMode) -> Result<Self> {
        let escaped = regex::escape(term);
        let source = match mode {
            MatchMode::WholeWord => format!(r"(?:^|\W)({escaped})(?:$|\W)"),
            MatchMode::Substring => format!("({escaped})"),
        };

        let regex = RegexBuilder::new(&source)
            .case_insensitive(true)
            .unicode(true)
            .build()
            .map_err(|e| CorpexError::InvalidPattern(e.to_string()))?;

        Ok(Self {
            term: term.to_owned(),
            mode,
            regex,
        })
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }
}

impl Matcher for Pattern {
    fn find(&self, line: &str) -> Option<Range<usize>> {
        // Group 1 is the term itself, without the boundary characters.
        self.regex
            .captures(line)
            .and_then(|caps| caps.get(1))
            .map(|m| m.range())
    }
}
