use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use ignore::WalkBuilder;

use crate::error::{CorpexError, Result};

/// Default number of dot-separated segments stripped from a filename to get
/// the document name: `movie.1999.vi.srt.txt` → `movie`.
pub const DEFAULT_SUFFIX_SEGMENTS: usize = 4;

// ---------------------------------------------------------------------------
// Document
// ---------------------------------------------------------------------------

/// One source file's deduplicated sentence lines.
///
/// Lines are stripped of trailing whitespace, blank lines are dropped, and
/// duplicates are removed keeping the first occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    name: String,
    lines: Vec<String>,
}

impl Document {
    pub fn new<I, S>(name: impl Into<String>, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut doc = DocumentBuilder::new(name.into());
        for line in lines {
            doc.push(line.as_ref());
        }
        doc.finish()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

struct DocumentBuilder {
    name: String,
    seen: HashSet<String>,
    lines: Vec<String>,
}

impl DocumentBuilder {
    fn new(name: String) -> Self {
        Self {
            name,
            seen: HashSet::new(),
            lines: Vec::new(),
        }
    }

    fn push(&mut self, raw: &str) {
        let line = raw.trim_end();
        if line.is_empty() || self.seen.contains(line) {
            return;
        }
        self.seen.insert(line.to_owned());
        self.lines.push(line.to_owned());
    }

    fn finish(self) -> Document {
        Document {
            name: self.name,
            lines: self.lines,
        }
    }
}

// ---------------------------------------------------------------------------
// Corpus
// ---------------------------------------------------------------------------

/// Options controlling how a corpus folder is read.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Dot-separated segments stripped from the end of each filename.
    pub suffix_segments: usize,

    /// Fail the load on the first line that is not valid UTF-8 instead of
    /// skipping it.
    pub strict_decoding: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            suffix_segments: DEFAULT_SUFFIX_SEGMENTS,
            strict_decoding: false,
        }
    }
}

/// An immutable, ordered collection of [`Document`]s with unique names.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    documents: Vec<Document>,
}

impl Corpus {
    /// Build a corpus from in-memory documents.
    ///
    /// # Errors
    ///
    /// [`CorpexError::DuplicateDocument`] if two documents share a name.
    ///
    /// ```rust
    /// use corpex::{Corpus, Document};
    ///
    /// let corpus = Corpus::new(vec![
    ///     Document::new("a", ["one line", "one line", "two lines  "]),
    ///     Document::new("b", ["three"]),
    /// ]).unwrap();
    ///
    /// assert_eq!(corpus.len(), 2);
    /// assert_eq!(corpus.line_count(), 3);
    /// assert!(Corpus::new(vec![Document::new("a", ["x"]), Document::new("a", ["y"])]).is_err());
    /// ```
    pub fn new(documents: Vec<Document>) -> Result<Self> {
        let mut names = HashSet::new();
        for doc in &documents {
            if !names.insert(doc.name.as_str()) {
                return Err(CorpexError::DuplicateDocument {
                    name: doc.name.clone(),
                    path: None,
                });
            }
        }
        Ok(Self { documents })
    }

    /// Read every file directly inside `folder` as one document.
    ///
    /// Files are visited in filename order so the document sequence is
    /// reproducible. Subdirectories are not descended into.
    pub fn load(folder: impl AsRef<Path>, opts: &LoadOptions) -> Result<Self> {
        let folder = folder.as_ref();
        if !folder.exists() {
            return Err(CorpexError::NotFound(folder.to_path_buf()));
        }
        if !folder.is_dir() {
            return Err(CorpexError::InvalidSource(folder.to_path_buf()));
        }

        let mut builder = WalkBuilder::new(folder);
        builder
            .standard_filters(false)
            .hidden(false)
            .parents(false)
            .follow_links(true)
            .max_depth(Some(1))
            .sort_by_file_name(|a, b| a.cmp(b));

        let mut documents = Vec::new();
        let mut names = HashSet::new();
        let mut skipped = 0usize;

        for res in builder.build() {
            let entry = res.map_err(map_ignore_error)?;
            if entry.depth() == 0 || !entry.file_type().is_some_and(|ft| ft.is_file()) {
                continue;
            }

            let path = entry.path();
            let file_name = entry.file_name().to_string_lossy();
            let name = document_name(&file_name, opts.suffix_segments);
            if !names.insert(name.clone()) {
                return Err(CorpexError::DuplicateDocument {
                    name,
                    path: Some(path.to_path_buf()),
                });
            }

            let (doc, bad_lines) = read_document(path, name, opts.strict_decoding)?;
            if bad_lines > 0 {
                tracing::warn!(
                    "skipped {} undecodable line(s) in {}",
                    bad_lines,
                    path.display()
                );
            }
            skipped += bad_lines;
            documents.push(doc);
        }

        let corpus = Self { documents };
        tracing::info!(
            documents = corpus.len(),
            lines = corpus.line_count(),
            skipped,
            "corpus loaded from {}",
            folder.display()
        );
        Ok(corpus)
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    /// Look up a document by name.
    pub fn get(&self, name: &str) -> Option<&Document> {
        self.documents.iter().find(|d| d.name == name)
    }

    /// Number of documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Total number of sentence lines across all documents.
    pub fn line_count(&self) -> usize {
        self.documents.iter().map(Document::len).sum()
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Strip up to `segments` dot-separated suffixes from a filename.
///
/// Falls back to the full filename when stripping would leave nothing
/// (e.g. dotfiles).
pub fn document_name(file_name: &str, segments: usize) -> String {
    let stem = file_name
        .rsplitn(segments.saturating_add(1), '.')
        .last()
        .unwrap_or(file_name);
    if stem.is_empty() {
        file_name.to_owned()
    } else {
        stem.to_owned()
    }
}

/// Read a file as newline-delimited text. Returns the document and the
/// number of lines skipped because they were not valid UTF-8.
fn read_document(path: &Path, name: String, strict: bool) -> Result<(Document, usize)> {
    let bytes = fs::read(path).map_err(|source| CorpexError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut doc = DocumentBuilder::new(name);
    let mut bad_lines = 0;
    for (idx, raw) in bytes.split(|b| *b == b'\n').enumerate() {
        match std::str::from_utf8(raw) {
            Ok(line) => doc.push(line),
            Err(_) if strict => {
                return Err(CorpexError::Decode {
                    path: path.to_path_buf(),
                    line: idx + 1,
                })
            }
            Err(_) => bad_lines += 1,
        }
    }
    Ok((doc.finish(), bad_lines))
}

fn map_ignore_error(e: ignore::Error) -> CorpexError {
    match e {
        ignore::Error::WithPath { path, err } => match *err {
            ignore::Error::Io(source) => CorpexError::Io { path, source },
            other => CorpexError::Walk(format!("{}: {}", path.display(), other)),
        },
        ignore::Error::Io(source) => CorpexError::Io {
            path: PathBuf::new(),
            source,
        },
        other => CorpexError::Walk(other.to_string()),
    }
}
