use crate::config::MatchMode;
use crate::error::{RelationError, Result};
use crate::types::{Corpus, FunctionDescriptor};
use regex::Regex;

/// Locates function names inside text according to [`MatchMode`]
pub struct NameMatcher {
    names: Vec<String>,
    patterns: Option<Vec<Regex>>,
}

impl NameMatcher {
    pub fn new(functions: &[FunctionDescriptor], mode: MatchMode) -> Result<Self> {
        let names: Vec<String> = functions.iter().map(|f| f.name.clone()).collect();

        let patterns = match mode {
            MatchMode::Substring => None,
            MatchMode::WordBoundary => Some(
                names
                    .iter()
                    .map(|name| {
                        Regex::new(&format!(
                            r"(?:^|[^A-Za-z0-9_$]){}(?:$|[^A-Za-z0-9_$])",
                            regex::escape(name)
                        ))
                        .map_err(|e| {
                            RelationError::processing(format!(
                                "cannot build matcher for '{name}': {e}"
                            ))
                        })
                    })
                    .collect::<Result<Vec<_>>>()?,
            ),
        };

        Ok(Self { names, patterns })
    }

    /// Byte offset of the first occurrence of function `idx` in `text`
    #[must_use]
    pub fn find(&self, idx: usize, text: &str) -> Option<usize> {
        let name = self.names.get(idx)?;
        match &self.patterns {
            None => text.find(name.as_str()),
            Some(patterns) => {
                let m = patterns.get(idx)?.find(text)?;
                if m.as_str().starts_with(name.as_str()) {
                    Some(m.start())
                } else {
                    let lead = m.as_str().chars().next().map_or(0, char::len_utf8);
                    Some(m.start() + lead)
                }
            }
        }
    }

    #[must_use]
    pub fn contains(&self, idx: usize, text: &str) -> bool {
        self.find(idx, text).is_some()
    }

    /// Indices of all functions present in `text`, in function-list order
    #[must_use]
    pub fn present_in(&self, text: &str) -> Vec<usize> {
        (0..self.names.len())
            .filter(|&idx| self.contains(idx, text))
            .collect()
    }

    #[must_use]
    pub fn name(&self, idx: usize) -> &str {
        self.names.get(idx).map_or("", String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Function occurrence inside one snippet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Occurrence {
    pub function: usize,
    /// Char index of the first occurrence
    pub offset: usize,
}

/// Presence cache: which functions occur in each snippet and where they first appear.
///
/// Built once per run; every scanner reads it instead of re-searching whole snippets.
pub struct SnippetIndex {
    matcher: NameMatcher,
    occurrences: Vec<Vec<Occurrence>>,
    blank_snippets: usize,
}

impl SnippetIndex {
    pub fn build(
        functions: &[FunctionDescriptor],
        corpus: &Corpus,
        mode: MatchMode,
    ) -> Result<Self> {
        let matcher = NameMatcher::new(functions, mode)?;
        let mut blank_snippets = 0;

        let occurrences = corpus
            .snippets
            .iter()
            .map(|snippet| {
                if snippet.code.trim().is_empty() {
                    blank_snippets += 1;
                    return Vec::new();
                }
                (0..matcher.len())
                    .filter_map(|function| {
                        matcher.find(function, &snippet.code).map(|byte| Occurrence {
                            function,
                            offset: char_offset(&snippet.code, byte),
                        })
                    })
                    .collect()
            })
            .collect::<Vec<Vec<Occurrence>>>();

        log::debug!(
            "Snippet index: {} snippets, {} occurrences",
            occurrences.len(),
            occurrences.iter().map(Vec::len).sum::<usize>()
        );
        Ok(Self {
            matcher,
            occurrences,
            blank_snippets,
        })
    }

    #[must_use]
    pub fn matcher(&self) -> &NameMatcher {
        &self.matcher
    }

    /// Occurrences in snippet `snippet`, ordered by function index
    #[must_use]
    pub fn occurrences(&self, snippet: usize) -> &[Occurrence] {
        self.occurrences.get(snippet).map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn contains(&self, snippet: usize, function: usize) -> bool {
        self.occurrences(snippet)
            .iter()
            .any(|o| o.function == function)
    }

    /// Snippets mentioning `function`, in corpus order
    pub fn snippets_with(&self, function: usize) -> impl Iterator<Item = usize> + '_ {
        (0..self.occurrences.len()).filter(move |&s| self.contains(s, function))
    }

    #[must_use]
    pub const fn blank_snippets(&self) -> usize {
        self.blank_snippets
    }
}

fn char_offset(text: &str, byte: usize) -> usize {
    text.get(..byte).map_or(byte, |prefix| prefix.chars().count())
}
