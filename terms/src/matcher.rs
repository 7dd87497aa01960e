//! Incremental recognition of multi-word terms.

use crate::TermIndex;
use log::trace;

/// Recognizes one term a word at a time against a TermIndex.
///
/// Feed words with [`starts`](TermMatcher::starts) and
/// [`continues`](TermMatcher::continues); after each word,
/// [`term`](TermMatcher::term) holds the longest complete term seen so far
/// and [`global_term`](TermMatcher::global_term) its underlying global term.
#[derive(Debug)]
pub struct TermMatcher<'a> {
    index: &'a TermIndex,
    part: String,
    term: Option<String>,
    global_term: Option<String>,
}

impl<'a> TermMatcher<'a> {
    pub fn new(index: &'a TermIndex) -> Self {
        Self {
            index,
            part: String::new(),
            term: None,
            global_term: None,
        }
    }

    /// Begin matching with the first word. Returns false if no known term,
    /// local name, or allowed forward term starts with it.
    pub fn starts(&mut self, word: &str) -> bool {
        self.part = word.to_string();
        self.term = None;
        self.global_term = None;

        if let Some(completions) = self
            .index
            .term_completions(word)
            .or_else(|| self.index.local_completions(word))
        {
            if let Some(global) = completions.get(word) {
                self.save(word, global.as_deref());
            }
            trace!(
                "term {} '{}'",
                if self.term.is_some() { "is" } else { "starts" },
                self.part
            );
            return true;
        }
        if self.index.is_allowed_forward(word) {
            self.save(word, None);
            trace!("term '{}' is an allowed forward", word);
            return true;
        }
        false
    }

    /// Feed the next word. Returns false if no known term continues with it.
    pub fn continues(&mut self, word: &str) -> bool {
        self.part.push(' ');
        self.part.push_str(word);

        // A term part takes precedence unless the words form a complete local name.
        let completions = if self.index.term_completions(&self.part).is_some()
            && !self.index.is_local_name(&self.part)
        {
            self.index.term_completions(&self.part)
        } else {
            self.index
                .local_completions(&self.part)
                .or_else(|| self.index.term_completions(&self.part))
        };

        match completions {
            Some(c) => {
                if let Some(global) = c.get(&self.part) {
                    let part = self.part.clone();
                    let global = global.clone();
                    self.save(&part, global.as_deref());
                }
                trace!(
                    "multi-word term {} '{}'",
                    if self.term.as_deref() == Some(self.part.as_str()) {
                        "ends at"
                    } else {
                        "continues to"
                    },
                    self.part
                );
                true
            }
            None => false,
        }
    }

    /// Whether the words fed so far form a complete term.
    pub fn complete(&self) -> bool {
        self.term.as_deref() == Some(self.part.as_str())
            || self.index.is_allowed_forward(&self.part)
    }

    /// The longest complete term recognized so far.
    pub fn term(&self) -> Option<&str> {
        self.term.as_deref()
    }

    /// The global term underlying the recognized term.
    pub fn global_term(&self) -> Option<&str> {
        self.global_term.as_deref()
    }

    fn save(&mut self, term: &str, global: Option<&str>) {
        self.term = Some(term.to_string());
        self.global_term = Some(global.unwrap_or(term).to_string());
        trace!("saving context {}/{}", term, global.unwrap_or(term));
    }
}
