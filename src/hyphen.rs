use std::collections::HashMap;

/// Splits a word into fragments that may be rejoined with hyphens.
///
/// Returning an empty or one-element vector means "no legal break points"; the
/// word is then kept whole. The engine inserts a flagged hyphen penalty between
/// consecutive fragments, so fragments should not include the hyphen themselves.
pub trait Hyphenate {
    fn hyphenate(&self, word: &str) -> Vec<String>;
}

/// Never hyphenates; every word is a single fragment.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHyphenation;

impl Hyphenate for NoHyphenation {
    fn hyphenate(&self, _word: &str) -> Vec<String> {
        Vec::new()
    }
}

/// A fixed word-to-fragments dictionary. Words not in the dictionary are left
/// whole. Fragment lookups are exact (case-sensitive).
#[derive(Debug, Clone, Default)]
pub struct DictionaryHyphenator {
    entries: HashMap<String, Vec<String>>,
}

impl DictionaryHyphenator {
    pub fn new<S: Into<String>>(
        entries: impl IntoIterator<Item = (S, Vec<S>)>,
    ) -> DictionaryHyphenator {
        DictionaryHyphenator {
            entries: entries
                .into_iter()
                .map(|(word, parts)| {
                    (
                        word.into(),
                        parts.into_iter().map(Into::into).collect::<Vec<_>>(),
                    )
                })
                .collect(),
        }
    }

    pub fn insert(&mut self, word: impl Into<String>, fragments: Vec<String>) {
        self.entries.insert(word.into(), fragments);
    }
}

impl Hyphenate for DictionaryHyphenator {
    fn hyphenate(&self, word: &str) -> Vec<String> {
        self.entries.get(word).cloned().unwrap_or_default()
    }
}

/// Wraps a plain fragmenting function into a [Hyphenate].
pub struct FnHyphenator<F>(pub F);

impl<F> Hyphenate for FnHyphenator<F>
where
    F: Fn(&str) -> Vec<String>,
{
    fn hyphenate(&self, word: &str) -> Vec<String> {
        (self.0)(word)
    }
}
