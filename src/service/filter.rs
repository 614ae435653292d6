//! Query contract for listing snippets.
//!
//! `language` and `category` are exact, case-sensitive matches and are pushed
//! down to the store. `search` is a case-insensitive substring test over
//! title, description and code, OR'd together. All present filters are AND'd.

use crate::persistence::SnippetModel;
use serde::Deserialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub(crate) struct SnippetFilter {
    pub(crate) search: Option<String>,
    pub(crate) language: Option<String>,
    pub(crate) category: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.is_empty())
}

impl SnippetFilter {
    /// Empty query parameters impose no constraint, same as omitted ones.
    pub(crate) fn normalized(self) -> Self {
        Self {
            search: non_empty(self.search),
            language: non_empty(self.language),
            category: non_empty(self.category),
        }
    }

    pub(crate) fn matches(&self, snippet: &SnippetModel) -> bool {
        self.matches_search(snippet)
            && self
                .language
                .as_deref()
                .is_none_or(|language| snippet.language == language)
            && self
                .category
                .as_deref()
                .is_none_or(|category| snippet.category == category)
    }

    pub(crate) fn matches_search(&self, snippet: &SnippetModel) -> bool {
        let Some(search) = self.search.as_deref() else {
            return true;
        };
        let needle = search.to_lowercase();

        [&snippet.title, &snippet.description, &snippet.code]
            .into_iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }
}
