//! Source filter for the article list.
//!
//! Non-matching entries are hidden with an inline style, filter tabs
//! (`[data-filter]`) reflect the active filter, and an empty-state block is
//! shown when nothing is visible.

use std::fmt;
use std::str::FromStr;

use crate::article::Source;
use crate::dom::{self, Document, Selection};

use super::escape_html;

const ENTRY_SELECTOR: &str = ".card--article";
const TAB_SELECTOR: &str = "[data-filter]";
const ACTIVE_TAB_CLASS: &str = "articles-filter__tab--active";
const EMPTY_STATE_SELECTOR: &str = ".articles-empty";

/// Which entries the list shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filter {
    #[default]
    All,
    Source(Source),
}

impl Filter {
    /// Value matching a tab's `data-filter` attribute.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Filter::All => "all",
            Filter::Source(source) => source.tag(),
        }
    }

    /// Whether an entry with the given `data-source` is shown.
    ///
    /// Entries without a source only show under [`Filter::All`].
    #[must_use]
    pub fn matches(self, data_source: Option<&str>) -> bool {
        match self {
            Filter::All => true,
            Filter::Source(source) => data_source
                .and_then(|s| s.parse::<Source>().ok())
                .is_some_and(|s| s == source),
        }
    }

    /// Empty-state wording for this filter.
    #[must_use]
    pub fn empty_message(self) -> String {
        match self {
            Filter::All => "該当する記事がありません".to_string(),
            Filter::Source(source) => format!("{}の記事はまだありません", source.label()),
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Filter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(Filter::All);
        }
        s.parse::<Source>().map(Filter::Source)
    }
}

/// Apply `filter` to the entries of `list`, updating tabs anywhere on `doc`.
pub(super) fn apply(doc: &Document, list: &Selection, filter: Filter) {
    let mut visible = 0usize;
    for entry in list.select(ENTRY_SELECTOR).iter() {
        let shown = filter.matches(entry.attr("data-source").as_deref());
        dom::set_hidden(&entry, !shown);
        if shown {
            visible += 1;
        }
    }

    update_tabs(doc, filter);

    list.select(EMPTY_STATE_SELECTOR).remove();
    if visible == 0 {
        list.append_html(format!(
            r#"<div class="articles-empty"><p class="articles-empty__text">{}</p></div>"#,
            escape_html(&filter.empty_message())
        ));
    }
}

fn update_tabs(doc: &Document, filter: Filter) {
    for tab in doc.select(TAB_SELECTOR).iter() {
        let key = tab.attr("data-filter").map(|k| k.to_string()).unwrap_or_default();
        let active = key.eq_ignore_ascii_case(filter.key());
        tab.set_attr("aria-selected", if active { "true" } else { "false" });
        if active {
            tab.add_class(ACTIVE_TAB_CLASS);
        } else {
            tab.remove_class(ACTIVE_TAB_CLASS);
        }
    }
}
