//! Merge per-source lists into one deduplicated, date-sorted list.

use std::collections::HashSet;

use crate::article::Article;

/// Merge lists given in source-priority order.
///
/// Incomplete records are dropped, the first occurrence of each link wins,
/// and the result is sorted newest first with undated (`0`) records last.
/// The sort is stable, so ties keep their priority order.
#[must_use]
pub fn merge<L: AsRef<[Article]>>(lists_by_source: &[L]) -> Vec<Article> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut merged: Vec<Article> = lists_by_source
        .iter()
        .flat_map(|list| list.as_ref().iter())
        .filter(|article| article.is_complete())
        .filter(|article| seen.insert(article.link.as_str()))
        .cloned()
        .collect();

    merged.sort_by_key(|article| sort_key(article.published_at_ms));
    merged
}

/// Descending by timestamp, zeros after every dated record.
fn sort_key(published_at_ms: i64) -> (bool, std::cmp::Reverse<i64>) {
    (published_at_ms == 0, std::cmp::Reverse(published_at_ms))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::article::Source;

    fn article(title: &str, link: &str, ts: i64, source: Source) -> Article {
        Article {
            title: title.to_string(),
            link: link.to_string(),
            published_at_ms: ts,
            display_date: String::new(),
            image_url: String::new(),
            source,
        }
    }

    fn links(items: &[Article]) -> Vec<&str> {
        items.iter().map(|a| a.link.as_str()).collect()
    }

    #[test]
    fn two_sources_interleave_by_date() {
        let a = vec![
            article("A1", "https://a/1", 300, Source::Note),
            article("A2", "https://a/2", 100, Source::Note),
        ];
        let b = vec![article("B1", "https://b/1", 200, Source::Zenn)];

        let merged = merge(&[a, b]);
        assert_eq!(links(&merged), ["https://a/1", "https://b/1", "https://a/2"]);
    }

    #[test]
    fn duplicate_link_keeps_higher_priority_source() {
        let note = vec![article("from note", "https://x/1", 100, Source::Note)];
        let zenn = vec![article("from zenn", "https://x/1", 500, Source::Zenn)];

        let merged = merge(&[note, zenn]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].source, Source::Note);
        assert_eq!(merged[0].title, "from note");
    }

    #[test]
    fn undated_records_sort_last_and_stay_stable() {
        let list = vec![
            article("u1", "https://u/1", 0, Source::Qiita),
            article("d1", "https://d/1", 10, Source::Qiita),
            article("u2", "https://u/2", 0, Source::Qiita),
            article("d2", "https://d/2", 10, Source::Qiita),
        ];

        let merged = merge(&[list]);
        assert_eq!(
            links(&merged),
            ["https://d/1", "https://d/2", "https://u/1", "https://u/2"]
        );
    }

    #[test]
    fn incomplete_records_are_dropped() {
        let list = vec![
            article("", "https://x/1", 1, Source::Note),
            article("t", "", 1, Source::Note),
            article("ok", "https://x/2", 1, Source::Note),
        ];
        assert_eq!(links(&merge(&[list])), ["https://x/2"]);
    }

    #[test]
    fn merge_is_idempotent_on_links() {
        let a = vec![
            article("A1", "https://a/1", 3, Source::Note),
            article("A1 again", "https://a/1", 9, Source::Note),
        ];
        let b = vec![article("B1", "https://b/1", 0, Source::Zenn)];

        let once = merge(&[a, b]);
        let twice = merge(&[once.clone()]);
        assert_eq!(links(&once), links(&twice));

        let unique: HashSet<&str> = once.iter().map(|a| a.link.as_str()).collect();
        assert_eq!(unique.len(), once.len());
    }

    #[test]
    fn empty_input_is_empty() {
        let lists: [Vec<Article>; 0] = [];
        assert!(merge(&lists).is_empty());
    }
}
