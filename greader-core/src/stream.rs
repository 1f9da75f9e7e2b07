//! Classification of opaque stream identifiers.
//!
//! The first half of stream resolution: a raw string plus the hint taken
//! from the URL segment that introduced it become a [`StreamSpec`]. The
//! store-backed second half (URL and name lookups) turns a spec into a
//! [`greader_types::StreamRef`].
//!
//! Classification is total: any input yields a spec, malformed input
//! yields [`StreamSpec::Unresolved`].

use greader_types::{label_name, FeedId, StateToken, FEED_PREFIX};

use crate::escape::escape_html;

/// Kind of stream expected by the route that carried the identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamHint {
    /// `.../stream/contents/feed/<id-or-url>`
    Feed,
    /// `.../stream/contents/user/-/label/<name>`
    Label,
    /// `.../stream/contents/user/-/state/com.google/starred`
    Starred,
    /// `.../stream/contents/user/-/state/com.google/reading-list`
    ReadingList,
    /// A full stream id such as the `s` parameter of `stream/items/ids`.
    Generic,
}

/// A stream identifier classified without consulting the store.
///
/// Names and URLs are already HTML-escaped and ready for store lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamSpec {
    /// The reading list.
    AllItems,
    /// The starred set.
    Starred,
    /// A feed given by numeric id.
    FeedId(FeedId),
    /// A feed given by URL, to be looked up.
    FeedUrl(String),
    /// A label name, to be looked up as a category first, then as a tag.
    Label(String),
    /// Nothing recognizable.
    Unresolved,
}

impl StreamSpec {
    /// Classify `raw` under `hint`.
    ///
    /// `username` enables the `user/<username>/label/<name>` form.
    pub fn classify(raw: &str, hint: StreamHint, username: Option<&str>) -> Self {
        match hint {
            StreamHint::Feed => Self::feed(raw),
            StreamHint::Label => Self::label(raw),
            StreamHint::Starred => Self::Starred,
            StreamHint::ReadingList => Self::AllItems,
            StreamHint::Generic => Self::generic(raw, username),
        }
    }

    fn feed(raw: &str) -> Self {
        let mut target = raw;
        while let Some(rest) = target.strip_prefix(FEED_PREFIX) {
            target = rest;
        }
        if target.is_empty() {
            return Self::Unresolved;
        }
        if target.bytes().all(|b| b.is_ascii_digit()) {
            return match target.parse::<u64>() {
                Ok(id) => Self::FeedId(FeedId::new(id)),
                Err(_) => Self::Unresolved,
            };
        }
        Self::FeedUrl(escape_html(target))
    }

    fn label(raw: &str) -> Self {
        if raw.is_empty() {
            return Self::Unresolved;
        }
        Self::Label(escape_html(raw))
    }

    fn generic(raw: &str, username: Option<&str>) -> Self {
        match StateToken::parse(raw) {
            Some(StateToken::ReadingList) => return Self::AllItems,
            Some(StateToken::Starred) => return Self::Starred,
            Some(_) => return Self::Unresolved,
            None => {}
        }
        if raw.starts_with(FEED_PREFIX) {
            return Self::feed(raw);
        }
        match label_name(raw, username) {
            Some(name) => Self::label(name),
            None => Self::Unresolved,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_feed_is_used_directly() {
        assert_eq!(
            StreamSpec::classify("42", StreamHint::Feed, None),
            StreamSpec::FeedId(FeedId::new(42))
        );
    }

    #[test]
    fn feed_prefix_is_stripped_repeatedly() {
        assert_eq!(
            StreamSpec::classify("feed/feed/http://example.test/rss", StreamHint::Feed, None),
            StreamSpec::FeedUrl("http://example.test/rss".into())
        );
        assert_eq!(
            StreamSpec::classify("feed/7", StreamHint::Feed, None),
            StreamSpec::FeedId(FeedId::new(7))
        );
    }

    #[test]
    fn feed_url_is_escaped() {
        assert_eq!(
            StreamSpec::classify("http://example.test/?a=1&b=2", StreamHint::Feed, None),
            StreamSpec::FeedUrl("http://example.test/?a=1&amp;b=2".into())
        );
    }

    #[test]
    fn empty_or_overflowing_feed_is_unresolved() {
        assert_eq!(StreamSpec::classify("", StreamHint::Feed, None), StreamSpec::Unresolved);
        assert_eq!(StreamSpec::classify("feed/", StreamHint::Feed, None), StreamSpec::Unresolved);
        assert_eq!(
            StreamSpec::classify("99999999999999999999999", StreamHint::Feed, None),
            StreamSpec::Unresolved
        );
    }

    #[test]
    fn label_is_escaped() {
        assert_eq!(
            StreamSpec::classify("R&D", StreamHint::Label, None),
            StreamSpec::Label("R&amp;D".into())
        );
    }

    #[test]
    fn fixed_hints_ignore_input() {
        assert_eq!(StreamSpec::classify("whatever", StreamHint::Starred, None), StreamSpec::Starred);
        assert_eq!(StreamSpec::classify("", StreamHint::ReadingList, None), StreamSpec::AllItems);
    }

    #[test]
    fn generic_special_literals() {
        assert_eq!(
            StreamSpec::classify("user/-/state/com.google/reading-list", StreamHint::Generic, None),
            StreamSpec::AllItems
        );
        assert_eq!(
            StreamSpec::classify("user/-/state/com.google/starred", StreamHint::Generic, None),
            StreamSpec::Starred
        );
    }

    #[test]
    fn generic_label_forms() {
        assert_eq!(
            StreamSpec::classify("user/-/label/Tech", StreamHint::Generic, None),
            StreamSpec::Label("Tech".into())
        );
        assert_eq!(
            StreamSpec::classify("user/alice/label/Tech", StreamHint::Generic, Some("alice")),
            StreamSpec::Label("Tech".into())
        );
    }

    #[test]
    fn generic_feed_form() {
        assert_eq!(
            StreamSpec::classify("feed/3", StreamHint::Generic, None),
            StreamSpec::FeedId(FeedId::new(3))
        );
    }

    #[test]
    fn classification_is_total() {
        for raw in ["", "/", "user/", "user/-/label/", "feed", "user/-/state/com.google/read", "\u{0}", "💥"] {
            // Must never panic; unknown input resolves to Unresolved.
            let spec = StreamSpec::classify(raw, StreamHint::Generic, None);
            assert_eq!(spec, StreamSpec::Unresolved, "input {raw:?}");
        }
    }
}
