//! Stream vocabulary: well-known stream ids, state tokens and resolved
//! stream references.

use crate::{CategoryId, FeedId, TagId};

/// Stream id of the global reading list (every entry).
pub const READING_LIST: &str = "user/-/state/com.google/reading-list";

/// Stream id of the starred set.
pub const STARRED: &str = "user/-/state/com.google/starred";

/// Prefix of label stream ids (categories and tags share it).
pub const LABEL_PREFIX: &str = "user/-/label/";

/// Prefix of feed stream ids (`feed/<id>` or `feed/<url>`).
pub const FEED_PREFIX: &str = "feed/";

const STATE_INFIX: &str = "/state/com.google/";

/// One of the protocol's well-known state tokens.
///
/// These double as filter values (`it`/`xt`) and as mutation targets
/// (`a`/`r` on edit-tag).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateToken {
    /// `user/-/state/com.google/reading-list`
    ReadingList,
    /// `user/-/state/com.google/read`
    Read,
    /// `user/-/state/com.google/unread`
    Unread,
    /// `user/-/state/com.google/starred`
    Starred,
}

impl StateToken {
    /// Parse a state token.
    ///
    /// Accepts the `-` user placeholder as well as an explicit user
    /// segment (`user/1234/state/com.google/read`), which some clients send.
    pub fn parse(token: &str) -> Option<Self> {
        let rest = token.strip_prefix("user/")?;
        let (user, state) = rest.split_once(STATE_INFIX)?;
        if user.is_empty() || user.contains('/') {
            return None;
        }
        match state {
            "reading-list" => Some(Self::ReadingList),
            "read" => Some(Self::Read),
            "unread" => Some(Self::Unread),
            "starred" => Some(Self::Starred),
            _ => None,
        }
    }

    /// Canonical wire form of this token.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ReadingList => READING_LIST,
            Self::Read => "user/-/state/com.google/read",
            Self::Unread => "user/-/state/com.google/unread",
            Self::Starred => STARRED,
        }
    }
}

/// Extract the label name from `user/-/label/<name>` or
/// `user/<username>/label/<name>`.
///
/// The explicit-user form only matches the given username. Returns `None`
/// for anything else, including an empty name.
pub fn label_name<'a>(token: &'a str, username: Option<&str>) -> Option<&'a str> {
    let name = match token.strip_prefix(LABEL_PREFIX) {
        Some(name) => name,
        None => {
            let user = username?;
            token
                .strip_prefix("user/")?
                .strip_prefix(user)?
                .strip_prefix("/label/")?
        }
    };
    (!name.is_empty()).then_some(name)
}

/// Build the label stream id for a category or tag name.
pub fn label_stream_id(name: &str) -> String {
    format!("{LABEL_PREFIX}{name}")
}

/// Build the stream id of a feed.
pub fn feed_stream_id(id: FeedId) -> String {
    format!("{FEED_PREFIX}{id}")
}

/// A resolved reference to a stream of entries.
///
/// Produced from an opaque client string by the stream resolver; never
/// persisted. `Feed`, `Category` and `Tag` always carry an id the store
/// handed out, an unknown name resolves to `Unresolved` instead of a
/// guessed id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamRef {
    /// Every entry (the reading list).
    AllItems,
    /// Starred entries.
    Starred,
    /// Entries of one feed.
    Feed(FeedId),
    /// Entries of every feed in a category.
    Category(CategoryId),
    /// Entries carrying a user tag.
    Tag(TagId),
    /// The identifier could not be resolved.
    Unresolved,
}

impl StreamRef {
    /// Whether resolution succeeded.
    pub fn is_resolved(&self) -> bool {
        !matches!(self, Self::Unresolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_tokens_parse() {
        assert_eq!(
            StateToken::parse("user/-/state/com.google/read"),
            Some(StateToken::Read)
        );
        assert_eq!(
            StateToken::parse("user/-/state/com.google/unread"),
            Some(StateToken::Unread)
        );
        assert_eq!(StateToken::parse(STARRED), Some(StateToken::Starred));
        assert_eq!(StateToken::parse(READING_LIST), Some(StateToken::ReadingList));
    }

    #[test]
    fn state_tokens_accept_explicit_user() {
        assert_eq!(
            StateToken::parse("user/01234/state/com.google/starred"),
            Some(StateToken::Starred)
        );
    }

    #[test]
    fn unknown_state_tokens_are_none() {
        assert_eq!(StateToken::parse(""), None);
        assert_eq!(StateToken::parse("user/-/state/com.google/like"), None);
        assert_eq!(StateToken::parse("user/-/label/read"), None);
        assert_eq!(StateToken::parse("user/a/b/state/com.google/read"), None);
    }

    #[test]
    fn state_token_round_trips() {
        for token in [
            StateToken::ReadingList,
            StateToken::Read,
            StateToken::Unread,
            StateToken::Starred,
        ] {
            assert_eq!(StateToken::parse(token.as_str()), Some(token));
        }
    }

    #[test]
    fn label_name_strips_placeholder_prefix() {
        assert_eq!(label_name("user/-/label/Tech", None), Some("Tech"));
        assert_eq!(label_name("user/-/label/a/b", None), Some("a/b"));
    }

    #[test]
    fn label_name_matches_own_username_only() {
        assert_eq!(label_name("user/alice/label/News", Some("alice")), Some("News"));
        assert_eq!(label_name("user/bob/label/News", Some("alice")), None);
        assert_eq!(label_name("user/alice/label/News", None), None);
    }

    #[test]
    fn label_name_rejects_empty_and_foreign() {
        assert_eq!(label_name("user/-/label/", None), None);
        assert_eq!(label_name("Tech", None), None);
        assert_eq!(label_name("feed/12", Some("alice")), None);
    }

    #[test]
    fn stream_id_builders() {
        assert_eq!(label_stream_id("Tech"), "user/-/label/Tech");
        assert_eq!(feed_stream_id(FeedId::new(12)), "feed/12");
    }

    #[test]
    fn unresolved_is_not_resolved() {
        assert!(!StreamRef::Unresolved.is_resolved());
        assert!(StreamRef::AllItems.is_resolved());
        assert!(StreamRef::Tag(TagId::new(1)).is_resolved());
    }
}
