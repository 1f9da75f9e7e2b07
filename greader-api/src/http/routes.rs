//! Positional route matching.
//!
//! Paths are split on `/` and percent-decoded segment by segment, then
//! matched by position. Trailing segments are ignored except for
//! `stream/contents`, whose tail names the stream.

/// Prefix of every authenticated reader route.
const READER_API: [&str; 3] = ["reader", "api", "0"];

/// An API endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// `accounts/ClientLogin`
    ClientLogin,
    /// `check/compatibility`
    CheckCompatibility,
    /// `reader/api/0/stream/contents[/<stream>]`
    StreamContents,
    /// `reader/api/0/stream/items/ids`
    StreamItemIds,
    /// `reader/api/0/stream/items/contents`
    StreamItemContents,
    /// `reader/api/0/tag/list`
    TagList,
    /// `reader/api/0/subscription/list`
    SubscriptionList,
    /// `reader/api/0/subscription/edit`
    SubscriptionEdit,
    /// `reader/api/0/subscription/quickadd`
    SubscriptionQuickadd,
    /// `reader/api/0/unread-count`
    UnreadCount,
    /// `reader/api/0/edit-tag`
    EditTag,
    /// `reader/api/0/rename-tag`
    RenameTag,
    /// `reader/api/0/disable-tag`
    DisableTag,
    /// `reader/api/0/mark-all-as-read`
    MarkAllAsRead,
    /// `reader/api/0/token`
    Token,
    /// `reader/api/0/user-info`
    UserInfo,
}

impl Endpoint {
    /// Endpoints that only accept POST.
    pub fn requires_post(self) -> bool {
        matches!(
            self,
            Self::StreamItemContents
                | Self::EditTag
                | Self::RenameTag
                | Self::DisableTag
                | Self::MarkAllAsRead
        )
    }

    /// Endpoints guarded by the `T` action token.
    pub fn requires_action_token(self) -> bool {
        matches!(
            self,
            Self::EditTag | Self::RenameTag | Self::DisableTag | Self::MarkAllAsRead
        )
    }

    /// Endpoints that need an authenticated session.
    pub fn requires_session(self) -> bool {
        !matches!(self, Self::ClientLogin | Self::CheckCompatibility)
    }
}

/// A matched route: the endpoint and the unmatched path tail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route<'a> {
    /// Matched endpoint.
    pub endpoint: Endpoint,
    /// Segments after the endpoint's own.
    pub tail: &'a [String],
}

/// Match decoded path segments (without the leading empty one).
pub fn match_route(segments: &[String]) -> Option<Route<'_>> {
    let names: Vec<&str> = segments.iter().map(String::as_str).collect();

    let (endpoint, used) = match names.as_slice() {
        ["accounts", "ClientLogin", ..] => (Endpoint::ClientLogin, 2),
        ["check", "compatibility", ..] => (Endpoint::CheckCompatibility, 2),
        [r, a, v, rest @ ..] if [*r, *a, *v] == READER_API => {
            let (endpoint, used) = match rest {
                ["stream", "contents", ..] => (Endpoint::StreamContents, 2),
                ["stream", "items", "ids", ..] => (Endpoint::StreamItemIds, 3),
                ["stream", "items", "contents", ..] => (Endpoint::StreamItemContents, 3),
                ["tag", "list", ..] => (Endpoint::TagList, 2),
                ["subscription", "list", ..] => (Endpoint::SubscriptionList, 2),
                ["subscription", "edit", ..] => (Endpoint::SubscriptionEdit, 2),
                ["subscription", "quickadd", ..] => (Endpoint::SubscriptionQuickadd, 2),
                ["unread-count", ..] => (Endpoint::UnreadCount, 1),
                ["edit-tag", ..] => (Endpoint::EditTag, 1),
                ["rename-tag", ..] => (Endpoint::RenameTag, 1),
                ["disable-tag", ..] => (Endpoint::DisableTag, 1),
                ["mark-all-as-read", ..] => (Endpoint::MarkAllAsRead, 1),
                ["token", ..] => (Endpoint::Token, 1),
                ["user-info", ..] => (Endpoint::UserInfo, 1),
                _ => return None,
            };
            (endpoint, READER_API.len() + used)
        }
        _ => return None,
    };

    Some(Route {
        endpoint,
        tail: &segments[used..],
    })
}

/// Whether the path is under `reader/api/0/`, authenticated or not.
pub fn is_reader_path(segments: &[String]) -> bool {
    segments.len() > READER_API.len()
        && segments
            .iter()
            .zip(READER_API)
            .all(|(segment, expected)| segment == expected)
}
