//! Mutation actions carried by edit-tag and subscription/edit requests.

use std::fmt;
use std::str::FromStr;

use crate::{label_name, StateToken, TypesError};

/// A single entry mutation requested through edit-tag.
///
/// Label names are returned exactly as the client sent them; escaping
/// them for store lookups is the caller's job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagAction {
    /// Attach a user tag (created on demand).
    AddLabel(String),
    /// Detach a user tag.
    RemoveLabel(String),
    /// Mark entries read.
    MarkRead,
    /// Mark entries unread.
    MarkUnread,
    /// Star entries.
    MarkStarred,
    /// Unstar entries.
    MarkUnstarred,
}

impl TagAction {
    /// Interpret the `a` (add) parameter of edit-tag.
    ///
    /// Returns `None` for tokens the adapter does not act on; those are
    /// ignored rather than rejected.
    pub fn from_add_token(token: &str, username: Option<&str>) -> Option<Self> {
        match StateToken::parse(token) {
            Some(StateToken::Read) => Some(Self::MarkRead),
            Some(StateToken::Starred) => Some(Self::MarkStarred),
            Some(_) => None,
            None => label_name(token, username).map(|name| Self::AddLabel(name.to_string())),
        }
    }

    /// Interpret the `r` (remove) parameter of edit-tag.
    pub fn from_remove_token(token: &str, username: Option<&str>) -> Option<Self> {
        match StateToken::parse(token) {
            Some(StateToken::Read) => Some(Self::MarkUnread),
            Some(StateToken::Starred) => Some(Self::MarkUnstarred),
            Some(_) => None,
            None => label_name(token, username).map(|name| Self::RemoveLabel(name.to_string())),
        }
    }
}

/// The `ac` parameter of subscription/edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionAction {
    /// Create a new subscription.
    Subscribe,
    /// Delete an existing subscription.
    Unsubscribe,
    /// Move and/or rename an existing subscription.
    Edit,
}

impl FromStr for SubscriptionAction {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "subscribe" => Ok(Self::Subscribe),
            "unsubscribe" => Ok(Self::Unsubscribe),
            "edit" => Ok(Self::Edit),
            other => Err(TypesError::UnknownAction(other.to_string())),
        }
    }
}

impl fmt::Display for SubscriptionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Subscribe => "subscribe",
            Self::Unsubscribe => "unsubscribe",
            Self::Edit => "edit",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_tokens() {
        assert_eq!(
            TagAction::from_add_token("user/-/state/com.google/read", None),
            Some(TagAction::MarkRead)
        );
        assert_eq!(
            TagAction::from_add_token("user/-/state/com.google/starred", None),
            Some(TagAction::MarkStarred)
        );
        assert_eq!(
            TagAction::from_add_token("user/-/label/Later", None),
            Some(TagAction::AddLabel("Later".into()))
        );
        assert_eq!(
            TagAction::from_add_token("user/alice/label/Later", Some("alice")),
            Some(TagAction::AddLabel("Later".into()))
        );
    }

    #[test]
    fn remove_tokens() {
        assert_eq!(
            TagAction::from_remove_token("user/-/state/com.google/read", None),
            Some(TagAction::MarkUnread)
        );
        assert_eq!(
            TagAction::from_remove_token("user/-/state/com.google/starred", None),
            Some(TagAction::MarkUnstarred)
        );
        assert_eq!(
            TagAction::from_remove_token("user/-/label/Later", None),
            Some(TagAction::RemoveLabel("Later".into()))
        );
    }

    #[test]
    fn unrecognized_tokens_are_ignored() {
        assert_eq!(TagAction::from_add_token("", None), None);
        assert_eq!(
            TagAction::from_add_token("user/-/state/com.google/tracking-kept-unread", None),
            None
        );
        assert_eq!(TagAction::from_add_token(crate::READING_LIST, None), None);
        assert_eq!(TagAction::from_remove_token("feed/12", None), None);
    }

    #[test]
    fn subscription_actions_parse() {
        assert_eq!(
            "subscribe".parse::<SubscriptionAction>().unwrap(),
            SubscriptionAction::Subscribe
        );
        assert_eq!(
            "unsubscribe".parse::<SubscriptionAction>().unwrap(),
            SubscriptionAction::Unsubscribe
        );
        assert_eq!("edit".parse::<SubscriptionAction>().unwrap(), SubscriptionAction::Edit);
        assert!("Subscribe".parse::<SubscriptionAction>().is_err());
        assert_eq!(SubscriptionAction::Edit.to_string(), "edit");
    }
}
