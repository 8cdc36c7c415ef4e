use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct UserRef {
    pub id: u64,
    pub username: String,
}

/// Directed friend request with per-direction visibility flags
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Friendship {
    pub id: u64,
    #[serde(default)]
    pub status: String,
    pub from_user_info: UserRef,
    pub to_user_info: UserRef,
    /// Whether the sender lets the receiver see their feed
    #[serde(default)]
    pub from_user_can_be_viewed: bool,
    /// Whether the receiver lets the sender see their feed
    #[serde(default)]
    pub to_user_can_be_viewed: bool,
}

impl Friendship {
    /// The party that is not `me`
    pub fn other_party(&self, me: u64) -> &UserRef {
        if self.from_user_info.id == me {
            &self.to_user_info
        } else {
            &self.from_user_info
        }
    }

    /// Whether `me` has authorized the other party to view my data
    pub fn my_permission(&self, me: u64) -> bool {
        if self.from_user_info.id == me {
            self.from_user_can_be_viewed
        } else {
            self.to_user_can_be_viewed
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FeedUser {
    pub username: String,
}

/// Raw feed entry; see [`crate::pages::friends::FeedKind`] for the typed tag
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FeedItem {
    pub content_type_model: String,
    pub object_id: u64,
    pub user: FeedUser,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Comment {
    pub author_username: String,
    pub text: String,
}
