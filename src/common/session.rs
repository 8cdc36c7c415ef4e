//! Signed-in user, as remembered by the browser after login

use crate::host::KeyValueStore;

const USER_ID_KEY: &str = "user_id";
const USERNAME_KEY: &str = "username";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub user_id: u64,
    pub username: String,
}

impl CurrentUser {
    pub fn load(store: &dyn KeyValueStore) -> Option<Self> {
        let user_id = store.get(USER_ID_KEY)?.parse().ok()?;
        let username = store.get(USERNAME_KEY).filter(|name| !name.is_empty())?;
        Some(Self { user_id, username })
    }

    pub fn save(&self, store: &dyn KeyValueStore) {
        store.set(USER_ID_KEY, &self.user_id.to_string());
        store.set(USERNAME_KEY, &self.username);
    }

    pub fn clear(store: &dyn KeyValueStore) {
        store.remove(USER_ID_KEY);
        store.remove(USERNAME_KEY);
    }
}
