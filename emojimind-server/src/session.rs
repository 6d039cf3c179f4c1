use dashmap::DashMap;
use uuid::Uuid;

use emojimind_types::{PlayerSession, User};

pub const SESSION_COOKIE: &str = "emojimind_session";

/// One authenticated browser session: the logged-in user plus the
/// transient play state the round controller operates on.
#[derive(Debug, Clone)]
pub struct Session {
    pub user: User,
    pub play: PlayerSession,
}

/// In-memory session registry keyed by the session cookie value. Entries
/// live until logout or server restart; the game itself survives restarts
/// through the persisted progress record.
pub struct SessionStore {
    sessions: DashMap<String, Session>,
    pending_logins: DashMap<String, ()>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
            pending_logins: DashMap::new(),
        }
    }

    pub fn create(&self, user: User) -> String {
        let session_id = Uuid::new_v4().to_string();
        self.sessions.insert(
            session_id.clone(),
            Session {
                user,
                play: PlayerSession::default(),
            },
        );
        session_id
    }

    pub fn get(&self, session_id: &str) -> Option<Session> {
        self.sessions.get(session_id).map(|entry| entry.clone())
    }

    pub fn update_play(&self, session_id: &str, play: PlayerSession) {
        if let Some(mut entry) = self.sessions.get_mut(session_id) {
            entry.play = play;
        }
    }

    pub fn remove(&self, session_id: &str) {
        self.sessions.remove(session_id);
    }

    /// Issue an OAuth state token for a login redirect.
    pub fn begin_login(&self) -> String {
        let state = Uuid::new_v4().to_string();
        self.pending_logins.insert(state.clone(), ());
        state
    }

    /// Consume a state token from the provider callback. False means the
    /// state was never issued or was already used.
    pub fn take_login_state(&self, state: &str) -> bool {
        self.pending_logins.remove(state).is_some()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn test_user() -> User {
        User {
            id: Uuid::new_v4(),
            email: "test@example.com".to_string(),
            display_name: "Test User".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_session_lifecycle() {
        let store = SessionStore::new();
        let user = test_user();

        let sid = store.create(user.clone());
        let session = store.get(&sid).unwrap();
        assert_eq!(session.user.id, user.id);
        assert_eq!(session.play, PlayerSession::default());

        store.remove(&sid);
        assert!(store.get(&sid).is_none());
    }

    #[test]
    fn test_update_play_persists_state() {
        let store = SessionStore::new();
        let sid = store.create(test_user());

        let mut play = store.get(&sid).unwrap().play;
        play.active_word = Some("Sun".to_string());
        play.tries.set(emojimind_types::Difficulty::Easy, 2);
        store.update_play(&sid, play.clone());

        assert_eq!(store.get(&sid).unwrap().play, play);
    }

    #[test]
    fn test_login_state_is_single_use() {
        let store = SessionStore::new();
        let state = store.begin_login();

        assert!(store.take_login_state(&state));
        assert!(!store.take_login_state(&state));
        assert!(!store.take_login_state("never-issued"));
    }
}
