use crate::content::Content;
use crate::hooks::SessionInfo;
use uuid::Uuid;

/// A conversation between one user and an agent
///
/// Holds the identity passed to hooks and the history sent to the model on each turn.
#[derive(Debug, Clone)]
pub struct Session {
    pub info: SessionInfo,
    pub history: Vec<Content>,
}

impl Session {
    /// Start a session with a fresh random id
    pub fn new(app_name: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self::with_id(app_name, Uuid::new_v4().to_string(), user_id)
    }

    pub fn with_id(
        app_name: impl Into<String>,
        session_id: impl Into<String>,
        user_id: impl Into<String>,
    ) -> Self {
        Self {
            info: SessionInfo::new(app_name, session_id, user_id),
            history: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.info.session_id
    }

    pub fn user_id(&self) -> &str {
        &self.info.user_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_sessions_get_distinct_ids() {
        let a = Session::new("CallbackDemo", "user1");
        let b = Session::new("CallbackDemo", "user1");

        assert_ne!(a.id(), b.id());
        assert!(Uuid::parse_str(a.id()).is_ok());
        assert_eq!(a.user_id(), "user1");
        assert!(a.history.is_empty());
    }

    #[test]
    fn test_with_id() {
        let session = Session::with_id("CallbackDemo", "session1", "user1");
        assert_eq!(session.id(), "session1");
        assert_eq!(session.info.app_name, "CallbackDemo");
    }
}
