use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The authenticated user on whose behalf a write is performed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub user_id: Uuid,
    pub display_name: Option<String>,
}

impl Actor {
    pub fn new(user_id: Uuid) -> Self {
        Self {
            user_id,
            display_name: None,
        }
    }

    #[must_use]
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// Display name stamped on recorded entries; `None` when blank
    pub fn collector_name(&self) -> Option<String> {
        self.display_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(ToString::to_string)
    }
}

/// Source of the current authenticated identity. Session handling lives
/// outside this crate; implementors only answer "who is signed in right now".
pub trait IdentityProvider: Send + Sync {
    fn current_actor(&self) -> Option<Actor>;
}

/// Fixed identity, used by batch jobs and tests
#[derive(Debug, Clone, Default)]
pub struct StaticIdentity(pub Option<Actor>);

impl StaticIdentity {
    pub fn signed_in(actor: Actor) -> Self {
        Self(Some(actor))
    }

    pub fn anonymous() -> Self {
        Self(None)
    }
}

impl IdentityProvider for StaticIdentity {
    fn current_actor(&self) -> Option<Actor> {
        self.0.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collector_name_is_trimmed_display_name() {
        let id = Uuid::new_v4();
        let actor = Actor::new(id).with_display_name("  Ana Reyes ");
        assert_eq!(actor.collector_name().as_deref(), Some("Ana Reyes"));

        assert_eq!(Actor::new(id).with_display_name("   ").collector_name(), None);
        assert_eq!(Actor::new(id).collector_name(), None);
    }

    #[test]
    fn test_static_identity() {
        let actor = Actor::new(Uuid::new_v4());
        assert_eq!(
            StaticIdentity::signed_in(actor.clone()).current_actor(),
            Some(actor)
        );
        assert_eq!(StaticIdentity::anonymous().current_actor(), None);
    }
}
