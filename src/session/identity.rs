//! Session identity context.

use crate::domain::Identity;

/// Holds the authenticated user's identity for the session lifetime.
///
/// Authentication itself is an external concern; this context merely
/// carries its result and supplies authorship snapshots to message sends.
#[derive(Debug, Clone, Default)]
pub struct IdentityContext {
    identity: Option<Identity>,
}

impl IdentityContext {
    /// A context with an authenticated identity.
    pub fn signed_in(identity: Identity) -> Self {
        Self {
            identity: Some(identity),
        }
    }

    /// A context with no identity (nothing can be created or sent).
    pub fn signed_out() -> Self {
        Self { identity: None }
    }

    /// The current identity, if any.
    pub fn current_identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DisplayName, UserId};

    #[test]
    fn test_signed_in_exposes_identity() {
        // given:
        let identity = Identity::new(
            UserId::new("u1".to_string()).unwrap(),
            DisplayName::new("Alice".to_string()).unwrap(),
        );

        // when:
        let context = IdentityContext::signed_in(identity.clone());

        // then:
        assert_eq!(context.current_identity(), Some(&identity));
    }

    #[test]
    fn test_signed_out_has_no_identity() {
        // then:
        assert!(IdentityContext::signed_out().current_identity().is_none());
    }
}
