//! Onboarding: the guarded sequence a profile must pass through before it is stored.
//!
//! `Name → StylePreference → BodyType → Complete`. Each step needs non-blank
//! input; a rejected input leaves the machine where it was.

use thiserror::Error;

use crate::models::user::NewUser;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OnboardingError {
    #[error("{0} cannot be empty")]
    BlankInput(&'static str),

    #[error("onboarding is already complete")]
    AlreadyComplete,

    #[error("onboarding is not complete: {0} is still missing")]
    Incomplete(&'static str),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Onboarding {
    #[default]
    Name,
    StylePreference {
        name: String,
    },
    BodyType {
        name: String,
        style_preference: String,
    },
    Complete(NewUser),
}

impl Onboarding {
    pub fn new() -> Self {
        Self::default()
    }

    /// Field the current step is waiting for.
    pub fn awaiting(&self) -> Option<&'static str> {
        match self {
            Onboarding::Name => Some("name"),
            Onboarding::StylePreference { .. } => Some("style_preference"),
            Onboarding::BodyType { .. } => Some("body_type"),
            Onboarding::Complete(_) => None,
        }
    }

    pub fn advance(&mut self, input: &str) -> Result<(), OnboardingError> {
        let field = self.awaiting().ok_or(OnboardingError::AlreadyComplete)?;
        let input = input.trim();
        if input.is_empty() {
            return Err(OnboardingError::BlankInput(field));
        }
        let input = input.to_string();

        *self = match std::mem::take(self) {
            Onboarding::Name => Onboarding::StylePreference { name: input },
            Onboarding::StylePreference { name } => Onboarding::BodyType {
                name,
                style_preference: input,
            },
            Onboarding::BodyType {
                name,
                style_preference,
            } => Onboarding::Complete(NewUser {
                name,
                style_preference,
                body_type: input,
            }),
            complete @ Onboarding::Complete(_) => complete,
        };
        Ok(())
    }

    pub fn into_new_user(self) -> Result<NewUser, OnboardingError> {
        match self {
            Onboarding::Complete(user) => Ok(user),
            pending => Err(OnboardingError::Incomplete(
                pending.awaiting().unwrap_or_default(),
            )),
        }
    }
}
