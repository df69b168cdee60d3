// ── Login wizard ──
//
// ENTRY → AUDIENCE → {SHOP, CLIENT → CLIENT_EMAIL} → AUTHENTICATED.
// Each step accepts a fixed set of actions; anything else is refused and
// leaves the step unchanged.

use serde::{Deserialize, Serialize};
use strum::Display;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum LoginStep {
    #[default]
    Entry,
    Audience,
    Shop,
    Client,
    ClientEmail,
    Authenticated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum LoginAction {
    Open,
    ChooseShop,
    ChooseClient,
    UseEmail,
    Back,
    Succeeded,
    Close,
}

impl LoginStep {
    /// Transition table. `None` means the action is not available here.
    pub fn next(self, action: LoginAction) -> Option<Self> {
        use LoginAction as A;
        use LoginStep as S;

        match (self, action) {
            (S::Authenticated, _) => None,
            (_, A::Close) => Some(S::Entry),
            (S::Entry, A::Open) => Some(S::Audience),
            (S::Audience, A::ChooseShop) => Some(S::Shop),
            (S::Audience, A::ChooseClient) => Some(S::Client),
            (S::Audience, A::Back) => Some(S::Entry),
            (S::Shop | S::Client, A::Back) => Some(S::Audience),
            (S::Client, A::UseEmail) => Some(S::ClientEmail),
            (S::ClientEmail, A::Back) => Some(S::Client),
            (S::Shop | S::Client | S::ClientEmail, A::Succeeded) => Some(S::Authenticated),
            _ => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        self == Self::Authenticated
    }
}

/// Login prompt state, with the page to land on once signed in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginWizard {
    step: LoginStep,
    intended: Option<String>,
}

impl LoginWizard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open straight at the audience choice, remembering a destination.
    pub fn opened_for(intended: Option<String>) -> Self {
        Self {
            step: LoginStep::Audience,
            intended,
        }
    }

    pub fn step(&self) -> LoginStep {
        self.step
    }

    pub fn intended(&self) -> Option<&str> {
        self.intended.as_deref()
    }

    /// Apply `action`; returns whether it was accepted.
    pub fn apply(&mut self, action: LoginAction) -> bool {
        match self.step.next(action) {
            Some(next) => {
                if action == LoginAction::Close {
                    self.intended = None;
                }
                self.step = next;
                true
            }
            None => false,
        }
    }
}
