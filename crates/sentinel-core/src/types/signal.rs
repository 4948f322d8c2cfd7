//! Trading signals.

use serde::{Deserialize, Serialize};

/// Discrete trading decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Buy,
    Sell,
    Hold,
}

impl Action {
    /// Prediction-market outcome token a paper trade would take for this action.
    pub fn outcome_token(&self) -> Option<&'static str> {
        match self {
            Action::Buy => Some("YES"),
            Action::Sell => Some("NO"),
            Action::Hold => None,
        }
    }

    pub fn is_actionable(&self) -> bool {
        !matches!(self, Action::Hold)
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Buy => write!(f, "BUY"),
            Action::Sell => write!(f, "SELL"),
            Action::Hold => write!(f, "HOLD"),
        }
    }
}

/// A decision together with a short human-readable reason.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Signal {
    pub action: Action,
    pub reason: String,
}

impl Signal {
    pub fn new(action: Action, reason: impl Into<String>) -> Self {
        Self {
            action,
            reason: reason.into(),
        }
    }

    pub fn buy(reason: impl Into<String>) -> Self {
        Self::new(Action::Buy, reason)
    }

    pub fn sell(reason: impl Into<String>) -> Self {
        Self::new(Action::Sell, reason)
    }

    pub fn hold(reason: impl Into<String>) -> Self {
        Self::new(Action::Hold, reason)
    }
}
