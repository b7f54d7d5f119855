use std::fmt;

use serde::{Deserialize, Serialize};

/// Scene identifier as issued by the game API.
///
/// The server decides what a valid id looks like; the client only insists
/// that it is not blank before putting it into a request path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SceneId(pub String);

impl SceneId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for SceneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SceneId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for SceneId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LawChaos {
    Lawful,
    Neutral,
    Chaotic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoodEvil {
    Good,
    Neutral,
    Evil,
}

/// Distance from the centre of an axis before it leaves "Neutral".
pub const ALIGNMENT_NEUTRAL_BAND: f64 = 30.0;

impl LawChaos {
    pub fn from_score(value: f64) -> Self {
        if value > ALIGNMENT_NEUTRAL_BAND {
            Self::Lawful
        } else if value < -ALIGNMENT_NEUTRAL_BAND {
            Self::Chaotic
        } else {
            Self::Neutral
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Lawful => "Lawful",
            Self::Neutral => "Neutral",
            Self::Chaotic => "Chaotic",
        }
    }
}

impl GoodEvil {
    pub fn from_score(value: f64) -> Self {
        if value > ALIGNMENT_NEUTRAL_BAND {
            Self::Good
        } else if value < -ALIGNMENT_NEUTRAL_BAND {
            Self::Evil
        } else {
            Self::Neutral
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Good => "Good",
            Self::Neutral => "Neutral",
            Self::Evil => "Evil",
        }
    }
}
