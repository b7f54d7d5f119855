use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{GoodEvil, LawChaos, SceneId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub scene_id: SceneId,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalFact {
    #[serde(default)]
    pub title: String,
    #[serde(default, alias = "text")]
    pub content: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Alignment {
    #[serde(default)]
    pub law_chaos: f64,
    #[serde(default)]
    pub good_evil: f64,
}

impl Alignment {
    pub fn law_chaos_axis(&self) -> LawChaos {
        LawChaos::from_score(self.law_chaos)
    }

    pub fn good_evil_axis(&self) -> GoodEvil {
        GoodEvil::from_score(self.good_evil)
    }

    /// Human label such as "Lawful Good" or "True Neutral".
    pub fn label(&self) -> String {
        match (self.law_chaos_axis(), self.good_evil_axis()) {
            (LawChaos::Neutral, GoodEvil::Neutral) => "True Neutral".to_string(),
            (lc, ge) => format!("{} {}", lc.label(), ge.label()),
        }
    }

    /// Position on the alignment chart as fractions of its width and height.
    pub fn chart_position(&self) -> (f32, f32) {
        let x = 0.5 + self.law_chaos / 200.0;
        let y = 0.5 + self.good_evil / 200.0;
        (x.clamp(0.0, 1.0) as f32, y.clamp(0.0, 1.0) as f32)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    #[serde(default)]
    pub alignment: Alignment,
    #[serde(default)]
    pub experience: f64,
    #[serde(default)]
    pub score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub skills: BTreeMap<String, f64>,
}

impl PlayerState {
    pub fn experience_fraction(&self) -> f32 {
        stat_fraction(self.experience)
    }

    pub fn score_fraction(&self) -> f32 {
        stat_fraction(self.score)
    }

    pub fn rounded_score(&self) -> i64 {
        self.score.round() as i64
    }
}

fn stat_fraction(value: f64) -> f32 {
    (value.clamp(0.0, 100.0) / 100.0) as f32
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scoring {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alignment: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creativity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roleplay: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
}

/// `GET /api/scene/{scene_id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneResponse {
    pub scene: Scene,
    #[serde(default)]
    pub choices: Vec<String>,
    #[serde(default)]
    pub image_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub historical_context: Option<Vec<HistoricalFact>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_state: Option<PlayerState>,
}

/// `POST /api/action`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRequest {
    pub scene_id: SceneId,
    pub choice_index: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionResponse {
    pub agent_response: String,
    #[serde(default)]
    pub audio_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub historical_context: Option<Vec<HistoricalFact>>,
    pub next_scene_id: SceneId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_state: Option<PlayerState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scoring: Option<Scoring>,
}

/// `GET /api/objectives`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObjectivesResponse {
    #[serde(default)]
    pub objectives: Vec<String>,
    #[serde(default)]
    pub description: String,
}
