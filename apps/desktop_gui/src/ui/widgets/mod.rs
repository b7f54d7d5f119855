//! Presentational leaves. Each one draws from the data it is handed and
//! reports at most a selected choice back to the caller.

pub mod choices;
pub mod dialogue;
pub mod facts;
pub mod loading;
pub mod objectives;
pub mod scene_view;
pub mod stats;

pub use choices::choice_list;
pub use dialogue::{dialogue_view, VoiceLine};
pub use facts::fact_panel;
pub use loading::loading_indicator;
pub use objectives::objectives_panel;
pub use scene_view::{scene_view, ScenePicture};
pub use stats::stat_panel;
