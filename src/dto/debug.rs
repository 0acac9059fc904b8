use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Optional details of a simulated first blood; missing fields are taken from cached data.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct FirstBloodTrigger {
    pub service: Option<String>,
    pub team: Option<String>,
}

/// Event injected by a debug trigger.
#[derive(Debug, Serialize, ToSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TriggeredEvent {
    FirstBlood { service: String, team: String },
    Final { tick: i64 },
}
