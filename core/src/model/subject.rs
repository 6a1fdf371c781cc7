use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::model::bunk::TargetPercent;
use crate::model::ledger::AttendanceLedger;
use crate::repository::Entity;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Subject {
    pub id: Uuid,
    pub name: String,

    // None falls back to the configured default target.
    #[serde(default)]
    pub target: Option<TargetPercent>,

    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub ledger: AttendanceLedger,
}

impl Subject {
    pub fn new(name: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            target: None,
            created_at: Utc::now(),
            ledger: AttendanceLedger::new(),
        }
    }

    pub fn short_id(&self) -> String {
        self.id.to_string()[..8].to_string()
    }

    pub fn effective_target(&self, default: TargetPercent) -> TargetPercent {
        self.target.unwrap_or(default)
    }
}

impl Entity for Subject {
    fn id(&self) -> Uuid {
        self.id
    }
}
