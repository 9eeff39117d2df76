use serde::{Deserialize, Serialize};

use crate::score::TeamScoreRecord;


#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeOperation {
    Insert,
    Update,
    Delete,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentKey {
    pub team_number: i64,
}

// A change to the score store, as pushed to subscribed clients.
//
// Stores with a native change feed produce this JSON themselves (see the Postgres trigger in
// the server); the server forwards their payloads without parsing them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeEvent {
    pub operation_type: ChangeOperation,
    pub document_key: DocumentKey,
    pub full_document: Option<TeamScoreRecord>,
}

impl ChangeEvent {
    pub fn updated(record: TeamScoreRecord) -> Self {
        ChangeEvent {
            operation_type: ChangeOperation::Update,
            document_key: DocumentKey { team_number: record.team_number },
            full_document: Some(record),
        }
    }

    pub fn to_payload(&self) -> String {
        // Cannot fail: no maps with non-string keys, no custom serializers.
        serde_json::to_string(self).unwrap()
    }
}
