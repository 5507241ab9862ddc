use super::super::common::session_status_label;
use db::models::{round, round_session};
use serde::Serialize;

/// A round as the admin console sees it, with its latest session folded in.
#[derive(Debug, Serialize, Default)]
pub struct RoundResponse {
    pub id: i64,
    pub job_id: i64,
    pub name: String,
    pub position: i32,
    pub retired: bool,
    pub session_id: Option<i64>,
    pub session_status: String,
    pub created_at: String,
    pub updated_at: String,
}

impl RoundResponse {
    pub fn from_parts(round: round::Model, session: Option<round_session::Model>) -> Self {
        Self {
            id: round.id,
            job_id: round.job_id,
            name: round.name,
            position: round.position,
            retired: round.retired,
            session_id: session.as_ref().map(|s| s.id),
            session_status: session_status_label(session.map(|s| s.status)).to_owned(),
            created_at: round.created_at.to_rfc3339(),
            updated_at: round.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize, Default)]
pub struct SessionResponse {
    pub id: i64,
    pub round_id: i64,
    pub status: String,
    pub opened_by: i64,
    pub created_at: String,
    pub updated_at: String,
}

impl From<round_session::Model> for SessionResponse {
    fn from(session: round_session::Model) -> Self {
        Self {
            id: session.id,
            round_id: session.round_id,
            status: session_status_label(Some(session.status)).to_owned(),
            opened_by: session.opened_by,
            created_at: session.created_at.to_rfc3339(),
            updated_at: session.updated_at.to_rfc3339(),
        }
    }
}
