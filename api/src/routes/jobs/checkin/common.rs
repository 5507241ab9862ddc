use super::super::common::outcome_label;
use db::models::attendance_record;
use serde::Serialize;

/// One round of the job as the scanning student sees it.
///
/// `status` takes one of `ATTENDED_<OUTCOME>`, `NOT_STARTED`, `ACTIVE`,
/// `NOT_ELIGIBLE`, `TEMP_CLOSED`, `PERM_CLOSED`. `token` is present exactly
/// when the status is `ACTIVE`.
#[derive(Debug, Serialize)]
pub struct RoundStatusEntry {
    pub round_id: i64,
    pub name: String,
    pub position: i32,
    pub status: String,
    pub token: Option<String>,
    pub outcome: Option<String>,
}

#[derive(Debug, Serialize, Default)]
pub struct CheckinStatusResponse {
    pub job_id: i64,
    pub rounds: Vec<RoundStatusEntry>,
}

#[derive(Debug, Serialize, Default)]
pub struct AttendanceRecordResponse {
    pub student_id: i64,
    pub round_id: i64,
    pub session_id: i64,
    pub confirmed_by: i64,
    pub outcome: String,
    pub recorded_at: String,
}

impl From<attendance_record::Model> for AttendanceRecordResponse {
    fn from(rec: attendance_record::Model) -> Self {
        Self {
            student_id: rec.student_id,
            round_id: rec.round_id,
            session_id: rec.session_id,
            confirmed_by: rec.confirmed_by,
            outcome: outcome_label(rec.outcome).to_owned(),
            recorded_at: rec.recorded_at.to_rfc3339(),
        }
    }
}
