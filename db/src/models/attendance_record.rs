use chrono::{DateTime, Utc};
use sea_orm::IntoActiveModel;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

use super::{application, round, round_session};

/// Durable proof that a student checked into a round. Keyed by
/// (student_id, round_id): at most one record per student per round, ever.
/// Rows are insert-only; nothing in this subsystem updates or deletes them.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "attendance_records")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub student_id: i64,
    #[sea_orm(primary_key, auto_increment = false)]
    pub round_id: i64,

    /// Session the check-in happened under.
    pub session_id: i64,
    /// Admin who confirmed the scan.
    pub confirmed_by: i64,
    pub outcome: Outcome,
    pub recorded_at: DateTime<Utc>,
}

/// Terminal result of a student's round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(
    rs_type = "String",
    db_type = "String(StringLen::N(16))",
    rename_all = "snake_case"
)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Attended,
    Failed,
}

/// Why a confirmation was refused. Every variant carries the stable,
/// user-facing reason the API reports.
#[derive(Debug, Error)]
pub enum ConfirmError {
    #[error("Session is no longer active")]
    SessionNotActive,
    #[error("No active application for this job")]
    ApplicationNotFound,
    #[error("Attendance already recorded")]
    AlreadyRecorded,
    #[error(transparent)]
    Db(#[from] DbErr),
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::round::Entity",
        from = "Column::RoundId",
        to = "super::round::Column::Id"
    )]
    Round,
    #[sea_orm(
        belongs_to = "super::round_session::Entity",
        from = "Column::SessionId",
        to = "super::round_session::Column::Id"
    )]
    Session,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::StudentId",
        to = "super::user::Column::Id"
    )]
    Student,
}

impl Related<super::round::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Round.def()
    }
}

impl Related<super::round_session::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Session.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Confirms a presented check-in claim and writes the attendance record.
    ///
    /// Everything is re-validated here rather than trusted from token
    /// issuance, because state may have moved between "token shown" and
    /// "token confirmed":
    ///
    /// 1. the named session must be the round's latest, belong to this
    ///    job/round, and be in `active` state;
    /// 2. the student must still hold an active application to the job;
    /// 3. no record may exist yet for (student, round).
    ///
    /// The insert leans on the composite primary key: if a concurrent
    /// confirmation wins the race, the losing insert is reported as
    /// [`ConfirmError::AlreadyRecorded`], never as a second row.
    pub async fn confirm(
        db: &DatabaseConnection,
        student_id: i64,
        job_id: i64,
        round_id: i64,
        session_id: i64,
        confirmed_by: i64,
    ) -> Result<Self, ConfirmError> {
        // 1. Session liveness, checked against current truth.
        let Some(round) = round::Entity::find_by_id(round_id).one(db).await? else {
            return Err(ConfirmError::SessionNotActive);
        };
        if round.job_id != job_id {
            return Err(ConfirmError::SessionNotActive);
        }
        let Some(latest) = round_session::Model::latest_for_round(db, round_id).await? else {
            return Err(ConfirmError::SessionNotActive);
        };
        if latest.id != session_id || latest.status != round_session::Status::Active {
            return Err(ConfirmError::SessionNotActive);
        }

        // 2. Application standing.
        if application::Model::find_active(db, student_id, job_id)
            .await?
            .is_none()
        {
            return Err(ConfirmError::ApplicationNotFound);
        }

        // 3. At-most-once per (student, round).
        if Self::find_for_round(db, student_id, round_id).await?.is_some() {
            return Err(ConfirmError::AlreadyRecorded);
        }

        // 4. Insert. The composite PK arbitrates concurrent confirmations;
        // a loser's constraint violation is re-read as a duplicate.
        let model = Self {
            student_id,
            round_id,
            session_id,
            confirmed_by,
            outcome: Outcome::Attended,
            recorded_at: Utc::now(),
        };

        match model.into_active_model().insert(db).await {
            Ok(created) => Ok(created),
            Err(insert_err) => {
                if Self::find_for_round(db, student_id, round_id).await?.is_some() {
                    Err(ConfirmError::AlreadyRecorded)
                } else {
                    Err(ConfirmError::Db(insert_err))
                }
            }
        }
    }

    pub async fn find_for_round(
        db: &DatabaseConnection,
        student_id: i64,
        round_id: i64,
    ) -> Result<Option<Self>, DbErr> {
        Entity::find_by_id((student_id, round_id)).one(db).await
    }

    /// The student's records across a set of rounds, keyed by round id.
    pub async fn map_for_student(
        db: &DatabaseConnection,
        student_id: i64,
        round_ids: &[i64],
    ) -> Result<HashMap<i64, Self>, DbErr> {
        if round_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let rows = Entity::find()
            .filter(Column::StudentId.eq(student_id))
            .filter(Column::RoundId.is_in(round_ids.iter().copied()))
            .all(db)
            .await?;
        Ok(rows.into_iter().map(|r| (r.round_id, r)).collect())
    }
}
