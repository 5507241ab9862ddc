use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::entity::prelude::*;
use sea_orm::{IntoActiveModel, QueryOrder};
use serde::{Deserialize, Serialize};

/// One check-in window of a round. A round may accumulate several sessions
/// over time; only the most recently created one is authoritative for
/// liveness (no session at all means the round has not started).
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "round_sessions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub round_id: i64,
    pub status: Status,
    /// Admin who opened the window.
    pub opened_by: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Lifecycle of a check-in window. The implicit fourth state, NOT_STARTED,
/// is the absence of any session for the round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(
    rs_type = "String",
    db_type = "String(StringLen::N(32))",
    rename_all = "snake_case"
)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Active,
    TemporarilyClosed,
    PermanentlyClosed,
}

impl Status {
    /// Transition table: active and temporarily-closed flip between each
    /// other and may both end permanently; permanently-closed is terminal.
    pub fn can_transition_to(self, next: Status) -> bool {
        use Status::*;
        matches!(
            (self, next),
            (Active, TemporarilyClosed)
                | (Active, PermanentlyClosed)
                | (TemporarilyClosed, Active)
                | (TemporarilyClosed, PermanentlyClosed)
        )
    }

    pub fn is_terminal(self) -> bool {
        self == Status::PermanentlyClosed
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::round::Entity",
        from = "Column::RoundId",
        to = "super::round::Column::Id"
    )]
    Round,
}

impl Related<super::round::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Round.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Opens a new check-in window for a round in `active` state.
    ///
    /// Refused while the round's latest session is still open (not
    /// permanently closed), so "latest session" stays unambiguous.
    pub async fn open(
        db: &DatabaseConnection,
        round_id: i64,
        opened_by: i64,
    ) -> Result<Self, DbErr> {
        if let Some(latest) = Self::latest_for_round(db, round_id).await? {
            if !latest.status.is_terminal() {
                return Err(DbErr::Custom(
                    "Previous session must be permanently closed before opening a new one".into(),
                ));
            }
        }

        let now = Utc::now();
        let model = Self {
            id: 0,
            round_id,
            status: Status::Active,
            opened_by,
            created_at: now,
            updated_at: now,
        };

        let mut active = model.into_active_model();
        active.id = NotSet;
        active.insert(db).await
    }

    /// The authoritative session for a round's live status, if any.
    pub async fn latest_for_round(
        db: &DatabaseConnection,
        round_id: i64,
    ) -> Result<Option<Self>, DbErr> {
        Entity::find()
            .filter(Column::RoundId.eq(round_id))
            .order_by_desc(Column::Id)
            .one(db)
            .await
    }

    /// Moves the session to `next`, enforcing the transition table.
    pub async fn transition(
        &self,
        db: &DatabaseConnection,
        next: Status,
    ) -> Result<Self, DbErr> {
        if !self.status.can_transition_to(next) {
            return Err(DbErr::Custom(format!(
                "Illegal session transition: {:?} -> {next:?}",
                self.status
            )));
        }

        let mut active: ActiveModel = self.clone().into();
        active.status = Set(next);
        active.updated_at = Set(Utc::now());
        active.update(db).await
    }
}
