use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::entity::prelude::*;
use sea_orm::{IntoActiveModel, QueryOrder};

/// An interview round of a job. `position` orders rounds within the job and
/// is unique among that job's non-retired rounds; retired rounds stay on
/// record but are skipped for eligibility and listing.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, serde::Serialize)]
#[sea_orm(table_name = "rounds")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub job_id: i64,
    pub name: String,
    pub position: i32,
    pub retired: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::job::Entity",
        from = "Column::JobId",
        to = "super::job::Column::Id"
    )]
    Job,
    #[sea_orm(has_many = "super::round_session::Entity")]
    Sessions,
}

impl Related<super::job::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Job.def()
    }
}

impl Related<super::round_session::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sessions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Creates a round, refusing a `position` already held by a non-retired
    /// round of the same job.
    pub async fn create(
        db: &DatabaseConnection,
        job_id: i64,
        name: &str,
        position: i32,
    ) -> Result<Self, DbErr> {
        if position < 1 {
            return Err(DbErr::Custom("Round position must be 1 or greater".into()));
        }

        let taken = Entity::find()
            .filter(Column::JobId.eq(job_id))
            .filter(Column::Position.eq(position))
            .filter(Column::Retired.eq(false))
            .one(db)
            .await?
            .is_some();
        if taken {
            return Err(DbErr::Custom(format!(
                "Round position {position} is already in use for this job"
            )));
        }

        let now = Utc::now();
        let model = Self {
            id: 0,
            job_id,
            name: name.to_owned(),
            position,
            retired: false,
            created_at: now,
            updated_at: now,
        };

        let mut active = model.into_active_model();
        active.id = NotSet;
        active.insert(db).await
    }

    /// All non-retired rounds of a job, ascending by position.
    pub async fn active_for_job(db: &DatabaseConnection, job_id: i64) -> Result<Vec<Self>, DbErr> {
        Entity::find()
            .filter(Column::JobId.eq(job_id))
            .filter(Column::Retired.eq(false))
            .order_by_asc(Column::Position)
            .all(db)
            .await
    }

    /// Marks the round retired; it keeps its history but drops out of
    /// eligibility and listings.
    pub async fn retire(&self, db: &DatabaseConnection) -> Result<Self, DbErr> {
        let mut active: ActiveModel = self.clone().into();
        active.retired = Set(true);
        active.updated_at = Set(Utc::now());
        active.update(db).await
    }
}
