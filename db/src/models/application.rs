use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::IntoActiveModel;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A student's application to a job. Holding an `active` application is the
/// precondition for any check-in token to be issued or confirmed.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "applications")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub student_id: i64,
    pub job_id: i64,
    pub status: Status,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(
    rs_type = "String",
    db_type = "String(StringLen::N(16))",
    rename_all = "snake_case"
)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Active,
    Withdrawn,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::StudentId",
        to = "super::user::Column::Id"
    )]
    Student,
    #[sea_orm(
        belongs_to = "super::job::Entity",
        from = "Column::JobId",
        to = "super::job::Column::Id"
    )]
    Job,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl Related<super::job::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Job.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub async fn create(
        db: &DatabaseConnection,
        student_id: i64,
        job_id: i64,
    ) -> Result<Self, DbErr> {
        let now = Utc::now();
        let model = Self {
            id: 0,
            student_id,
            job_id,
            status: Status::Active,
            created_at: now,
            updated_at: now,
        };

        let mut active = model.into_active_model();
        active.id = NotSet;
        active.insert(db).await
    }

    /// The student's live application to a job, if they have one.
    pub async fn find_active(
        db: &DatabaseConnection,
        student_id: i64,
        job_id: i64,
    ) -> Result<Option<Self>, DbErr> {
        Entity::find()
            .filter(Column::StudentId.eq(student_id))
            .filter(Column::JobId.eq(job_id))
            .filter(Column::Status.eq(Status::Active))
            .one(db)
            .await
    }

    pub async fn withdraw(&self, db: &DatabaseConnection) -> Result<Self, DbErr> {
        let mut active: ActiveModel = self.clone().into();
        active.status = Set(Status::Withdrawn);
        active.updated_at = Set(Utc::now());
        active.update(db).await
    }
}
