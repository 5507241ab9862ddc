use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::IntoActiveModel;
use sea_orm::entity::prelude::*;

/// A job posting students apply to. Interview rounds hang off a job.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, serde::Serialize)]
#[sea_orm(table_name = "jobs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub company: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::round::Entity")]
    Rounds,
    #[sea_orm(has_many = "super::application::Entity")]
    Applications,
}

impl Related<super::round::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Rounds.def()
    }
}

impl Related<super::application::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Applications.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub async fn create(
        db: &DatabaseConnection,
        company: &str,
        title: &str,
    ) -> Result<Self, DbErr> {
        let now = Utc::now();
        let model = Self {
            id: 0,
            company: company.to_owned(),
            title: title.to_owned(),
            created_at: now,
            updated_at: now,
        };

        let mut active = model.into_active_model();
        active.id = NotSet;
        active.insert(db).await
    }
}
