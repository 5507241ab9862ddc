use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use chrono::{DateTime, Utc};
use rand::rngs::OsRng;
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::IntoActiveModel;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Represents an account in the `users` table: a placement-seeking student or
/// an administrator.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Primary key ID (auto-incremented).
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Unique login name (student number for students).
    pub username: String,
    /// User's unique email address.
    pub email: String,
    /// Securely hashed password string.
    pub password_hash: String,
    /// Whether the user has admin privileges.
    pub admin: bool,
    /// KYC verification state; only approved students may request check-in tokens.
    pub verification_status: VerificationStatus,
    /// Timestamp when the user was created.
    pub created_at: DateTime<Utc>,
    /// Timestamp when the user was last updated.
    pub updated_at: DateTime<Utc>,
}

/// KYC verification lifecycle for a student account.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(
    rs_type = "String",
    db_type = "String(StringLen::N(16))",
    rename_all = "snake_case"
)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::application::Entity")]
    Applications,
}

impl Related<super::application::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Applications.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Creates a user with a freshly hashed password. New accounts start with
    /// `pending` verification.
    pub async fn create(
        db: &DatabaseConnection,
        username: &str,
        email: &str,
        password: &str,
        admin: bool,
    ) -> Result<Self, DbErr> {
        let password_hash = Self::hash_password(password)
            .map_err(|e| DbErr::Custom(format!("Failed to hash password: {e}")))?;

        let now = Utc::now();
        let model = Self {
            id: 0,
            username: username.to_owned(),
            email: email.to_owned(),
            password_hash,
            admin,
            verification_status: VerificationStatus::Pending,
            created_at: now,
            updated_at: now,
        };

        let mut active = model.into_active_model();
        active.id = NotSet;
        active.insert(db).await
    }

    /// Looks up a user by username and checks the password against the stored
    /// argon2 hash. Returns `None` for unknown users and bad passwords alike.
    pub async fn verify_credentials(
        db: &DatabaseConnection,
        username: &str,
        password: &str,
    ) -> Result<Option<Self>, DbErr> {
        let Some(user) = Entity::find()
            .filter(Column::Username.eq(username))
            .one(db)
            .await?
        else {
            return Ok(None);
        };

        let Ok(parsed) = PasswordHash::new(&user.password_hash) else {
            return Ok(None);
        };

        if Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
        {
            Ok(Some(user))
        } else {
            Ok(None)
        }
    }

    /// Moves the account's KYC state, e.g. when a verification review completes.
    pub async fn set_verification_status(
        &self,
        db: &DatabaseConnection,
        status: VerificationStatus,
    ) -> Result<Self, DbErr> {
        let mut active: ActiveModel = self.clone().into();
        active.verification_status = Set(status);
        active.updated_at = Set(Utc::now());
        active.update(db).await
    }

    fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
        let salt = SaltString::generate(&mut OsRng);
        Ok(Argon2::default()
            .hash_password(password.as_bytes(), &salt)?
            .to_string())
    }
}
