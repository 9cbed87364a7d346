use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, QueryFilter,
};

use crate::entity::admin_users;
use crate::error::AppResult;

/// Repository for admin accounts
pub struct AdminUserRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> AdminUserRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn find_by_username(&self, username: &str) -> AppResult<Option<admin_users::Model>> {
        let user = admin_users::Entity::find()
            .filter(admin_users::Column::Username.eq(username))
            .one(self.db)
            .await?;

        Ok(user)
    }

    /// Create the account, or replace its password hash if it exists.
    pub async fn upsert(&self, username: &str, password_hash: String) -> AppResult<admin_users::Model> {
        let user = match self.find_by_username(username).await? {
            Some(existing) => {
                let mut active = existing.into_active_model();
                active.password_hash = Set(password_hash);
                active.update(self.db).await?
            }
            None => {
                admin_users::ActiveModel {
                    username: Set(username.to_string()),
                    password_hash: Set(password_hash),
                    created_at: Set(chrono::Utc::now().naive_utc()),
                    ..Default::default()
                }
                .insert(self.db)
                .await?
            }
        };

        Ok(user)
    }
}
