use async_trait::async_trait;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use std::sync::Arc;
use uuid::Uuid;

use crate::modules::account::application::domain::entities::Account;
use crate::modules::account::application::ports::outgoing::{AccountQuery, AccountQueryError};

use super::sea_orm_entity::accounts::{Column as AccountColumn, Entity as AccountEntity};

#[derive(Clone, Debug)]
pub struct AccountQueryPostgres {
    db: Arc<DatabaseConnection>,
}

impl AccountQueryPostgres {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AccountQuery for AccountQueryPostgres {
    async fn find_by_id(&self, account_id: Uuid) -> Result<Option<Account>, AccountQueryError> {
        let model = AccountEntity::find_by_id(account_id)
            .one(&*self.db)
            .await
            .map_err(|e| AccountQueryError::DatabaseError(e.to_string()))?;

        model
            .map(|m| m.into_account())
            .transpose()
            .map_err(AccountQueryError::DatabaseError)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, AccountQueryError> {
        let model = AccountEntity::find()
            .filter(AccountColumn::Email.eq(email))
            .one(&*self.db)
            .await
            .map_err(|e| AccountQueryError::DatabaseError(e.to_string()))?;

        model
            .map(|m| m.into_account())
            .transpose()
            .map_err(AccountQueryError::DatabaseError)
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, AccountQueryError> {
        let found = AccountEntity::find()
            .filter(AccountColumn::Email.eq(email))
            .one(&*self.db)
            .await
            .map_err(|e| AccountQueryError::DatabaseError(e.to_string()))?;

        Ok(found.is_some())
    }

    async fn exists_by_nickname(&self, nickname: &str) -> Result<bool, AccountQueryError> {
        let found = AccountEntity::find()
            .filter(AccountColumn::Nickname.eq(nickname))
            .one(&*self.db)
            .await
            .map_err(|e| AccountQueryError::DatabaseError(e.to_string()))?;

        Ok(found.is_some())
    }
}
