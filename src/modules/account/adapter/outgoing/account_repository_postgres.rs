use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use std::sync::Arc;
use uuid::Uuid;

use crate::modules::account::application::domain::entities::{Account, IssuedToken};
use crate::modules::account::application::ports::outgoing::{
    AccountRepository, AccountRepositoryError, DuplicateField,
};

use super::sea_orm_entity::accounts::{
    ActiveModel as AccountActiveModel, Entity as AccountEntity,
};

#[derive(Clone, Debug)]
pub struct AccountRepositoryPostgres {
    db: Arc<DatabaseConnection>,
}

impl AccountRepositoryPostgres {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Postgres reports constraint violations by name, so the colliding
    /// column can be read off the message.
    fn map_insert_error(e: sea_orm::DbErr) -> AccountRepositoryError {
        let err_str = e.to_string().to_lowercase();
        let is_duplicate = err_str.contains("23505")
            || err_str.contains("duplicate key")
            || err_str.contains("unique constraint");

        if is_duplicate {
            if err_str.contains("nickname") {
                return AccountRepositoryError::Duplicate(DuplicateField::Nickname);
            }
            return AccountRepositoryError::Duplicate(DuplicateField::Email);
        }
        AccountRepositoryError::DatabaseError(e.to_string())
    }
}

#[async_trait]
impl AccountRepository for AccountRepositoryPostgres {
    async fn create_account(&self, account: Account) -> Result<Account, AccountRepositoryError> {
        let token = account.verification_token().cloned();

        let active_account = AccountActiveModel {
            id: Set(account.id),
            email: Set(account.email.clone()),
            nickname: Set(account.nickname.clone()),
            password_hash: Set(account.password_hash.clone()),
            is_verified: Set(false),
            verification_token: Set(token.as_ref().map(|t| t.value.clone())),
            token_issued_at: Set(token.map(|t| t.issued_at.into())),
            verified_at: Set(None),
            bio: Set(account.profile.bio.clone()),
            url: Set(account.profile.url.clone()),
            occupation: Set(account.profile.occupation.clone()),
            location: Set(account.profile.location.clone()),
            notify_by_email: Set(account.notifications.by_email),
            notify_by_web: Set(account.notifications.by_web),
            created_at: NotSet,
            updated_at: NotSet,
        };

        let inserted = active_account
            .insert(&*self.db)
            .await
            .map_err(Self::map_insert_error)?;

        inserted
            .into_account()
            .map_err(AccountRepositoryError::DatabaseError)
    }

    async fn store_verification_token(
        &self,
        account_id: Uuid,
        token: IssuedToken,
    ) -> Result<(), AccountRepositoryError> {
        let account = AccountEntity::find_by_id(account_id)
            .one(&*self.db)
            .await
            .map_err(|e| AccountRepositoryError::DatabaseError(e.to_string()))?
            .ok_or(AccountRepositoryError::AccountNotFound)?;

        let mut active_account: AccountActiveModel = account.into();
        active_account.verification_token = Set(Some(token.value));
        active_account.token_issued_at = Set(Some(token.issued_at.into()));

        active_account
            .update(&*self.db)
            .await
            .map_err(|e| AccountRepositoryError::DatabaseError(e.to_string()))?;

        Ok(())
    }

    async fn mark_verified(
        &self,
        account_id: Uuid,
        verified_at: DateTime<Utc>,
    ) -> Result<(), AccountRepositoryError> {
        let account = AccountEntity::find_by_id(account_id)
            .one(&*self.db)
            .await
            .map_err(|e| AccountRepositoryError::DatabaseError(e.to_string()))?
            .ok_or(AccountRepositoryError::AccountNotFound)?;

        let mut active_account: AccountActiveModel = account.into();
        active_account.is_verified = Set(true);
        active_account.verified_at = Set(Some(verified_at.into()));

        active_account
            .update(&*self.db)
            .await
            .map_err(|e| AccountRepositoryError::DatabaseError(e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::sea_orm_entity::accounts::Model as AccountModel;
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, DbErr, MockDatabase, MockExecResult};

    fn test_account() -> Account {
        let mut account = Account::new(
            "member@example.com".to_string(),
            "member".to_string(),
            "hashed_password".to_string(),
        );
        account.issue_verification_token(Utc::now());
        account
    }

    fn model_for(account: &Account) -> AccountModel {
        let token = account.verification_token().unwrap();
        AccountModel {
            id: account.id,
            email: account.email.clone(),
            nickname: account.nickname.clone(),
            password_hash: account.password_hash.clone(),
            is_verified: false,
            verification_token: Some(token.value.clone()),
            token_issued_at: Some(token.issued_at.into()),
            verified_at: None,
            bio: None,
            url: None,
            occupation: None,
            location: None,
            notify_by_email: false,
            notify_by_web: true,
            created_at: account.created_at.into(),
            updated_at: account.updated_at.into(),
        }
    }

    #[tokio::test]
    async fn test_create_account_success() {
        let account = test_account();
        let token_value = account.verification_token().unwrap().value.clone();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![model_for(&account)]])
            .append_exec_results(vec![MockExecResult {
                last_insert_id: 1,
                rows_affected: 1,
            }])
            .into_connection();

        let repository = AccountRepositoryPostgres::new(Arc::new(db));

        let result = repository.create_account(account.clone()).await;

        assert!(result.is_ok(), "Expected insert to succeed, got {:?}", result);
        let created = result.unwrap();
        assert_eq!(created.email, "member@example.com");
        assert_eq!(created.nickname, "member");
        assert!(!created.is_verified());
        assert!(created.token_matches(&token_value));
    }

    #[tokio::test]
    async fn test_create_account_duplicate_email() {
        let mock_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors([DbErr::Custom(
                "duplicate key value violates unique constraint \"accounts_email_key\""
                    .to_string(),
            )])
            .into_connection();

        let repository = AccountRepositoryPostgres::new(Arc::new(mock_db));

        let result = repository.create_account(test_account()).await;

        assert!(matches!(
            result,
            Err(AccountRepositoryError::Duplicate(DuplicateField::Email))
        ));
    }

    #[tokio::test]
    async fn test_create_account_duplicate_nickname() {
        let mock_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors([DbErr::Custom(
                "duplicate key value violates unique constraint \"accounts_nickname_key\""
                    .to_string(),
            )])
            .into_connection();

        let repository = AccountRepositoryPostgres::new(Arc::new(mock_db));

        let result = repository.create_account(test_account()).await;

        assert!(matches!(
            result,
            Err(AccountRepositoryError::Duplicate(DuplicateField::Nickname))
        ));
    }

    #[tokio::test]
    async fn test_create_account_database_error() {
        let mock_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors([DbErr::Custom("connection timeout".to_string())])
            .into_connection();

        let repository = AccountRepositoryPostgres::new(Arc::new(mock_db));

        let result = repository.create_account(test_account()).await;

        match result.unwrap_err() {
            AccountRepositoryError::DatabaseError(msg) => {
                assert!(msg.contains("connection timeout"));
            }
            other => panic!("Expected DatabaseError, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_store_verification_token_success() {
        let account = test_account();
        let fresh = IssuedToken {
            value: "fresh-token".to_string(),
            issued_at: Utc::now(),
        };

        let mut updated_model = model_for(&account);
        updated_model.verification_token = Some(fresh.value.clone());
        updated_model.token_issued_at = Some(fresh.issued_at.into());

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![model_for(&account)]])
            .append_query_results(vec![vec![updated_model]])
            .append_exec_results(vec![MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();

        let repository = AccountRepositoryPostgres::new(Arc::new(db));

        let result = repository.store_verification_token(account.id, fresh).await;

        assert!(result.is_ok(), "Failed to store token: {:?}", result);
    }

    #[tokio::test]
    async fn test_store_verification_token_account_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![Vec::<AccountModel>::new()])
            .into_connection();

        let repository = AccountRepositoryPostgres::new(Arc::new(db));

        let result = repository
            .store_verification_token(
                Uuid::new_v4(),
                IssuedToken {
                    value: "t".to_string(),
                    issued_at: Utc::now(),
                },
            )
            .await;

        assert!(matches!(
            result,
            Err(AccountRepositoryError::AccountNotFound)
        ));
    }

    #[tokio::test]
    async fn test_mark_verified_success() {
        let account = test_account();
        let verified_at = Utc::now();

        let mut verified_model = model_for(&account);
        verified_model.is_verified = true;
        verified_model.verified_at = Some(verified_at.into());

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![model_for(&account)]])
            .append_query_results(vec![vec![verified_model]])
            .append_exec_results(vec![MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();

        let repository = AccountRepositoryPostgres::new(Arc::new(db));

        let result = repository.mark_verified(account.id, verified_at).await;

        assert!(result.is_ok(), "Failed to mark verified: {:?}", result);
    }

    #[tokio::test]
    async fn test_mark_verified_account_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![Vec::<AccountModel>::new()])
            .into_connection();

        let repository = AccountRepositoryPostgres::new(Arc::new(db));

        let result = repository.mark_verified(Uuid::new_v4(), Utc::now()).await;

        assert!(matches!(
            result,
            Err(AccountRepositoryError::AccountNotFound)
        ));
    }

    #[tokio::test]
    async fn test_mark_verified_database_error_on_update() {
        let account = test_account();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![model_for(&account)]])
            .append_query_errors([DbErr::Custom("update failed".to_string())])
            .into_connection();

        let repository = AccountRepositoryPostgres::new(Arc::new(db));

        let result = repository.mark_verified(account.id, Utc::now()).await;

        match result.unwrap_err() {
            AccountRepositoryError::DatabaseError(msg) => {
                assert!(msg.contains("update failed"));
            }
            other => panic!("Expected DatabaseError, got {:?}", other),
        }
    }
}
