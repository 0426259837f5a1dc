use sea_orm::entity::prelude::*;
use uuid::Uuid;

use crate::modules::account::application::domain::entities::{
    Account, IssuedToken, NotificationPreferences, Profile, VerificationState,
};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub email: String,
    #[sea_orm(unique)]
    pub nickname: String,
    pub password_hash: String,
    pub is_verified: bool,
    pub verification_token: Option<String>,
    pub token_issued_at: Option<DateTimeWithTimeZone>,
    pub verified_at: Option<DateTimeWithTimeZone>,
    pub bio: Option<String>,
    pub url: Option<String>,
    pub occupation: Option<String>,
    pub location: Option<String>,
    pub notify_by_email: bool,
    pub notify_by_web: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        use chrono::Utc;
        use sea_orm::ActiveValue::Set;

        if !insert {
            // Only update updated_at on UPDATE, not INSERT
            self.updated_at = Set(Utc::now().into());
        }

        Ok(self)
    }
}

impl Model {
    /// Rebuild the domain entity from a row. The column pair
    /// (verification_token, token_issued_at) is read as one unit; a row that
    /// claims to be verified without a token is rejected as corrupt.
    pub fn into_account(self) -> Result<Account, String> {
        let token = match (self.verification_token, self.token_issued_at) {
            (Some(value), Some(issued_at)) => Some(IssuedToken {
                value,
                issued_at: issued_at.to_utc(),
            }),
            (None, None) => None,
            _ => {
                return Err(format!(
                    "account {} has a half-written verification token",
                    self.id
                ))
            }
        };

        let verification = if self.is_verified {
            let at = self
                .verified_at
                .ok_or_else(|| format!("account {} is verified without a timestamp", self.id))?
                .to_utc();
            let token = token
                .ok_or_else(|| format!("account {} is verified without a token", self.id))?;
            VerificationState::Verified { at, token }
        } else {
            VerificationState::Unverified { token }
        };

        Ok(Account {
            id: self.id,
            email: self.email,
            nickname: self.nickname,
            password_hash: self.password_hash,
            verification,
            profile: Profile {
                bio: self.bio,
                url: self.url,
                occupation: self.occupation,
                location: self.location,
            },
            notifications: NotificationPreferences {
                by_email: self.notify_by_email,
                by_web: self.notify_by_web,
            },
            created_at: self.created_at.to_utc(),
            updated_at: self.updated_at.to_utc(),
        })
    }
}
