use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Accounts::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Accounts::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Accounts::Email)
                            .string_len(255)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Accounts::Nickname)
                            .string_len(50)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Accounts::PasswordHash)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Accounts::IsVerified)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Accounts::VerificationToken).string_len(64))
                    .col(ColumnDef::new(Accounts::TokenIssuedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Accounts::VerifiedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Accounts::Bio).string_len(255))
                    .col(ColumnDef::new(Accounts::Url).string_len(255))
                    .col(ColumnDef::new(Accounts::Occupation).string_len(100))
                    .col(ColumnDef::new(Accounts::Location).string_len(100))
                    .col(
                        ColumnDef::new(Accounts::NotifyByEmail)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Accounts::NotifyByWeb)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Accounts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Accounts::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Uniqueness of email/nickname is enforced here, not in the sign-up
        // validator: two concurrent sign-ups race to the same constraint and
        // the loser gets a duplicate-key error.

        // Partial index for sweeping unverified accounts.
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                CREATE INDEX idx_accounts_unverified
                ON accounts (token_issued_at)
                WHERE is_verified = false;
                "#,
            )
            .await?;

        // Lookup by email is the hot path for confirmation and login.
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                CREATE INDEX idx_accounts_created_at
                ON accounts (created_at DESC);
                "#,
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                DROP INDEX IF EXISTS idx_accounts_unverified;
                DROP INDEX IF EXISTS idx_accounts_created_at;
                "#,
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Accounts::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Accounts {
    Table,
    Id,
    Email,
    Nickname,
    PasswordHash,
    IsVerified,
    VerificationToken,
    TokenIssuedAt,
    VerifiedAt,
    Bio,
    Url,
    Occupation,
    Location,
    NotifyByEmail,
    NotifyByWeb,
    CreatedAt,
    UpdatedAt,
}
