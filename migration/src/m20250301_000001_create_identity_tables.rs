use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create agencies table first, users carries a foreign key to it
        manager
            .create_table(
                Table::create()
                    .table(Agencies::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Agencies::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Agencies::Name).string().not_null())
                    .col(ColumnDef::new(Agencies::Code).string().not_null().unique_key())
                    .col(ColumnDef::new(Agencies::AgencyType).string().not_null())
                    .col(ColumnDef::new(Agencies::ContactEmail).string())
                    .col(ColumnDef::new(Agencies::ContactPhone).string())
                    .col(ColumnDef::new(Agencies::CreatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // Create users table
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Users::Email).string().not_null().unique_key())
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Users::FullName).string().not_null())
                    .col(ColumnDef::new(Users::Phone).string())
                    .col(ColumnDef::new(Users::Role).string().not_null())
                    .col(ColumnDef::new(Users::Status).string().not_null().default("ACTIVE"))
                    .col(ColumnDef::new(Users::EmailVerifiedAt).big_integer())
                    .col(ColumnDef::new(Users::LastLoginAt).big_integer())
                    .col(ColumnDef::new(Users::AgencyId).string())
                    .col(ColumnDef::new(Users::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Users::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_users_agency_id")
                            .from(Users::Table, Users::AgencyId)
                            .to(Agencies::Table, Agencies::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_users_status")
                    .table(Users::Table)
                    .col(Users::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_users_agency_id")
                    .table(Users::Table)
                    .col(Users::AgencyId)
                    .to_owned(),
            )
            .await?;

        // Create suppliers table
        manager
            .create_table(
                Table::create()
                    .table(Suppliers::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Suppliers::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Suppliers::LegalName).string().not_null())
                    .col(ColumnDef::new(Suppliers::TradingName).string())
                    .col(ColumnDef::new(Suppliers::Tin).string().not_null())
                    .col(ColumnDef::new(Suppliers::Address).string())
                    .col(ColumnDef::new(Suppliers::ContactEmail).string().not_null())
                    .col(ColumnDef::new(Suppliers::ContactPhone).string())
                    .col(ColumnDef::new(Suppliers::Categories).string().not_null().default("[]"))
                    .col(ColumnDef::new(Suppliers::KycStatus).string().not_null())
                    .col(ColumnDef::new(Suppliers::IrcStatus).string().not_null())
                    .col(ColumnDef::new(Suppliers::OwnerUserId).string().not_null().unique_key())
                    .col(ColumnDef::new(Suppliers::CreatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_suppliers_owner_user_id")
                            .from(Suppliers::Table, Suppliers::OwnerUserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                    )
                    .to_owned(),
            )
            .await?;

        // (legal_name, tin) pairs must be unique across suppliers
        manager
            .create_index(
                Index::create()
                    .name("idx_suppliers_legal_name_tin")
                    .table(Suppliers::Table)
                    .col(Suppliers::LegalName)
                    .col(Suppliers::Tin)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Create verification_tokens table (email verification and password
        // reset share it, reset rows carry a fixed prefix on the token value)
        manager
            .create_table(
                Table::create()
                    .table(VerificationTokens::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(VerificationTokens::Token).string().not_null().primary_key())
                    .col(ColumnDef::new(VerificationTokens::Identifier).string().not_null())
                    .col(ColumnDef::new(VerificationTokens::ExpiresAt).big_integer().not_null())
                    .col(ColumnDef::new(VerificationTokens::CreatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_verification_tokens_identifier")
                    .table(VerificationTokens::Table)
                    .col(VerificationTokens::Identifier)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_verification_tokens_expires_at")
                    .table(VerificationTokens::Table)
                    .col(VerificationTokens::ExpiresAt)
                    .to_owned(),
            )
            .await?;

        // Create sessions table
        manager
            .create_table(
                Table::create()
                    .table(Sessions::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Sessions::TokenHash).string().not_null().primary_key())
                    .col(ColumnDef::new(Sessions::UserId).string().not_null())
                    .col(ColumnDef::new(Sessions::ExpiresAt).big_integer().not_null())
                    .col(ColumnDef::new(Sessions::CreatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_sessions_user_id")
                            .from(Sessions::Table, Sessions::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_sessions_user_id")
                    .table(Sessions::Table)
                    .col(Sessions::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_sessions_expires_at")
                    .table(Sessions::Table)
                    .col(Sessions::ExpiresAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Sessions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(VerificationTokens::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Suppliers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Agencies::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Email,
    PasswordHash,
    FullName,
    Phone,
    Role,
    Status,
    EmailVerifiedAt,
    LastLoginAt,
    AgencyId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Agencies {
    Table,
    Id,
    Name,
    Code,
    AgencyType,
    ContactEmail,
    ContactPhone,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Suppliers {
    Table,
    Id,
    LegalName,
    TradingName,
    Tin,
    Address,
    ContactEmail,
    ContactPhone,
    Categories,
    KycStatus,
    IrcStatus,
    OwnerUserId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum VerificationTokens {
    Table,
    Token,
    Identifier,
    ExpiresAt,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Sessions {
    Table,
    TokenHash,
    UserId,
    ExpiresAt,
    CreatedAt,
}
