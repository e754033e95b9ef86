//! Migration: Create bookings table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Bookings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Bookings::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Bookings::UserId).big_integer().null())
                    .col(ColumnDef::new(Bookings::CustomerName).string_len(120).not_null())
                    .col(ColumnDef::new(Bookings::Phone).string_len(30).not_null())
                    .col(ColumnDef::new(Bookings::Email).string_len(255).null())
                    .col(ColumnDef::new(Bookings::AddressLine1).string_len(255).not_null())
                    .col(ColumnDef::new(Bookings::AddressLine2).string_len(255).null())
                    .col(ColumnDef::new(Bookings::City).string_len(80).not_null())
                    .col(ColumnDef::new(Bookings::State).string_len(80).not_null())
                    .col(ColumnDef::new(Bookings::Pincode).string_len(20).not_null())
                    .col(ColumnDef::new(Bookings::ServiceId).big_integer().null())
                    .col(
                        ColumnDef::new(Bookings::ServiceTitleSnapshot)
                            .string_len(150)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Bookings::PreferredDate).date().not_null())
                    .col(ColumnDef::new(Bookings::PreferredTime).string_len(20).not_null())
                    .col(ColumnDef::new(Bookings::PetType).string_len(50).null())
                    .col(ColumnDef::new(Bookings::PetBreed).string_len(80).null())
                    .col(ColumnDef::new(Bookings::PetAge).string_len(20).null())
                    .col(ColumnDef::new(Bookings::Notes).text().null())
                    .col(
                        ColumnDef::new(Bookings::Status)
                            .string_len(20)
                            .not_null()
                            .default("New"),
                    )
                    .col(
                        ColumnDef::new(Bookings::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Bookings::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_bookings_service")
                            .from(Bookings::Table, Bookings::ServiceId)
                            .to(Services::Table, Services::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_bookings_user")
                            .from(Bookings::Table, Bookings::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        for (name, column) in [
            ("idx_bookings_status", Bookings::Status),
            ("idx_bookings_created_at", Bookings::CreatedAt),
            ("idx_bookings_preferred_date", Bookings::PreferredDate),
            ("idx_bookings_email", Bookings::Email),
            ("idx_bookings_user_id", Bookings::UserId),
        ] {
            manager
                .create_index(
                    Index::create()
                        .name(name)
                        .table(Bookings::Table)
                        .col(column)
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Bookings::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Bookings {
    Table,
    Id,
    UserId,
    CustomerName,
    Phone,
    Email,
    AddressLine1,
    AddressLine2,
    City,
    State,
    Pincode,
    ServiceId,
    ServiceTitleSnapshot,
    PreferredDate,
    PreferredTime,
    PetType,
    PetBreed,
    PetAge,
    Notes,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Services {
    Table,
    Id,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}
