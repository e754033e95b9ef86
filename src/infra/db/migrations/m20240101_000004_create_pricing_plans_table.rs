//! Migration: Create pricing_plans table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PricingPlans::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PricingPlans::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PricingPlans::Name)
                            .string_len(100)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(PricingPlans::PriceMonthly)
                            .decimal_len(10, 2)
                            .not_null(),
                    )
                    .col(ColumnDef::new(PricingPlans::FeaturesJson).text().null())
                    .col(
                        ColumnDef::new(PricingPlans::IsPopular)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(PricingPlans::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(PricingPlans::SortOrder)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(PricingPlans::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(PricingPlans::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PricingPlans::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum PricingPlans {
    Table,
    Id,
    Name,
    PriceMonthly,
    FeaturesJson,
    IsPopular,
    IsActive,
    SortOrder,
    CreatedAt,
    UpdatedAt,
}
