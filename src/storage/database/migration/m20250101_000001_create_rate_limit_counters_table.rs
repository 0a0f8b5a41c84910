use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(RateLimitCounters::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RateLimitCounters::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(RateLimitCounters::Identifier)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RateLimitCounters::Endpoint)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RateLimitCounters::RequestCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(RateLimitCounters::WindowResetAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RateLimitCounters::IsOverThreshold)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(RateLimitCounters::LastAlertSentAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(RateLimitCounters::AlertCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(RateLimitCounters::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RateLimitCounters::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // One counter per (identifier, endpoint)
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_rate_limit_counters_key")
                    .table(RateLimitCounters::Table)
                    .col(RateLimitCounters::Identifier)
                    .col(RateLimitCounters::Endpoint)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_rate_limit_counters_window_reset_at")
                    .table(RateLimitCounters::Table)
                    .col(RateLimitCounters::WindowResetAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(RateLimitCounters::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum RateLimitCounters {
    Table,
    Id,
    Identifier,
    Endpoint,
    RequestCount,
    WindowResetAt,
    IsOverThreshold,
    LastAlertSentAt,
    AlertCount,
    CreatedAt,
    UpdatedAt,
}
