use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(RateLimitLogs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RateLimitLogs::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(RateLimitLogs::Identifier)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(ColumnDef::new(RateLimitLogs::Endpoint).text().not_null())
                    .col(
                        ColumnDef::new(RateLimitLogs::Action)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RateLimitLogs::GlobalCount)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(RateLimitLogs::IpCount).integer().null())
                    .col(ColumnDef::new(RateLimitLogs::UserAgent).text().null())
                    .col(ColumnDef::new(RateLimitLogs::Country).string_len(8).null())
                    .col(
                        ColumnDef::new(RateLimitLogs::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_rate_limit_logs_created_at")
                    .table(RateLimitLogs::Table)
                    .col(RateLimitLogs::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(RateLimitLogs::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum RateLimitLogs {
    Table,
    Id,
    Identifier,
    Endpoint,
    Action,
    GlobalCount,
    IpCount,
    UserAgent,
    Country,
    CreatedAt,
}
