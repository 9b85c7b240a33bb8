use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Achievements::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Achievements::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Achievements::PlayerName).string().not_null())
                    .col(ColumnDef::new(Achievements::Title).string().not_null())
                    .col(ColumnDef::new(Achievements::Description).string().not_null())
                    .col(ColumnDef::new(Achievements::Icon).string().not_null())
                    .col(ColumnDef::new(Achievements::Rarity).string().not_null())
                    .col(ColumnDef::new(Achievements::Category).string().not_null())
                    .col(
                        ColumnDef::new(Achievements::UnlockedDate)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // A player holds each achievement title at most once
        manager
            .create_index(
                Index::create()
                    .name("idx_achievements_player_title")
                    .table(Achievements::Table)
                    .col(Achievements::PlayerName)
                    .col(Achievements::Title)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Achievements::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Achievements {
    Table,
    Id,
    PlayerName,
    Title,
    Description,
    Icon,
    Rarity,
    Category,
    UnlockedDate,
}
