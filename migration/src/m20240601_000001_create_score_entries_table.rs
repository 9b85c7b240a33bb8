use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ScoreEntries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ScoreEntries::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ScoreEntries::PlayerName).string().not_null())
                    .col(
                        ColumnDef::new(ScoreEntries::Score)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(ScoreEntries::GameType).string().not_null())
                    .col(ColumnDef::new(ScoreEntries::Difficulty).string().not_null())
                    .col(
                        ColumnDef::new(ScoreEntries::Date)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(ScoreEntries::TimeSpentSecs)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    // JSON array of the achievements earned in this game
                    .col(ColumnDef::new(ScoreEntries::Achievements).text().not_null())
                    .col(ColumnDef::new(ScoreEntries::Details).text().null())
                    .to_owned(),
            )
            .await?;

        // Scoreboard queries read by score, highest first
        manager
            .create_index(
                Index::create()
                    .name("idx_score_entries_score")
                    .table(ScoreEntries::Table)
                    .col(ScoreEntries::Score)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_score_entries_player_name")
                    .table(ScoreEntries::Table)
                    .col(ScoreEntries::PlayerName)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ScoreEntries::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ScoreEntries {
    Table,
    Id,
    PlayerName,
    Score,
    GameType,
    Difficulty,
    Date,
    TimeSpentSecs,
    Achievements,
    Details,
}
