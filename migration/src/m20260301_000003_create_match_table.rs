use sea_orm_migration::prelude::*;

/// Creates the `match` table: one recorded score of a person in a game.
#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Match {
    Table,
    Id,
    GameId,
    PersonId,
    Score,
}

#[derive(DeriveIden)]
enum Game {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Person {
    Table,
    Id,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Match::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Match::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Match::GameId).integer().not_null())
                    .col(ColumnDef::new(Match::PersonId).integer().not_null())
                    .col(ColumnDef::new(Match::Score).double().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_match_game_id")
                            .from(Match::Table, Match::GameId)
                            .to(Game::Table, Game::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_match_person_id")
                            .from(Match::Table, Match::PersonId)
                            .to(Person::Table, Person::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Per-game score listings
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_match_game_id")
                    .table(Match::Table)
                    .col(Match::GameId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Match::Table).to_owned())
            .await
    }
}
