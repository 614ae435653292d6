use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Snippet::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Snippet::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Snippet::Title).text().not_null())
                    .col(
                        ColumnDef::new(Snippet::Description)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(Snippet::Code).text().not_null())
                    .col(ColumnDef::new(Snippet::Language).string().not_null())
                    .col(ColumnDef::new(Snippet::Category).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_snippets_language")
                    .table(Snippet::Table)
                    .col(Snippet::Language)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_snippets_category")
                    .table(Snippet::Table)
                    .col(Snippet::Category)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Snippet::Table).if_exists().to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Snippet {
    #[sea_orm(iden = "snippets")]
    Table,
    Id,
    Title,
    Description,
    Code,
    Language,
    Category,
}
