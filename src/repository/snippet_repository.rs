use crate::persistence::{SnippetActiveModel, SnippetColumn, SnippetEntity, SnippetModel};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
};

pub(crate) struct SnippetRepository;

impl SnippetRepository {
    /// Rows in insertion order, narrowed by the exact-match columns when given.
    pub(crate) async fn list_records<C>(
        db: &C,
        language: Option<&str>,
        category: Option<&str>,
    ) -> Result<Vec<SnippetModel>, DbErr>
    where
        C: ConnectionTrait,
    {
        let mut select = SnippetEntity::find();
        if let Some(language) = language {
            select = select.filter(SnippetColumn::Language.eq(language));
        }
        if let Some(category) = category {
            select = select.filter(SnippetColumn::Category.eq(category));
        }

        select.order_by_asc(SnippetColumn::Id).all(db).await
    }

    pub(crate) async fn find_by_id<C>(db: &C, id: i32) -> Result<Option<SnippetModel>, DbErr>
    where
        C: ConnectionTrait,
    {
        SnippetEntity::find_by_id(id).one(db).await
    }

    pub(crate) async fn insert<C>(db: &C, active_model: SnippetActiveModel) -> Result<SnippetModel, DbErr>
    where
        C: ConnectionTrait,
    {
        active_model.insert(db).await
    }

    pub(crate) async fn update<C>(db: &C, active_model: SnippetActiveModel) -> Result<SnippetModel, DbErr>
    where
        C: ConnectionTrait,
    {
        active_model.update(db).await
    }

    pub(crate) async fn delete_by_id<C>(db: &C, id: i32) -> Result<u64, DbErr>
    where
        C: ConnectionTrait,
    {
        let result = SnippetEntity::delete_by_id(id).exec(db).await?;
        Ok(result.rows_affected)
    }

    pub(crate) async fn delete_all<C>(db: &C) -> Result<u64, DbErr>
    where
        C: ConnectionTrait,
    {
        let result = SnippetEntity::delete_many().exec(db).await?;
        Ok(result.rows_affected)
    }

    pub(crate) async fn insert_many<C>(
        db: &C,
        active_models: Vec<SnippetActiveModel>,
    ) -> Result<(), DbErr>
    where
        C: ConnectionTrait,
    {
        if active_models.is_empty() {
            return Ok(());
        }
        SnippetEntity::insert_many(active_models).exec(db).await?;
        Ok(())
    }
}
