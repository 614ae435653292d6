mod entity;

pub(crate) use entity::{
    ActiveModel as SnippetActiveModel, Column as SnippetColumn, Entity as SnippetEntity,
    Model as SnippetModel,
};
