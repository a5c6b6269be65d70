//! Chat log entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use garage_core::domain::ChatSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum Source {
    #[sea_orm(string_value = "ai")]
    Ai,
    #[sea_orm(string_value = "fallback")]
    Fallback,
}

impl From<Source> for ChatSource {
    fn from(source: Source) -> Self {
        match source {
            Source::Ai => ChatSource::Ai,
            Source::Fallback => ChatSource::Fallback,
        }
    }
}

impl From<ChatSource> for Source {
    fn from(source: ChatSource) -> Self {
        match source {
            ChatSource::Ai => Source::Ai,
            ChatSource::Fallback => Source::Fallback,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "chat_logs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(nullable)]
    pub user_id: Option<Uuid>,
    #[sea_orm(column_type = "Text")]
    pub message: String,
    #[sea_orm(column_type = "Text")]
    pub response: String,
    pub source: Source,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "SetNull"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for garage_core::domain::ChatLog {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            message: model.message,
            response: model.response,
            source: model.source.into(),
            created_at: model.created_at.into(),
        }
    }
}

impl From<garage_core::domain::ChatLog> for ActiveModel {
    fn from(log: garage_core::domain::ChatLog) -> Self {
        Self {
            id: Set(log.id),
            user_id: Set(log.user_id),
            message: Set(log.message),
            response: Set(log.response),
            source: Set(log.source.into()),
            created_at: Set(log.created_at.into()),
        }
    }
}
