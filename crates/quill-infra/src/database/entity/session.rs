//! Session entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "sessions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub valid: bool,
    pub user_agent: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for quill_core::domain::Session {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            valid: model.valid,
            user_agent: model.user_agent,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

impl From<quill_core::domain::Session> for ActiveModel {
    fn from(session: quill_core::domain::Session) -> Self {
        Self {
            id: Set(session.id),
            user_id: Set(session.user_id),
            valid: Set(session.valid),
            user_agent: Set(session.user_agent),
            created_at: Set(session.created_at.into()),
            updated_at: Set(session.updated_at.into()),
        }
    }
}
