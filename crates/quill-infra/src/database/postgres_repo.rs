//! PostgreSQL repository implementations.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DbConn, DbErr, EntityTrait, IntoActiveModel,
    QueryFilter, QueryOrder, Set,
};

use quill_core::domain::{Comment, CommentFilter, CommentPatch, NewComment, Session, User};
use quill_core::error::RepoError;
use quill_core::ports::{CommentRepository, SessionRepository, UserRepository};

use super::entity::comment::{self, Entity as CommentEntity};
use super::entity::session::{self, Entity as SessionEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::{PostgresBaseRepository, repo_error};

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL session repository.
pub type PostgresSessionRepository = PostgresBaseRepository<SessionEntity>;

/// Mask the local part of an email so it can be logged.
fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => match local.chars().next() {
            Some(first) if local.chars().count() > 1 => format!("{first}***@{domain}"),
            _ => format!("***@{domain}"),
        },
        None => "***".to_string(),
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(user_email = %mask_email(email), "Finding user by email");

        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(repo_error)?;

        Ok(result.map(Into::into))
    }
}

#[async_trait]
impl SessionRepository for PostgresSessionRepository {
    async fn find_valid_by_user(&self, user_id: uuid::Uuid) -> Result<Vec<Session>, RepoError> {
        let result = SessionEntity::find()
            .filter(session::Column::UserId.eq(user_id))
            .filter(session::Column::Valid.eq(true))
            .order_by_desc(session::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(repo_error)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

/// PostgreSQL comment store.
pub struct PostgresCommentRepository {
    pub(crate) db: DbConn,
}

impl PostgresCommentRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    fn condition(filter: &CommentFilter) -> Condition {
        Condition::all()
            .add_option(filter.id.map(|id| comment::Column::Id.eq(id)))
            .add_option(
                filter
                    .post_slug
                    .as_ref()
                    .map(|slug| comment::Column::PostSlug.eq(slug.as_str())),
            )
            .add_option(filter.author.map(|author| comment::Column::UserId.eq(author)))
    }

    async fn first_match(&self, filter: &CommentFilter) -> Result<Option<comment::Model>, RepoError> {
        CommentEntity::find()
            .filter(Self::condition(filter))
            .one(&self.db)
            .await
            .map_err(repo_error)
    }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn insert(&self, input: NewComment) -> Result<Comment, RepoError> {
        let active_model: comment::ActiveModel = Comment::new(input).into();
        let model = active_model.insert(&self.db).await.map_err(repo_error)?;

        Ok(model.into())
    }

    async fn find_one(&self, filter: &CommentFilter) -> Result<Option<Comment>, RepoError> {
        Ok(self.first_match(filter).await?.map(Into::into))
    }

    async fn find_many(&self, filter: &CommentFilter) -> Result<Vec<Comment>, RepoError> {
        let result = CommentEntity::find()
            .filter(Self::condition(filter))
            .order_by_desc(comment::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(repo_error)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn update_one(
        &self,
        filter: &CommentFilter,
        patch: CommentPatch,
    ) -> Result<Option<Comment>, RepoError> {
        let Some(model) = self.first_match(filter).await? else {
            return Ok(None);
        };

        let mut active_model = model.into_active_model();
        if let Some(content) = patch.content {
            active_model.content = Set(content);
        }
        active_model.updated_at = Set(Utc::now().into());

        // The row can vanish between the read and the write.
        match active_model.update(&self.db).await {
            Ok(updated) => Ok(Some(updated.into())),
            Err(DbErr::RecordNotUpdated) => Ok(None),
            Err(e) => Err(repo_error(e)),
        }
    }

    async fn delete_one(&self, filter: &CommentFilter) -> Result<u64, RepoError> {
        let Some(model) = self.first_match(filter).await? else {
            return Ok(0);
        };

        let result = CommentEntity::delete_by_id(model.id)
            .exec(&self.db)
            .await
            .map_err(repo_error)?;

        Ok(result.rows_affected)
    }
}
