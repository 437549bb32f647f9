use chrono::Utc;
use quill_core::domain::{CommentFilter, CommentPatch, NewComment, Session};
use quill_core::ports::{BaseRepository, CommentRepository, SessionRepository};
use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
use uuid::Uuid;

use crate::database::entity::{comment, session};
use crate::database::postgres_repo::{PostgresCommentRepository, PostgresSessionRepository};

fn comment_model(id: Uuid, user_id: Uuid, slug: &str, content: &str) -> comment::Model {
    let now = Utc::now();
    comment::Model {
        id,
        content: content.to_owned(),
        user_id,
        post_slug: slug.to_owned(),
        parent_comment: None,
        created_at: now.into(),
        updated_at: now.into(),
    }
}

#[tokio::test]
async fn test_find_comments_by_post_slug_orders_newest_first() {
    let user_id = Uuid::new_v4();
    let newer = comment_model(Uuid::new_v4(), user_id, "p1", "second");
    let older = comment_model(Uuid::new_v4(), user_id, "p1", "first");

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![newer.clone(), older.clone()]])
        .into_connection();

    let repo = PostgresCommentRepository::new(db);
    let comments = repo
        .find_many(&CommentFilter::by_post_slug("p1"))
        .await
        .unwrap();

    assert_eq!(comments.len(), 2);
    assert_eq!(comments[0].id, newer.id);
    assert_eq!(comments[1].content, "first");

    let sql = format!("{:?}", repo.db.into_transaction_log()[0]);
    assert!(sql.contains("post_slug"), "{sql}");
    assert!(sql.contains("ORDER BY"), "{sql}");
    assert!(sql.contains("DESC"), "{sql}");
}

#[tokio::test]
async fn test_insert_comment_returns_stored_row() {
    let user_id = Uuid::new_v4();
    let stored = comment_model(Uuid::new_v4(), user_id, "p1", "Hi");

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![stored.clone()]])
        .into_connection();

    let repo = PostgresCommentRepository::new(db);
    let comment = repo
        .insert(NewComment {
            content: "Hi".to_string(),
            post_slug: "p1".to_string(),
            author: user_id,
            parent_comment: None,
        })
        .await
        .unwrap();

    assert_eq!(comment.id, stored.id);
    assert_eq!(comment.author, user_id);
    assert_eq!(comment.parent_comment, None);
}

#[tokio::test]
async fn test_update_missing_comment_issues_no_write() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<comment::Model>::new()])
        .into_connection();

    let repo = PostgresCommentRepository::new(db);
    let result = repo
        .update_one(
            &CommentFilter::by_id(Uuid::new_v4()),
            CommentPatch {
                content: Some("Edited".to_string()),
            },
        )
        .await
        .unwrap();

    assert!(result.is_none());
    assert_eq!(repo.db.into_transaction_log().len(), 1);
}

#[tokio::test]
async fn test_update_of_comment_removed_mid_flight_is_none() {
    let existing = comment_model(Uuid::new_v4(), Uuid::new_v4(), "p1", "Hi");

    // Read finds the row; the UPDATE ... RETURNING comes back empty.
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![existing.clone()], Vec::new()])
        .into_connection();

    let repo = PostgresCommentRepository::new(db);
    let result = repo
        .update_one(
            &CommentFilter::by_id(existing.id),
            CommentPatch {
                content: Some("Edited".to_string()),
            },
        )
        .await
        .unwrap();

    assert!(result.is_none());
    assert_eq!(repo.db.into_transaction_log().len(), 2);
}

#[tokio::test]
async fn test_delete_comment_reports_count() {
    let existing = comment_model(Uuid::new_v4(), Uuid::new_v4(), "p1", "Hi");

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![existing.clone()]])
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        }])
        .into_connection();

    let repo = PostgresCommentRepository::new(db);
    let removed = repo
        .delete_one(&CommentFilter::by_id(existing.id))
        .await
        .unwrap();

    assert_eq!(removed, 1);
}

#[tokio::test]
async fn test_find_valid_sessions() {
    let user_id = Uuid::new_v4();
    let now = Utc::now();
    let row = session::Model {
        id: Uuid::new_v4(),
        user_id,
        valid: true,
        user_agent: "curl/8.0".to_owned(),
        created_at: now.into(),
        updated_at: now.into(),
    };

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![row.clone()]])
        .into_connection();

    let repo = PostgresSessionRepository::new(db);
    let sessions = repo.find_valid_by_user(user_id).await.unwrap();

    assert_eq!(sessions.len(), 1);
    assert!(sessions[0].valid);
    assert_eq!(sessions[0].user_agent, "curl/8.0");
}

#[tokio::test]
async fn test_save_session_upserts() {
    let session = Session::new(Uuid::new_v4(), "curl/8.0".to_string()).invalidate();
    let row = session::Model {
        id: session.id,
        user_id: session.user_id,
        valid: false,
        user_agent: session.user_agent.clone(),
        created_at: session.created_at.into(),
        updated_at: session.updated_at.into(),
    };

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![row]])
        .into_connection();

    let repo = PostgresSessionRepository::new(db);
    let saved = repo.save(session.clone()).await.unwrap();
    assert!(!saved.valid);

    let sql = format!("{:?}", repo.db.into_transaction_log()[0]);
    assert!(sql.contains("ON CONFLICT"), "{sql}");
}
