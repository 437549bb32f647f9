//! Comment lifecycle service.

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use crate::domain::{Comment, CommentFilter, CommentPatch, NewComment};
use crate::error::RepoError;
use crate::ports::{CommentRepository, OperationRecorder, Outcome};

/// Thin façade over the comment store. Every call is timed through the
/// injected [`OperationRecorder`]; failures are recorded and then returned
/// unchanged.
#[derive(Clone)]
pub struct CommentService {
    repo: Arc<dyn CommentRepository>,
    recorder: Arc<dyn OperationRecorder>,
}

impl CommentService {
    pub fn new(repo: Arc<dyn CommentRepository>, recorder: Arc<dyn OperationRecorder>) -> Self {
        Self { repo, recorder }
    }

    pub async fn create(&self, input: NewComment) -> Result<Comment, RepoError> {
        self.timed("createComment", self.repo.insert(input)).await
    }

    pub async fn find_one(&self, filter: &CommentFilter) -> Result<Option<Comment>, RepoError> {
        self.timed("findComment", self.repo.find_one(filter)).await
    }

    /// All comments on a post, newest first. Never fails on an unknown slug.
    pub async fn find_all_by_post(&self, post_slug: &str) -> Result<Vec<Comment>, RepoError> {
        let filter = CommentFilter::by_post_slug(post_slug);
        self.timed("findCommentsByPostSlug", self.repo.find_many(&filter)).await
    }

    pub async fn update(
        &self,
        filter: &CommentFilter,
        patch: CommentPatch,
    ) -> Result<Option<Comment>, RepoError> {
        self.timed("updateComment", self.repo.update_one(filter, patch)).await
    }

    pub async fn delete(&self, filter: &CommentFilter) -> Result<u64, RepoError> {
        self.timed("deleteComment", self.repo.delete_one(filter)).await
    }

    async fn timed<T, F>(&self, operation: &'static str, call: F) -> Result<T, RepoError>
    where
        F: Future<Output = Result<T, RepoError>>,
    {
        let started = Instant::now();
        let result = call.await;
        let outcome = match &result {
            Ok(_) => Outcome::Success,
            Err(e) => {
                tracing::warn!(operation, error = %e, "Comment store operation failed");
                Outcome::Failure
            }
        };
        self.recorder.record(operation, outcome, started.elapsed());
        result
    }
}
