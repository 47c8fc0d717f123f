//! Comment reconciliation — keeps a single summary comment on the PR in sync with the diff.

use super::github_service::CommentApi;
use super::summary_service::{hash_marker, DIFF_COMMENT_IDENTIFIER};
use crate::error::{SchemaDiffError, SchemaDiffResult};
use crate::models::comment::{CommentOperation, IssueRef, SummaryComment};

/// Create, update, delete or leave alone the summary comment on `issue`.
///
/// An empty `body` means there is no diff. Only the first comment carrying the
/// identifier marker is considered; further duplicates are left untouched.
pub async fn upsert_comment(
    api: &dyn CommentApi,
    issue: &IssueRef,
    body: &str,
    hash: &str,
) -> SchemaDiffResult<SummaryComment> {
    let comments = api.list_comments(issue).await?;
    let existing = comments
        .into_iter()
        .find(|c| c.body_contains(DIFF_COMMENT_IDENTIFIER));
    let empty_diff = body.trim().is_empty();

    let Some(existing) = existing else {
        if empty_diff {
            return Ok(SummaryComment {
                url: None,
                operation: CommentOperation::Noop,
            });
        }

        let resp = api.create_comment(issue, body).await?;
        if !resp.is_success() {
            return Err(SchemaDiffError::CreateComment);
        }
        return Ok(SummaryComment {
            url: resp.body.map(|c| c.html_url),
            operation: CommentOperation::Created,
        });
    };

    if empty_diff {
        let resp = api.delete_comment(issue, existing.id).await?;
        if !resp.is_success() {
            return Err(SchemaDiffError::DeleteComment);
        }
        return Ok(SummaryComment {
            url: None,
            operation: CommentOperation::Deleted,
        });
    }

    if existing.body_contains(&hash_marker(hash)) {
        tracing::debug!(comment_id = existing.id, "Summary comment already up to date");
        return Ok(SummaryComment {
            url: Some(existing.html_url),
            operation: CommentOperation::Noop,
        });
    }

    let resp = api.update_comment(issue, existing.id, body).await?;
    if !resp.is_success() {
        return Err(SchemaDiffError::UpdateComment { id: existing.id });
    }
    Ok(SummaryComment {
        url: resp.body.map(|c| c.html_url),
        operation: CommentOperation::Updated,
    })
}

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;

    use super::*;
    use crate::testing::{comment, issue, CommentCall, FakeGitHub, CREATED_URL, UPDATED_URL};

    const HASH: &str = "abcd1234";
    const EXISTING_URL: &str = "http://example.com/comment";

    fn body() -> String {
        format!(
            "{DIFF_COMMENT_IDENTIFIER}\n{}\nSome diff content",
            hash_marker(HASH)
        )
    }

    fn ours(id: u64, hash: &str) -> crate::models::comment::IssueComment {
        comment(
            id,
            EXISTING_URL,
            &format!("{DIFF_COMMENT_IDENTIFIER}\n{}\nOld diff content", hash_marker(hash)),
        )
    }

    #[tokio::test]
    async fn creates_when_missing() {
        let api = FakeGitHub::new(vec![comment(1, "http://example.com/other", "LGTM")]);

        let result = upsert_comment(&api, &issue(), &body(), HASH).await.unwrap();

        assert_eq!(
            result,
            SummaryComment {
                url: Some(CREATED_URL.into()),
                operation: CommentOperation::Created,
            }
        );
        assert_eq!(api.calls(), vec![CommentCall::Create(body())]);
    }

    #[tokio::test]
    async fn noop_when_missing_and_empty() {
        let api = FakeGitHub::new(vec![]);

        let result = upsert_comment(&api, &issue(), "", "").await.unwrap();

        assert_eq!(
            result,
            SummaryComment {
                url: None,
                operation: CommentOperation::Noop,
            }
        );
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn updates_when_hash_changed() {
        let api = FakeGitHub::new(vec![ours(123, "oldhash")]);

        let result = upsert_comment(&api, &issue(), &body(), HASH).await.unwrap();

        assert_eq!(
            result,
            SummaryComment {
                url: Some(UPDATED_URL.into()),
                operation: CommentOperation::Updated,
            }
        );
        assert_eq!(api.calls(), vec![CommentCall::Update(123, body())]);
    }

    #[tokio::test]
    async fn noop_when_hash_unchanged() {
        let api = FakeGitHub::new(vec![ours(123, HASH)]);

        let result = upsert_comment(&api, &issue(), &body(), HASH).await.unwrap();

        assert_eq!(
            result,
            SummaryComment {
                url: Some(EXISTING_URL.into()),
                operation: CommentOperation::Noop,
            }
        );
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn deletes_when_diff_gone() {
        let api = FakeGitHub::new(vec![ours(123, HASH)]);

        let result = upsert_comment(&api, &issue(), "", "").await.unwrap();

        assert_eq!(
            result,
            SummaryComment {
                url: None,
                operation: CommentOperation::Deleted,
            }
        );
        assert_eq!(api.calls(), vec![CommentCall::Delete(123)]);
    }

    #[tokio::test]
    async fn first_marked_comment_wins() {
        let api = FakeGitHub::new(vec![
            comment(1, "http://example.com/1", "unrelated"),
            ours(2, "old"),
            ours(3, "older"),
        ]);

        upsert_comment(&api, &issue(), &body(), HASH).await.unwrap();

        assert_eq!(api.calls(), vec![CommentCall::Update(2, body())]);
    }

    #[tokio::test]
    async fn create_failure() {
        let api = FakeGitHub::new(vec![]).failing(StatusCode::FORBIDDEN);
        let err = upsert_comment(&api, &issue(), &body(), HASH).await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to create a comment");
    }

    #[tokio::test]
    async fn update_failure_names_comment() {
        let api = FakeGitHub::new(vec![ours(123, "old")]).failing(StatusCode::FORBIDDEN);
        let err = upsert_comment(&api, &issue(), &body(), HASH).await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to update comment 123");
    }

    #[tokio::test]
    async fn delete_failure() {
        let api = FakeGitHub::new(vec![ours(123, HASH)]).failing(StatusCode::NOT_FOUND);
        let err = upsert_comment(&api, &issue(), "  \n", "").await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to delete comment");
    }
}
