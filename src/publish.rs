//! Idempotent publication of reports as review-thread comments
//!
//! A report is upserted: the first existing comment containing the report's
//! identity marker is edited in place, otherwise a new comment is created.
//! The find-then-write sequence is not atomic; a single writer per title is
//! assumed.

use crate::report::Report;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Errors raised by a comment store
#[derive(Error, Debug)]
pub enum PublishError {
    #[error("HTTP request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{method} {url} returned {status}: {body}")]
    Status {
        method: &'static str,
        url: String,
        status: u16,
        body: String,
    },

    #[error("Invalid publish target: {0}")]
    InvalidTarget(String),

    #[error("Comment {0} not found")]
    CommentNotFound(u64),
}

/// A comment on a review thread
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: u64,
    pub body: String,
}

/// What publishing did to the remote thread
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    Created { id: u64 },
    Updated { id: u64 },
}

impl PublishOutcome {
    pub fn comment_id(&self) -> u64 {
        match self {
            PublishOutcome::Created { id } | PublishOutcome::Updated { id } => *id,
        }
    }
}

/// Storage for review-thread comments
pub trait CommentStore {
    fn list_comments(&mut self) -> Result<Vec<Comment>, PublishError>;
    fn create_comment(&mut self, body: &str) -> Result<Comment, PublishError>;
    fn update_comment(&mut self, id: u64, body: &str) -> Result<Comment, PublishError>;
}

/// Create or replace the comment carrying the report's identity marker
pub fn publish<S: CommentStore + ?Sized>(
    store: &mut S,
    report: &Report,
) -> Result<PublishOutcome, PublishError> {
    let existing = store
        .list_comments()?
        .into_iter()
        .find(|c| c.body.contains(&report.id_marker));

    let outcome = match existing {
        Some(comment) => {
            let updated = store.update_comment(comment.id, &report.body)?;
            PublishOutcome::Updated { id: updated.id }
        }
        None => {
            let created = store.create_comment(&report.body)?;
            PublishOutcome::Created { id: created.id }
        }
    };

    tracing::info!("Published report {:?}: {:?}", report.title, outcome);
    Ok(outcome)
}

/// Comment store held in memory, for previews and tests
#[derive(Debug, Default, Clone)]
pub struct InMemoryCommentStore {
    comments: Vec<Comment>,
    next_id: u64,
}

impl InMemoryCommentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }
}

impl CommentStore for InMemoryCommentStore {
    fn list_comments(&mut self) -> Result<Vec<Comment>, PublishError> {
        Ok(self.comments.clone())
    }

    fn create_comment(&mut self, body: &str) -> Result<Comment, PublishError> {
        self.next_id += 1;
        let comment = Comment {
            id: self.next_id,
            body: body.to_string(),
        };
        self.comments.push(comment.clone());
        Ok(comment)
    }

    fn update_comment(&mut self, id: u64, body: &str) -> Result<Comment, PublishError> {
        let comment = self
            .comments
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(PublishError::CommentNotFound(id))?;
        comment.body = body.to_string();
        Ok(comment.clone())
    }
}

/// Where a GitHub report is posted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitHubTarget {
    /// API root, e.g. `https://api.github.com`
    pub api_url: String,
    /// `owner/name`
    pub repository: String,
    /// Pull request or issue number
    pub issue: u64,
}

impl GitHubTarget {
    pub fn new(api_url: &str, repository: &str, issue: u64) -> Result<Self, PublishError> {
        let valid_repo = matches!(
            repository.split_once('/'),
            Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/')
        );
        if !valid_repo {
            return Err(PublishError::InvalidTarget(format!(
                "repository must be owner/name, got {:?}",
                repository
            )));
        }
        if issue == 0 {
            return Err(PublishError::InvalidTarget(
                "issue number must be positive".to_string(),
            ));
        }

        Ok(Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            repository: repository.to_string(),
            issue,
        })
    }

    fn comments_url(&self) -> String {
        format!(
            "{}/repos/{}/issues/{}/comments",
            self.api_url, self.repository, self.issue
        )
    }

    fn comment_url(&self, id: u64) -> String {
        format!(
            "{}/repos/{}/issues/comments/{}",
            self.api_url, self.repository, id
        )
    }
}

const GITHUB_PAGE_SIZE: usize = 100;
const GITHUB_ACCEPT: &str = "application/vnd.github+json";

#[derive(Serialize)]
struct CommentBody<'a> {
    body: &'a str,
}

/// Comment store backed by the GitHub issues REST API
pub struct GitHubCommentStore {
    client: reqwest::blocking::Client,
    target: GitHubTarget,
    token: String,
}

impl GitHubCommentStore {
    pub fn new(target: GitHubTarget, token: String) -> Result<Self, PublishError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("benchdiff/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|source| PublishError::Http {
                url: target.api_url.clone(),
                source,
            })?;

        Ok(Self {
            client,
            target,
            token,
        })
    }

    fn send<T: DeserializeOwned>(
        &self,
        method: &'static str,
        url: &str,
        request: reqwest::blocking::RequestBuilder,
    ) -> Result<T, PublishError> {
        let http_err = |source: reqwest::Error| PublishError::Http {
            url: url.to_string(),
            source,
        };

        let response = request
            .bearer_auth(&self.token)
            .header(reqwest::header::ACCEPT, GITHUB_ACCEPT)
            .send()
            .map_err(http_err)?;

        let status = response.status();
        if !status.is_success() {
            return Err(PublishError::Status {
                method,
                url: url.to_string(),
                status: status.as_u16(),
                body: response.text().unwrap_or_default(),
            });
        }

        response.json::<T>().map_err(http_err)
    }
}

impl CommentStore for GitHubCommentStore {
    fn list_comments(&mut self) -> Result<Vec<Comment>, PublishError> {
        let url = self.target.comments_url();
        let mut comments = Vec::new();

        for page in 1.. {
            let request = self.client.get(&url).query(&[
                ("per_page", GITHUB_PAGE_SIZE.to_string()),
                ("page", page.to_string()),
            ]);
            let batch: Vec<Comment> = self.send("GET", &url, request)?;
            let last_page = batch.len() < GITHUB_PAGE_SIZE;
            comments.extend(batch);
            if last_page {
                break;
            }
        }

        tracing::debug!("Fetched {} comments from {}", comments.len(), url);
        Ok(comments)
    }

    fn create_comment(&mut self, body: &str) -> Result<Comment, PublishError> {
        let url = self.target.comments_url();
        let request = self.client.post(&url).json(&CommentBody { body });
        self.send("POST", &url, request)
    }

    fn update_comment(&mut self, id: u64, body: &str) -> Result<Comment, PublishError> {
        let url = self.target.comment_url(id);
        let request = self.client.patch(&url).json(&CommentBody { body });
        self.send("PATCH", &url, request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::id_marker;

    fn report(title: &str, body: &str) -> Report {
        let id_marker = id_marker(title);
        Report {
            title: title.to_string(),
            body: format!("{}\n{}", id_marker, body),
            id_marker,
        }
    }

    #[test]
    fn test_publish_creates_then_updates() {
        let mut store = InMemoryCommentStore::new();

        let first = publish(&mut store, &report("Perf", "v1")).unwrap();
        assert!(matches!(first, PublishOutcome::Created { .. }));

        let second = publish(&mut store, &report("Perf", "v2")).unwrap();
        assert_eq!(second, PublishOutcome::Updated { id: first.comment_id() });

        assert_eq!(store.comments().len(), 1);
        assert!(store.comments()[0].body.ends_with("v2"));
    }

    #[test]
    fn test_publish_distinct_titles_do_not_collide() {
        let mut store = InMemoryCommentStore::new();
        publish(&mut store, &report("Perf", "a")).unwrap();
        publish(&mut store, &report("Memory", "b")).unwrap();
        assert_eq!(store.comments().len(), 2);
    }

    #[test]
    fn test_publish_ignores_unrelated_comments() {
        let mut store = InMemoryCommentStore::new();
        store.create_comment("LGTM").unwrap();

        let outcome = publish(&mut store, &report("Perf", "body")).unwrap();
        assert_eq!(outcome, PublishOutcome::Created { id: 2 });
        assert_eq!(store.comments()[0].body, "LGTM");
    }

    #[test]
    fn test_update_missing_comment() {
        let mut store = InMemoryCommentStore::new();
        assert!(matches!(
            store.update_comment(42, "x"),
            Err(PublishError::CommentNotFound(42))
        ));
    }

    #[test]
    fn test_github_target_urls() {
        let target = GitHubTarget::new("https://api.github.com/", "paiml/benchdiff", 7).unwrap();
        assert_eq!(
            target.comments_url(),
            "https://api.github.com/repos/paiml/benchdiff/issues/7/comments"
        );
        assert_eq!(
            target.comment_url(99),
            "https://api.github.com/repos/paiml/benchdiff/issues/comments/99"
        );
    }

    #[test]
    fn test_github_target_validation() {
        assert!(GitHubTarget::new("https://api.github.com", "noslash", 1).is_err());
        assert!(GitHubTarget::new("https://api.github.com", "a/b/c", 1).is_err());
        assert!(GitHubTarget::new("https://api.github.com", "/b", 1).is_err());
        assert!(GitHubTarget::new("https://api.github.com", "a/b", 0).is_err());
    }

    #[test]
    fn test_github_store_reports_connection_failure() {
        // Port 9 (discard) on localhost is not expected to serve HTTP
        let target = GitHubTarget::new("http://127.0.0.1:9", "a/b", 1).unwrap();
        let mut store = GitHubCommentStore::new(target, "token".to_string()).unwrap();
        assert!(matches!(
            store.list_comments(),
            Err(PublishError::Http { .. })
        ));
    }
}
