//! Idempotent file publishing
//!
//! Makes the stored file at a path equal to the desired bytes with at most
//! one write. The current state is read inside every call; version
//! identifiers are never cached across calls.

use crate::error::Result;
use crate::traits::ContentStore;
use crate::types::{Committer, CommitDescriptor, PublishOutcome, RepoCoordinates};

/// Publishes artifacts to one repository through a [`ContentStore`]
pub struct ContentPublisher<'s, S> {
    store: &'s S,
    repo: &'s RepoCoordinates,
    committer: Committer<'s>,
}

impl<'s, S: ContentStore> ContentPublisher<'s, S> {
    /// Create a publisher committing as the GitHub Actions bot
    pub fn new(store: &'s S, repo: &'s RepoCoordinates) -> Self {
        Self {
            store,
            repo,
            committer: Committer::ACTIONS_BOT,
        }
    }

    /// Use a different committer identity
    pub fn with_committer(mut self, committer: Committer<'s>) -> Self {
        self.committer = committer;
        self
    }

    /// Ensure `path` holds exactly `payload`.
    ///
    /// Any read failure counts as "file absent": the write then goes out
    /// without a version identifier, and the backend rejects it if the file
    /// does exist. Write failures propagate.
    pub async fn publish(&self, path: &str, message: &str, payload: &[u8]) -> Result<PublishOutcome> {
        let existing = match self.store.get_content(self.repo, path).await {
            Ok(existing) => existing,
            Err(err) => {
                tracing::warn!(path, error = %err, "could not read existing file, treating as absent");
                None
            }
        };

        let previous_sha = match existing {
            Some(file) if file.content == payload => {
                tracing::info!("no change detected for {}", path);
                return Ok(PublishOutcome::Unchanged);
            }
            Some(file) => Some(file.sha),
            None => None,
        };

        let commit = CommitDescriptor {
            repo: self.repo,
            path,
            message,
            content: payload,
            sha: previous_sha.as_deref(),
            committer: self.committer,
        };

        let receipt = self.store.create_or_update_file_contents(&commit).await?;

        Ok(match previous_sha {
            Some(previous_sha) => PublishOutcome::Updated {
                previous_sha,
                sha: receipt.sha,
            },
            None => PublishOutcome::Created { sha: receipt.sha },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::memory::MemoryStore;
    use assert_matches::assert_matches;

    fn repo() -> RepoCoordinates {
        RepoCoordinates::new("octo", "reports")
    }

    #[tokio::test]
    async fn test_absent_file_written_without_sha() {
        let store = MemoryStore::new();
        let repo = repo();
        let publisher = ContentPublisher::new(&store, &repo);

        let outcome = publisher.publish("out.csv", "msg", b"a,b\n").await.unwrap();

        assert_matches!(outcome, PublishOutcome::Created { .. });
        let writes = store.writes();
        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0].sha, None);
        assert_eq!(writes[0].content, b"a,b\n");
        assert_eq!(writes[0].committer, "github-actions[bot]");
    }

    #[tokio::test]
    async fn test_identical_content_is_noop() {
        let store = MemoryStore::new().with_file("out.csv", "a,b\n");
        let repo = repo();
        let publisher = ContentPublisher::new(&store, &repo);

        let outcome = publisher.publish("out.csv", "msg", b"a,b\n").await.unwrap();

        assert_eq!(outcome, PublishOutcome::Unchanged);
        assert!(!outcome.wrote());
        assert_eq!(store.write_count(), 0);
        assert_eq!(store.read_count(), 1);
    }

    #[tokio::test]
    async fn test_changed_content_carries_current_sha() {
        let store = MemoryStore::new();
        let sha = store.insert("out.csv", "a,b\n");
        let repo = repo();
        let publisher = ContentPublisher::new(&store, &repo);

        let outcome = publisher.publish("out.csv", "msg", b"a,c\n").await.unwrap();

        assert_matches!(outcome, PublishOutcome::Updated { ref previous_sha, .. } if *previous_sha == sha);
        assert_eq!(store.writes()[0].sha.as_deref(), Some(sha.as_str()));
        assert_eq!(store.file("out.csv").unwrap().content, b"a,c\n");
    }

    #[tokio::test]
    async fn test_trailing_newline_difference_triggers_write() {
        let store = MemoryStore::new().with_file("out.md", "| a |");
        let repo = repo();
        let publisher = ContentPublisher::new(&store, &repo);

        let outcome = publisher.publish("out.md", "msg", b"| a |\n").await.unwrap();

        assert!(outcome.wrote());
        assert_eq!(store.write_count(), 1);
    }

    #[tokio::test]
    async fn test_read_error_treated_as_absent() {
        let store = MemoryStore::new();
        store.fail_reads("502 Bad Gateway");
        let repo = repo();
        let publisher = ContentPublisher::new(&store, &repo);

        let outcome = publisher.publish("out.csv", "msg", b"x").await.unwrap();

        assert_matches!(outcome, PublishOutcome::Created { .. });
        assert_eq!(store.writes()[0].sha, None);
    }

    #[tokio::test]
    async fn test_read_error_on_existing_file_surfaces_backend_conflict() {
        let store = MemoryStore::new().with_file("out.csv", "old");
        store.fail_reads("502 Bad Gateway");
        let repo = repo();
        let publisher = ContentPublisher::new(&store, &repo);

        let result = publisher.publish("out.csv", "msg", b"new").await;

        assert_matches!(result, Err(Error::Conflict(_)));
        assert_eq!(store.write_count(), 0);
    }

    #[tokio::test]
    async fn test_write_error_propagates() {
        let store = MemoryStore::new();
        store.fail_writes_to("out.csv");
        let repo = repo();
        let publisher = ContentPublisher::new(&store, &repo);

        let result = publisher.publish("out.csv", "msg", b"x").await;

        assert_matches!(result, Err(Error::Http(_)));
    }

    #[tokio::test]
    async fn test_custom_committer() {
        let store = MemoryStore::new();
        let repo = repo();
        let publisher = ContentPublisher::new(&store, &repo).with_committer(Committer {
            name: "report-bot",
            email: "bot@example.com",
        });

        publisher.publish("out.csv", "msg", b"x").await.unwrap();

        assert_eq!(store.writes()[0].committer, "report-bot");
    }
}
