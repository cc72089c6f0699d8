use futures::stream::{self, StreamExt};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::config::ScanConfig;
use crate::edge_lines::{EdgeReadLimits, read_edge_lines};
use crate::fs::{DirEntry, FileSystem};
use crate::project::normalize_project_name;
use crate::timestamp::extract_timestamp;
use crate::types::{Session, SkipReason};

/// A transcript file found during discovery, tagged with its project label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub path: PathBuf,
    pub project: String,
}

/// Walks `<root>/projects/<encoded-project>/...` and turns transcripts into sessions.
pub struct SessionScanner<F> {
    fs: F,
    config: ScanConfig,
}

impl<F: FileSystem> SessionScanner<F> {
    pub fn new(fs: F, config: ScanConfig) -> Self {
        Self { fs, config }
    }

    /// All valid sessions under `root`, ordered by start time.
    ///
    /// Directories that can't be listed contribute nothing; a missing root
    /// yields an empty list.
    pub async fn scan(&self, root: &Path) -> Vec<Session> {
        let candidates = self.discover(root).await;
        info!(files = candidates.len(), root = %root.display(), "discovered transcripts");

        let mut sessions: Vec<Session> = stream::iter(candidates)
            .map(|candidate| async move {
                let result = self.scan_file(&candidate.path, &candidate.project).await;
                if let Err(reason) = result {
                    debug!(path = %candidate.path.display(), ?reason, "skipping transcript");
                }
                result.ok()
            })
            .buffer_unordered(self.config.max_concurrent_reads.max(1))
            .filter_map(|session| async move { session })
            .collect()
            .await;

        sessions.sort_by(|a, b| {
            a.start()
                .cmp(&b.start())
                .then_with(|| a.end().cmp(&b.end()))
                .then_with(|| a.project().cmp(b.project()))
        });
        info!(
            sessions = sessions.len(),
            bytes = sessions.iter().map(Session::size_bytes).sum::<u64>(),
            "scan complete"
        );
        sessions
    }

    /// Find transcript files: directly inside each project directory, inside
    /// each of its subdirectories, and inside `<subdirectory>/subagents/`.
    pub async fn discover(&self, root: &Path) -> Vec<Candidate> {
        let projects_dir = root.join("projects");
        let mut candidates = Vec::new();

        for project_dir in self.list_or_empty(&projects_dir).await {
            if !project_dir.is_dir {
                continue;
            }
            let Some(dir_name) = project_dir.path.file_name().map(|n| n.to_string_lossy()) else {
                continue;
            };
            let project = normalize_project_name(&dir_name);

            for entry in self.list_or_empty(&project_dir.path).await {
                if entry.is_dir {
                    for nested in [entry.path.clone(), entry.path.join("subagents")] {
                        self.collect_transcripts(&nested, &project, &mut candidates)
                            .await;
                    }
                } else if self.is_transcript(&entry.path) {
                    candidates.push(Candidate {
                        path: entry.path,
                        project: project.clone(),
                    });
                }
            }
        }

        candidates
    }

    /// Turn one transcript file into a session, or say why it can't be one.
    pub async fn scan_file(&self, path: &Path, project: &str) -> Result<Session, SkipReason> {
        let size = self
            .fs
            .file_size(path)
            .await
            .map_err(|_| SkipReason::Unreadable)?;
        if size < self.config.min_file_bytes {
            return Err(SkipReason::TooSmall);
        }

        let limits = EdgeReadLimits {
            head_bytes: self.config.head_bytes,
            tail_bytes: self.config.tail_bytes,
        };
        let lines = read_edge_lines(&self.fs, path, limits)
            .await
            .map_err(|_| SkipReason::Unreadable)?
            .ok_or(SkipReason::Empty)?;

        let start = extract_timestamp(&lines.first).ok_or(SkipReason::MissingTimestamp)?;
        let end = extract_timestamp(&lines.last).ok_or(SkipReason::MissingTimestamp)?;

        Session::new(project, start, end, size, self.config.max_session_hours)
    }

    async fn collect_transcripts(&self, dir: &Path, project: &str, out: &mut Vec<Candidate>) {
        for entry in self.list_or_empty(dir).await {
            if !entry.is_dir && self.is_transcript(&entry.path) {
                out.push(Candidate {
                    path: entry.path,
                    project: project.to_string(),
                });
            }
        }
    }

    async fn list_or_empty(&self, dir: &Path) -> Vec<DirEntry> {
        match self.fs.list_dir(dir).await {
            Ok(entries) => entries,
            Err(e) => {
                debug!(dir = %dir.display(), error = %e, "cannot list directory");
                Vec::new()
            }
        }
    }

    fn is_transcript(&self, path: &Path) -> bool {
        path.extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case(self.config.extension.as_str()))
    }
}
