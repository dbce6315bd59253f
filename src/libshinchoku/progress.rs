use crate::libshinchoku::error::Result;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::time::Instant;

pub const DEFAULT_SKIP_REASON: &str = "skipReasonNotProvided";

/// The on-disk progress document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolveProgress {
    pub solved_questions: Vec<u32>,
    pub skipped_questions: BTreeMap<String, Vec<u32>>,
}

impl SolveProgress {
    pub fn is_solved(&self, id: u32) -> bool {
        self.solved_questions.contains(&id)
    }

    pub fn skip_reason_of(&self, id: u32) -> Option<&str> {
        self.skipped_questions
            .iter()
            .find(|(_, ids)| ids.contains(&id))
            .map(|(reason, _)| reason.as_str())
    }

    /// Adds `id` to the solved list once and drops it from every skip list.
    pub fn record_solved(&mut self, id: u32) {
        self.forget_skip(id);
        if !self.solved_questions.contains(&id) {
            self.solved_questions.push(id);
        }
    }

    /// Files `id` under `reason` once. An id is kept under a single reason and
    /// never in the solved list at the same time.
    pub fn record_skipped(&mut self, id: u32, reason: &str) {
        self.solved_questions.retain(|&solved| solved != id);
        if self.skip_reason_of(id) == Some(reason) {
            return;
        }
        self.forget_skip(id);
        self.skipped_questions
            .entry(reason.to_string())
            .or_default()
            .push(id);
    }

    fn forget_skip(&mut self, id: u32) {
        for ids in self.skipped_questions.values_mut() {
            ids.retain(|&skipped| skipped != id);
        }
        self.skipped_questions.retain(|_, ids| !ids.is_empty());
    }
}

/// A progress document bound to the file it is read from and written to.
/// Every mutation rewrites the whole file.
#[derive(Debug)]
pub struct ProgressStore {
    path: PathBuf,
    progress: SolveProgress,
}

impl ProgressStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<ProgressStore> {
        let path = path.into();
        if path.exists() {
            info!("[Progress] Opening existing progress file {:?}", path);
            Self::load(path)
        } else {
            info!("[Progress] Progress file not found, initializing with empty state.");
            let store = ProgressStore {
                path,
                progress: SolveProgress::default(),
            };
            store.save()?;
            Ok(store)
        }
    }

    fn load(path: PathBuf) -> Result<ProgressStore> {
        let now = Instant::now();
        let content = fs::read_to_string(&path)?;
        let progress: SolveProgress = serde_json::from_str(&content)?;
        debug!(
            "[Progress] Loaded {} solved and {} skipped questions in {} ms.",
            progress.solved_questions.len(),
            progress.skipped_questions.values().map(Vec::len).sum::<usize>(),
            now.elapsed().as_millis()
        );
        Ok(ProgressStore { path, progress })
    }

    pub fn save(&self) -> Result<()> {
        self.write(&self.progress)
    }

    fn write(&self, progress: &SolveProgress) -> Result<()> {
        let now = Instant::now();
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(progress)?;
        fs::write(&self.path, json)?;
        debug!(
            "[Progress] Saved {:?} in {} ms.",
            self.path,
            now.elapsed().as_millis()
        );
        Ok(())
    }

    pub fn progress(&self) -> &SolveProgress {
        &self.progress
    }

    // The document in memory only changes once the new one is on disk.
    pub fn record_solved(&mut self, id: u32) -> Result<()> {
        let mut next = self.progress.clone();
        next.record_solved(id);
        self.write(&next)?;
        self.progress = next;
        Ok(())
    }

    pub fn record_skipped(&mut self, id: u32, reason: &str) -> Result<()> {
        let mut next = self.progress.clone();
        next.record_skipped(id, reason);
        self.write(&next)?;
        self.progress = next;
        Ok(())
    }
}
