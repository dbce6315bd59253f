use crate::libshinchoku::error::{Error, Result};
use crate::libshinchoku::progress::{ProgressStore, SolveProgress};
use crate::libshinchoku::question::{Difficulty, Question, RawQuestion};
use log::{debug, info, warn};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

pub const NO_QUESTIONS_MESSAGE: &str = "No questions were found. This can happen if your session token is invalid. Use cached questions or provide a valid token.";
pub const NO_MATCHING_QUESTIONS_MESSAGE: &str = "questions were loaded, but none are in your topics of interest. Check `interested_topics` in your config file.";

/// Attribute filter for [`QuestionsManager::get_questions_by_attributes`].
/// `None` means "don't care". The default is the queue view: not skipped and
/// inside the topics of interest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionFilter {
    pub difficulty: Option<BTreeSet<Difficulty>>,
    pub solved: Option<bool>,
    pub skipped: Option<bool>,
    pub topics_match: Option<bool>,
}

impl Default for QuestionFilter {
    fn default() -> Self {
        QuestionFilter {
            difficulty: None,
            solved: None,
            skipped: Some(false),
            topics_match: Some(true),
        }
    }
}

impl QuestionFilter {
    /// Matches every question.
    pub fn any() -> Self {
        QuestionFilter {
            difficulty: None,
            solved: None,
            skipped: None,
            topics_match: None,
        }
    }

    pub fn difficulty(mut self, difficulties: impl IntoIterator<Item = Difficulty>) -> Self {
        self.difficulty = Some(difficulties.into_iter().collect());
        self
    }

    pub fn solved(mut self, solved: bool) -> Self {
        self.solved = Some(solved);
        self
    }

    pub fn skipped(mut self, skipped: bool) -> Self {
        self.skipped = Some(skipped);
        self
    }

    pub fn matches(&self, question: &Question) -> bool {
        if let Some(difficulties) = &self.difficulty {
            if !difficulties.contains(&question.difficulty) {
                return false;
            }
        }
        self.solved.map_or(true, |s| question.solved() == s)
            && self.skipped.map_or(true, |s| question.skipped() == s)
            && self.topics_match.map_or(true, |t| question.topics_match() == t)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub solved: usize,
    pub total: usize,
}

impl Tally {
    pub fn percent(&self) -> Option<f64> {
        if self.total == 0 {
            None
        } else {
            Some(100.0 * self.solved as f64 / self.total as f64)
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SolveStats {
    pub easy: Tally,
    pub medium: Tally,
    pub hard: Tally,
    pub total: Tally,
    /// Every question in the catalog, regardless of filters.
    pub catalog: usize,
}

impl SolveStats {
    pub fn report_lines(&self) -> Vec<String> {
        if self.catalog == 0 {
            return vec![NO_QUESTIONS_MESSAGE.to_string()];
        }
        if self.total.total == 0 {
            return vec![format!("{} {}", self.catalog, NO_MATCHING_QUESTIONS_MESSAGE)];
        }
        [
            ("easy", self.easy),
            ("medium", self.medium),
            ("hard", self.hard),
            ("total", self.total),
        ]
        .iter()
        .map(|(label, tally)| {
            let percent = match tally.percent() {
                Some(p) => format!("{:.2}%", p),
                None => "n/a".to_string(),
            };
            format!(
                "{}/{} ({}) {} questions solved.",
                tally.solved, tally.total, percent, label
            )
        })
        .collect()
    }
}

/// Owns the catalog and keeps it in step with the progress file.
pub struct QuestionsManager {
    questions: BTreeMap<u32, Question>,
    store: ProgressStore,
}

impl QuestionsManager {
    pub fn new(progress_path: impl Into<PathBuf>) -> Result<QuestionsManager> {
        let store = ProgressStore::open(progress_path)?;
        Ok(QuestionsManager {
            questions: BTreeMap::new(),
            store,
        })
    }

    /// Inserts (or replaces) one question per record, keyed by id, with its
    /// persisted progress already applied.
    pub fn add_questions<I>(&mut self, records: I) -> Result<usize>
    where
        I: IntoIterator<Item = RawQuestion>,
    {
        let mut added = 0;
        for record in records {
            let mut question = Question::try_from(record)?;
            apply_progress(self.store.progress(), &mut question);
            if self.questions.insert(question.id, question).is_some() {
                debug!("[Catalog] Replaced an existing question.");
            }
            added += 1;
        }
        info!(
            "[Catalog] Added {} questions ({} in catalog).",
            added,
            self.questions.len()
        );
        Ok(added)
    }

    /// Same as [`add_questions`](Self::add_questions) for untyped JSON. Anything
    /// other than an array is rejected.
    pub fn add_questions_from_value(&mut self, value: Value) -> Result<usize> {
        let items = match value {
            Value::Array(items) => items,
            other => return Err(Error::NotASequence(json_kind(&other))),
        };
        let records = items
            .into_iter()
            .map(serde_json::from_value::<RawQuestion>)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        self.add_questions(records)
    }

    pub fn get_question(&self, id: u32) -> Option<&Question> {
        self.questions.get(&id)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    #[cfg(test)]
    pub fn progress(&self) -> &SolveProgress {
        self.store.progress()
    }

    pub fn get_questions_by_attributes(&self, filter: &QuestionFilter) -> Vec<&Question> {
        self.questions
            .values()
            .filter(|q| filter.matches(q))
            .collect()
    }

    pub fn set_topics_match_by_interested_topics(&mut self, interested: &BTreeSet<String>) {
        for question in self.questions.values_mut() {
            question.update_topics_match(interested);
        }
        debug!(
            "[Catalog] {} of {} questions match {} topics of interest.",
            self.questions.values().filter(|q| q.topics_match()).count(),
            self.questions.len(),
            interested.len()
        );
    }

    /// Number of questions per topic across the whole catalog.
    pub fn topic_counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for topic in self.questions.values().flat_map(|q| q.topics.iter()) {
            *counts.entry(topic.clone()).or_insert(0) += 1;
        }
        counts
    }

    pub fn topics_match_questions(&self) -> Vec<&Question> {
        self.get_questions_by_attributes(&QuestionFilter::default())
    }

    pub fn num_topics_match_questions(&self) -> usize {
        self.topics_match_questions().len()
    }

    pub fn skipped_questions(&self) -> Vec<&Question> {
        self.get_questions_by_attributes(&QuestionFilter::default().skipped(true))
    }

    pub fn num_skipped_questions(&self) -> usize {
        self.skipped_questions().len()
    }

    pub fn unsolved_questions(&self) -> Vec<&Question> {
        self.get_questions_by_attributes(&QuestionFilter::default().solved(false))
    }

    pub fn num_unsolved_questions(&self) -> usize {
        self.unsolved_questions().len()
    }

    /// Unknown ids are ignored and reported as `false`. The question only
    /// changes after the progress file has been written.
    pub fn mark_question_as_solved(&mut self, id: u32) -> Result<bool> {
        let Some(question) = self.questions.get_mut(&id) else {
            warn!("[Progress] Question {} is not in the catalog, not marking it solved.", id);
            return Ok(false);
        };
        self.store.record_solved(id)?;
        question.mark_solved();
        debug!("[Progress] Question {} ({}) marked as solved.", id, question.title);
        Ok(true)
    }

    /// Unknown ids are ignored and reported as `false`. The question only
    /// changes after the progress file has been written.
    pub fn mark_question_as_skipped(&mut self, id: u32, reason: &str) -> Result<bool> {
        let Some(question) = self.questions.get_mut(&id) else {
            warn!("[Progress] Question {} is not in the catalog, not marking it skipped.", id);
            return Ok(false);
        };
        self.store.record_skipped(id, reason)?;
        question.mark_skipped(reason);
        debug!(
            "[Progress] Question {} ({}) marked as skipped: {}",
            id, question.title, reason
        );
        Ok(true)
    }

    /// Solved/total per difficulty over the queue view.
    pub fn solve_stats(&self) -> SolveStats {
        let tally = |difficulty: Option<Difficulty>| {
            let mut filter = QuestionFilter::default();
            if let Some(d) = difficulty {
                filter = filter.difficulty([d]);
            }
            let queue = self.get_questions_by_attributes(&filter);
            Tally {
                solved: queue.iter().filter(|q| q.solved()).count(),
                total: queue.len(),
            }
        };
        SolveStats {
            easy: tally(Some(Difficulty::Easy)),
            medium: tally(Some(Difficulty::Medium)),
            hard: tally(Some(Difficulty::Hard)),
            total: tally(None),
            catalog: self.questions.len(),
        }
    }

    /// Up to `count` unsolved queue questions, easiest first, then most
    /// frequently asked. Ties keep ascending id order.
    pub fn get_next_questions(&self, count: usize) -> Vec<&Question> {
        let mut next = self.unsolved_questions();
        next.sort_by(|a, b| {
            a.difficulty
                .rank()
                .cmp(&b.difficulty.rank())
                .then_with(|| b.freq_bar.total_cmp(&a.freq_bar))
        });
        next.truncate(count);
        next
    }
}

// Skip replays after solve, so a document listing an id in both places
// leaves it skipped.
fn apply_progress(progress: &SolveProgress, question: &mut Question) {
    if progress.is_solved(question.id) {
        question.mark_solved();
    }
    if let Some(reason) = progress.skip_reason_of(question.id) {
        question.mark_skipped(reason);
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
