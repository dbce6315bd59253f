use crate::libshinchoku::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

const PROBLEM_URL_BASE: &str = "https://leetcode.com/problems";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Sort rank used when recommending questions, easiest first.
    pub fn rank(self) -> u8 {
        match self {
            Difficulty::Easy => 0,
            Difficulty::Medium => 1,
            Difficulty::Hard => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(Error::UnknownDifficulty(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicTag {
    pub name: String,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub slug: String,
}

/// One catalog record exactly as the upstream question list returns it.
/// Keys that are not listed here are ignored when deserializing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawQuestion {
    pub ac_rate: f64,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub freq_bar: Option<f64>,
    pub frontend_question_id: String,
    #[serde(default)]
    pub is_favor: bool,
    #[serde(default)]
    pub paid_only: bool,
    #[serde(default)]
    pub status: Option<String>,
    pub title: String,
    pub title_slug: String,
    #[serde(default)]
    pub topic_tags: Option<Vec<TopicTag>>,
    #[serde(default)]
    pub has_solution: bool,
    #[serde(default)]
    pub has_video_solution: bool,
}

#[derive(Debug, Clone)]
pub struct Question {
    pub id: u32,
    pub title: String,
    pub title_slug: String,
    pub difficulty: Difficulty,
    pub ac_rate: f64,
    pub freq_bar: f64,
    pub is_favor: bool,
    pub paid_only: bool,
    pub status: Option<String>,
    pub topics: BTreeSet<String>,
    pub has_solution: bool,
    pub has_video_solution: bool,

    solved: bool,
    skipped: bool,
    skip_reason: Option<String>,
    topics_match: bool,
}

impl TryFrom<RawQuestion> for Question {
    type Error = Error;

    fn try_from(raw: RawQuestion) -> Result<Self> {
        let id = raw
            .frontend_question_id
            .trim()
            .parse::<u32>()
            .map_err(|_| Error::InvalidQuestionId(raw.frontend_question_id.clone()))?;
        let topics = raw
            .topic_tags
            .unwrap_or_default()
            .into_iter()
            .map(|tag| tag.name)
            .collect();

        Ok(Question {
            id,
            title: raw.title,
            title_slug: raw.title_slug,
            difficulty: raw.difficulty,
            ac_rate: raw.ac_rate,
            freq_bar: raw.freq_bar.unwrap_or(0.0),
            is_favor: raw.is_favor,
            paid_only: raw.paid_only,
            status: raw.status,
            topics,
            has_solution: raw.has_solution,
            has_video_solution: raw.has_video_solution,
            solved: false,
            skipped: false,
            skip_reason: None,
            topics_match: false,
        })
    }
}

impl Question {
    pub fn url(&self) -> String {
        format!("{}/{}/description", PROBLEM_URL_BASE, self.title_slug)
    }

    pub fn solved(&self) -> bool {
        self.solved
    }

    pub fn skipped(&self) -> bool {
        self.skipped
    }

    pub fn skip_reason(&self) -> Option<&str> {
        self.skip_reason.as_deref()
    }

    pub fn topics_match(&self) -> bool {
        self.topics_match
    }

    /// `topics_match` holds when every topic of this question is in `interested`.
    /// A question without topics always matches.
    pub(crate) fn update_topics_match(&mut self, interested: &BTreeSet<String>) {
        self.topics_match = self.topics.is_subset(interested);
    }

    pub fn mark_solved(&mut self) {
        self.solved = true;
        self.skipped = false;
        self.skip_reason = None;
    }

    // Solved and skipped are mutually exclusive: skipping clears `solved`.
    pub fn mark_skipped(&mut self, reason: impl Into<String>) {
        self.solved = false;
        self.skipped = true;
        self.skip_reason = Some(reason.into());
    }
}

impl fmt::Display for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}. \t ({}) ({:.2}%) \t {} {}",
            self.id,
            self.difficulty,
            self.freq_bar,
            self.title,
            self.url()
        )
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn raw(id: &str, difficulty: Difficulty, freq_bar: Option<f64>, topics: &[&str]) -> RawQuestion {
        RawQuestion {
            ac_rate: 50.0,
            difficulty,
            freq_bar,
            frontend_question_id: id.to_string(),
            is_favor: false,
            paid_only: false,
            status: None,
            title: format!("Question {id}"),
            title_slug: format!("question-{id}"),
            topic_tags: Some(
                topics
                    .iter()
                    .map(|name| TopicTag {
                        name: name.to_string(),
                        id: String::new(),
                        slug: name.to_lowercase().replace(' ', "-"),
                    })
                    .collect(),
            ),
            has_solution: true,
            has_video_solution: false,
        }
    }

    const TWO_SUM: &str = r#"{
        "acRate": 53.28040678700701,
        "difficulty": "Easy",
        "freqBar": 42.03560515655977,
        "frontendQuestionId": "1",
        "isFavor": false,
        "paidOnly": false,
        "status": "ac",
        "title": "Two Sum",
        "titleSlug": "two-sum",
        "topicTags": [
            {"name": "Array", "id": "VG9waWNUYWdOb2RlOjU=", "slug": "array"},
            {"name": "Hash Table", "id": "VG9waWNUYWdOb2RlOjY=", "slug": "hash-table"}
        ],
        "hasSolution": true,
        "hasVideoSolution": true,
        "somethingNew": [1, 2, 3]
    }"#;

    #[test]
    fn builds_from_upstream_record() {
        let raw: RawQuestion = serde_json::from_str(TWO_SUM).unwrap();
        let q = Question::try_from(raw).unwrap();

        assert_eq!(q.id, 1);
        assert_eq!(q.title, "Two Sum");
        assert_eq!(q.difficulty, Difficulty::Easy);
        assert_eq!(q.status.as_deref(), Some("ac"));
        assert_eq!(q.url(), "https://leetcode.com/problems/two-sum/description");
        assert_eq!(
            q.topics,
            BTreeSet::from(["Array".to_string(), "Hash Table".to_string()])
        );
        assert!(!q.solved() && !q.skipped() && !q.topics_match());
        assert_eq!(q.skip_reason(), None);
    }

    #[test]
    fn id_is_parsed_as_integer() {
        for id in ["1", "42", "2999"] {
            let q = Question::try_from(raw(id, Difficulty::Medium, None, &[])).unwrap();
            assert_eq!(q.id, id.parse::<u32>().unwrap());
        }
    }

    #[test]
    fn non_numeric_id_is_rejected() {
        let err = Question::try_from(raw("LCP 01", Difficulty::Easy, None, &[])).unwrap_err();
        assert!(matches!(err, Error::InvalidQuestionId(id) if id == "LCP 01"));
    }

    #[test]
    fn null_frequency_defaults_to_zero() {
        let json = TWO_SUM.replace("42.03560515655977", "null");
        let raw: RawQuestion = serde_json::from_str(&json).unwrap();
        assert_eq!(raw.freq_bar, None);
        assert_eq!(Question::try_from(raw).unwrap().freq_bar, 0.0);
    }

    #[test]
    fn missing_topic_tags_give_empty_topics() {
        let mut r = raw("7", Difficulty::Hard, Some(3.0), &[]);
        r.topic_tags = None;
        let q = Question::try_from(r).unwrap();
        assert!(q.topics.is_empty());
    }

    #[test]
    fn solving_clears_skip() {
        let mut q = Question::try_from(raw("3", Difficulty::Easy, None, &[])).unwrap();
        q.mark_skipped("too long");
        assert_eq!(q.skip_reason(), Some("too long"));
        q.mark_solved();
        q.mark_solved();
        assert!(q.solved());
        assert!(!q.skipped());
        assert_eq!(q.skip_reason(), None);
    }

    #[test]
    fn skipping_a_solved_question_clears_solved() {
        let mut q = Question::try_from(raw("3", Difficulty::Easy, None, &[])).unwrap();
        q.mark_solved();
        q.mark_skipped("revisit");
        assert!(q.skipped());
        assert!(!q.solved());
        assert_eq!(q.skip_reason(), Some("revisit"));
    }

    #[test]
    fn topics_match_requires_subset() {
        let interested = BTreeSet::from(["Array".to_string()]);
        let mut both = Question::try_from(raw("1", Difficulty::Easy, None, &["Array", "Hash Table"])).unwrap();
        let mut array = Question::try_from(raw("2", Difficulty::Easy, None, &["Array"])).unwrap();
        let mut none = Question::try_from(raw("3", Difficulty::Easy, None, &[])).unwrap();

        both.update_topics_match(&interested);
        array.update_topics_match(&interested);
        none.update_topics_match(&interested);

        assert!(!both.topics_match());
        assert!(array.topics_match());
        assert!(none.topics_match());
    }

    #[test]
    fn difficulty_parses_case_insensitively() {
        assert_eq!("easy".parse::<Difficulty>().unwrap(), Difficulty::Easy);
        assert_eq!(" HARD ".parse::<Difficulty>().unwrap(), Difficulty::Hard);
        assert!("extreme".parse::<Difficulty>().is_err());
        assert!(Difficulty::Easy.rank() < Difficulty::Medium.rank());
        assert!(Difficulty::Medium.rank() < Difficulty::Hard.rank());
    }

    #[test]
    fn display_is_one_console_line() {
        let q = Question::try_from(raw("9", Difficulty::Medium, Some(12.5), &[])).unwrap();
        assert_eq!(
            q.to_string(),
            "9. \t (Medium) (12.50%) \t Question 9 https://leetcode.com/problems/question-9/description"
        );
    }
}
