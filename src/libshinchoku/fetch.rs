//! Fetching the question catalog from LeetCode's GraphQL endpoint and caching
//! it per company selection under the questions directory.
//!
//! The catalog is handled as raw JSON here; turning it into questions is the
//! manager's job.

use crate::libshinchoku::error::{Error, Result};
use log::{debug, info, warn};
use reqwest::header::{COOKIE, REFERER, USER_AGENT};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

const GRAPHQL_URL: &str = "https://leetcode.com/graphql/";
const CATEGORY_SLUG: &str = "all-code-essentials";
const QUESTION_LIMIT: u32 = 10000;

const QUESTION_LIST_QUERY: &str = r#"
query problemsetQuestionList($categorySlug: String, $limit: Int, $skip: Int, $filters: QuestionListFilterInput) {
  problemsetQuestionList: questionList(
    categorySlug: $categorySlug
    limit: $limit
    skip: $skip
    filters: $filters
  ) {
    total: totalNum
    questions: data {
      acRate
      difficulty
      freqBar
      frontendQuestionId: questionFrontendId
      isFavor
      paidOnly: isPaidOnly
      status
      title
      titleSlug
      topicTags {
        name
        id
        slug
      }
      hasSolution
      hasVideoSolution
    }
  }
}
"#;

#[derive(Debug, Serialize)]
struct GraphQlRequest<'a> {
    query: &'a str,
    variables: Variables<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Variables<'a> {
    category_slug: &'a str,
    skip: u32,
    limit: u32,
    filters: Filters<'a>,
}

#[derive(Debug, Serialize)]
struct Filters<'a> {
    companies: &'a [String],
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    data: Option<ResponseData>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponseData {
    problemset_question_list: Option<QuestionList>,
}

#[derive(Debug, Deserialize)]
struct QuestionList {
    questions: Value,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

fn request_body(companies: &[String]) -> GraphQlRequest<'_> {
    GraphQlRequest {
        query: QUESTION_LIST_QUERY,
        variables: Variables {
            category_slug: CATEGORY_SLUG,
            skip: 0,
            limit: QUESTION_LIMIT,
            filters: Filters { companies },
        },
    }
}

/// Pulls `data.problemsetQuestionList.questions` out of a response body.
fn extract_questions(body: &str) -> Result<Value> {
    let response: GraphQlResponse = serde_json::from_str(body)?;
    if !response.errors.is_empty() {
        let messages: Vec<&str> = response.errors.iter().map(|e| e.message.as_str()).collect();
        return Err(Error::UnexpectedResponse(messages.join("; ")));
    }
    response
        .data
        .and_then(|data| data.problemset_question_list)
        .map(|list| list.questions)
        .ok_or_else(|| Error::UnexpectedResponse("missing problemsetQuestionList".to_string()))
}

fn trunc_for_log(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

pub struct CatalogSource {
    questions_dir: PathBuf,
}

impl CatalogSource {
    pub fn new(questions_dir: impl Into<PathBuf>) -> CatalogSource {
        CatalogSource {
            questions_dir: questions_dir.into(),
        }
    }

    /// `{dir}/{company&company...}.json`, or `{dir}/all.json` with no companies.
    pub fn cache_file(&self, companies: &[String]) -> PathBuf {
        let name = if companies.is_empty() {
            "all".to_string()
        } else {
            companies.join("&")
        };
        self.questions_dir.join(format!("{}.json", name))
    }

    /// A missing cache is not an error, it just means there is nothing local.
    pub fn load_cached(&self, companies: &[String]) -> Result<Option<Value>> {
        let path = self.cache_file(companies);
        if !path.exists() {
            warn!("[Fetch] {:?} not found in questions directory.", path);
            return Ok(None);
        }
        let content = fs::read_to_string(&path)?;
        let questions: Value = serde_json::from_str(&content)?;
        info!("[Fetch] Loaded cached questions from {:?}", path);
        Ok(Some(questions))
    }

    /// Downloads the catalog for `companies` and overwrites the cache with it.
    pub fn fetch_remote(&self, companies: &[String], session_token: &str) -> Result<Value> {
        let now = Instant::now();
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()?;
        let res = client
            .post(GRAPHQL_URL)
            .header(COOKIE, format!("LEETCODE_SESSION={}", session_token))
            .header(REFERER, "https://leetcode.com/problemset/")
            .header(USER_AGENT, concat!("shinchoku/", env!("CARGO_PKG_VERSION")))
            .json(&request_body(companies))
            .send()?;

        let status = res.status();
        let body = res.text()?;
        if !status.is_success() {
            return Err(Error::UnexpectedResponse(format!(
                "HTTP {}: {}",
                status,
                trunc_for_log(&body, 200)
            )));
        }
        debug!(
            "[Fetch] Received {} bytes in {} ms.",
            body.len(),
            now.elapsed().as_millis()
        );

        let questions = extract_questions(&body)?;
        self.write_cache(companies, &questions)?;
        Ok(questions)
    }

    fn write_cache(&self, companies: &[String], questions: &Value) -> Result<()> {
        fs::create_dir_all(&self.questions_dir)?;
        let path = self.cache_file(companies);
        fs::write(&path, serde_json::to_string(questions)?)?;
        info!("[Fetch] Cached questions to {:?}", path);
        Ok(())
    }

    /// Fetches fresh when `scrape_new` is set (which needs a session token),
    /// otherwise reads the cache.
    pub fn get_questions(
        &self,
        companies: &[String],
        scrape_new: bool,
        session_token: Option<&str>,
    ) -> Result<Option<Value>> {
        if scrape_new {
            let token = session_token.ok_or(Error::MissingSessionToken)?;
            self.fetch_remote(companies, token).map(Some)
        } else {
            self.load_cached(companies)
        }
    }
}
