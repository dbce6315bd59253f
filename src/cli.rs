use crate::libshinchoku::error::Result;
use crate::libshinchoku::manager::{QuestionFilter, QuestionsManager};
use crate::libshinchoku::progress::DEFAULT_SKIP_REASON;
use crate::libshinchoku::question::{Difficulty, Question};
use colored::{ColoredString, Colorize};
use log::debug;
use std::collections::BTreeSet;
use std::io::{self, Write};
use std::path::Path;
use text_io::read;

#[derive(Debug, PartialEq)]
enum Choice {
    Solved,
    Skip(String),
    Next,
    Quit,
}

impl Choice {
    fn from_str(input: &str) -> Choice {
        match input.trim() {
            "q" => Choice::Quit,
            "s" => Choice::Solved,
            "k" => Choice::Skip(DEFAULT_SKIP_REASON.to_string()),
            input => match input.strip_prefix("k ") {
                Some(reason) => Choice::Skip(reason.trim().to_string()),
                None => Choice::Next,
            },
        }
    }
}

fn print_divider(text: &str) {
    println!("\n{}", text.cyan().bold());
    println!("{}\n", "-".repeat(text.chars().count()).cyan());
}

fn colored_difficulty(difficulty: Difficulty) -> ColoredString {
    match difficulty {
        Difficulty::Easy => difficulty.as_str().bright_green(),
        Difficulty::Medium => difficulty.as_str().yellow(),
        Difficulty::Hard => difficulty.as_str().bright_red(),
    }
}

fn question_line(question: &Question) -> String {
    format!(
        "{}. \t ({}) ({:.2}%) \t {} {}",
        question.id.to_string().bold(),
        colored_difficulty(question.difficulty),
        question.freq_bar,
        question.title,
        question.url().dimmed()
    )
}

/// Catalog attributes that only `list` shows.
fn question_details(question: &Question) -> String {
    let mut details = vec![format!("acceptance {:.1}%", question.ac_rate)];
    if question.paid_only {
        details.push("premium".to_string());
    }
    if question.is_favor {
        details.push("favorite".to_string());
    }
    if let Some(status) = &question.status {
        details.push(format!("status {}", status));
    }
    if question.has_solution {
        details.push("solution".to_string());
    }
    if question.has_video_solution {
        details.push("video solution".to_string());
    }
    details.join(", ")
}

/// Flags left out of `list` don't constrain it, except that questions outside
/// the topics of interest are hidden unless `all_topics` is set.
pub fn list_filter(
    difficulty: Vec<Difficulty>,
    solved: Option<bool>,
    skipped: Option<bool>,
    all_topics: bool,
) -> QuestionFilter {
    QuestionFilter {
        difficulty: (!difficulty.is_empty()).then(|| difficulty.into_iter().collect()),
        solved,
        skipped,
        topics_match: (!all_topics).then_some(true),
    }
}

/// Explains an empty queue caused by the config rather than by progress.
fn interest_notice(config: &Path, interested: &BTreeSet<String>) -> Option<String> {
    if !config.exists() {
        Some(format!(
            "{:?} not found, so no topics of interest are set and the queue is empty. Add `interested_topics = [..]` to it.",
            config
        ))
    } else if interested.is_empty() {
        Some(format!(
            "{:?} sets no `interested_topics`, so the queue is empty.",
            config
        ))
    } else {
        None
    }
}

pub fn print_interest_notice(config: &Path, interested: &BTreeSet<String>) {
    if let Some(notice) = interest_notice(config, interested) {
        println!("{}", notice.yellow());
    }
}

pub fn print_next(manager: &QuestionsManager, count: usize) {
    print_divider(&format!("Next {} questions", count));
    let next = manager.get_next_questions(count);
    if next.is_empty() {
        println!("{}", "Nothing left in the queue!".yellow());
    }
    for question in next {
        println!("{}", question_line(question));
    }
}

pub fn print_list(manager: &QuestionsManager, filter: &QuestionFilter) {
    let questions = manager.get_questions_by_attributes(filter);
    print_divider(&format!("{} matching questions", questions.len()));
    for question in questions {
        let line = format!(
            "{} {}",
            question_line(question),
            format!("({})", question_details(question)).dimmed()
        );
        match question.skip_reason() {
            Some(reason) => println!("{} {}", line, format!("[skipped: {}]", reason).yellow()),
            None if question.solved() => println!("{} {}", line, "[solved]".green()),
            None => println!("{}", line),
        }
    }
}

pub fn print_stats(manager: &QuestionsManager) {
    print_divider("Solve stats");
    for line in manager.solve_stats().report_lines() {
        println!("{}", line);
    }
    println!(
        "{} unsolved, {} skipped, {} of {} questions in topics of interest.",
        manager.num_unsolved_questions(),
        manager.num_skipped_questions(),
        manager.num_topics_match_questions(),
        manager.len()
    );
}

pub fn print_topics(manager: &QuestionsManager, interested: &BTreeSet<String>) {
    print_divider("Topics");
    let mut counts: Vec<(String, usize)> = manager.topic_counts().into_iter().collect();
    counts.sort_by(|(a_name, a_count), (b_name, b_count)| {
        b_count.cmp(a_count).then_with(|| a_name.cmp(b_name))
    });
    for (topic, count) in counts {
        if interested.contains(&topic) {
            println!("{:>5} {} {}", count, "*".green(), topic.green());
        } else {
            println!("{:>5}   {}", count, topic);
        }
    }
}

pub fn mark_solved(manager: &mut QuestionsManager, ids: &[u32]) -> Result<()> {
    for &id in ids {
        if manager.mark_question_as_solved(id)? {
            println!("{}", format!("Question {} marked as solved.", id).bright_green());
        } else {
            println!("{}", format!("Question {} is not in the catalog.", id).yellow());
        }
    }
    Ok(())
}

pub fn mark_skipped(manager: &mut QuestionsManager, ids: &[u32], reason: &str) -> Result<()> {
    for &id in ids {
        if manager.mark_question_as_skipped(id, reason)? {
            println!(
                "{}",
                format!("Question {} skipped ({}).", id, reason).bright_yellow()
            );
        } else {
            println!("{}", format!("Question {} is not in the catalog.", id).yellow());
        }
    }
    Ok(())
}

pub fn review_loop(manager: &mut QuestionsManager, count: usize) -> Result<()> {
    let queue: Vec<u32> = manager
        .get_next_questions(count)
        .iter()
        .map(|q| q.id)
        .collect();
    if queue.is_empty() {
        println!("{}", "Nothing left in the queue!".yellow());
        return Ok(());
    }

    for (idx, id) in queue.iter().enumerate() {
        let Some(question) = manager.get_question(*id) else {
            continue;
        };
        let leading = format!("{}/{}. ", idx + 1, queue.len());
        println!("{}{}", leading.cyan(), question_line(question));

        print!(
            "{} ",
            "(s = solved, k [reason] = skip, q = quit, anything else = next):".cyan()
        );
        io::stdout().flush()?;
        let input: String = read!("{}\n");
        let choice = Choice::from_str(&input);
        debug!("choice: {:?}", choice);

        match choice {
            Choice::Solved => mark_solved(manager, &[*id])?,
            Choice::Skip(reason) => mark_skipped(manager, &[*id], &reason)?,
            Choice::Next => {}
            Choice::Quit => {
                println!("{}", "Quitting Early!".cyan());
                return Ok(());
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libshinchoku::question::tests::raw;
    use crate::libshinchoku::testutil::TempPath;
    use std::fs;

    fn topics(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn list_flags_left_out_do_not_filter() {
        let filter = list_filter(vec![], None, None, false);
        assert_eq!(filter.solved, None);
        assert_eq!(filter.skipped, None);
        assert_eq!(filter.difficulty, None);
        assert_eq!(filter.topics_match, Some(true));

        let filter = list_filter(vec![Difficulty::Hard], Some(false), Some(true), true);
        assert_eq!(filter.difficulty, Some([Difficulty::Hard].into_iter().collect()));
        assert_eq!(filter.solved, Some(false));
        assert_eq!(filter.skipped, Some(true));
        assert_eq!(filter.topics_match, None);
    }

    #[test]
    fn list_without_flags_includes_skipped_questions() {
        let tmp = TempPath::new("cli-list");
        let mut manager = QuestionsManager::new(tmp.path()).unwrap();
        manager
            .add_questions(vec![
                raw("1", Difficulty::Easy, Some(1.0), &["Array"]),
                raw("2", Difficulty::Easy, Some(2.0), &["Array"]),
            ])
            .unwrap();
        manager.set_topics_match_by_interested_topics(&topics(&["Array"]));
        manager.mark_question_as_skipped(2, "later").unwrap();

        let listed = manager.get_questions_by_attributes(&list_filter(vec![], None, None, false));
        assert_eq!(listed.iter().map(|q| q.id).collect::<Vec<_>>(), vec![1, 2]);

        let listed =
            manager.get_questions_by_attributes(&list_filter(vec![], None, Some(false), false));
        assert_eq!(listed.iter().map(|q| q.id).collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn details_show_catalog_attributes() {
        let mut record = raw("5", Difficulty::Medium, None, &[]);
        record.ac_rate = 53.28;
        record.paid_only = true;
        record.status = Some("ac".to_string());
        record.has_video_solution = true;
        let question = Question::try_from(record).unwrap();
        assert_eq!(
            question_details(&question),
            "acceptance 53.3%, premium, status ac, solution, video solution"
        );

        let mut record = raw("6", Difficulty::Easy, None, &[]);
        record.is_favor = true;
        record.has_solution = false;
        let question = Question::try_from(record).unwrap();
        assert_eq!(question_details(&question), "acceptance 50.0%, favorite");
    }

    #[test]
    fn empty_interest_set_is_explained() {
        let tmp = TempPath::new("cli-config");
        let notice = interest_notice(tmp.path(), &BTreeSet::new()).unwrap();
        assert!(notice.contains("not found"));

        fs::write(tmp.path(), "").unwrap();
        let notice = interest_notice(tmp.path(), &BTreeSet::new()).unwrap();
        assert!(notice.contains("sets no `interested_topics`"));

        assert_eq!(interest_notice(tmp.path(), &topics(&["Array"])), None);
    }

    #[test]
    fn parses_review_choices() {
        assert_eq!(Choice::from_str("q"), Choice::Quit);
        assert_eq!(Choice::from_str("s\n"), Choice::Solved);
        assert_eq!(
            Choice::from_str("k"),
            Choice::Skip(DEFAULT_SKIP_REASON.to_string())
        );
        assert_eq!(
            Choice::from_str("k too hard for now"),
            Choice::Skip("too hard for now".to_string())
        );
        assert_eq!(Choice::from_str(""), Choice::Next);
        assert_eq!(Choice::from_str("keep going"), Choice::Next);
    }
}
