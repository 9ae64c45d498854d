//! Scoring helpers shared by the attempt engine and the leaderboard.

use crate::model::{AnswerRecord, QuestionDocument, Selection};

/// `score / total × 100`, rounded half up. Zero when there are no questions.
///
/// Integer arithmetic keeps e.g. 2/3 (66.67) at 67 and 1/8 (12.5) at 13
/// without float rounding surprises.
pub fn percentage(score: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    let (score, total) = (u64::from(score), u64::from(total));
    ((200 * score + total) / (2 * total)) as u32
}

/// A selection counts only if it is in range and points at a correct option.
pub fn is_correct_choice(question: &QuestionDocument, selection: Selection) -> bool {
    selection
        .index()
        .and_then(|index| question.options.get(index))
        .is_some_and(|option| option.is_correct)
}

/// Number of questions answered correctly.
pub fn score(questions: &[QuestionDocument], answers: &[Selection]) -> u32 {
    questions
        .iter()
        .zip(answers)
        .filter(|(question, selection)| is_correct_choice(question, **selection))
        .count() as u32
}

/// Build the per-question snapshot stored with an attempt.
pub fn answer_records(questions: &[QuestionDocument], answers: &[Selection]) -> Vec<AnswerRecord> {
    questions
        .iter()
        .zip(answers)
        .map(|(question, &selection)| AnswerRecord {
            question_text: question.text.clone(),
            selected_option_index: selection,
            selected_option_text: selection
                .index()
                .and_then(|index| question.options.get(index))
                .map(|option| option.text.clone())
                .unwrap_or_default(),
            correct_option_index: question.correct_index(),
            is_correct: is_correct_choice(question, selection),
        })
        .collect()
}
