//! Grading of completed quizzes and mock exams.
//!
//! Grading is pure: it reads a question set and the learner's raw input and
//! returns verdicts, a percentage score and recommended weak-point deltas.
//! The caller persists the score and applies the deltas to its own store.

use crate::matching::{
    match_answer_with_threshold, match_conj_answer_with_threshold,
    match_expr_answer_with_threshold, match_vocab_answer_with_threshold, Verdict,
};
use crate::types::{
    AnswerSheet, Category, ExamBlanc, ExamGrammarResult, ExamResults, ExamVocabResult,
    QuestionKind, QuizData, QuizQuestion, QuizResult, QuizResults, QuizSettings, WeakPointDelta,
};

/// Display labels attached to failure deltas are kept short.
const ITEM_LABEL_MAX: usize = 80;

/// Outcome of grading a unit quiz.
#[derive(Debug, Clone)]
pub struct GradedQuiz {
    pub results: QuizResults,
    /// Whole-quiz score, rounded to an integer percentage.
    pub percentage: u32,
    /// Recommended weak-point mutations, in question order.
    pub deltas: Vec<WeakPointDelta>,
}

/// Grade a unit quiz against the learner's answer sheet.
///
/// Answers pair with questions positionally per category; missing entries
/// grade as blank. A wrong blank answer produces no failure delta (skipped
/// questions are not weaknesses), while a correct answer always produces a
/// success delta.
pub fn grade_unit_quiz(
    quiz: &QuizData,
    answers: &AnswerSheet,
    settings: &QuizSettings,
) -> GradedQuiz {
    let mut results = QuizResults::default();
    let mut deltas = Vec::new();

    grade_category(
        &quiz.vocab,
        &answers.vocab,
        Category::Vocabulary,
        quiz.unit,
        settings,
        &mut results.vocab,
        &mut deltas,
    );
    grade_category(
        &quiz.expr,
        &answers.expr,
        Category::Expression,
        quiz.unit,
        settings,
        &mut results.expr,
        &mut deltas,
    );
    grade_category(
        &quiz.conj,
        &answers.conj,
        Category::Conjugation,
        quiz.unit,
        settings,
        &mut results.conj,
        &mut deltas,
    );
    grade_category(
        &quiz.trans,
        &answers.trans,
        Category::Grammar,
        quiz.unit,
        settings,
        &mut results.trans,
        &mut deltas,
    );

    let total = results.total_questions();
    let percentage = if total == 0 {
        0
    } else {
        (results.total_correct() as f64 / total as f64 * 100.0).round() as u32
    };
    log::debug!(
        "unit {} graded: {}/{} ({percentage}%)",
        quiz.unit,
        results.total_correct(),
        total
    );

    GradedQuiz {
        results,
        percentage,
        deltas,
    }
}

fn grade_category(
    questions: &[QuizQuestion],
    answers: &[String],
    category: Category,
    unit: u32,
    settings: &QuizSettings,
    results: &mut Vec<QuizResult>,
    deltas: &mut Vec<WeakPointDelta>,
) {
    for (i, question) in questions.iter().enumerate() {
        let user_answer = answers.get(i).map(String::as_str).unwrap_or("");
        let verdict = grade_one(question, user_answer, category, settings);

        if !verdict.correct && !user_answer.trim().is_empty() {
            deltas.push(WeakPointDelta::Failure {
                category,
                unit,
                key: question.key.clone(),
                item: question.prompt.chars().take(ITEM_LABEL_MAX).collect(),
            });
        } else if verdict.correct && !question.key.is_empty() {
            deltas.push(WeakPointDelta::Success {
                category,
                unit,
                key: question.key.clone(),
            });
        }

        results.push(QuizResult {
            question: question.clone(),
            user_answer: user_answer.to_string(),
            correct: verdict.correct,
            feedback_hint: verdict.hint,
        });
    }
}

fn grade_one(
    question: &QuizQuestion,
    user_answer: &str,
    category: Category,
    settings: &QuizSettings,
) -> Verdict {
    // choice options are picked, not typed; only an exact pick is right
    if question.kind == QuestionKind::MultipleChoice {
        return if user_answer == question.answer {
            Verdict::pass()
        } else {
            Verdict::fail("")
        };
    }

    let user = user_answer.trim();
    let expected = question.answer.trim();
    let threshold = settings.similarity_threshold;

    match category {
        Category::Vocabulary => {
            match_vocab_answer_with_threshold(user, expected, question.article.as_deref(), threshold)
        }
        Category::Expression => {
            match_expr_answer_with_threshold(user, expected, &question.alternatives, threshold)
        }
        Category::Conjugation => match_conj_answer_with_threshold(
            user,
            expected,
            question.person.as_deref().unwrap_or(""),
            threshold,
        ),
        Category::Grammar => match_answer_with_threshold(user, expected, threshold),
    }
}

/// Grade a mock exam.
///
/// Vocabulary and grammar sections are each scored out of 25 (one decimal);
/// the writing text is passed through untouched for the external grader. No
/// weak-point deltas: the mock exam is a cold sample.
pub fn grade_exam(
    exam: &ExamBlanc,
    vocab_answers: &[String],
    grammar_answers: &[String],
    writing_text: &str,
    settings: &QuizSettings,
) -> ExamResults {
    let threshold = settings.similarity_threshold;

    let mut vocab = Vec::new();
    let mut vocab_correct = 0usize;
    for (i, q) in exam.vocabulary.iter().enumerate() {
        let user_answer = vocab_answers.get(i).map(String::as_str).unwrap_or("").trim();
        let expected = q.answer.trim();
        let verdict =
            match_vocab_answer_with_threshold(user_answer, expected, q.article.as_deref(), threshold);
        if verdict.correct {
            vocab_correct += 1;
        }
        vocab.push(ExamVocabResult {
            definition: q.definition.clone(),
            user_answer: user_answer.to_string(),
            expected: expected.to_string(),
            correct: verdict.correct,
            hint: verdict.hint,
        });
    }

    let mut grammar = Vec::new();
    let mut grammar_correct = 0usize;
    for (i, q) in exam.grammar.iter().enumerate() {
        let user_answer = grammar_answers.get(i).map(String::as_str).unwrap_or("").trim();
        let expected = q.answer.trim();
        let verdict = match_answer_with_threshold(user_answer, expected, threshold);
        if verdict.correct {
            grammar_correct += 1;
        }
        grammar.push(ExamGrammarResult {
            kind: q.kind.clone(),
            source: q.source.clone(),
            user_answer: user_answer.to_string(),
            expected: expected.to_string(),
            correct: verdict.correct,
            hint: verdict.hint,
        });
    }

    ExamResults {
        vocab_score: section_score(vocab_correct, exam.vocabulary.len()),
        vocab,
        grammar_score: section_score(grammar_correct, exam.grammar.len()),
        grammar,
        writing_text: writing_text.to_string(),
    }
}

/// Section score out of 25, rounded to one decimal. Empty sections score 0.
fn section_score(correct: usize, total: usize) -> f64 {
    let ratio = correct as f64 / total.max(1) as f64;
    (ratio * 25.0 * 10.0).round() / 10.0
}
