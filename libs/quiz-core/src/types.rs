//! Core types for the quiz engine.

use serde::{Deserialize, Serialize};

/// Content category of a catalog item or question.
///
/// The declared order is the allocator's deterministic tie-break order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Vocabulary,
    Expression,
    Conjugation,
    Grammar,
}

impl Category {
    /// All categories in declared order.
    pub const ALL: [Category; 4] = [
        Self::Vocabulary,
        Self::Expression,
        Self::Conjugation,
        Self::Grammar,
    ];

    /// Get the category name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Vocabulary => "vocabulary",
            Self::Expression => "expression",
            Self::Conjugation => "conjugation",
            Self::Grammar => "grammar",
        }
    }
}

/// Vocabulary entry: a headword with its definition and expected answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VocabEntry {
    pub word: String,
    pub definition: String,
    pub answer: String,
    /// Required article for the answer ("le", "la", "l'", ...), if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub article: Option<String>,
}

impl VocabEntry {
    /// Structural identity key (stable across catalog edits).
    pub fn key(&self) -> String {
        self.word.clone()
    }
}

/// Idiomatic expression entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpressionEntry {
    pub expression: String,
    /// Usage description shown as the prompt.
    pub usage: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
    /// Alternative acceptable phrasings.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alternatives: Vec<String>,
}

impl ExpressionEntry {
    pub fn key(&self) -> String {
        self.expression.clone()
    }
}

/// Verb conjugation entry for a given tense and grammatical person.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConjugationEntry {
    pub verb: String,
    pub tense: String,
    pub person: String,
    pub answer: String,
}

impl ConjugationEntry {
    pub fn key(&self) -> String {
        format!("{}_{}_{}", self.verb, self.tense, self.person)
    }
}

/// Sentence transformation entry (rewrite exercises).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransformEntry {
    /// Name of the transformation, e.g. "voix passive".
    pub kind: String,
    pub source: String,
    pub answer: String,
}

impl TransformEntry {
    pub fn key(&self) -> String {
        let head: String = self.source.chars().take(30).collect();
        format!("{}|{}", self.kind, head)
    }
}

/// A themed lesson grouping of content items. Immutable once loaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Unit {
    pub unit_number: u32,
    pub theme: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub grammar_focus: Vec<String>,
    #[serde(default)]
    pub vocabulary: Vec<VocabEntry>,
    #[serde(default)]
    pub expressions: Vec<ExpressionEntry>,
    #[serde(default)]
    pub conjugations: Vec<ConjugationEntry>,
    #[serde(default)]
    pub transforms: Vec<TransformEntry>,
}

impl Unit {
    /// Total number of content items across all categories.
    pub fn total_items(&self) -> usize {
        self.vocabulary.len()
            + self.expressions.len()
            + self.conjugations.len()
            + self.transforms.len()
    }
}

/// A content item the learner has previously answered incorrectly.
///
/// At most one record exists per (category, unit, key); `fail_count` is
/// always at least 1 (a record reaching 0 is deleted, never stored).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeakPoint {
    pub category: Category,
    pub unit: u32,
    pub key: String,
    /// Short display label for the failed item.
    pub item: String,
    pub fail_count: u32,
}

/// Recommended weak-point mutation returned by grading.
///
/// The engine never mutates the learner's weak-point collection directly;
/// the caller applies these to its own store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeakPointDelta {
    Failure {
        category: Category,
        unit: u32,
        key: String,
        item: String,
    },
    Success {
        category: Category,
        unit: u32,
        key: String,
    },
}

/// Question rendering form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    MultipleChoice,
    FillIn,
    Rewrite,
}

impl Default for QuestionKind {
    fn default() -> Self {
        Self::FillIn
    }
}

/// A single assembled question. Ephemeral: rebuilt on every assembly call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub kind: QuestionKind,
    pub prompt: String,
    pub answer: String,
    /// Structural key of the source catalog item.
    pub key: String,
    /// Choice options (multiple-choice only, shuffled).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub article: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub person: Option<String>,
    /// Example sentence shown as a hint (expressions).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alternatives: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform_kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// An assembled unit quiz, grouped by category.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuizData {
    pub unit: u32,
    pub vocab: Vec<QuizQuestion>,
    pub expr: Vec<QuizQuestion>,
    pub conj: Vec<QuizQuestion>,
    pub trans: Vec<QuizQuestion>,
}

impl QuizData {
    pub fn total_questions(&self) -> usize {
        self.vocab.len() + self.expr.len() + self.conj.len() + self.trans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total_questions() == 0
    }
}

/// Raw learner input for a quiz, positional per category.
///
/// Missing entries grade as empty answers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnswerSheet {
    pub vocab: Vec<String>,
    pub expr: Vec<String>,
    pub conj: Vec<String>,
    pub trans: Vec<String>,
}

/// A graded question: the question, the learner's input and the verdict.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizResult {
    pub question: QuizQuestion,
    pub user_answer: String,
    pub correct: bool,
    /// Remediation hint; empty when fully correct.
    pub feedback_hint: String,
}

/// Graded questions grouped by category.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuizResults {
    pub vocab: Vec<QuizResult>,
    pub expr: Vec<QuizResult>,
    pub conj: Vec<QuizResult>,
    pub trans: Vec<QuizResult>,
}

impl QuizResults {
    pub fn total_questions(&self) -> usize {
        self.vocab.len() + self.expr.len() + self.conj.len() + self.trans.len()
    }

    pub fn total_correct(&self) -> usize {
        [&self.vocab, &self.expr, &self.conj, &self.trans]
            .iter()
            .map(|cat| cat.iter().filter(|r| r.correct).count())
            .sum()
    }
}

/// Mock-exam vocabulary question, tagged with its source unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamVocabQuestion {
    pub definition: String,
    pub answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub article: Option<String>,
    pub unit: u32,
}

/// Mock-exam grammar transform question, tagged with its source unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExamGrammarQuestion {
    pub kind: String,
    pub source: String,
    pub answer: String,
    pub unit: u32,
}

/// Cross-unit mock exam bundle. Re-derived fresh for every sitting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamBlanc {
    pub vocabulary: Vec<ExamVocabQuestion>,
    pub grammar: Vec<ExamGrammarQuestion>,
    /// None when no writing prompts are configured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub writing_prompt: Option<String>,
}

/// Graded mock-exam vocabulary question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamVocabResult {
    pub definition: String,
    pub user_answer: String,
    pub expected: String,
    pub correct: bool,
    pub hint: String,
}

/// Graded mock-exam grammar question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamGrammarResult {
    pub kind: String,
    pub source: String,
    pub user_answer: String,
    pub expected: String,
    pub correct: bool,
    pub hint: String,
}

/// Graded mock exam. Section scores are out of 25; the writing text is
/// passed through untouched for the external grader.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamResults {
    pub vocab: Vec<ExamVocabResult>,
    pub vocab_score: f64,
    pub grammar: Vec<ExamGrammarResult>,
    pub grammar_score: f64,
    pub writing_text: String,
}

/// Tunable assembly and matching parameters.
///
/// The similarity threshold and weak ratio are behavioral constants carried
/// over from the original tuning; change them only deliberately.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizSettings {
    /// Total question budget for a unit quiz.
    pub target_questions: usize,
    /// Share of each category's quota reserved for weak items.
    pub weak_ratio: f64,
    /// Minimum LCS similarity ratio for the near-miss spelling tier.
    pub similarity_threshold: f64,
    /// Vocabulary questions in a mock exam.
    pub exam_vocab_questions: usize,
    /// Grammar transform questions in a mock exam.
    pub exam_grammar_questions: usize,
}

impl Default for QuizSettings {
    fn default() -> Self {
        Self {
            target_questions: 40,
            weak_ratio: 0.4,
            similarity_threshold: 0.85,
            exam_vocab_questions: 20,
            exam_grammar_questions: 5,
        }
    }
}
