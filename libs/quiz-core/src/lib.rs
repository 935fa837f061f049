//! Core quiz engine shared by the DELF B2 trainer applications.
//!
//! Provides:
//! - Tolerant answer matching (ordered tolerance ladder plus French-specific
//!   article/pronoun/containment matchers)
//! - Adaptive unit quiz assembly (proportional allocation, weak-point bias)
//! - Mock exam assembly (cold cross-unit sampling)
//! - Grading with percentage scores and weak-point delta proposals
//! - Shared types (catalog records, questions, results, weak points)
//!
//! The engine is pure and synchronous: the caller owns the catalog, the
//! weak-point store and the random source, and passes them in explicitly.

pub mod assemble;
pub mod catalog;
pub mod error;
pub mod grading;
pub mod matching;
pub mod types;
pub mod weak_points;

pub use assemble::{allocate, assemble_exam, assemble_unit_quiz, sample, select_with_weak_bias};
pub use catalog::Catalog;
pub use error::{CatalogError, Result};
pub use grading::{grade_exam, grade_unit_quiz, GradedQuiz};
pub use matching::{
    match_answer, match_conj_answer, match_expr_answer, match_vocab_answer, Verdict,
};
pub use types::{
    AnswerSheet, Category, ConjugationEntry, ExamBlanc, ExamGrammarQuestion, ExamGrammarResult,
    ExamResults, ExamVocabQuestion, ExamVocabResult, ExpressionEntry, QuestionKind, QuizData,
    QuizQuestion, QuizResult, QuizResults, QuizSettings, TransformEntry, Unit, VocabEntry,
    WeakPoint, WeakPointDelta,
};
pub use weak_points::WeakPointSet;
