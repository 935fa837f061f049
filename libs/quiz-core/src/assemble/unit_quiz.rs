//! Unit quiz assembly.
//!
//! Builds a bounded, category-balanced question set for one unit, biased
//! toward the learner's recorded weak points. Single pass, no state kept
//! between calls.

use crate::assemble::allocator::allocate;
use crate::assemble::sampler::{sample, select_with_weak_bias, weak_quota};
use crate::catalog::Catalog;
use crate::types::{Category, QuestionKind, QuizData, QuizQuestion, QuizSettings, Unit};
use crate::weak_points::WeakPointSet;
use rand::seq::SliceRandom;
use rand::Rng;

/// Assemble a quiz for `unit`.
///
/// Expression items are reserved unconditionally (that pool is small and
/// every item earns its slot); the remaining budget is split across
/// vocabulary, conjugation and transformation proportionally to pool sizes.
/// Weak points scoped to this unit bias each category's selection. The
/// catalog provides cross-unit distractor definitions for multiple choice.
pub fn assemble_unit_quiz<R>(
    unit: &Unit,
    catalog: &Catalog,
    weak_points: &WeakPointSet,
    settings: &QuizSettings,
    rng: &mut R,
) -> QuizData
where
    R: Rng + ?Sized,
{
    if unit.total_items() == 0 {
        log::warn!("unit {} has no content items", unit.unit_number);
        return QuizData {
            unit: unit.unit_number,
            ..QuizData::default()
        };
    }

    let n_expr = unit.expressions.len();
    let remaining = settings.target_questions.saturating_sub(n_expr);

    let alloc = allocate(
        &[
            (Category::Vocabulary, unit.vocabulary.len()),
            (Category::Conjugation, unit.conjugations.len()),
            (Category::Grammar, unit.transforms.len()),
        ],
        remaining,
    );
    let n_vocab = alloc[0].1;
    let n_conj = alloc[1].1;
    let n_trans = alloc[2].1;
    log::debug!(
        "unit {}: expr {n_expr} + vocab {n_vocab} + conj {n_conj} + trans {n_trans}",
        unit.unit_number
    );

    let unit_number = unit.unit_number;
    let vocab_selected = select_with_weak_bias(
        &unit.vocabulary,
        |v| v.key(),
        &weak_points.weak_keys(Category::Vocabulary, unit_number),
        n_vocab,
        weak_quota(n_vocab, settings.weak_ratio),
        rng,
    );
    // whole pool, weak quota included: expressions are never truncated
    let expr_selected = select_with_weak_bias(
        &unit.expressions,
        |e| e.key(),
        &weak_points.weak_keys(Category::Expression, unit_number),
        n_expr,
        n_expr,
        rng,
    );
    let conj_selected = select_with_weak_bias(
        &unit.conjugations,
        |c| c.key(),
        &weak_points.weak_keys(Category::Conjugation, unit_number),
        n_conj,
        weak_quota(n_conj, settings.weak_ratio),
        rng,
    );
    let trans_selected = select_with_weak_bias(
        &unit.transforms,
        |t| t.key(),
        &weak_points.weak_keys(Category::Grammar, unit_number),
        n_trans,
        weak_quota(n_trans, settings.weak_ratio),
        rng,
    );

    // roughly a quarter of the vocabulary as multiple choice
    let all_definitions = catalog.all_definitions();
    let n_mcq = if vocab_selected.is_empty() {
        0
    } else {
        (n_vocab / 4).max(1)
    };

    let vocab = vocab_selected
        .iter()
        .enumerate()
        .map(|(i, v)| {
            if i < n_mcq {
                let pool: Vec<String> = all_definitions
                    .iter()
                    .filter(|d| **d != v.definition)
                    .map(|d| d.to_string())
                    .collect();
                let mut options = sample(&pool, 3, rng);
                options.push(v.definition.clone());
                options.shuffle(rng);
                QuizQuestion {
                    kind: QuestionKind::MultipleChoice,
                    prompt: format!("Quelle est la définition de « {} » ?", v.word),
                    answer: v.definition.clone(),
                    key: v.key(),
                    options,
                    ..QuizQuestion::default()
                }
            } else {
                QuizQuestion {
                    kind: QuestionKind::FillIn,
                    prompt: v.definition.clone(),
                    answer: v.answer.clone(),
                    key: v.key(),
                    article: v.article.clone(),
                    ..QuizQuestion::default()
                }
            }
        })
        .collect();

    let expr = expr_selected
        .iter()
        .map(|e| QuizQuestion {
            kind: QuestionKind::FillIn,
            prompt: e.usage.clone(),
            answer: e.expression.clone(),
            key: e.key(),
            hint: e.example.clone(),
            alternatives: e.alternatives.clone(),
            ..QuizQuestion::default()
        })
        .collect();

    let conj = conj_selected
        .iter()
        .map(|c| QuizQuestion {
            kind: QuestionKind::FillIn,
            prompt: format!("{} — {} — {}", c.verb, c.tense, c.person),
            answer: c.answer.clone(),
            key: c.key(),
            person: Some(c.person.clone()),
            ..QuizQuestion::default()
        })
        .collect();

    let trans = trans_selected
        .iter()
        .map(|t| QuizQuestion {
            kind: QuestionKind::Rewrite,
            prompt: t.source.clone(),
            answer: t.answer.clone(),
            key: t.key(),
            transform_kind: Some(t.kind.clone()),
            source: Some(t.source.clone()),
            ..QuizQuestion::default()
        })
        .collect();

    QuizData {
        unit: unit.unit_number,
        vocab,
        expr,
        conj,
        trans,
    }
}
