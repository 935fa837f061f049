//! Mock exam (examen blanc) assembly.
//!
//! A cold, representative cross-unit sample: no weak-point bias, nothing
//! persisted between sittings.

use crate::assemble::sampler::sample;
use crate::catalog::Catalog;
use crate::types::{ExamBlanc, ExamGrammarQuestion, ExamVocabQuestion, QuizSettings};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::{BTreeMap, HashSet};

/// Assemble a mock exam from the whole catalog.
///
/// Vocabulary is sampled uniformly across every unit; grammar transforms are
/// picked from a shuffled cross-unit pool preferring one per distinct unit,
/// then topped up (skipping exact duplicates) when fewer units than slots
/// exist. One writing prompt is drawn uniformly from the prompt map.
pub fn assemble_exam<R>(
    catalog: &Catalog,
    writing_prompts: &BTreeMap<u32, String>,
    settings: &QuizSettings,
    rng: &mut R,
) -> ExamBlanc
where
    R: Rng + ?Sized,
{
    let mut all_vocab = Vec::new();
    let mut all_transforms = Vec::new();
    for unit in catalog.units() {
        for v in &unit.vocabulary {
            all_vocab.push(ExamVocabQuestion {
                definition: v.definition.clone(),
                answer: v.answer.clone(),
                article: v.article.clone(),
                unit: unit.unit_number,
            });
        }
        for t in &unit.transforms {
            all_transforms.push(ExamGrammarQuestion {
                kind: t.kind.clone(),
                source: t.source.clone(),
                answer: t.answer.clone(),
                unit: unit.unit_number,
            });
        }
    }

    let vocabulary = sample(&all_vocab, settings.exam_vocab_questions, rng);

    all_transforms.shuffle(rng);
    let mut grammar: Vec<ExamGrammarQuestion> = Vec::new();
    let mut units_used: HashSet<u32> = HashSet::new();
    for t in &all_transforms {
        if grammar.len() >= settings.exam_grammar_questions {
            break;
        }
        if units_used.insert(t.unit) {
            grammar.push(t.clone());
        }
    }
    // not enough distinct units: fill from the rest, skipping duplicates
    for t in &all_transforms {
        if grammar.len() >= settings.exam_grammar_questions {
            break;
        }
        if !grammar.contains(t) {
            grammar.push(t.clone());
        }
    }

    let writing_prompt = if writing_prompts.is_empty() {
        None
    } else {
        let prompts: Vec<&String> = writing_prompts.values().collect();
        Some(prompts[rng.gen_range(0..prompts.len())].clone())
    };

    log::debug!(
        "exam assembled: {} vocab, {} grammar, prompt: {}",
        vocabulary.len(),
        grammar.len(),
        writing_prompt.is_some()
    );

    ExamBlanc {
        vocabulary,
        grammar,
        writing_prompt,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{TransformEntry, Unit, VocabEntry};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn unit(number: u32, n_vocab: usize, n_trans: usize) -> Unit {
        Unit {
            unit_number: number,
            theme: format!("Thème {number}"),
            grammar_focus: vec![],
            vocabulary: (0..n_vocab)
                .map(|i| VocabEntry {
                    word: format!("mot{number}_{i}"),
                    definition: format!("définition {number}-{i}"),
                    answer: format!("mot{number}_{i}"),
                    article: None,
                })
                .collect(),
            expressions: vec![],
            conjugations: vec![],
            transforms: (0..n_trans)
                .map(|i| TransformEntry {
                    kind: "nominalisation".to_string(),
                    source: format!("Source {number}-{i}."),
                    answer: format!("Réponse {number}-{i}."),
                })
                .collect(),
        }
    }

    fn prompts(units: &[u32]) -> BTreeMap<u32, String> {
        units
            .iter()
            .map(|n| (*n, format!("Rédigez un essai pour l'unité {n}.")))
            .collect()
    }

    #[test]
    fn samples_twenty_vocab_when_available() {
        let catalog =
            Catalog::new((1..=6).map(|n| unit(n, 10, 2)).collect()).unwrap();
        let exam = assemble_exam(
            &catalog,
            &prompts(&[1, 2, 3]),
            &QuizSettings::default(),
            &mut StdRng::seed_from_u64(1),
        );
        assert_eq!(exam.vocabulary.len(), 20);
        assert!(exam.writing_prompt.is_some());
    }

    #[test]
    fn vocab_caps_at_the_pool() {
        let catalog = Catalog::new(vec![unit(1, 7, 1)]).unwrap();
        let exam = assemble_exam(
            &catalog,
            &prompts(&[1]),
            &QuizSettings::default(),
            &mut StdRng::seed_from_u64(2),
        );
        assert_eq!(exam.vocabulary.len(), 7);
    }

    #[test]
    fn grammar_prefers_distinct_units() {
        let catalog =
            Catalog::new((1..=8).map(|n| unit(n, 1, 3)).collect()).unwrap();
        for seed in 0..10 {
            let exam = assemble_exam(
                &catalog,
                &prompts(&[1]),
                &QuizSettings::default(),
                &mut StdRng::seed_from_u64(seed),
            );
            assert_eq!(exam.grammar.len(), 5);
            let units: HashSet<u32> = exam.grammar.iter().map(|g| g.unit).collect();
            assert_eq!(units.len(), 5, "seed {seed} repeated a unit");
        }
    }

    #[test]
    fn grammar_tops_up_from_fewer_units_without_duplicates() {
        let catalog = Catalog::new(vec![unit(1, 1, 4), unit(2, 1, 4)]).unwrap();
        let exam = assemble_exam(
            &catalog,
            &prompts(&[1]),
            &QuizSettings::default(),
            &mut StdRng::seed_from_u64(3),
        );
        assert_eq!(exam.grammar.len(), 5);
        let distinct: HashSet<String> = exam
            .grammar
            .iter()
            .map(|g| format!("{}|{}|{}", g.kind, g.source, g.unit))
            .collect();
        assert_eq!(distinct.len(), 5);
    }

    #[test]
    fn empty_prompt_map_yields_no_prompt() {
        let catalog = Catalog::new(vec![unit(1, 3, 1)]).unwrap();
        let exam = assemble_exam(
            &catalog,
            &BTreeMap::new(),
            &QuizSettings::default(),
            &mut StdRng::seed_from_u64(4),
        );
        assert!(exam.writing_prompt.is_none());
    }

    #[test]
    fn empty_catalog_degrades_to_an_empty_exam() {
        let catalog = Catalog::new(vec![]).unwrap();
        let exam = assemble_exam(
            &catalog,
            &prompts(&[1]),
            &QuizSettings::default(),
            &mut StdRng::seed_from_u64(5),
        );
        assert!(exam.vocabulary.is_empty());
        assert!(exam.grammar.is_empty());
        assert!(exam.writing_prompt.is_some());
    }

    #[test]
    fn exam_is_reproducible_under_a_seed() {
        let catalog =
            Catalog::new((1..=6).map(|n| unit(n, 10, 2)).collect()).unwrap();
        let build = |seed| {
            assemble_exam(
                &catalog,
                &prompts(&[1, 2, 3]),
                &QuizSettings::default(),
                &mut StdRng::seed_from_u64(seed),
            )
        };
        let a = build(9);
        let b = build(9);
        let sig = |e: &ExamBlanc| {
            (
                e.vocabulary.iter().map(|v| v.answer.clone()).collect::<Vec<_>>(),
                e.grammar.iter().map(|g| g.source.clone()).collect::<Vec<_>>(),
                e.writing_prompt.clone(),
            )
        };
        assert_eq!(sig(&a), sig(&b));
    }
}
