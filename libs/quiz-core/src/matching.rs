//! Tolerant answer matching.
//!
//! Free-text answers are compared against a reference through an ordered
//! ladder of increasingly lenient rules (first match wins):
//!
//! 1. byte-exact equality
//! 2. case-insensitive
//! 3. + collapsed whitespace
//! 4. + sentence punctuation stripped (apostrophe variants folded first)
//! 5. + combining accents stripped -> incorrect, accent hint
//! 6. LCS similarity above the threshold -> incorrect, spelling hint
//! 7. incorrect, no hint
//!
//! All functions are pure; the same inputs always produce the same verdict.

use crate::types::QuizSettings;
use serde::{Deserialize, Serialize};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Hint shown when only the accents are wrong.
pub const ACCENT_HINT: &str = "Presque ! Vérifiez les accents.";

/// Hint shown for a near-miss spelling.
pub const SPELLING_HINT: &str = "Très proche ! Vérifiez l'orthographe.";

/// French definite and indefinite articles accepted in front of a noun.
const ARTICLES: [&str; 7] = ["le", "la", "les", "un", "une", "des", "l'"];

/// Verdict of comparing a learner answer to a reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub correct: bool,
    /// Remediation hint; always empty when `correct` is true.
    pub hint: String,
}

impl Verdict {
    pub fn pass() -> Self {
        Self {
            correct: true,
            hint: String::new(),
        }
    }

    pub fn fail(hint: impl Into<String>) -> Self {
        Self {
            correct: false,
            hint: hint.into(),
        }
    }
}

// normalization primitives

/// Trim and collapse runs of whitespace.
fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Fold exotic apostrophe code points to the canonical `'`.
fn fold_apostrophes(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{2019}' | '\u{2018}' | '\u{02BC}' | '`' => '\'',
            other => other,
        })
        .collect()
}

/// Sentence-level punctuation, terminal and internal. Apostrophes and
/// hyphens are word-level in French and are kept.
fn is_sentence_punct(c: char) -> bool {
    matches!(
        c,
        '.' | ',' | ';' | ':' | '!' | '?' | '…' | '«' | '»' | '"' | '\u{201C}' | '\u{201D}'
            | '(' | ')'
    )
}

/// Fold apostrophes, drop sentence punctuation, re-collapse whitespace.
fn strip_punctuation(text: &str) -> String {
    let folded = fold_apostrophes(text);
    let stripped: String = folded.chars().filter(|c| !is_sentence_punct(*c)).collect();
    normalize_whitespace(&stripped)
}

/// NFD-decompose and drop all combining diacritical marks.
fn strip_accents(text: &str) -> String {
    text.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

/// Similarity ratio `2 * LCS(a, b) / (len(a) + len(b))`.
///
/// Symmetric; 1.0 for two equal or two empty strings, 0.0 when exactly one
/// side is empty.
pub fn lcs_ratio(a: &str, b: &str) -> f64 {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    let m = a_chars.len();
    let n = b_chars.len();

    if m == 0 && n == 0 {
        return 1.0;
    }
    if m == 0 || n == 0 {
        return 0.0;
    }

    // Two rows instead of the full matrix
    let mut prev = vec![0usize; n + 1];
    let mut curr = vec![0usize; n + 1];

    for i in 1..=m {
        for j in 1..=n {
            curr[j] = if a_chars[i - 1] == b_chars[j - 1] {
                prev[j - 1] + 1
            } else {
                prev[j].max(curr[j - 1])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
        curr.fill(0);
    }

    let lcs = prev[n];
    (2 * lcs) as f64 / (m + n) as f64
}

// generic ladder

/// Compare a learner answer to the reference with the default threshold.
pub fn match_answer(user: &str, expected: &str) -> Verdict {
    match_answer_with_threshold(user, expected, QuizSettings::default().similarity_threshold)
}

/// Compare a learner answer to the reference.
pub fn match_answer_with_threshold(user: &str, expected: &str, threshold: f64) -> Verdict {
    // 1. exact
    if user == expected {
        return Verdict::pass();
    }

    // 2. case-insensitive
    let user_ci = user.to_lowercase();
    let expected_ci = expected.to_lowercase();
    if user_ci == expected_ci {
        return Verdict::pass();
    }

    // 3. collapsed whitespace
    let user_ws = normalize_whitespace(&user_ci);
    let expected_ws = normalize_whitespace(&expected_ci);
    if user_ws == expected_ws {
        return Verdict::pass();
    }

    // 4. sentence punctuation stripped
    let user_np = strip_punctuation(&user_ws);
    let expected_np = strip_punctuation(&expected_ws);
    if user_np == expected_np {
        return Verdict::pass();
    }

    // 5. accents stripped: close, but accents count
    let user_na = strip_accents(&user_np);
    let expected_na = strip_accents(&expected_np);
    if user_na == expected_na {
        return Verdict::fail(ACCENT_HINT);
    }

    // 6. near-miss spelling, accent-insensitively
    if lcs_ratio(&user_na, &expected_na) >= threshold {
        return Verdict::fail(SPELLING_HINT);
    }

    // 7. no match
    Verdict::fail("")
}

// vocabulary matcher

/// Compare a vocabulary answer, tolerating an optional leading article.
///
/// When the entry declares a required article and the learner supplied one,
/// the articles must agree (case- and accent-insensitively); the bare word
/// is then compared through the ladder.
pub fn match_vocab_answer(user: &str, expected: &str, article: Option<&str>) -> Verdict {
    match_vocab_answer_with_threshold(
        user,
        expected,
        article,
        QuizSettings::default().similarity_threshold,
    )
}

pub fn match_vocab_answer_with_threshold(
    user: &str,
    expected: &str,
    article: Option<&str>,
    threshold: f64,
) -> Verdict {
    let required = article.map(str::trim).filter(|a| !a.is_empty());
    let (supplied, bare) = split_leading_article(user);

    if let (Some(required), Some(supplied)) = (required, supplied.as_deref()) {
        if !article_matches(supplied, required) {
            return Verdict::fail(format!(
                "Attention à l'article : « {} ».",
                join_article(required, expected.trim())
            ));
        }
    }

    match_answer_with_threshold(&bare, expected.trim(), threshold)
}

/// Split a leading French article off an answer, if one is present.
fn split_leading_article(answer: &str) -> (Option<String>, String) {
    let folded = fold_apostrophes(answer.trim());

    // elided article attaches directly to the word
    if let Some(rest) = strip_prefix_ci(&folded, "l'") {
        return (Some("l'".to_string()), rest.trim_start().to_string());
    }

    if let Some((first, rest)) = folded.split_once(char::is_whitespace) {
        let first_lower = first.to_lowercase();
        if ARTICLES.contains(&first_lower.as_str()) {
            return (Some(first_lower), rest.trim_start().to_string());
        }
    }

    (None, folded)
}

fn article_matches(supplied: &str, required: &str) -> bool {
    let canon = |a: &str| strip_accents(&fold_apostrophes(a.trim()).to_lowercase());
    canon(supplied) == canon(required)
}

/// Render an article next to its word ("le gaspillage", "l'argent").
fn join_article(article: &str, word: &str) -> String {
    if article.ends_with('\'') {
        format!("{article}{word}")
    } else {
        format!("{article} {word}")
    }
}

// conjugation matcher

/// Compare a conjugated form, tolerating a leading subject pronoun
/// consistent with the declared grammatical person.
pub fn match_conj_answer(user: &str, expected: &str, person: &str) -> Verdict {
    match_conj_answer_with_threshold(
        user,
        expected,
        person,
        QuizSettings::default().similarity_threshold,
    )
}

pub fn match_conj_answer_with_threshold(
    user: &str,
    expected: &str,
    person: &str,
    threshold: f64,
) -> Verdict {
    let expected = expected.trim();
    let direct = match_answer_with_threshold(user, expected, threshold);
    if direct.correct {
        return direct;
    }

    if let Some(stripped) = strip_person_pronoun(user, person) {
        let retried = match_answer_with_threshold(&stripped, expected, threshold);
        if retried.correct {
            return retried;
        }
        return Verdict::fail(better_hint(&direct.hint, &retried.hint));
    }

    direct
}

/// Pronoun prefixes consistent with a declared person ("je" accepts both
/// "je " and the elided "j'").
fn pronoun_prefixes(person: &str) -> Vec<&'static str> {
    let person = strip_accents(&person.to_lowercase());
    let mut prefixes = Vec::new();
    for token in person.split(|c: char| c == '/' || c == ',' || c.is_whitespace()) {
        let group: &[&'static str] = match token {
            "je" => &["je ", "j'"],
            "tu" => &["tu "],
            "il" | "elle" | "on" => &["il ", "elle ", "on "],
            "nous" => &["nous "],
            "vous" => &["vous "],
            "ils" | "elles" => &["ils ", "elles "],
            _ => &[],
        };
        for p in group {
            if !prefixes.contains(p) {
                prefixes.push(*p);
            }
        }
    }
    prefixes
}

fn strip_person_pronoun(user: &str, person: &str) -> Option<String> {
    let folded = fold_apostrophes(user.trim());
    for prefix in pronoun_prefixes(person) {
        if let Some(rest) = strip_prefix_ci(&folded, prefix) {
            return Some(rest.trim_start().to_string());
        }
    }
    None
}

/// The more informative of two ladder hints (accents beat spelling).
fn better_hint<'a>(first: &'a str, second: &'a str) -> &'a str {
    let rank = |h: &str| match h {
        ACCENT_HINT => 2,
        SPELLING_HINT => 1,
        _ => 0,
    };
    if rank(second) >= rank(first) {
        second
    } else {
        first
    }
}

/// Case-insensitive prefix strip, safe on multi-byte input.
fn strip_prefix_ci(s: &str, prefix: &str) -> Option<String> {
    let mut chars = s.chars();
    for pc in prefix.chars() {
        let sc = chars.next()?;
        if !sc.to_lowercase().eq(pc.to_lowercase()) {
            return None;
        }
    }
    Some(chars.as_str().to_string())
}

// expression matcher

/// Compare an idiomatic expression, accepting alternatives and answers that
/// embed the expression in a full sentence.
pub fn match_expr_answer(user: &str, expected: &str, alternatives: &[String]) -> Verdict {
    match_expr_answer_with_threshold(
        user,
        expected,
        alternatives,
        QuizSettings::default().similarity_threshold,
    )
}

pub fn match_expr_answer_with_threshold(
    user: &str,
    expected: &str,
    alternatives: &[String],
    threshold: f64,
) -> Verdict {
    let candidates: Vec<&str> = std::iter::once(expected)
        .chain(alternatives.iter().map(String::as_str))
        .collect();

    let mut primary_hint = String::new();
    for (i, candidate) in candidates.iter().enumerate() {
        let verdict = match_answer_with_threshold(user, candidate.trim(), threshold);
        if verdict.correct {
            return verdict;
        }
        if i == 0 {
            primary_hint = verdict.hint;
        }
    }

    // full-sentence answers containing the idiom
    let user_np = strip_punctuation(&normalize_whitespace(&user.to_lowercase()));
    for candidate in &candidates {
        let cand_np = strip_punctuation(&normalize_whitespace(&candidate.to_lowercase()));
        if !cand_np.is_empty() && user_np.contains(&cand_np) {
            return Verdict::pass();
        }
    }

    // second pass: accent-insensitive containment
    let user_na = strip_accents(&user_np);
    for candidate in &candidates {
        let cand_na = strip_accents(&strip_punctuation(&normalize_whitespace(
            &candidate.to_lowercase(),
        )));
        if !cand_na.is_empty() && user_na.contains(&cand_na) {
            return Verdict::fail(ACCENT_HINT);
        }
    }

    Verdict::fail(primary_hint)
}
