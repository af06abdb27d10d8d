use rand::Rng;
use rand::seq::SliceRandom;

use crate::model::{QuizQuestion, VocabularyEntry};

/// Wrong answers offered next to the correct one.
pub const DISTRACTORS_PER_QUESTION: usize = 3;

/// Build up to `count` multiple-choice questions from `pool`.
///
/// - Only usable entries take part; a pool smaller than `count` yields fewer
///   questions, never padding.
/// - Each question gets up to [`DISTRACTORS_PER_QUESTION`] distinct wrong
///   target texts from the rest of the pool. A distractor equal to the correct
///   answer by value is never offered, even if it belongs to another entry.
/// - Question order and option order are both shuffled with `rng`.
pub fn build_quiz<R>(count: usize, pool: &[VocabularyEntry], rng: &mut R) -> Vec<QuizQuestion>
where
    R: Rng + ?Sized,
{
    let usable: Vec<&VocabularyEntry> = pool.iter().filter(|e| e.is_usable()).collect();
    let targets = distinct_targets(&usable);

    let mut chosen = usable;
    chosen.shuffle(rng);
    chosen.truncate(count);

    chosen
        .into_iter()
        .map(|entry| {
            let correct = entry.target_text();
            let mut options =
                pick_distractors(correct, &targets, DISTRACTORS_PER_QUESTION, rng);
            options.push(correct.to_string());
            options.shuffle(rng);

            QuizQuestion {
                prompt: entry.source_text().to_string(),
                correct_answer: correct.to_string(),
                options,
                hint: entry.transliteration().map(str::to_string),
            }
        })
        .collect()
}

/// Draw up to `n` candidates other than `correct`, uniformly and without
/// replacement. Candidates are expected to be distinct already.
pub fn pick_distractors<R>(correct: &str, candidates: &[&str], n: usize, rng: &mut R) -> Vec<String>
where
    R: Rng + ?Sized,
{
    let mut others: Vec<&str> = candidates
        .iter()
        .copied()
        .filter(|t| *t != correct)
        .collect();
    others.shuffle(rng);
    others.truncate(n);
    others.into_iter().map(str::to_string).collect()
}

fn distinct_targets<'a>(entries: &[&'a VocabularyEntry]) -> Vec<&'a str> {
    let mut out: Vec<&'a str> = Vec::with_capacity(entries.len());
    for entry in entries {
        let target = entry.target_text();
        if !out.contains(&target) {
            out.push(target);
        }
    }
    out
}
