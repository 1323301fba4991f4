use itertools::Itertools;
use std::collections::{BTreeMap, HashMap};
use tracing::trace;

/// Per-position feedback for a guessed letter.
///
/// Ordered by severity so that `max` picks the best state seen for a key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum_macros::Display)]
pub enum LetterScore {
    Absent,
    Present,
    Correct,
}

/// Score `guess` against `target`.
///
/// Both words must have the same length. Exact matches are taken first so a
/// repeated letter in the guess can never claim more occurrences than the
/// target actually has.
pub fn evaluate(target: &str, guess: &str) -> Vec<LetterScore> {
    let target: Vec<char> = target.chars().collect();
    let guess: Vec<char> = guess.chars().collect();
    debug_assert_eq!(target.len(), guess.len());

    let mut scores = vec![LetterScore::Absent; guess.len()];
    let mut remaining: HashMap<char, usize> = target.iter().copied().counts();

    for (i, (g, t)) in guess.iter().zip(target.iter()).enumerate() {
        if g == t {
            scores[i] = LetterScore::Correct;
            if let Some(count) = remaining.get_mut(g) {
                *count = count.saturating_sub(1);
            }
        }
    }

    for (i, g) in guess.iter().enumerate() {
        if scores[i] == LetterScore::Correct {
            continue;
        }
        match remaining.get_mut(g) {
            Some(count) if *count > 0 => {
                *count -= 1;
                scores[i] = LetterScore::Present;
            }
            _ => trace!(letter = %g, position = i, "absent"),
        }
    }

    scores
}

/// Best score seen for every letter of the on-screen keyboard during a round.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct KeyStates {
    states: BTreeMap<char, LetterScore>,
}

impl KeyStates {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise the state of `letter` to `score` unless it is already higher.
    pub fn upgrade(&mut self, letter: char, score: LetterScore) {
        let entry = self.states.entry(letter).or_insert(score);
        if score > *entry {
            *entry = score;
        }
    }

    pub fn apply(&mut self, guess: &str, scores: &[LetterScore]) {
        for (letter, score) in guess.chars().zip(scores.iter()) {
            self.upgrade(letter, *score);
        }
    }

    pub fn get(&self, letter: char) -> Option<LetterScore> {
        self.states.get(&letter).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use LetterScore::{Absent as A, Correct as C, Present as P};

    #[test]
    fn test_exact_guess_is_all_correct() {
        assert_eq!(evaluate("GHOST", "GHOST"), vec![C; 5]);
        assert_eq!(evaluate("NIGHTMARE", "NIGHTMARE"), vec![C; 9]);
    }

    #[test]
    fn test_no_shared_letters_is_all_absent() {
        assert_eq!(evaluate("GHOST", "CRUMB"), vec![A; 5]);
    }

    #[test]
    fn test_repeated_guess_letters_are_capped_by_target_count() {
        // the target has a single R, so only the first guessed R is present
        assert_eq!(evaluate("ROBOT", "ERROR"), vec![A, P, A, C, A]);
    }

    #[test]
    fn test_exact_match_consumes_before_present() {
        assert_eq!(evaluate("SKULL", "LLAMA"), vec![P, P, A, A, A]);
        // the L at index 3 is exact, leaving a single L for the rest of the guess
        assert_eq!(evaluate("SKULL", "LOLLY"), vec![P, A, A, C, A]);
    }

    #[test]
    fn test_mixed_scores() {
        assert_eq!(evaluate("GHOST", "SHOUT"), vec![P, C, C, A, C]);
        assert_eq!(evaluate("WITCH", "TWICE"), vec![P, P, P, C, A]);
        assert_eq!(evaluate("MUMMY", "TUMMY"), vec![A, C, C, C, C]);
    }

    #[test]
    fn test_scored_letters_never_exceed_target_counts() {
        let cases = [
            ("ROBOT", "ERROR"),
            ("EERIE", "GEESE"),
            ("SKULL", "LLLLL"),
            ("HEXES", "EEEEE"),
            ("VAMPIRE", "PAPPIER"),
            ("NIGHTMARE", "AAAAAAAAA"),
        ];
        for (target, guess) in cases {
            let scores = evaluate(target, guess);
            let target_counts = target.chars().counts();
            let mut hit_counts: HashMap<char, usize> = HashMap::new();
            for (letter, score) in guess.chars().zip(scores.iter()) {
                if *score != A {
                    *hit_counts.entry(letter).or_default() += 1;
                }
            }
            for (letter, hits) in hit_counts {
                assert!(
                    hits <= target_counts.get(&letter).copied().unwrap_or(0),
                    "{guess} vs {target}: {letter} scored {hits} times"
                );
            }
        }
    }

    #[test]
    fn test_key_state_upgrade_is_monotonic() {
        let mut keys = KeyStates::new();
        keys.upgrade('G', A);
        assert_eq!(keys.get('G'), Some(A));
        keys.upgrade('G', P);
        assert_eq!(keys.get('G'), Some(P));
        keys.upgrade('G', C);
        assert_eq!(keys.get('G'), Some(C));
        keys.upgrade('G', P);
        keys.upgrade('G', A);
        assert_eq!(keys.get('G'), Some(C));
    }

    #[test]
    fn test_key_states_apply_row() {
        let mut keys = KeyStates::new();
        keys.apply("ERROR", &evaluate("ROBOT", "ERROR"));
        assert_eq!(keys.get('E'), Some(A));
        assert_eq!(keys.get('R'), Some(P));
        assert_eq!(keys.get('O'), Some(C));
        assert_eq!(keys.get('Z'), None);

        keys.apply("ROBOT", &evaluate("ROBOT", "ROBOT"));
        assert_eq!(keys.get('R'), Some(C));
        assert_eq!(keys.get('E'), Some(A));
    }

    #[test]
    fn test_letter_score_ordering() {
        assert!(C > P);
        assert!(P > A);
        assert_eq!(C.to_string(), "Correct");
    }
}
