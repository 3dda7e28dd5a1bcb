use rand::seq::SliceRandom;

use super::config::{GameConfig, SYMBOL_POOL};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CardStatus {
    Hidden,
    Revealed,
    Matched,
}

#[derive(Clone, Debug)]
pub struct Card {
    pub value: String,
    pub status: CardStatus,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PairOutcome {
    Matched,
    Mismatched,
}

/// Result of the pair-completing flip. `lost` is only set when the attempt
/// limit was reached without simultaneously winning.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PairResult {
    pub indices: [usize; 2],
    pub outcome: PairOutcome,
    pub won: bool,
    pub lost: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlipOutcome {
    /// The click violated a precondition and changed nothing.
    Ignored,
    /// First card of a pair is now face-up.
    Revealed,
    /// Second card completed the pair; it was evaluated synchronously.
    Pair(PairResult),
}

/// The whole game state. Owns the cards, the revealed-but-unresolved set and
/// the attempt counter; a fresh deal replaces everything.
///
/// Pending timer callbacks must capture `generation()` when scheduled and
/// bail out once it no longer matches, so a rebuild orphans them cleanly.
pub struct GameSession {
    cards: Vec<Card>,
    revealed_indices: Vec<usize>,
    attempts: u32,
    generation: u64,
    config: GameConfig,
}

impl GameSession {
    pub fn new(config: GameConfig) -> Self {
        let mut session = GameSession {
            cards: Vec::new(),
            revealed_indices: Vec::new(),
            attempts: 0,
            generation: 0,
            config,
        };
        session.rebuild();
        session
    }

    /// Discard the current deal and lay out a fresh shuffled board.
    pub fn rebuild(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.cards.clear();
        self.revealed_indices.clear();
        self.attempts = 0;

        let mut rng = rand::rng();
        let mut pool = SYMBOL_POOL.to_vec();
        pool.shuffle(&mut rng);

        let mut values = Vec::with_capacity(self.config.total_cards());
        for i in 0..self.config.value_count {
            let symbol = pool[i % pool.len()];
            values.push(symbol);
            values.push(symbol);
        }
        values.shuffle(&mut rng);

        for value in values {
            self.cards.push(Card {
                value: value.to_string(),
                status: CardStatus::Hidden,
            });
        }
    }

    pub fn set_config(&mut self, config: GameConfig) {
        self.config = config;
        self.rebuild();
    }

    /// Flip the card at `index`. Invalid clicks (face-up card, full pair
    /// pending, game over) are silent no-ops.
    pub fn flip(&mut self, index: usize) -> FlipOutcome {
        if self.is_lost() || self.revealed_indices.len() == 2 {
            return FlipOutcome::Ignored;
        }
        match self.cards.get(index) {
            Some(card) if card.status == CardStatus::Hidden => {}
            _ => return FlipOutcome::Ignored,
        }

        self.cards[index].status = CardStatus::Revealed;
        self.revealed_indices.push(index);
        if self.revealed_indices.len() < 2 {
            return FlipOutcome::Revealed;
        }

        self.attempts = self.attempts.saturating_add(1);
        let pair = [self.revealed_indices[0], self.revealed_indices[1]];
        let outcome = if self.cards[pair[0]].value == self.cards[pair[1]].value {
            for idx in pair {
                self.cards[idx].status = CardStatus::Matched;
            }
            self.revealed_indices.clear();
            PairOutcome::Matched
        } else {
            PairOutcome::Mismatched
        };

        let won = self.is_won();
        FlipOutcome::Pair(PairResult {
            indices: pair,
            outcome,
            won,
            lost: self.attempts_exhausted() && !won,
        })
    }

    /// Flip a mismatched pair back face-down. Cards that are no longer
    /// `Revealed` (a rebuild happened in between) are left untouched.
    pub fn resolve_mismatch(&mut self, pair: [usize; 2]) {
        for idx in pair {
            if let Some(card) = self.cards.get_mut(idx)
                && card.status == CardStatus::Revealed
            {
                card.status = CardStatus::Hidden;
            }
        }
        self.revealed_indices.retain(|idx| !pair.contains(idx));
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn attempts_remaining(&self) -> Option<u32> {
        self.config
            .attempt_limit
            .map(|limit| limit.saturating_sub(self.attempts))
    }

    fn attempts_exhausted(&self) -> bool {
        self.config
            .attempt_limit
            .is_some_and(|limit| self.attempts >= limit)
    }

    pub fn revealed_count(&self) -> usize {
        self.revealed_indices.len()
    }

    pub fn matched_count(&self) -> usize {
        self.cards
            .iter()
            .filter(|card| card.status == CardStatus::Matched)
            .count()
    }

    pub fn is_won(&self) -> bool {
        !self.cards.is_empty()
            && self
                .cards
                .iter()
                .all(|card| card.status == CardStatus::Matched)
    }

    pub fn is_lost(&self) -> bool {
        self.attempts_exhausted() && !self.is_won()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{HashMap, HashSet};

    use proptest::prelude::*;

    use super::*;
    use crate::game::config::Mode;

    /// First hidden pair with equal values.
    fn hidden_match(session: &GameSession) -> [usize; 2] {
        let cards = session.cards();
        for i in 0..cards.len() {
            for j in i + 1..cards.len() {
                if cards[i].status == CardStatus::Hidden
                    && cards[j].status == CardStatus::Hidden
                    && cards[i].value == cards[j].value
                {
                    return [i, j];
                }
            }
        }
        panic!("no hidden matching pair left");
    }

    /// First hidden pair with differing values.
    fn hidden_mismatch(session: &GameSession) -> [usize; 2] {
        let cards = session.cards();
        for i in 0..cards.len() {
            for j in i + 1..cards.len() {
                if cards[i].status == CardStatus::Hidden
                    && cards[j].status == CardStatus::Hidden
                    && cards[i].value != cards[j].value
                {
                    return [i, j];
                }
            }
        }
        panic!("no hidden mismatched pair left");
    }

    fn flip_pair(session: &mut GameSession, pair: [usize; 2]) -> PairResult {
        assert_eq!(session.flip(pair[0]), FlipOutcome::Revealed);
        match session.flip(pair[1]) {
            FlipOutcome::Pair(result) => result,
            other => panic!("expected a completed pair, got {other:?}"),
        }
    }

    // =========================================================================
    // Deal / shuffle
    // =========================================================================

    #[test]
    fn board_holds_twice_the_value_count() {
        for mode in Mode::ALL {
            let session = GameSession::new(mode.config());
            assert_eq!(session.cards().len(), mode.config().value_count * 2);
            assert_eq!(session.cards().len() % 2, 0);
        }
    }

    /// The deal is a permutation of the duplicated value multiset.
    #[test]
    fn deal_duplicates_each_drawn_symbol_exactly_once() {
        let session = GameSession::new(Mode::FreePlay.config());
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for card in session.cards() {
            *counts.entry(card.value.as_str()).or_insert(0) += 1;
        }
        assert_eq!(counts.len(), 4);
        assert!(counts.values().all(|&count| count == 2));
        for value in counts.keys() {
            assert!(SYMBOL_POOL.iter().any(|symbol| symbol == value));
        }
    }

    #[test]
    fn repeated_deals_differ() {
        let mut session = GameSession::new(Mode::FreePlay.config());
        let mut seen = HashSet::new();
        for _ in 0..20 {
            let order: Vec<String> = session
                .cards()
                .iter()
                .map(|card| card.value.clone())
                .collect();
            seen.insert(order);
            session.rebuild();
        }
        assert!(seen.len() > 1, "20 deals produced a single ordering");
    }

    #[test]
    fn deal_starts_face_down_with_fresh_counters() {
        let session = GameSession::new(Mode::Challenge.config());
        assert!(session
            .cards()
            .iter()
            .all(|card| card.status == CardStatus::Hidden));
        assert_eq!(session.attempts(), 0);
        assert_eq!(session.revealed_count(), 0);
        assert_eq!(session.matched_count(), 0);
    }

    // =========================================================================
    // Flip guards
    // =========================================================================

    #[test]
    fn flipping_a_matched_card_is_a_noop() {
        let mut session = GameSession::new(Mode::Challenge.config());
        let pair = hidden_match(&session);
        let result = flip_pair(&mut session, pair);
        assert_eq!(result.outcome, PairOutcome::Matched);

        let attempts = session.attempts();
        assert_eq!(session.flip(pair[0]), FlipOutcome::Ignored);
        assert_eq!(session.attempts(), attempts);
        assert_eq!(session.cards()[pair[0]].status, CardStatus::Matched);
    }

    #[test]
    fn flipping_the_same_card_twice_is_a_noop() {
        let mut session = GameSession::new(Mode::Challenge.config());
        assert_eq!(session.flip(0), FlipOutcome::Revealed);
        assert_eq!(session.flip(0), FlipOutcome::Ignored);
        assert_eq!(session.revealed_count(), 1);
    }

    #[test]
    fn third_flip_is_blocked_while_a_pair_is_unresolved() {
        let mut session = GameSession::new(Mode::FreePlay.config());
        let pair = hidden_mismatch(&session);
        let result = flip_pair(&mut session, pair);
        assert_eq!(result.outcome, PairOutcome::Mismatched);

        let third = hidden_mismatch(&session)[0];
        assert_eq!(session.flip(third), FlipOutcome::Ignored);
        assert_eq!(session.revealed_count(), 2);
    }

    #[test]
    fn out_of_range_index_is_a_noop() {
        let mut session = GameSession::new(Mode::Challenge.config());
        assert_eq!(session.flip(99), FlipOutcome::Ignored);
        assert_eq!(session.revealed_count(), 0);
    }

    // =========================================================================
    // Match evaluation and end states
    // =========================================================================

    #[test]
    fn matching_both_pairs_wins() {
        let mut session = GameSession::new(Mode::Challenge.config());

        let first_pair = hidden_match(&session);
        let first = flip_pair(&mut session, first_pair);
        assert_eq!(first.outcome, PairOutcome::Matched);
        assert!(!first.won);
        assert_eq!(session.matched_count(), 2);

        let second_pair = hidden_match(&session);
        let second = flip_pair(&mut session, second_pair);
        assert_eq!(second.outcome, PairOutcome::Matched);
        assert!(second.won);
        assert!(!second.lost);
        assert_eq!(session.matched_count(), 4);
        assert!(session.is_won());
        assert!(!session.is_lost());
    }

    #[test]
    fn three_mismatches_lose_the_challenge() {
        let mut session = GameSession::new(Mode::Challenge.config());
        for attempt in 1..=3u32 {
            let pair = hidden_mismatch(&session);
            let result = flip_pair(&mut session, pair);
            assert_eq!(result.outcome, PairOutcome::Mismatched);
            assert_eq!(session.attempts(), attempt);
            assert_eq!(result.lost, attempt == 3);
            session.resolve_mismatch(pair);
        }
        assert!(session.is_lost());
        assert!(session.matched_count() < 4);
        assert_eq!(session.flip(0), FlipOutcome::Ignored);
    }

    /// Winning on the final attempt must not also report a loss.
    #[test]
    fn win_on_final_attempt_is_not_a_loss() {
        let mut session = GameSession::new(Mode::Challenge.config());

        let miss = hidden_mismatch(&session);
        flip_pair(&mut session, miss);
        session.resolve_mismatch(miss);

        let first_pair = hidden_match(&session);
        flip_pair(&mut session, first_pair);
        let last_pair = hidden_match(&session);
        let last = flip_pair(&mut session, last_pair);
        assert_eq!(session.attempts(), 3);
        assert!(last.won);
        assert!(!last.lost);
        assert!(!session.is_lost());
    }

    #[test]
    fn free_play_never_loses() {
        let mut session = GameSession::new(Mode::FreePlay.config());
        for _ in 0..10 {
            let pair = hidden_mismatch(&session);
            let result = flip_pair(&mut session, pair);
            assert!(!result.lost);
            session.resolve_mismatch(pair);
        }
        assert!(!session.is_lost());
        assert_eq!(session.attempts_remaining(), None);
    }

    #[test]
    fn resolve_mismatch_reverts_the_pair() {
        let mut session = GameSession::new(Mode::FreePlay.config());
        let pair = hidden_mismatch(&session);
        flip_pair(&mut session, pair);

        session.resolve_mismatch(pair);
        assert_eq!(session.cards()[pair[0]].status, CardStatus::Hidden);
        assert_eq!(session.cards()[pair[1]].status, CardStatus::Hidden);
        assert_eq!(session.revealed_count(), 0);
    }

    // =========================================================================
    // Rebuild / stale callbacks
    // =========================================================================

    #[test]
    fn rebuild_resets_counters_and_bumps_generation() {
        let mut session = GameSession::new(Mode::Challenge.config());
        let generation = session.generation();
        let matched = hidden_match(&session);
        flip_pair(&mut session, matched);
        let lone = hidden_mismatch(&session)[0];
        session.flip(lone);

        session.rebuild();
        assert_ne!(session.generation(), generation);
        assert_eq!(session.attempts(), 0);
        assert_eq!(session.revealed_count(), 0);
        assert_eq!(session.matched_count(), 0);
    }

    /// A reversion scheduled before a rebuild carries a stale generation, so
    /// the timer layer drops it; even if it slipped through, the status guard
    /// keeps it from disturbing the fresh deal.
    #[test]
    fn stale_mismatch_resolve_cannot_touch_a_new_deal() {
        let mut session = GameSession::new(Mode::Challenge.config());
        let pair = hidden_mismatch(&session);
        flip_pair(&mut session, pair);
        let generation = session.generation();

        session.rebuild();
        assert_ne!(session.generation(), generation);

        session.resolve_mismatch(pair);
        assert!(session
            .cards()
            .iter()
            .all(|card| card.status == CardStatus::Hidden));
        assert_eq!(session.revealed_count(), 0);
    }

    // =========================================================================
    // Invariants over random play
    // =========================================================================

    proptest! {
        /// Revealed set stays within 0..=2, the matched count is even and
        /// non-decreasing, no matter how the player clicks.
        #[test]
        fn invariants_hold_under_random_clicks(
            clicks in proptest::collection::vec(0usize..8, 1..60),
        ) {
            let mut session = GameSession::new(Mode::FreePlay.config());
            let mut last_matched = 0;
            for index in clicks {
                let outcome = session.flip(index);
                prop_assert!(session.revealed_count() <= 2);
                prop_assert_eq!(session.matched_count() % 2, 0);
                prop_assert!(session.matched_count() >= last_matched);
                last_matched = session.matched_count();
                if let FlipOutcome::Pair(result) = outcome {
                    if result.outcome == PairOutcome::Mismatched {
                        session.resolve_mismatch(result.indices);
                    }
                }
            }
        }

        /// The attempt counter never passes the configured limit.
        #[test]
        fn attempts_never_exceed_the_limit(
            clicks in proptest::collection::vec(0usize..4, 1..80),
        ) {
            let mut session = GameSession::new(Mode::Challenge.config());
            for index in clicks {
                if let FlipOutcome::Pair(result) = session.flip(index) {
                    if result.outcome == PairOutcome::Mismatched {
                        session.resolve_mismatch(result.indices);
                    }
                }
                prop_assert!(session.attempts() <= 3);
            }
        }
    }
}
