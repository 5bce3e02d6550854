//! Property tests for moves and undo (pure domain).
//!
//! Properties tested:
//! - Applying any legal move then undoing it is a strict identity on the board
//! - Undoing an entire move sequence returns to the dealt board
//! - The card partition holds after every move and every undo
//! - A play flips exactly the cards it was the last cover of

use proptest::prelude::*;

use super::history::{MoveHistory, Wallet};
use super::moves::MoveRecord;
use super::test_gens::{apply_step, dealt_board, played_board, step};
use super::test_prelude;

fn rich_wallet() -> Wallet {
    Wallet::new(u64::MAX)
}

proptest! {
    #![proptest_config(test_prelude::proptest_config())]

    /// Property: undo(apply(M, B)) == B for every legal M at a reachable B
    #[test]
    fn prop_undo_is_identity_for_every_legal_move((board, _) in played_board()) {
        let mut moves: Vec<Option<_>> = board.playable_cards().into_iter().map(Some).collect();
        if !board.stock().is_empty() {
            moves.push(None);
        }

        for m in moves {
            let mut after = board.clone();
            let record = match m {
                Some(card) => after.play(card),
                None => after.draw_from_stock(),
            };
            prop_assert!(record.is_ok(), "legal move was rejected: {:?}", record);

            let mut history = MoveHistory::new(50);
            history.record_move(record.unwrap());
            let mut wallet = rich_wallet();
            let undone = history.undo(&mut after, &mut wallet);
            prop_assert!(undone.is_ok());
            prop_assert_eq!(&after, &board);
            prop_assert_eq!(wallet.coins(), u64::MAX - 50);
        }
    }

    /// Property: undoing everything restores the dealt board
    #[test]
    fn prop_full_unwind_restores_deal(
        board in dealt_board(),
        steps in prop::collection::vec(step(), 0..60),
    ) {
        let start = board.clone();
        let mut current = board;
        let mut history = MoveHistory::new(0);
        for s in steps {
            if let Some(record) = apply_step(&mut current, s) {
                history.record_move(record);
            }
        }
        let mut wallet = Wallet::new(0);
        while !history.is_empty() {
            prop_assert!(history.undo(&mut current, &mut wallet).is_ok());
            prop_assert!(current.check_partition());
        }
        prop_assert_eq!(current, start);
    }

    /// Property: the partition holds and the card count is stable
    #[test]
    fn prop_partition_invariant(
        board in dealt_board(),
        steps in prop::collection::vec(step(), 0..60),
    ) {
        let total = board.total_cards();
        let mut current = board;
        for s in steps {
            apply_step(&mut current, s);
            prop_assert!(current.check_partition());
            prop_assert_eq!(
                current.tableau().len() + current.stock().len() + current.discard().len() + 1,
                total
            );
        }
    }

    /// Property: after a play, covered cards are face up iff nothing else covers them
    #[test]
    fn prop_coverage_invariant((board, _) in played_board()) {
        for card in board.playable_cards() {
            let mut after = board.clone();
            let record = after.play(card);
            prop_assert!(record.is_ok());
            let Ok(MoveRecord::Tableau { covered, flipped, .. }) = record else {
                continue;
            };
            for id in &covered {
                let c = after.card(*id).unwrap();
                prop_assert!(!c.covered_by.contains(&card));
                prop_assert_eq!(c.face_up, c.covered_by.is_empty());
                prop_assert_eq!(flipped.contains(id), c.covered_by.is_empty());
            }
        }
    }
}
