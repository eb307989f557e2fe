//! プロパティベーステストモジュール
//! ランダムな対局でルールとAIの不変条件を検証し、
//! 終局判定、石数、パス処理、探索AIの強さ、同時アクセス時の健全性を確認する。

use proptest::prelude::*;
use std::sync::Arc;

use board_games::{
    ai::othello::GreedyAI,
    ai::tictactoe::{HeuristicAI, MinimaxAI},
    ai::{AIStrategy, Difficulty, LocalAIService},
    config::PacingConfig,
    error::{GameError, InvalidStateReason},
    game::othello::{self, OthelloRules, Player, TurnAdvance},
    game::tictactoe::{self, coord_of, Evaluation, Mark, TicTacToeRules},
    game::types::{Coord, GameKind, Side},
    game::GameBoard,
    session::{GameService, GameSession, SessionConfig, SessionManager, TurnState},
};

/// 着手の選び方を表す乱数列（合法手の数で剰余を取って使う）
fn choice_sequence_strategy() -> impl Strategy<Value = Vec<usize>> {
    prop::collection::vec(any::<usize>(), 0..70)
}

/// 選択列に従ってオセロを進め、各手で不変条件を確認する
fn play_othello(choices: &[usize]) -> (othello::Board, Option<Player>) {
    let mut board = othello::Board::new();
    let mut to_move = Some(Player::Black);

    for &choice in choices {
        let Some(player) = to_move else { break };
        let moves = OthelloRules::get_all_legal_moves(&board, player);
        assert!(!moves.is_empty(), "side to move must have a legal move");

        let legal_move = &moves[choice % moves.len()];
        let (black_before, white_before) = board.count_pieces();
        let flips = OthelloRules::play(&mut board, legal_move.position, player).unwrap();
        let (black_after, white_after) = board.count_pieces();

        assert_eq!(flips.len(), legal_move.capture_count());
        let gained = flips.len() as i32 + 1;
        let (mine_delta, theirs_delta) = match player {
            Player::Black => (black_after as i32 - black_before as i32, white_after as i32 - white_before as i32),
            Player::White => (white_after as i32 - white_before as i32, black_after as i32 - black_before as i32),
        };
        assert_eq!(mine_delta, gained);
        assert_eq!(theirs_delta, -(flips.len() as i32));

        to_move = match OthelloRules::next_turn(&board, player) {
            TurnAdvance::Pass(next) => Some(next),
            TurnAdvance::Retain(same) => {
                assert!(!OthelloRules::has_valid_moves(&board, player.opposite()));
                Some(same)
            }
            TurnAdvance::GameOver(_) => {
                assert!(OthelloRules::is_game_over(&board));
                None
            }
        };
    }

    (board, to_move)
}

proptest! {
    #[test]
    fn test_othello_playout_invariants(choices in choice_sequence_strategy()) {
        let (board, _) = play_othello(&choices);
        let (black, white) = board.count_pieces();
        prop_assert_eq!(black as usize + white as usize + board.count_empty() as usize, 64);
    }

    #[test]
    fn test_othello_legal_moves_rotate_with_board(choices in choice_sequence_strategy()) {
        let (board, _) = play_othello(&choices);
        let rotated = board.rotated();

        for player in [Player::Black, Player::White] {
            let mut expected: Vec<_> = OthelloRules::get_all_legal_moves(&board, player)
                .into_iter()
                .map(|m| m.position.rotated())
                .collect();
            let mut actual: Vec<_> = OthelloRules::get_all_legal_moves(&rotated, player)
                .into_iter()
                .map(|m| m.position)
                .collect();
            expected.sort_by_key(|p| (p.row, p.col));
            actual.sort_by_key(|p| (p.row, p.col));
            prop_assert_eq!(expected, actual);
        }
    }

    #[test]
    fn test_greedy_picks_maximum_captures(choices in choice_sequence_strategy()) {
        let (board, to_move) = play_othello(&choices);
        if let Some(player) = to_move {
            let moves = OthelloRules::get_all_legal_moves(&board, player);
            let best = moves.iter().map(|m| m.capture_count()).max().unwrap();
            let chosen = GreedyAI::new().calculate_move(&board, player.side()).unwrap();

            prop_assert_eq!(chosen.capture_count(), best);
            // 同数の場合は走査順で最初の手
            let first_best = moves.iter().find(|m| m.capture_count() == best).unwrap();
            prop_assert_eq!(chosen.position, first_best.position);
        }
    }

    #[test]
    fn test_tictactoe_session_terminates_exactly_when_finished(choices in prop::collection::vec(any::<usize>(), 0..12)) {
        let mut session = GameSession::new(SessionConfig::two_player(GameKind::TicTacToe)).unwrap();

        for choice in choices {
            let legal = session.legal_moves();
            if legal.is_empty() {
                break;
            }
            session.submit_move(legal[choice % legal.len()]).unwrap();

            let board = match &session.board {
                GameBoard::TicTacToe(board) => *board,
                _ => unreachable!(),
            };
            let finished = TicTacToeRules::evaluate(&board).is_finished();
            prop_assert_eq!(finished, !session.is_active());
        }

        let expected_total = if session.is_active() { 0 } else { 1 };
        prop_assert_eq!(session.scores.total(), expected_total);
    }

    #[test]
    fn test_heuristic_takes_available_win(choices in prop::collection::vec(any::<usize>(), 0..8), seed in any::<u64>()) {
        // O の番になる局面まで進める
        let mut board = tictactoe::Board::new();
        let mut mark = Mark::X;
        for choice in choices {
            let empty = TicTacToeRules::empty_cells(&board);
            if empty.is_empty() || TicTacToeRules::evaluate(&board).is_finished() {
                break;
            }
            TicTacToeRules::apply_move(&mut board, empty[choice % empty.len()], mark).unwrap();
            mark = mark.opposite();
        }
        let o_can_win = mark == Mark::O
            && !TicTacToeRules::evaluate(&board).is_finished()
            && TicTacToeRules::find_completing_move(&board, Mark::O).is_some();
        if !o_can_win {
            return Ok(());
        }

        let idx = HeuristicAI::with_seed(seed).calculate_move(&board, Side::Second).unwrap();
        TicTacToeRules::apply_move(&mut board, idx, Mark::O).unwrap();
        let won_by_o = matches!(TicTacToeRules::evaluate(&board), Evaluation::Won { winner: Mark::O, .. });
        prop_assert!(won_by_o);
    }
}

/// 人間側の全ての手順を試し、ミニマックスが一度も負けないことを確かめる
fn explore_against_minimax(board: tictactoe::Board, games: &mut usize) {
    let ai = MinimaxAI::new();

    for idx in TicTacToeRules::empty_cells(&board) {
        let mut after_human = board;
        TicTacToeRules::apply_move(&mut after_human, idx, Mark::X).unwrap();

        match TicTacToeRules::evaluate(&after_human) {
            Evaluation::Won { .. } => panic!("minimax lost after human played {}", coord_of(idx)),
            Evaluation::Draw => {
                *games += 1;
                continue;
            }
            Evaluation::InProgress => {}
        }

        let reply = ai.calculate_move(&after_human, Side::Second).unwrap();
        let mut after_ai = after_human;
        TicTacToeRules::apply_move(&mut after_ai, reply, Mark::O).unwrap();

        if TicTacToeRules::evaluate(&after_ai).is_finished() {
            *games += 1;
        } else {
            explore_against_minimax(after_ai, games);
        }
    }
}

#[test]
fn test_minimax_never_loses() {
    let mut games = 0;
    explore_against_minimax(tictactoe::Board::new(), &mut games);
    assert!(games > 0);
}

#[test]
fn test_minimax_self_play_is_draw() {
    let ai = MinimaxAI::new();
    let mut board = tictactoe::Board::new();
    let mut side = Side::First;

    while !TicTacToeRules::evaluate(&board).is_finished() {
        let idx = ai.calculate_move(&board, side).unwrap();
        TicTacToeRules::apply_move(&mut board, idx, Mark::from(side)).unwrap();
        side = side.opposite();
    }

    assert_eq!(TicTacToeRules::evaluate(&board), Evaluation::Draw);
}

#[tokio::test]
async fn test_concurrent_moves_only_one_applies() {
    let service = GameService::new(
        Arc::new(SessionManager::new(10)),
        Arc::new(LocalAIService::new_fast()),
        PacingConfig::instant(),
    );
    let session = service
        .create_session(SessionConfig::vs_computer(GameKind::TicTacToe, Difficulty::Heuristic))
        .unwrap();

    let session_id = session.id;
    let attempts = (0..9).map(|idx| {
        let service = service.clone();
        let coord = coord_of(idx);
        async move { service.submit_move(session_id, coord).await }
    });
    let results = futures::future::join_all(attempts).await;

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(results.iter().filter_map(|r| r.as_ref().err()).all(|e| matches!(
        e,
        GameError::InvalidState { reason: InvalidStateReason::NotYourTurn }
    )));

    let snapshot = service.get_session(session.id).unwrap();
    assert_eq!(snapshot.move_count, 1);
    assert!(matches!(snapshot.turn, TurnState::AwaitingMove { side: Side::Second, .. }));
}

#[tokio::test]
async fn test_full_game_against_computer_terminates() {
    let service = GameService::new(
        Arc::new(SessionManager::new(10)),
        Arc::new(LocalAIService::new_fast()),
        PacingConfig::instant(),
    );
    let session = service
        .create_session(SessionConfig::vs_computer(GameKind::Othello, Difficulty::Weighted))
        .unwrap();

    for _ in 0..128 {
        let snapshot = service.get_session(session.id).unwrap();
        if !snapshot.is_active() {
            break;
        }
        if snapshot.is_computer_turn() {
            service.computer_move(session.id).await.unwrap();
        } else {
            let moves: Vec<Coord> = service.get_legal_moves(session.id).unwrap();
            service.submit_move(session.id, moves[0]).await.unwrap();
        }
    }

    let finished = service.get_session(session.id).unwrap();
    assert!(matches!(finished.turn, TurnState::Terminated { .. }));
    assert_eq!(finished.scores.total(), 1);
    assert!(finished.legal_moves().is_empty());
}
