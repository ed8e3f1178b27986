// crates/minimax-core/tests/search_properties.rs
use std::collections::HashSet;

use minimax_core::{
    analyze, AnalysisRequest, ConnectFourState, GameKind, Player, Position, Searcher,
    TicTacToeState, Window,
};

fn run(kind: GameKind, board: &str, alpha_beta: bool, depth: Option<i64>) -> (Vec<f64>, u64) {
    let request = AnalysisRequest::parse(kind, board, alpha_beta, depth.is_some(), depth)
        .expect("valid request");
    let result = analyze(&request);
    (result.evaluations, result.evaluated_nodes)
}

/// Every non-terminal tic-tac-toe position reachable from the empty board.
fn reachable_tic_tac_toe() -> Vec<(TicTacToeState, Player)> {
    let mut seen = HashSet::new();
    let mut stack = vec![(TicTacToeState::new(), Player::Max)];
    let mut out = Vec::new();
    while let Some((state, to_move)) = stack.pop() {
        if !seen.insert(state) || state.outcome().is_some() {
            continue;
        }
        out.push((state, to_move));
        for child in state.successors(to_move) {
            stack.push((child, to_move.opponent()));
        }
    }
    out
}

#[test]
fn alpha_beta_matches_minimax_on_every_tic_tac_toe_position() {
    let positions = reachable_tic_tac_toe();
    // 5478 legal boards, minus the 958 finished ones.
    assert_eq!(positions.len(), 4520);

    let mut plain = Searcher::new();
    let mut pruned = Searcher::new();
    for (state, to_move) in positions {
        let exact = plain.minimax(state, to_move);
        let cut = pruned.alpha_beta(state, to_move, Window::FULL);
        assert_eq!(exact.value, cut.value, "value differs on {state}");
        assert!(
            cut.nodes <= exact.nodes,
            "alpha-beta expanded more nodes on {state}: {} > {}",
            cut.nodes,
            exact.nodes
        );
    }
}

#[test]
fn depth_zero_returns_the_estimate_as_one_node() {
    let boards = [",,,,,,", "yy,r,r,,,,", "yry,ry,y,r,,,", "yr,yr,r,y,,,", ",,,y,,,"];
    for board in boards {
        let state = ConnectFourState::decode(board).unwrap();
        let to_move = state.to_move();
        let mut searcher = Searcher::new();
        let e = searcher.depth_limited(state, to_move, 0);
        assert_eq!(e.nodes, 1, "{board}");
        assert_eq!(e.value, state.estimate(to_move), "{board}");

        let e = searcher.depth_limited_alpha_beta(state, to_move, 0, Window::FULL);
        assert_eq!(e.nodes, 1, "{board}");
    }
}

#[test]
fn estimate_scores_favorable_lines_for_max() {
    let cases = [
        ("yy,r,r,,,,", 0.0),
        ("yry,ry,y,r,,,", 0.02),
        ("yr,yr,r,y,,,", -0.02),
    ];
    for (board, expected) in cases {
        let state = ConnectFourState::decode(board).unwrap();
        let value = minimax_core::round2(state.estimate(state.to_move()));
        assert_eq!(value, expected, "{board}");
    }
}

#[test]
fn tic_tac_toe_scenarios() {
    let cases: [(&str, &[f64]); 5] = [
        ("xo_______", &[0.0, 1.0, 1.0, 0.0, 1.0, 0.0, 0.0]),
        ("_________", &[0.0; 9]),
        ("x___o____", &[0.0; 7]),
        ("xx_oo____", &[1.0, 0.0, -1.0, -1.0, -1.0]),
        ("xo_xo____", &[-1.0, -1.0, 1.0, 0.0, -1.0]),
    ];
    for (board, expected) in cases {
        for alpha_beta in [false, true] {
            let (evaluations, nodes) = run(GameKind::TicTacToe, board, alpha_beta, None);
            assert_eq!(evaluations, expected, "{board} alpha_beta={alpha_beta}");
            assert!(nodes >= evaluations.len() as u64);
        }
    }
}

#[test]
fn tic_tac_toe_depth_limit_cuts_off_neutrally() {
    // One ply: every reply is a cut-off, and none of them completes a line.
    let (evaluations, nodes) = run(GameKind::TicTacToe, "xo_______", false, Some(1));
    assert_eq!(evaluations, vec![0.0; 7]);
    assert_eq!(nodes, 7);

    // A winning reply is terminal and beats the cut-off.
    let (evaluations, _) = run(GameKind::TicTacToe, "xx_oo____", true, Some(1));
    assert_eq!(evaluations[0], 1.0);
}

#[test]
fn empty_connect_four_shallow_depths() {
    for alpha_beta in [false, true] {
        let (evaluations, nodes) = run(GameKind::ConnectFour, ",,,,,,", alpha_beta, Some(1));
        assert_eq!(evaluations, vec![0.0; 7]);
        assert_eq!(nodes, 7);

        let (evaluations, nodes) = run(GameKind::ConnectFour, ",,,,,,", alpha_beta, Some(2));
        assert_eq!(evaluations, vec![0.0; 7]);
        assert_eq!(nodes, 56);
    }

    let (evaluations, nodes) = run(GameKind::ConnectFour, ",,,,,,", false, Some(3));
    assert_eq!(evaluations, vec![0.02; 7]);
    assert_eq!(nodes, 399);

    let (evaluations, nodes) = run(GameKind::ConnectFour, ",,,,,,", true, Some(3));
    assert_eq!(evaluations, vec![0.02; 7]);
    assert_eq!(nodes, 235);
}

#[test]
fn connect_four_depth_limited_reference_boards() {
    let (evaluations, nodes) = run(GameKind::ConnectFour, "y,,,,,,", false, Some(2));
    assert_eq!(evaluations, vec![0.02; 7]);
    assert_eq!(nodes, 56);

    let (evaluations, nodes) = run(GameKind::ConnectFour, "yy,r,r,,,,", false, Some(1));
    assert_eq!(evaluations, vec![0.04, 0.04, 0.02, 0.02, 0.02, 0.0, 0.0]);
    assert_eq!(nodes, 7);

    for alpha_beta in [false, true] {
        let (evaluations, nodes) = run(GameKind::ConnectFour, "yy,r,r,,,,", alpha_beta, Some(2));
        assert_eq!(evaluations, vec![-0.02, -0.02, -0.02, -0.02, -0.02, -0.04, -0.04]);
        assert_eq!(nodes, 56);

        let (evaluations, nodes) = run(GameKind::ConnectFour, "yyy,rr,r,,,,", alpha_beta, Some(2));
        assert_eq!(evaluations, vec![1.0, 0.02, -0.04, -0.02, -0.02, -0.04, -0.04]);
        assert_eq!(nodes, 49);
    }

    let expected = vec![0.02, 0.0, -0.02, -0.02, 0.0, 0.02, 0.02];
    let (evaluations, nodes) = run(GameKind::ConnectFour, "yry,ry,y,r,,,", false, Some(3));
    assert_eq!(evaluations, expected);
    assert_eq!(nodes, 399);
    let (evaluations, nodes) = run(GameKind::ConnectFour, "yry,ry,y,r,,,", true, Some(3));
    assert_eq!(evaluations, expected);
    assert_eq!(nodes, 195);

    let expected = vec![0.06, 0.04, 0.06, 0.04, 0.06, 0.04, 0.06];
    let (evaluations, nodes) = run(GameKind::ConnectFour, ",,,y,,,", false, Some(4));
    assert_eq!(evaluations, expected);
    assert_eq!(nodes, 2800);
    let (evaluations, nodes) = run(GameKind::ConnectFour, ",,,y,,,", true, Some(4));
    assert_eq!(evaluations, expected);
    assert_eq!(nodes, 1166);
}

#[test]
fn connect_four_endgame_is_solved_exactly() {
    let board = "rryyry,y,ryyr,ryyryy,ryrr,yrryr,yryyrr";

    let (evaluations, nodes) = run(GameKind::ConnectFour, board, false, None);
    assert_eq!(evaluations, vec![1.0, 1.0, 1.0, -1.0]);
    assert_eq!(nodes, 209);

    let (evaluations, nodes) = run(GameKind::ConnectFour, board, true, None);
    assert_eq!(evaluations, vec![1.0, 1.0, 1.0, -1.0]);
    assert_eq!(nodes, 37);
}

#[test]
fn root_without_moves_reports_one_node() {
    // Full board, no line for either side.
    let (evaluations, nodes) = run(GameKind::TicTacToe, "xoxxoooxx", false, None);
    assert!(evaluations.is_empty());
    assert_eq!(nodes, 1);
}
