use super::*;
use crate::error::EngineError;

#[test]
fn test_stone_opponent() {
    assert_eq!(Stone::Black.opponent(), Stone::White);
    assert_eq!(Stone::White.opponent(), Stone::Black);
    assert_eq!(Stone::Empty.opponent(), Stone::Empty);
}

#[test]
fn test_role_opponent() {
    assert_eq!(Role::ME.opponent(), Role::OPPONENT);
    assert_eq!(Role::OPPONENT.opponent(), Role::ME);
    assert_eq!(Role::ME.cell(), 1);
    assert_eq!(Role::OPPONENT.cell(), -1);
    assert_ne!(Role::ME.index(), Role::OPPONENT.index());
}

#[test]
fn test_pos_conversion() {
    let pos = Pos::new(7, 7); // Center
    assert_eq!(pos.to_index(), 7 * 15 + 7);
    assert_eq!(pos.to_index(), 112);

    let pos2 = Pos::from_index(112);
    assert_eq!(pos2, CENTER);
}

#[test]
fn test_pos_validity() {
    assert!(Pos::is_valid(0, 0));
    assert!(Pos::is_valid(14, 14));
    assert!(!Pos::is_valid(-1, 0));
    assert!(!Pos::is_valid(0, -1));
    assert!(!Pos::is_valid(15, 0));
    assert!(!Pos::is_valid(0, 15));
}

#[test]
fn test_board_constants() {
    assert_eq!(BOARD_SIZE, 15);
    assert_eq!(TOTAL_CELLS, 225);
}

#[test]
fn test_pos_corner_indices() {
    assert_eq!(Pos::new(0, 0).to_index(), 0);
    assert_eq!(Pos::new(0, 14).to_index(), 14);
    assert_eq!(Pos::new(14, 0).to_index(), 210);
    assert_eq!(Pos::new(14, 14).to_index(), 224);
}

#[test]
fn test_bitboard_iter_covers_last_word() {
    let mut bb = Bitboard::new();
    bb.set(Pos::new(0, 0));
    bb.set(Pos::new(14, 14));
    let cells: Vec<Pos> = bb.iter_ones().collect();
    assert_eq!(cells, vec![Pos::new(0, 0), Pos::new(14, 14)]);
    assert_eq!(bb.count(), 2);
}

#[test]
fn test_board_place_replaces() {
    let mut board = Board::new();
    let pos = Pos::new(3, 4);
    board.place_stone(pos, Stone::Black);
    board.place_stone(pos, Stone::White);
    assert_eq!(board.get(pos), Stone::White);
    assert_eq!(board.stone_count(), 1);
    board.remove_stone(pos);
    assert!(board.is_board_empty());
}

#[test]
fn test_board_from_rows_checks_dimensions() {
    let rows = vec![vec![Stone::Empty; BOARD_SIZE]; BOARD_SIZE - 1];
    assert_eq!(
        Board::from_rows(&rows),
        Err(EngineError::RowCount { rows: 14, expected: 15 })
    );

    let mut rows = vec![vec![Stone::Empty; BOARD_SIZE]; BOARD_SIZE];
    rows[3].push(Stone::Black);
    assert_eq!(
        Board::from_rows(&rows),
        Err(EngineError::RowLength { row: 3, len: 16, expected: 15 })
    );
}

#[test]
fn test_board_text_roundtrip() {
    let mut board = Board::new();
    board.place_stone(Pos::new(7, 7), Stone::Black);
    board.place_stone(Pos::new(7, 8), Stone::White);
    let text = board.to_string();
    let parsed: Board = text.parse().unwrap();
    assert_eq!(parsed, board);
}

#[test]
fn test_board_text_bad_symbol() {
    let mut text = String::new();
    for r in 0..BOARD_SIZE {
        if r == 2 {
            text.push_str("..Z............\n");
        } else {
            text.push_str("...............\n");
        }
    }
    let err = text.parse::<Board>().unwrap_err();
    assert_eq!(err, EngineError::BadSymbol { symbol: 'Z', row: 2, col: 2 });
}
