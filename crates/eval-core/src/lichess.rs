//! Lichess puzzle database rows and their conversion into evaluation
//! positions.
//!
//! Row layout: `PuzzleId,FEN,Moves,Rating,RatingDeviation,Popularity,NbPlays,Themes,GameUrl,OpeningTags`.
//! The FEN is the position before the opponent's setup move (`Moves[0]`);
//! the solver answers with `Moves[1]`.

use shakmaty::{fen::Fen, san::San, uci::UciMove, CastlingMode, Chess, Color, EnPassantMode, Position as _};

use serde_json::{Map, Value};

use crate::error::DatasetError;
use crate::types::Position;

const MIN_COLUMNS: usize = 8;

#[derive(Debug, Clone, PartialEq)]
pub struct LichessPuzzle {
    pub puzzle_id: String,
    pub fen: String,
    /// Space-separated UCI moves
    pub moves: String,
    pub rating: Option<u32>,
    pub themes: Vec<String>,
}

impl LichessPuzzle {
    /// Parse one CSV line. Returns `Ok(None)` for the header row.
    pub fn from_csv_line(line: &str) -> Result<Option<Self>, DatasetError> {
        let cols: Vec<&str> = line.trim_end_matches(['\r', '\n']).split(',').collect();
        if cols.len() < MIN_COLUMNS {
            return Err(DatasetError::MalformedRow(line.to_string()));
        }
        if cols[0] == "PuzzleId" {
            return Ok(None);
        }

        Ok(Some(Self {
            puzzle_id: cols[0].to_string(),
            fen: cols[1].to_string(),
            moves: cols[2].to_string(),
            rating: cols[3].trim().parse().ok(),
            themes: cols[7].split_whitespace().map(String::from).collect(),
        }))
    }

    pub fn has_theme(&self, theme: &str) -> bool {
        self.themes.iter().any(|t| t == theme)
    }

    /// Play the setup move and express the solver's first move in SAN.
    pub fn to_position(&self) -> Result<Position, DatasetError> {
        let fen = self.fen.parse::<Fen>().map_err(|e| DatasetError::InvalidFen {
            id: self.puzzle_id.clone(),
            reason: e.to_string(),
        })?;
        let start: Chess = fen
            .into_position(CastlingMode::Standard)
            .map_err(|e| DatasetError::InvalidFen {
                id: self.puzzle_id.clone(),
                reason: e.to_string(),
            })?;

        let mut moves = self.moves.split_whitespace();
        let setup_uci = moves
            .next()
            .ok_or_else(|| DatasetError::MissingSolution(self.puzzle_id.clone()))?;
        let solution_uci = moves
            .next()
            .ok_or_else(|| DatasetError::MissingSolution(self.puzzle_id.clone()))?;

        let setup = self.legal_move(&start, setup_uci)?;
        let last_move = San::from_move(&start, setup.clone()).to_string();
        let pos = start.play(setup).map_err(|e| DatasetError::InvalidMove {
            id: self.puzzle_id.clone(),
            uci: setup_uci.to_string(),
            reason: e.to_string(),
        })?;

        let solution = self.legal_move(&pos, solution_uci)?;
        let answer = San::from_move(&pos, solution).to_string();

        let fen_after = Fen::from_position(&pos, EnPassantMode::Legal).to_string();
        let side = match pos.turn() {
            Color::White => "White",
            Color::Black => "Black",
        };

        let question = format!("FEN: {fen_after}\nLast move: {last_move}\n{side} to move.");
        let mut metadata = Map::new();
        metadata.insert("fen".into(), Value::from(fen_after));
        if let Some(rating) = self.rating {
            metadata.insert("rating".into(), Value::from(rating));
        }
        if !self.themes.is_empty() {
            metadata.insert("themes".into(), Value::from(self.themes.clone()));
        }

        Ok(Position {
            id: self.puzzle_id.clone(),
            question,
            answer,
            metadata,
        })
    }

    fn legal_move(&self, pos: &Chess, uci: &str) -> Result<shakmaty::Move, DatasetError> {
        let invalid = |reason: String| DatasetError::InvalidMove {
            id: self.puzzle_id.clone(),
            uci: uci.to_string(),
            reason,
        };
        let uci_move: UciMove = uci.parse().map_err(|_| invalid("not UCI".to_string()))?;
        uci_move.to_move(pos).map_err(|e| invalid(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Black plays ...Kh8 and walks into Re8#
    const BACK_RANK: &str =
        "t3st1,6k1/5ppp/8/8/8/8/5PPP/4R1K1 b - - 0 1,g8h8 e1e8,1200,75,90,500,backRankMate mate mateIn1 oneMove,https://lichess.org/x,";

    #[test]
    fn test_parse_csv_line() {
        let puzzle = LichessPuzzle::from_csv_line(BACK_RANK).unwrap().unwrap();
        assert_eq!(puzzle.puzzle_id, "t3st1");
        assert_eq!(puzzle.moves, "g8h8 e1e8");
        assert_eq!(puzzle.rating, Some(1200));
        assert!(puzzle.has_theme("mateIn1"));
        assert!(!puzzle.has_theme("mateIn2"));
    }

    #[test]
    fn test_header_row_is_skipped() {
        let header = "PuzzleId,FEN,Moves,Rating,RatingDeviation,Popularity,NbPlays,Themes,GameUrl,OpeningTags";
        assert_eq!(LichessPuzzle::from_csv_line(header).unwrap(), None);
    }

    #[test]
    fn test_short_row_is_rejected() {
        assert!(matches!(
            LichessPuzzle::from_csv_line("abc,def"),
            Err(DatasetError::MalformedRow(_))
        ));
    }

    #[test]
    fn test_to_position() {
        let puzzle = LichessPuzzle::from_csv_line(BACK_RANK).unwrap().unwrap();
        let pos = puzzle.to_position().unwrap();
        assert_eq!(pos.id, "t3st1");
        assert_eq!(pos.answer, "Re8");
        assert!(pos.question.contains("Last move: Kh8"));
        assert!(pos.question.ends_with("White to move."));
        assert_eq!(pos.meta_str("fen"), Some("7k/5ppp/8/8/8/8/5PPP/4R1K1 w - - 1 2"));
        assert_eq!(pos.metadata.get("rating"), Some(&serde_json::json!(1200)));
    }

    #[test]
    fn test_illegal_move() {
        let mut puzzle = LichessPuzzle::from_csv_line(BACK_RANK).unwrap().unwrap();
        puzzle.moves = "g8h8 e1e9".to_string();
        assert!(matches!(puzzle.to_position(), Err(DatasetError::InvalidMove { .. })));

        puzzle.moves = "g8h8 a1a8".to_string();
        assert!(matches!(puzzle.to_position(), Err(DatasetError::InvalidMove { .. })));
    }

    #[test]
    fn test_missing_solution() {
        let mut puzzle = LichessPuzzle::from_csv_line(BACK_RANK).unwrap().unwrap();
        puzzle.moves = "g8h8".to_string();
        assert!(matches!(puzzle.to_position(), Err(DatasetError::MissingSolution(_))));
    }

    #[test]
    fn test_invalid_fen() {
        let mut puzzle = LichessPuzzle::from_csv_line(BACK_RANK).unwrap().unwrap();
        puzzle.fen = "not a fen".to_string();
        assert!(matches!(puzzle.to_position(), Err(DatasetError::InvalidFen { .. })));
    }
}
