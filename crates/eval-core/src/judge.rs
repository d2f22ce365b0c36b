//! Move judging: strict SAN token comparison.

/// Check and mate decorations a model may append to its move.
const DECORATIONS: &[char] = &['+', '#'];

/// Compare a predicted move with the ground truth.
///
/// The ground truth is taken as canonical; only the prediction has its
/// trailing `+`/`#` removed. No chess-rules equivalence is attempted, so
/// `Nbd2` and `Nd2` are different answers.
pub fn judge_move(predicted: Option<&str>, correct: &str) -> bool {
    let Some(predicted) = predicted else {
        return false;
    };
    let predicted = predicted.trim().trim_end_matches(DECORATIONS);
    !predicted.is_empty() && predicted == correct.trim()
}
