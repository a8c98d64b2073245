//! Static exchange evaluation.
//!
//! Plays out the capture sequence on one square, each side always
//! recapturing with its least valuable attacker, and scores the net
//! material change for the side making the first capture. X-ray
//! attackers are revealed as pieces leave the occupancy set.

use rampart_core::{
    bishop_attacks, king_attacks, knight_attacks, pawn_attacks, rook_attacks, Bitboard, Board,
    Color, Move, MoveKind, PieceKind, Square,
};

/// Exchange values. The king is priced so it never profitably enters
/// an exchange it could lose.
const SEE_VALUE: [i32; PieceKind::COUNT] = [100, 320, 330, 500, 900, 20_000];

/// All pieces of both colors attacking `sq` under occupancy `occ`.
fn attackers_of(board: &Board, sq: Square, occ: Bitboard) -> Bitboard {
    let pawns = board.pieces(PieceKind::Pawn);
    let white_pawns = pawn_attacks(Color::Black, sq) & pawns & board.side(Color::White);
    let black_pawns = pawn_attacks(Color::White, sq) & pawns & board.side(Color::Black);
    let knights = knight_attacks(sq) & board.pieces(PieceKind::Knight);
    let kings = king_attacks(sq) & board.pieces(PieceKind::King);
    let diagonal = bishop_attacks(sq, occ)
        & (board.pieces(PieceKind::Bishop) | board.pieces(PieceKind::Queen));
    let orthogonal =
        rook_attacks(sq, occ) & (board.pieces(PieceKind::Rook) | board.pieces(PieceKind::Queen));
    white_pawns | black_pawns | knights | kings | diagonal | orthogonal
}

/// The least valuable piece of `side` among `attackers`.
fn cheapest_attacker(board: &Board, attackers: Bitboard, side: Color) -> Option<(Square, PieceKind)> {
    for kind in PieceKind::ALL {
        let candidates = attackers & board.side(side) & board.pieces(kind);
        if let Some(sq) = candidates.lsb() {
            return Some((sq, kind));
        }
    }
    None
}

/// Evaluate the exchange started by `mv`, from the mover's perspective.
pub fn see(board: &Board, mv: Move) -> i32 {
    let src = mv.source();
    let dst = mv.dest();
    let mut occ = board.occupied().without(src);

    let first_victim = match mv.kind() {
        MoveKind::EnPassant => {
            let dr = if board.side_to_move() == Color::White { -1 } else { 1 };
            if let Some(captured) = dst.offset(0, dr) {
                occ = occ.without(captured);
            }
            SEE_VALUE[PieceKind::Pawn.index()]
        }
        _ => match board.piece_on(dst) {
            Some(victim) => SEE_VALUE[victim.index()],
            None => 0,
        },
    };

    // The piece now standing on dst, next in line to be captured.
    let mut occupant_value = if mv.kind() == MoveKind::Promotion {
        SEE_VALUE[mv.promotion_piece().kind().index()]
    } else {
        let attacker = board.piece_on(src).unwrap_or(PieceKind::Pawn);
        SEE_VALUE[attacker.index()]
    };

    let mut gain = [0i32; 32];
    gain[0] = first_victim;
    let mut depth = 0usize;
    let mut side = !board.side_to_move();
    let mut attackers = attackers_of(board, dst, occ) & occ;

    while let Some((sq, kind)) = cheapest_attacker(board, attackers, side) {
        depth += 1;
        if depth >= gain.len() {
            break;
        }
        gain[depth] = occupant_value - gain[depth - 1];
        occupant_value = SEE_VALUE[kind.index()];
        occ = occ.without(sq);

        // Removing a piece may uncover a slider behind it.
        match kind {
            PieceKind::Pawn | PieceKind::Bishop | PieceKind::Queen => {
                attackers = attackers
                    | (bishop_attacks(dst, occ)
                        & (board.pieces(PieceKind::Bishop) | board.pieces(PieceKind::Queen)));
            }
            _ => {}
        }
        match kind {
            PieceKind::Rook | PieceKind::Queen => {
                attackers = attackers
                    | (rook_attacks(dst, occ)
                        & (board.pieces(PieceKind::Rook) | board.pieces(PieceKind::Queen)));
            }
            _ => {}
        }
        attackers &= occ;
        side = !side;
    }

    // Minimax backward over the gain chain: either side may stop
    // capturing when continuing loses material.
    while depth > 0 {
        depth -= 1;
        gain[depth] = -((-gain[depth]).max(gain[depth + 1]));
    }
    gain[0]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rampart_core::{generate_moves, GenKind};

    fn capture(board: &Board, from: &str, to: &str) -> Move {
        let from = Square::from_algebraic(from).unwrap();
        let to = Square::from_algebraic(to).unwrap();
        generate_moves(board, GenKind::Captures)
            .iter()
            .copied()
            .find(|m| m.source() == from && m.dest() == to)
            .expect("capture not found")
    }

    #[test]
    fn undefended_piece_is_free() {
        let board: Board = "4k3/8/8/3n4/4P3/8/8/4K3 w - - 0 1".parse().unwrap();
        assert_eq!(see(&board, capture(&board, "e4", "d5")), 320);
    }

    #[test]
    fn defended_piece_costs_the_attacker() {
        // PxN, pxP: gain a knight, lose a pawn.
        let board: Board = "4k3/8/4p3/3n4/4P3/8/8/4K3 w - - 0 1".parse().unwrap();
        assert_eq!(see(&board, capture(&board, "e4", "d5")), 220);
    }

    #[test]
    fn queen_grabbing_defended_pawn_loses() {
        let board: Board = "4k3/8/3p4/2p5/8/4Q3/8/4K3 w - - 0 1".parse().unwrap();
        assert!(see(&board, capture(&board, "e3", "c5")) < 0);
    }

    #[test]
    fn even_trade_of_knights() {
        let board: Board = "4k3/8/8/3n4/8/4N3/8/4K3 w - - 0 1".parse().unwrap();
        assert_eq!(see(&board, capture(&board, "e3", "d5")), 320);
    }

    #[test]
    fn xray_battery_counts() {
        // Rook takes the d5 pawn; the d8 rook recaptures, but White's
        // doubled rook behind on d1 continues the exchange.
        let board: Board = "3r2k1/8/8/3p4/8/8/3R4/3R2K1 w - - 0 1".parse().unwrap();
        // Rxd5 Rxd5 Rxd5: +100 -500 +500 = +100.
        assert_eq!(see(&board, capture(&board, "d2", "d5")), 100);
    }

    #[test]
    fn en_passant_exchange() {
        let board: Board = "rnbqkbnr/ppp1pppp/8/3pP3/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 3"
            .parse()
            .unwrap();
        let ep = generate_moves(&board, GenKind::Captures)
            .iter()
            .copied()
            .find(|m| m.kind() == MoveKind::EnPassant)
            .unwrap();
        // exd6 wins a pawn; the c7 pawn can recapture: 100 - 100 = 0.
        assert_eq!(see(&board, ep), 0);
    }
}
