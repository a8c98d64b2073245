//! Search limits: settings snapshot, time budget, and stop predicate.

use std::time::{Duration, Instant};

use rampart_core::Color;

/// A snapshot of the limits for one search, taken by the controller
/// when `go` arrives and read-only for the duration of the search.
#[derive(Debug, Clone, Default)]
pub struct SearchSettings {
    /// Stop deepening after completing this iteration.
    pub max_depth: Option<u32>,
    /// Abort once this many nodes have been visited.
    pub max_nodes: Option<u64>,
    /// Moves remaining until the next time control.
    pub movestogo: Option<u32>,
    /// Never stop on time; only `stop` ends the search.
    pub infinite: bool,
    /// Pondering: ignore every limit until told otherwise.
    pub ponder: bool,
    /// Hard per-move time cap (`go movetime`).
    pub max_time: Option<Duration>,
    /// White's remaining clock time.
    pub wtime: Option<Duration>,
    /// Black's remaining clock time.
    pub btime: Option<Duration>,
    /// White's increment per move.
    pub winc: Option<Duration>,
    /// Black's increment per move.
    pub binc: Option<Duration>,
}

/// Per-search time bookkeeping and the stop predicate.
///
/// Built by the root driver from the settings and the side to move.
/// The soft budget (`move_time`) is derived from the clock; when the
/// side to move has no clock, only `max_time` and `max_nodes` bind.
#[derive(Debug)]
pub struct TimeController {
    search_start: Instant,
    last_update: Instant,
    move_time: Option<Duration>,
    max_time: Option<Duration>,
    max_nodes: Option<u64>,
    infinite: bool,
    ponder: bool,
}

/// Interval between periodic `info` telemetry lines.
const UPDATE_INTERVAL: Duration = Duration::from_secs(2);

impl TimeController {
    /// Compute limits for a search starting at `start`.
    ///
    /// `positions_played` is the number of positions in the game so
    /// far (including the root), from which the move number is
    /// derived. The soft budget is:
    ///
    /// - no `movestogo`: `time/40` for the first dozen moves, then
    ///   a tenth of the remaining clock;
    /// - with `movestogo`: `0.95 * time / movestogo + increment / 3`.
    pub fn new(
        settings: &SearchSettings,
        side: Color,
        positions_played: usize,
        start: Instant,
    ) -> TimeController {
        let (clock, increment) = match side {
            Color::White => (settings.wtime, settings.winc),
            Color::Black => (settings.btime, settings.binc),
        };

        let move_time = clock.map(|clock| {
            let clock_ms = clock.as_millis() as u64;
            let increment_ms = increment.unwrap_or(Duration::ZERO).as_millis() as u64;
            let move_number = (positions_played + 2) / 2;
            let budget_ms = match settings.movestogo {
                None | Some(0) => {
                    if move_number < 12 {
                        clock_ms / 40
                    } else {
                        clock_ms / 10
                    }
                }
                Some(n) => clock_ms * 95 / 100 / u64::from(n) + increment_ms / 3,
            };
            Duration::from_millis(budget_ms)
        });

        TimeController {
            search_start: start,
            last_update: start,
            move_time,
            max_time: settings.max_time,
            max_nodes: settings.max_nodes,
            infinite: settings.infinite,
            ponder: settings.ponder,
        }
    }

    /// Time since the search started.
    pub fn elapsed(&self) -> Duration {
        self.search_start.elapsed()
    }

    /// The soft per-move budget, if one could be computed.
    pub fn move_time(&self) -> Option<Duration> {
        self.move_time
    }

    /// Whether the search should stop now.
    ///
    /// Pondering suppresses every limit; an infinite search suppresses
    /// the time limits but still honors the node cap.
    pub fn should_stop(&self, nodes: u64) -> bool {
        if self.ponder {
            return false;
        }
        if let Some(max_nodes) = self.max_nodes {
            if nodes > max_nodes {
                return true;
            }
        }
        if self.infinite {
            return false;
        }
        let elapsed = self.elapsed();
        if let Some(move_time) = self.move_time {
            if elapsed > move_time {
                return true;
            }
        }
        if let Some(max_time) = self.max_time {
            if elapsed > max_time {
                return true;
            }
        }
        false
    }

    /// Rate-limit periodic telemetry to one line every two seconds.
    ///
    /// Returns true when an update is due and resets the interval.
    pub fn should_emit_update(&mut self) -> bool {
        if self.last_update.elapsed() >= UPDATE_INTERVAL {
            self.last_update = Instant::now();
            true
        } else {
            false
        }
    }
}
