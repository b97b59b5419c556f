use crate::board::Score;

/// Summary of one finished first-move search
pub struct SearchInfo {
    pub first_move: usize,
    pub score: Score,
    pub best_reply: Option<usize>,
    pub nodes: u64,
    pub table_hits: u64,
    pub flushes: u32,
    pub max_ply: u32,
    pub time_ms: u128,
}

pub trait SearchLogger {
    fn info(&self, info: &SearchInfo);
}

pub struct StdoutLogger;

impl SearchLogger for StdoutLogger {
    fn info(&self, info: &SearchInfo) {
        println!(
            "first move {}: {} reply {} nodes {} hits {} flushes {} maxply {} time {}",
            info.first_move,
            info.score,
            info.best_reply
                .map_or_else(|| "-".to_string(), |well| well.to_string()),
            info.nodes,
            info.table_hits,
            info.flushes,
            info.max_ply,
            info.time_ms
        );
    }
}

/// Discards every report
pub struct SilentLogger;

impl SearchLogger for SilentLogger {
    fn info(&self, _info: &SearchInfo) {}
}
