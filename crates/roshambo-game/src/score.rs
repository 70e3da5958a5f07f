use crate::match_engine::MatchResult;

/// Receives every finished round. Storage is up to the implementor.
pub trait ScoreReporter {
    fn record(&mut self, result: &MatchResult);
}
