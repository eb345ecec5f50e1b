//! Search module for the AI
//!
//! Contains:
//! - Threat detection and move ranking
//! - Fork detection for the forced-threat gate
//! - Depth-bounded alpha-beta search

pub mod alphabeta;
pub mod threat;

pub use alphabeta::{candidate_moves, ordered_moves, SearchResult, Searcher, MATE_SCORE};
pub use threat::{detect_blocks, detect_threats, find_forks, rank_moves, Threat, ThreatKind};
