pub mod cache;
pub mod ranker;
