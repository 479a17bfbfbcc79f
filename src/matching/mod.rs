pub mod matcher;
pub mod strategy;

pub use matcher::{identify_flips, FlipMatcher};
pub use strategy::{
    evaluate_pair, AdjacentPairs, AllPairs, FirstQualifying, MatchStrategy, StrategyRegistry,
};
