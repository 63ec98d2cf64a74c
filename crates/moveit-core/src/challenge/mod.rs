mod catalog;
mod selector;

pub use catalog::{Catalog, Challenge, ChallengeType};
pub use selector::{ChallengeSelector, FixedSelector, RandomSelector};
