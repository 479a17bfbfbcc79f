pub mod inference;
pub mod scorer;
pub mod template;

pub use inference::{city_of, infer_business_type, infer_location};
pub use scorer::{estimated_yearly_volume, priority_score, rank, OutreachScorer};
pub use template::outreach_template;
