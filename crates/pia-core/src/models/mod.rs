pub mod answer;
pub mod assessment;
pub mod evaluation;
pub mod measure;
pub mod records;
pub mod revision;
