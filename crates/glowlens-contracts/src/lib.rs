pub mod contract;
pub mod domain;
pub mod domains;
pub mod events;
pub mod images;
pub mod reliability;

pub use contract::{conform, ContractViolation, ResultContract};
pub use domain::AnalysisDomain;
pub use images::{ImageAngle, ImageData, ImageInput};
pub use reliability::{
    AnalysisEvidence, ImageQuality, LightingCondition, MetricScore, MetricStatus, ReliabilityTier,
};
