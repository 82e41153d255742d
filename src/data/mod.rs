mod model;

pub use model::{DEFAULT_BATCH_COUNT, DEFAULT_LIQUID_TEMP_C, EvaluationRequest};
