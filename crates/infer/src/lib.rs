pub mod banks;
pub mod engine;
pub mod resolver;

pub use banks::{BankCalendar, BankFormatTable};
pub use engine::{
    Alternative, ContextualResolver, DateInferenceContext, DateInferenceEngine,
    DateInferenceResult, InferenceMethod,
};
pub use resolver::{SimpleEraTable, YearResolver};
