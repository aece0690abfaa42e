//! Evaluation engine.
//!
//! - [`validator`]: pulls a JSON object out of model text and checks its schema
//! - [`scorer`]: intent classification diffing and entity-set diffing
//! - [`resources`]: system resource sampling around inference calls
//! - [`runner`]: drives one model through the corpus and summarizes the run
//! - [`analyzer`]: ranks runs against each other

pub mod analyzer;
pub mod resources;
pub mod runner;
pub mod scorer;
pub mod validator;

pub use analyzer::analyze;
pub use resources::SystemSampler;
pub use runner::{summarize, SuiteOptions, SuiteRun, SuiteRunner};
pub use scorer::{classify, score_entities};
pub use validator::{validate, ParsedResponse, ValidationFailure};
