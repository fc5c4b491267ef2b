pub mod envelope;
pub mod submission;

pub use envelope::Envelope;
pub use submission::{FormType, Submission};
