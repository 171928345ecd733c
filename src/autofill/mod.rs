pub mod client;
pub mod prompt;
pub mod schema;

pub use client::AutofillClient;
pub use prompt::AutofillRequest;
pub use schema::{AiGeneratedDetails, CharacterProposal};
