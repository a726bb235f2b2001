//! OpenAI integrations: structured chat completions and DALL-E images.

mod completion;
mod dalle;

pub use completion::OpenAiCompletionClient;
pub use dalle::{DalleProvider, DalleProviderBuilder};
