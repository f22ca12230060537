mod openai;
pub mod prompt;
pub use openai::OpenAiExtractor;
