mod client;
mod prompt;
mod types;

pub use client::{parse_json_array, OpenAiClient};
pub use prompt::{build_destination_prompt, build_extraction_prompt};
