//! Industry Tagger Common Library
//!
//! CLIと統合テストで共有される業種語彙・プロンプト

pub mod prompts;
pub mod vocabulary;

pub use prompts::{build_classification_prompt, SYSTEM_PROMPT};
pub use vocabulary::{LabelMatch, Resolution, Vocabulary, INDUSTRIES, UNKNOWN_LABEL};
