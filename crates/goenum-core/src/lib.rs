pub mod config;
pub mod error;
pub mod generate;
pub mod locate;
pub mod parse;
pub mod render;
pub mod resolve;

pub use config::{EnumConfig, Features};
pub use generate::{GeneratedFile, generate, output_path, plan};
