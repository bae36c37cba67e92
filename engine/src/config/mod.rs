pub mod settings;

pub use settings::{EngineSettings, Field, FieldAliases};
