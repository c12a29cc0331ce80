//! Shared domain types, errors, and configuration for LexiSync.

pub mod config;
pub mod error;
pub mod types;

pub use config::{
    AppConfig, DefaultsConfig, MongoConfig, ProviderConfig, config_dir, config_file_path,
    init_config, load_config, load_config_from,
};
pub use error::{LexiSyncError, Result};
pub use types::{Course, Language, ProviderSkill, SkillRecord, TranslationRecord};
