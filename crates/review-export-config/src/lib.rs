pub mod config;
pub mod paths;

pub use config::{
    AndroidConfig, Config, HttpConfig, IosConfig, OutputConfig, TranslationConfig,
    DEFAULT_ANDROID_MAX_RESULTS, DEFAULT_IOS_MAX_RESULTS,
};
pub use paths::PathManager;
