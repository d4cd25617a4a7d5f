//! Pipeline configuration.

use clips_media::EngineConfig;

use crate::submit::SubmitConfig;

/// Configuration for one upload pipeline instance.
#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    /// Submission endpoint settings.
    pub submit: SubmitConfig,
    /// Transcode engine settings.
    pub engine: EngineConfig,
}

impl PipelineConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            submit: SubmitConfig::from_env(),
            engine: EngineConfig::from_env(),
        }
    }
}
