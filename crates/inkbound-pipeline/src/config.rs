use std::path::PathBuf;

/// Tunables the pipeline stages need at construction time. Assembled by the
/// binary crate from environment variables / CLI overrides and handed down
/// as a single value, never read back out of global state.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub tmp_dir: PathBuf,
    pub queue_size: usize,
    pub kindlegen_path: String,
    pub from_address: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            tmp_dir: std::env::temp_dir(),
            queue_size: 10,
            kindlegen_path: "kindlegen".to_string(),
            from_address: "kindle@inkbound.example".to_string(),
        }
    }
}
