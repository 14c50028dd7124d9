mod presets;
mod project;

#[cfg(test)]
pub use presets::memory::MemoryStore;
pub use presets::{JsonFileStore, PresetStore};
pub use project::{config_dir, default_log_path, default_presets_path, expand_tilde, project_dir};
