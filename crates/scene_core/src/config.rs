use crate::prefab::MAX_PREFAB_DEPTH;

/// Knobs for one scene-load pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadConfig {
    /// Template levels walked before a subtree is cut off.
    pub max_prefab_depth: usize,
    /// Emit a record for each scene entity itself, not only for what it
    /// instantiates.
    pub emit_seed_records: bool,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            max_prefab_depth: MAX_PREFAB_DEPTH,
            emit_seed_records: true,
        }
    }
}
