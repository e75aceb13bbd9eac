//! Reusable entity templates and their instantiation.

mod definition;
mod instantiate;
mod patch;
mod registry;

pub use definition::{parse_prefabs, PrefabDefinition, PrefabEntity, MAX_PREFAB_DEPTH};
pub use instantiate::{InstanceRequest, InstantiateError, PrefabInstantiator};
pub use patch::{apply, OverridePatch};
pub use registry::{PrefabRegistry, PrefabRegistryError};
