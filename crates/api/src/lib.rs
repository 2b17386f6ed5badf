pub mod error;
pub mod host;
pub mod models;

pub use error::{HostError, HostResult};
pub use host::{
    AssetLoader, Host, IdentityService, Instantiator, NoProgress, ObjectModel, PrefabLinks,
    ProgressSink, SceneEnvironment, ScriptLinks, StateMachines,
};
pub use models::*;
