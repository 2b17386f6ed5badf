pub mod builder;
pub mod config;
pub mod error;
pub mod graph;
pub mod host;
pub mod ignore;
pub mod kind;
pub mod logging;
pub mod resolver;
pub mod traverse;

pub use builder::{AssetGraphBuilder, BuildOutput, ScanFailure};
pub use config::ScanConfig;
pub use error::{Result, ScanError};
pub use graph::ReferenceGraph;
pub use ignore::IgnoreRules;
pub use kind::KindHierarchy;
pub use resolver::ReferenceResolver;
pub use traverse::ObjectGraphTraverser;
