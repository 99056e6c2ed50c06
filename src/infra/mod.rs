pub use workbench_app as app;
pub use workbench_domain as domain;

pub mod adapters;
pub mod config;
pub mod registry;

pub use registry::default_registry;
