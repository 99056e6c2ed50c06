pub use workbench_app as app;
pub use workbench_domain as domain;
pub use workbench_infra as infra;

pub mod error;
