// Config module - api manifests declaring endpoints in yaml

pub mod endpoints;
pub mod yml_settings;

pub use yml_settings::{ApiSettings, EndpointSettings};
