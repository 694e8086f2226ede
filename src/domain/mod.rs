// Domain layer: models and ports. No knowledge of HTTP, files or clap.

pub mod model;
pub mod ports;
