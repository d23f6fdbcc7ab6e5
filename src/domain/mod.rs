// Domain layer: request/response data, payload models and ports. No network code here.

pub mod http;
pub mod model;
pub mod ports;
