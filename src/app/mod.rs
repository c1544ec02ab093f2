pub mod ports;
pub mod route_batch_use_case;
