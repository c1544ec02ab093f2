pub mod hooks;
pub mod http_sink;
