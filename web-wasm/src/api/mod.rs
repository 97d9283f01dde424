//! ブラウザAPI・HTTP連携

pub mod geolocation;
pub mod http;
pub mod upload;
