// LOC service client module.

pub mod http;

#[cfg(test)]
pub(crate) mod stub;

pub use http::LocClient;
