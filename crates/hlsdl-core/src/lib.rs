//! hlsdl core: HLS playlist parsing, concurrent segment download with
//! in-order reassembly, and inspection of captured HTTP requests.

pub mod capture;
pub mod checksum;
pub mod config;
pub mod control;
pub mod direct;
pub mod export;
pub mod fetch;
pub mod logging;
pub mod manifest;
pub mod reassembly;
pub mod retry;
pub mod scheduler;
pub mod session;
pub mod storage;
pub mod url_model;

#[cfg(test)]
pub(crate) mod test_support;
