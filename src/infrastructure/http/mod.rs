mod client;
mod retry;

pub use client::HttpClient;
pub use retry::RetryPolicy;
