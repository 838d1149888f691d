mod shared_secret;

pub use shared_secret::{AccessError, SharedSecret};
