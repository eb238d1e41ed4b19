mod diff_client;

pub use diff_client::*;
