pub mod server;

pub use server::{Pacing, ServerConfig};
