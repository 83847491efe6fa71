// Service exports
pub mod postgres;

pub use postgres::{IncomingRequest, PostgresClient, PostgresError, SentRequest};
