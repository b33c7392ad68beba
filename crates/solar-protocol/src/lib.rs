pub mod address;
pub mod connection;
pub mod setting;
pub mod types;

pub use address::ProviderAddress;
pub use connection::{Connection, ConnectionFactory};
pub use setting::{ModbusEncoding, Setting};
pub use types::{KnownProtocol, SupportedInterface};
