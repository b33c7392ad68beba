pub mod builder;
pub mod client;
pub mod codec;
pub mod connection;
pub mod factory;
pub mod planner;
pub mod types;

pub use builder::ModbusConfigurationBuilder;
pub use client::{ModbusClient, ModbusTarget};
pub use codec::RegisterCodec;
pub use connection::ModbusConnection;
pub use factory::ModbusConnectionFactory;
pub use planner::{ReadBatch, ReadPlanner, RegisterSpan};
pub use types::{DataType, RegisterType};
