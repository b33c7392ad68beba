use crate::types::RegisterType;
use async_trait::async_trait;
use solar_core::Result;
use solar_protocol::Connection;

/// Modbus 连接：在 [`Connection`] 之上提供寄存器读取
#[async_trait]
pub trait ModbusConnection: Connection {
    async fn read_input_registers(&mut self, addr: u16, count: u16) -> Result<Vec<u16>>;

    async fn read_holding_registers(&mut self, addr: u16, count: u16) -> Result<Vec<u16>>;

    /// 按寄存器类型分派
    async fn read_registers(
        &mut self,
        register_type: RegisterType,
        addr: u16,
        count: u16,
    ) -> Result<Vec<u16>> {
        match register_type {
            RegisterType::Input => self.read_input_registers(addr, count).await,
            RegisterType::Holding => self.read_holding_registers(addr, count).await,
        }
    }
}
