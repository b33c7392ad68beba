use crate::connection::ModbusConnection;
use async_trait::async_trait;
use solar_core::{ProviderError, Result};
use solar_protocol::Connection;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio_modbus::client::rtu;
use tokio_modbus::prelude::*;
use tokio_serial::{DataBits, Parity, SerialPortType, SerialStream, StopBits};
use tracing::{debug, info};

/// 连接目标
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModbusTarget {
    /// 直接给出串口路径
    Serial { path: String },
    /// 在系统枚举的串口中按名称匹配
    ListedSerial { name: String },
    /// 通过 TCP 透传 RTU 帧的网关
    Bridge { host: String, port: u16 },
}

/// Modbus RTU 客户端
pub struct ModbusClient {
    target: ModbusTarget,
    baudrate: u32,
    slave_id: u8,
    timeout: Duration,
    context: Option<client::Context>,
}

impl ModbusClient {
    pub fn new(target: ModbusTarget, baudrate: u32, slave_id: u8, timeout: Duration) -> Self {
        Self {
            target,
            baudrate,
            slave_id,
            timeout,
            context: None,
        }
    }

    fn context_mut(&mut self) -> Result<&mut client::Context> {
        self.context
            .as_mut()
            .ok_or_else(|| ProviderError::modbus("Not connected"))
    }
}

#[async_trait]
impl Connection for ModbusClient {
    async fn connect(&mut self) -> Result<()> {
        if self.context.is_some() {
            return Ok(());
        }

        let context = attach(self.target.clone(), self.baudrate, self.slave_id, self.timeout).await?;
        self.context = Some(context);

        info!(
            device = ?self.target,
            baudrate = %self.baudrate,
            slave_id = %self.slave_id,
            "Connected to Modbus device"
        );

        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        // 丢弃 context 即释放串口或 TCP 连接
        if self.context.take().is_some() {
            debug!(device = ?self.target, "Disconnected from Modbus device");
        }
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.context.is_some()
    }
}

#[async_trait]
impl ModbusConnection for ModbusClient {
    async fn read_input_registers(&mut self, addr: u16, count: u16) -> Result<Vec<u16>> {
        let timeout = self.timeout;
        let ctx = self.context_mut()?;
        let values = tokio::time::timeout(timeout, ctx.read_input_registers(addr, count))
            .await
            .map_err(|_| ProviderError::Timeout(timeout.as_millis() as u64))?
            .map_err(|e| ProviderError::modbus(format!("Modbus IO error: {:?}", e)))?
            .map_err(|e| ProviderError::Exception(format!("{:?}", e)))?;

        debug!(addr = %addr, count = %count, "Read input registers");

        Ok(values)
    }

    async fn read_holding_registers(&mut self, addr: u16, count: u16) -> Result<Vec<u16>> {
        let timeout = self.timeout;
        let ctx = self.context_mut()?;
        let values = tokio::time::timeout(timeout, ctx.read_holding_registers(addr, count))
            .await
            .map_err(|_| ProviderError::Timeout(timeout.as_millis() as u64))?
            .map_err(|e| ProviderError::modbus(format!("Modbus IO error: {:?}", e)))?
            .map_err(|e| ProviderError::Exception(format!("{:?}", e)))?;

        debug!(addr = %addr, count = %count, "Read holding registers");

        Ok(values)
    }
}

fn open_serial(path: &str, baudrate: u32, timeout: Duration) -> Result<SerialStream> {
    let builder = tokio_serial::new(path, baudrate)
        .data_bits(DataBits::Eight)
        .parity(Parity::None)
        .stop_bits(StopBits::One)
        .timeout(timeout);

    SerialStream::open(&builder).map_err(|e| ProviderError::Io(e.into()))
}

async fn attach(
    target: ModbusTarget,
    baudrate: u32,
    slave_id: u8,
    timeout: Duration,
) -> Result<client::Context> {
    let slave = Slave(slave_id);

    let context = match target {
        ModbusTarget::Serial { path } => rtu::attach_slave(open_serial(&path, baudrate, timeout)?, slave),
        ModbusTarget::ListedSerial { name } => {
            let path = resolve_listed_port(&name)?;
            rtu::attach_slave(open_serial(&path, baudrate, timeout)?, slave)
        }
        ModbusTarget::Bridge { host, port } => {
            let stream = tokio::time::timeout(timeout, TcpStream::connect((host.as_str(), port)))
                .await
                .map_err(|_| ProviderError::Timeout(timeout.as_millis() as u64))??;
            rtu::attach_slave(stream, slave)
        }
    };

    Ok(context)
}

/// 在可用串口中查找名称匹配的设备（端口名、产品名或序列号）
fn resolve_listed_port(name: &str) -> Result<String> {
    let ports = tokio_serial::available_ports().map_err(|e| ProviderError::Io(e.into()))?;

    ports
        .into_iter()
        .find(|port| {
            if port.port_name == name {
                return true;
            }
            match &port.port_type {
                SerialPortType::UsbPort(usb) => {
                    usb.product.as_deref() == Some(name) || usb.serial_number.as_deref() == Some(name)
                }
                _ => false,
            }
        })
        .map(|port| port.port_name)
        .ok_or_else(|| ProviderError::NotFound(format!("Serial port not listed: {}", name)))
}
