use async_trait::async_trait;
use solar_core::{ProviderError, Result};
use solar_modbus::ModbusConnection;
use solar_protocol::{Connection, Setting};
use solar_provider::base::ModbusConnectionFactoryRef;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU16, AtomicUsize, Ordering};
use std::sync::Arc;

/// 假电表的共享状态，测试在 Provider 释放连接后检查
#[derive(Default)]
pub struct MeterState {
    pub connects: AtomicUsize,
    pub closes: AtomicUsize,
    pub reads: AtomicUsize,
    pub open: AtomicBool,
    pub max_quantity: AtomicU16,
}

/// 内存中的 SDM630：输入寄存器保存 float32（高字在前）
pub struct FakeMeter {
    registers: Arc<HashMap<u16, u16>>,
    state: Arc<MeterState>,
    faults: Faults,
}

#[derive(Debug, Clone, Copy, Default)]
struct Faults {
    refuse_connect: bool,
    fail_close: bool,
    fail_reads: bool,
}

#[async_trait]
impl Connection for FakeMeter {
    async fn connect(&mut self) -> Result<()> {
        self.state.connects.fetch_add(1, Ordering::SeqCst);
        if self.faults.refuse_connect {
            return Err(ProviderError::Connection("Failed to open /dev/ttyUSB0".to_string()));
        }
        self.state.open.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        self.state.closes.fetch_add(1, Ordering::SeqCst);
        self.state.open.store(false, Ordering::SeqCst);
        if self.faults.fail_close {
            return Err(ProviderError::Io(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "serial port vanished",
            )));
        }
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.state.open.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ModbusConnection for FakeMeter {
    async fn read_input_registers(&mut self, addr: u16, count: u16) -> Result<Vec<u16>> {
        if !self.is_connected() {
            return Err(ProviderError::Connection("Not connected".to_string()));
        }
        self.state.reads.fetch_add(1, Ordering::SeqCst);
        if self.faults.fail_reads {
            return Err(ProviderError::modbus("CRC mismatch"));
        }
        self.state.max_quantity.fetch_max(count, Ordering::SeqCst);
        Ok((addr..addr + count)
            .map(|a| self.registers.get(&a).copied().unwrap_or(0))
            .collect())
    }

    async fn read_holding_registers(&mut self, _addr: u16, _count: u16) -> Result<Vec<u16>> {
        Err(ProviderError::Exception("IllegalFunction".to_string()))
    }
}

pub struct MeterBuilder {
    registers: HashMap<u16, u16>,
    faults: Faults,
}

impl MeterBuilder {
    pub fn new() -> Self {
        Self {
            registers: HashMap::new(),
            faults: Faults::default(),
        }
    }

    pub fn with_float(mut self, address: u16, value: f32) -> Self {
        let bits = value.to_bits();
        self.registers.insert(address, (bits >> 16) as u16);
        self.registers.insert(address + 1, (bits & 0xFFFF) as u16);
        self
    }

    pub fn refusing_connect(mut self) -> Self {
        self.faults.refuse_connect = true;
        self
    }

    pub fn failing_close(mut self) -> Self {
        self.faults.fail_close = true;
        self
    }

    /// 所有寄存器读取都返回传输错误
    pub fn failing_reads(mut self) -> Self {
        self.faults.fail_reads = true;
        self
    }

    /// 每次 `create_connection` 返回一个新的假连接，共享同一状态
    pub fn factory(self) -> (ModbusConnectionFactoryRef, Arc<MeterState>) {
        let state = Arc::new(MeterState::default());
        let registers = Arc::new(self.registers);
        let faults = self.faults;

        let shared = state.clone();
        let factory: ModbusConnectionFactoryRef =
            Arc::new(move |_: &Setting| -> Result<Box<dyn ModbusConnection>> {
                Ok(Box::new(FakeMeter {
                    registers: registers.clone(),
                    state: shared.clone(),
                    faults,
                }))
            });

        (factory, state)
    }
}
