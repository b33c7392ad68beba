use serde::{Deserialize, Serialize};

pub const DEFAULT_BAUDRATE: u32 = 9600;
pub const DEFAULT_SLAVE_ID: u8 = 1;
pub const DEFAULT_BLOCK_SIZE: u16 = 16;
pub const DEFAULT_TIMEOUT_MS: u64 = 1000;
pub const DEFAULT_READ_RETRIES: u32 = 2;

/// 寄存器类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegisterType {
    /// 输入寄存器（只读，功能码 0x04）
    Input,

    /// 保持寄存器（功能码 0x03）
    Holding,
}

/// 寄存器中的数值类型，多字寄存器按高字在前排列
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    Int16,
    Uint16,
    Int32,
    Uint32,
    Float32,
}

impl DataType {
    /// 占用的寄存器数量
    pub fn register_count(&self) -> u16 {
        match self {
            DataType::Int16 | DataType::Uint16 => 1,
            DataType::Int32 | DataType::Uint32 | DataType::Float32 => 2,
        }
    }
}
