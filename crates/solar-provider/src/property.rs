use serde::{Deserialize, Serialize};
use solar_modbus::{DataType, RegisterSpan, RegisterType};

/// 设备寄存器到输出字段的映射
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderProperty {
    /// 输出变量名
    pub name: String,

    /// 寄存器起始地址（从 0 开始的协议地址）
    pub address: u16,

    #[serde(default = "default_register_type")]
    pub register_type: RegisterType,

    pub data_type: DataType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,

    /// 解码后乘以该倍率
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub factor: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decimals: Option<u32>,
}

fn default_register_type() -> RegisterType {
    RegisterType::Input
}

impl ProviderProperty {
    pub fn span(&self) -> RegisterSpan {
        RegisterSpan {
            register_type: self.register_type,
            address: self.address,
            quantity: self.data_type.register_count(),
        }
    }
}
