use solar_protocol::{ModbusEncoding, Setting, SupportedInterface};

/// 构建 Modbus 连接配置
#[derive(Debug, Clone, Default)]
pub struct ModbusConfigurationBuilder {
    setting: Setting,
}

impl ModbusConfigurationBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_baudrate(mut self, baudrate: u32) -> Self {
        self.setting.baudrate = Some(baudrate);
        self
    }

    pub fn with_rtu_encoding(mut self) -> Self {
        self.setting.encoding = Some(ModbusEncoding::Rtu);
        self
    }

    pub fn with_ascii_encoding(mut self) -> Self {
        self.setting.encoding = Some(ModbusEncoding::Ascii);
        self
    }

    /// 从站地址
    pub fn with_provider_address(mut self, address: u8) -> Self {
        self.setting.provider_address = Some(address);
        self
    }

    pub fn with_block_size(mut self, block_size: u16) -> Self {
        self.setting.block_size = Some(block_size);
        self
    }

    pub fn with_interface(mut self, interface: SupportedInterface) -> Self {
        self.setting.interface = Some(interface);
        self
    }

    pub fn with_provider_host<S: Into<String>>(mut self, host: S) -> Self {
        self.setting.provider_host = Some(host.into());
        self
    }

    pub fn with_provider_port(mut self, port: u16) -> Self {
        self.setting.provider_port = Some(port);
        self
    }

    pub fn with_read_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.setting.read_timeout_ms = Some(timeout_ms);
        self
    }

    pub fn with_read_retries(mut self, retries: u32) -> Self {
        self.setting.read_retries = Some(retries);
        self
    }

    pub fn build(self) -> Setting {
        self.setting
    }
}
