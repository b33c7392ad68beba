use crate::types::DataType;
use solar_core::{ProviderError, Result};

/// 寄存器数值解码
///
/// 多字数值按高字在前、字内大端解释，这是 Eastron 等电表的排列方式。
pub struct RegisterCodec;

impl RegisterCodec {
    /// 将寄存器切片解码为 f64
    ///
    /// `words` 长度必须不少于 `data_type.register_count()`，多余部分忽略。
    pub fn decode(words: &[u16], data_type: DataType) -> Result<f64> {
        let needed = data_type.register_count() as usize;
        if words.len() < needed {
            return Err(ProviderError::modbus(format!(
                "Need {} registers for {:?}, got {}",
                needed,
                data_type,
                words.len()
            )));
        }

        let value = match data_type {
            DataType::Uint16 => f64::from(words[0]),
            DataType::Int16 => f64::from(words[0] as i16),
            DataType::Uint32 => f64::from(Self::join(words[0], words[1])),
            DataType::Int32 => f64::from(Self::join(words[0], words[1]) as i32),
            DataType::Float32 => f64::from(f32::from_bits(Self::join(words[0], words[1]))),
        };

        Ok(value)
    }

    /// 解码并应用倍率与小数位；非有限值返回 None
    pub fn decode_scaled(
        words: &[u16],
        data_type: DataType,
        factor: Option<f64>,
        decimals: Option<u32>,
    ) -> Result<Option<f64>> {
        let raw = Self::decode(words, data_type)?;
        let scaled = raw * factor.unwrap_or(1.0);

        if !scaled.is_finite() {
            return Ok(None);
        }

        Ok(Some(match decimals {
            Some(places) => round_to(scaled, places),
            None => scaled,
        }))
    }

    #[inline]
    fn join(high: u16, low: u16) -> u32 {
        (u32::from(high) << 16) | u32::from(low)
    }
}

fn round_to(value: f64, places: u32) -> f64 {
    let scale = 10f64.powi(places.min(15) as i32);
    (value * scale).round() / scale
}
