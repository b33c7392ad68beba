use std::collections::BTreeMap;

/// 一次采集得到的变量表（字段名 -> 值），由 Provider 填充，由 Host 消费
pub type Variables = BTreeMap<String, serde_json::Value>;
