use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// 展示用表格布局
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    pub columns: Vec<String>,

    pub rows: Vec<TableRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRow {
    pub label: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,

    /// 每列引用的字段名，空单元格为 null
    pub cells: Vec<Option<String>>,
}

impl Table {
    /// 所有被引用的字段名
    pub fn referenced_fields(&self) -> impl Iterator<Item = &str> {
        self.rows
            .iter()
            .flat_map(|row| row.cells.iter().flatten().map(String::as_str))
    }

    /// 清空不在 `known` 中的单元格，返回被清掉的引用
    pub fn retain_known(&mut self, known: &HashSet<&str>) -> Vec<String> {
        let mut dropped = Vec::new();
        for row in &mut self.rows {
            for cell in &mut row.cells {
                if let Some(field) = cell {
                    if !known.contains(field.as_str()) {
                        dropped.push(field.clone());
                        *cell = None;
                    }
                }
            }
        }
        dropped
    }
}
