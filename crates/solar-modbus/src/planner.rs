use crate::types::RegisterType;
use std::collections::BTreeMap;

/// 一个待读取的寄存器区间
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterSpan {
    pub register_type: RegisterType,
    pub address: u16,
    pub quantity: u16,
}

impl RegisterSpan {
    fn end(&self) -> u16 {
        self.address.saturating_add(self.quantity.max(1) - 1)
    }
}

/// 合并后的一次读请求
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadBatch {
    pub register_type: RegisterType,
    pub start: u16,
    pub quantity: u16,
    /// 本批次覆盖的区间在输入中的下标
    pub members: Vec<usize>,
}

impl ReadBatch {
    /// 取出某个区间在本批次结果中的寄存器
    pub fn slice<'a>(&self, words: &'a [u16], span: &RegisterSpan) -> Option<&'a [u16]> {
        let offset = span.address.checked_sub(self.start)? as usize;
        words.get(offset..offset + span.quantity as usize)
    }
}

/// 按块大小合并相邻寄存器读取
///
/// 同类型寄存器按地址排序后合并，合并后跨度不超过 `max_batch`，
/// 相邻区间间隔不超过 `max_gap`。超过 `max_batch` 的单个区间独立成批。
pub struct ReadPlanner;

impl ReadPlanner {
    pub fn plan(spans: &[RegisterSpan], max_batch: u16, max_gap: u16) -> Vec<ReadBatch> {
        if spans.is_empty() {
            return Vec::new();
        }

        let max_batch = max_batch.max(1);

        let mut groups: BTreeMap<RegisterType, Vec<usize>> = BTreeMap::new();
        for (idx, span) in spans.iter().enumerate() {
            groups.entry(span.register_type).or_default().push(idx);
        }

        let mut batches = Vec::with_capacity(spans.len() / 4 + 1);

        for (register_type, mut indices) in groups {
            indices.sort_by_key(|&i| (spans[i].address, spans[i].quantity));

            let mut i = 0usize;
            while i < indices.len() {
                let first = &spans[indices[i]];
                let batch_start = first.address;
                let mut batch_end = first.end();
                let mut members = vec![indices[i]];
                i += 1;

                while i < indices.len() {
                    let next = &spans[indices[i]];
                    let span_if_merged = u32::from(next.end().max(batch_end)) - u32::from(batch_start) + 1;
                    let gap_ok = next.address.saturating_sub(batch_end) <= max_gap.saturating_add(1);

                    if gap_ok && span_if_merged <= u32::from(max_batch) {
                        members.push(indices[i]);
                        batch_end = batch_end.max(next.end());
                        i += 1;
                    } else {
                        break;
                    }
                }

                batches.push(ReadBatch {
                    register_type,
                    start: batch_start,
                    quantity: (batch_end - batch_start).saturating_add(1),
                    members,
                });
            }
        }

        batches
    }
}
