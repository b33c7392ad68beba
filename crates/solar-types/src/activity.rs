use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 一天的最后一秒
pub const LAST_SECOND_OF_DAY: i64 = 86_399;

/// 时间窗口的参考事件
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeEvent {
    /// 偏移量即午夜后的秒数
    Time,
    /// 偏移量相对日出（可为负）
    Sunrise,
    /// 偏移量相对日落（可为负）
    Sunset,
}

/// 轮询间隔单位
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    Seconds,
    Minutes,
    Hours,
}

impl TimeUnit {
    pub fn to_duration(self, amount: u64) -> Duration {
        match self {
            TimeUnit::Seconds => Duration::from_secs(amount),
            TimeUnit::Minutes => Duration::from_secs(amount * 60),
            TimeUnit::Hours => Duration::from_secs(amount * 3600),
        }
    }
}

/// 当天的日出日落时间，窗口引用太阳事件时需要
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SunTimes {
    pub sunrise: NaiveTime,
    pub sunset: NaiveTime,
}

/// 调度描述：在 [start, end] 窗口内每隔 interval 执行一次
///
/// 只是值对象，调度本身由 Host 完成。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub start_event: TimeEvent,
    pub start_offset: i64,
    pub end_event: TimeEvent,
    pub end_offset: i64,
    pub interval: u64,
    pub time_unit: TimeUnit,
}

impl Activity {
    pub fn new(
        start_event: TimeEvent,
        start_offset: i64,
        end_event: TimeEvent,
        end_offset: i64,
        interval: u64,
        time_unit: TimeUnit,
    ) -> Self {
        Self {
            start_event,
            start_offset,
            end_event,
            end_offset,
            interval,
            time_unit,
        }
    }

    /// 全天窗口
    pub fn whole_day(interval: u64, time_unit: TimeUnit) -> Self {
        Self::new(
            TimeEvent::Time,
            0,
            TimeEvent::Time,
            LAST_SECOND_OF_DAY,
            interval,
            time_unit,
        )
    }

    pub fn interval_duration(&self) -> Duration {
        self.time_unit.to_duration(self.interval)
    }

    pub fn covers_full_day(&self) -> bool {
        self.start_event == TimeEvent::Time
            && self.end_event == TimeEvent::Time
            && self.start_offset <= 0
            && self.end_offset >= LAST_SECOND_OF_DAY
    }

    /// 解析为当天的秒数窗口；引用太阳事件但未提供 `sun` 时返回 None
    pub fn resolve_window(&self, sun: Option<SunTimes>) -> Option<(i64, i64)> {
        let start = resolve_bound(self.start_event, self.start_offset, sun)?;
        let end = resolve_bound(self.end_event, self.end_offset, sun)?;
        Some((start, end))
    }

    pub fn is_active_at(&self, time: NaiveTime, sun: Option<SunTimes>) -> bool {
        let Some((start, end)) = self.resolve_window(sun) else {
            return false;
        };
        let now = i64::from(time.num_seconds_from_midnight());
        if start <= end {
            (start..=end).contains(&now)
        } else {
            // 跨午夜
            now >= start || now <= end
        }
    }
}

fn resolve_bound(event: TimeEvent, offset: i64, sun: Option<SunTimes>) -> Option<i64> {
    let base = match event {
        TimeEvent::Time => 0,
        TimeEvent::Sunrise => i64::from(sun?.sunrise.num_seconds_from_midnight()),
        TimeEvent::Sunset => i64::from(sun?.sunset.num_seconds_from_midnight()),
    };
    Some((base + offset).clamp(0, LAST_SECOND_OF_DAY))
}
