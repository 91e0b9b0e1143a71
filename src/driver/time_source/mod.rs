// src/driver/time_source/mod.rs

//! 时间源
//!
//! 调度器只关心“现在几点几分”以及“距离下一分钟还有多久”。
//! 系统时钟直接读取本地时间；模拟时钟从给定的起点开始，按单调时钟
//! 流逝的时间向前推进，便于在测试中固定起始时刻。

use embassy_time::{Duration, Instant};
use jiff::{SignedDuration, Zoned, fmt::strtime};

use crate::common::error::{AppError, Result};
use crate::digit::{Glyph, Numeral};

pub trait TimeSource {
    /// 获取当前时间（带时区）
    fn now(&self) -> Result<Zoned>;
}

/// 系统本地时间
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl TimeSource for SystemClock {
    fn now(&self) -> Result<Zoned> {
        Ok(Zoned::now())
    }
}

/// 模拟时钟：起始时刻 + 单调时钟流逝的时间
pub struct SimulatedClock {
    start: Zoned,
    started_at: Instant,
}

impl SimulatedClock {
    pub fn new(start: Zoned) -> Self {
        Self {
            start,
            started_at: Instant::now(),
        }
    }
}

impl TimeSource for SimulatedClock {
    fn now(&self) -> Result<Zoned> {
        let elapsed = SignedDuration::from_micros(self.started_at.elapsed().as_micros() as i64);
        self.start
            .checked_add(elapsed)
            .map_err(|e| AppError::TimeFormat(e.to_string()))
    }
}

/// 一次读时得到的四个字位
///
/// 顺序为小时十位、小时个位、分钟十位、分钟个位
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockReading {
    pub digits: [Glyph; 4],
}

impl ClockReading {
    /// 解析 `HH:MM` 形式的文本
    ///
    /// 不显示前导零时，小时十位为0则变为空白
    pub fn from_text(text: &str, leading_zero: bool) -> Result<Self> {
        let chars: Vec<char> = text.chars().collect();
        if chars.len() != 5 || chars[2] != ':' {
            return Err(AppError::TimeFormat(format!("expected HH:MM, got {:?}", text)));
        }

        let mut digits = [Glyph::Blank; 4];
        for (glyph, c) in digits.iter_mut().zip([chars[0], chars[1], chars[3], chars[4]]) {
            let numeral = Numeral::from_char(c)
                .ok_or_else(|| AppError::TimeFormat(format!("non-digit {:?} in {:?}", c, text)))?;
            *glyph = Glyph::Numeral(numeral);
        }

        if !leading_zero && digits[0] == Glyph::Numeral(Numeral::ZERO) {
            digits[0] = Glyph::Blank;
        }
        Ok(Self { digits })
    }

    /// 按 strftime 格式把时间格式化后解析
    pub fn from_zoned(time: &Zoned, format: &str, leading_zero: bool) -> Result<Self> {
        let text = strtime::format(format, time)
            .map_err(|e| AppError::TimeFormat(format!("format {:?}: {}", format, e)))?;
        Self::from_text(&text, leading_zero)
    }
}

/// 距离下一个整分钟的时间，至少1毫秒
pub fn until_next_minute(time: &Zoned) -> Duration {
    let into_minute = i64::from(time.second()) * 1000 + i64::from(time.millisecond());
    Duration::from_millis((60_000 - into_minute).max(1) as u64)
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;
    use jiff::tz::TimeZone;

    use super::*;

    fn glyph(v: u8) -> Glyph {
        Glyph::Numeral(Numeral::new(v).unwrap())
    }

    fn at(hour: i8, minute: i8, second: i8) -> Zoned {
        date(2024, 3, 9)
            .at(hour, minute, second, 0)
            .to_zoned(TimeZone::UTC)
            .unwrap()
    }

    #[test]
    fn test_reading_suppresses_leading_zero() {
        let reading = ClockReading::from_text("09:41", false).unwrap();
        assert_eq!(reading.digits, [Glyph::Blank, glyph(9), glyph(4), glyph(1)]);

        let reading = ClockReading::from_text("09:41", true).unwrap();
        assert_eq!(reading.digits[0], glyph(0));
    }

    #[test]
    fn test_malformed_text_is_rejected() {
        for text in ["9:41", "09-41", "0a:41", "09:41 PM", ""] {
            assert!(
                matches!(ClockReading::from_text(text, false), Err(AppError::TimeFormat(_))),
                "{:?}",
                text
            );
        }
    }

    #[test]
    fn test_twelve_and_twenty_four_hour_formats() {
        let time = at(13, 45, 10);
        let twelve = ClockReading::from_zoned(&time, "%I:%M", false).unwrap();
        assert_eq!(twelve.digits, [Glyph::Blank, glyph(1), glyph(4), glyph(5)]);

        let twenty_four = ClockReading::from_zoned(&time, "%H:%M", false).unwrap();
        assert_eq!(twenty_four.digits, [glyph(1), glyph(3), glyph(4), glyph(5)]);
    }

    #[test]
    fn test_until_next_minute() {
        assert_eq!(until_next_minute(&at(13, 45, 0)), Duration::from_millis(60_000));
        assert_eq!(until_next_minute(&at(13, 45, 59)), Duration::from_millis(1_000));
    }

    #[test]
    fn test_simulated_clock_starts_at_given_time() {
        let clock = SimulatedClock::new(at(7, 5, 0));
        let now = clock.now().unwrap();
        assert_eq!((now.hour(), now.minute()), (7, 5));
    }
}
