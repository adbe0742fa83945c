//! HTTP 日期的解析与格式化
//!
//! 解析时依次尝试 RFC 1123、带短横线的 RFC 1123 变体、RFC 850、asctime，
//! 最后退回到纯数字的 Unix 秒数。解析后的时间统一按 UTC 保存，精度为秒。

use std::fmt;
use std::str::FromStr;
use std::time::SystemTime;

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::{debug, trace};

use crate::error::{HttpDefsError, Result};

mod format;
mod grammar;

pub use format::DateFormat;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HttpDate {
    instant: DateTime<Utc>,
}

impl HttpDate {
    pub fn now() -> Self {
        Self { instant: Utc::now().trunc_subsecs(0) }
    }

    /// 从 Unix 秒数构造，年份不在 1000 到 9999 之间时返回 `None`
    pub fn from_timestamp(secs: i64) -> Option<Self> {
        DateTime::from_timestamp(secs, 0)
            .filter(grammar::is_representable)
            .map(|instant| Self { instant })
    }

    /// 解析 HTTP 日期字符串
    ///
    /// # Arguments
    /// * `s` - 已去除首尾空白的日期字符串
    ///
    /// # Examples
    /// ```
    /// use http_defs::date::HttpDate;
    ///
    /// let a = HttpDate::parse("Sun, 06 Nov 1994 08:49:37 GMT").unwrap();
    /// let b = HttpDate::parse("Sunday, 06-Nov-94 08:49:37 GMT").unwrap();
    /// let c = HttpDate::parse("Sun Nov  6 08:49:37 1994").unwrap();
    /// assert_eq!(a, b);
    /// assert_eq!(b, c);
    /// assert_eq!(a.timestamp(), 784111777);
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        for grammar in &grammar::GRAMMARS {
            match grammar.parse(s) {
                Some(instant) => return Ok(Self { instant }),
                None => trace!("Date {:?} does not match {} layout", s, grammar.name),
            }
        }

        if let Some(instant) = grammar::parse_epoch(s) {
            return Ok(Self { instant });
        }

        debug!("Failed parsing date: {:?}", s);
        Err(HttpDefsError::DateFormat(s.to_string()))
    }

    pub fn instant(&self) -> DateTime<Utc> {
        self.instant
    }

    pub fn timestamp(&self) -> i64 {
        self.instant.timestamp()
    }

    /// 按指定格式写入输出，不带换行
    pub fn write<W: fmt::Write>(&self, out: &mut W, format: DateFormat) -> fmt::Result {
        match format {
            // 先换算成 UTC 日历字段，再写死 GMT 标签
            DateFormat::Rfc1123Gmt => write!(out, "{}", self.instant.naive_utc().format(format.pattern())),
            _ => write!(out, "{}", self.instant.format(format.pattern())),
        }
    }

    pub fn format(&self, format: DateFormat) -> String {
        let mut out = String::with_capacity(32);
        // 写入 String 不会失败
        let _ = self.write(&mut out, format);
        out
    }
}

impl FromStr for HttpDate {
    type Err = HttpDefsError;

    fn from_str(s: &str) -> Result<Self> {
        HttpDate::parse(s)
    }
}

impl fmt::Display for HttpDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write(f, DateFormat::Rfc1123Gmt)
    }
}

impl TryFrom<DateTime<Utc>> for HttpDate {
    type Error = HttpDefsError;

    /// 不足一秒的部分被截掉，写不成四位年份的时刻会被拒绝
    fn try_from(instant: DateTime<Utc>) -> Result<Self> {
        if !grammar::is_representable(&instant) {
            return Err(HttpDefsError::DateFormat(instant.to_rfc3339()));
        }
        Ok(Self { instant: instant.trunc_subsecs(0) })
    }
}

impl TryFrom<SystemTime> for HttpDate {
    type Error = HttpDefsError;

    fn try_from(time: SystemTime) -> Result<Self> {
        Self::try_from(DateTime::<Utc>::from(time))
    }
}

impl From<HttpDate> for SystemTime {
    fn from(date: HttpDate) -> Self {
        SystemTime::from(date.instant)
    }
}

impl From<HttpDate> for DateTime<Utc> {
    fn from(date: HttpDate) -> Self {
        date.instant
    }
}

impl Serialize for HttpDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for HttpDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        HttpDate::parse(s.trim()).map_err(serde::de::Error::custom)
    }
}
