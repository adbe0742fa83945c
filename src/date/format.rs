use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::HttpDefsError;

/// 日期输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum DateFormat {
    /// `Sun, 06 Nov 1994 08:49:37 UTC`，时区标签取自时间值本身
    Rfc1123,
    /// `Sun, 06 Nov 1994 08:49:37 GMT`，HTTP 头部要求的写法
    Rfc1123Gmt,
    /// `Sunday, 06-Nov-94 08:49:37 UTC`
    Rfc850,
    /// `Sun Nov  6 08:49:37 1994`
    AscTime,
}

impl DateFormat {
    pub const ALL: [DateFormat; 4] = [
        DateFormat::Rfc1123,
        DateFormat::Rfc1123Gmt,
        DateFormat::Rfc850,
        DateFormat::AscTime,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            DateFormat::Rfc1123 => "rfc1123",
            DateFormat::Rfc1123Gmt => "rfc1123-gmt",
            DateFormat::Rfc850 => "rfc850",
            DateFormat::AscTime => "asctime",
        }
    }

    pub(crate) fn pattern(&self) -> &'static str {
        match self {
            DateFormat::Rfc1123 => "%a, %d %b %Y %T %Z",
            DateFormat::Rfc1123Gmt => "%a, %d %b %Y %T GMT",
            DateFormat::Rfc850 => "%A, %d-%b-%y %T %Z",
            DateFormat::AscTime => "%a %b %e %T %Y",
        }
    }
}

impl Default for DateFormat {
    fn default() -> Self {
        DateFormat::Rfc1123Gmt
    }
}

impl fmt::Display for DateFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DateFormat {
    type Err = HttpDefsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DateFormat::ALL
            .into_iter()
            .find(|format| format.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| HttpDefsError::InvalidOperation(format!("unsupported date format: {}", s)))
    }
}

impl TryFrom<String> for DateFormat {
    type Error = HttpDefsError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DateFormat> for &'static str {
    fn from(format: DateFormat) -> Self {
        format.name()
    }
}
