use chrono::{DateTime, Datelike, NaiveDateTime, TimeZone, Utc};

/// 一种固定的日期文本布局
#[derive(Debug)]
pub(crate) struct Grammar {
    pub(crate) name: &'static str,
    pattern: &'static str,
    /// RFC 850 只接受星期全称
    long_weekday: bool,
    /// `%Y` 也接受 1 到 3 位数字，两位年份只留给 RFC 850
    four_digit_year: bool,
    has_zone: bool,
}

pub(crate) const RFC1123: Grammar = Grammar {
    name: "rfc1123",
    pattern: "%a, %d %b %Y %T %Z",
    long_weekday: false,
    four_digit_year: true,
    has_zone: true,
};

// www.google.com 的 expires 用的就是这种写法: Mon, 26-May-2025 18:38:48 GMT
pub(crate) const RFC1123_DASHED: Grammar = Grammar {
    name: "rfc1123-dashed",
    pattern: "%a, %d-%b-%Y %T %Z",
    long_weekday: false,
    four_digit_year: true,
    has_zone: true,
};

pub(crate) const RFC850: Grammar = Grammar {
    name: "rfc850",
    pattern: "%A, %d-%b-%y %T %Z",
    long_weekday: true,
    four_digit_year: false,
    has_zone: true,
};

pub(crate) const ASCTIME: Grammar = Grammar {
    name: "asctime",
    pattern: "%a %b %e %T %Y",
    long_weekday: false,
    four_digit_year: true,
    has_zone: false,
};

/// 按优先级排列，越靠后越宽松
pub(crate) const GRAMMARS: [Grammar; 4] = [RFC1123, RFC1123_DASHED, RFC850, ASCTIME];

impl Grammar {
    /// 按本布局解析整串输入，星期与日期不符、有剩余字符都算失败
    pub(crate) fn parse(&self, input: &str) -> Option<DateTime<Utc>> {
        if self.long_weekday && !starts_with_long_weekday(input) {
            return None;
        }
        // chrono 的 `%Z` 会吞掉任意非空白字符，这里要求是字母缩写
        if self.has_zone && !ends_with_zone_label(input) {
            return None;
        }

        let naive = NaiveDateTime::parse_from_str(input, self.pattern).ok()?;
        let instant = Utc.from_utc_datetime(&naive);
        if self.four_digit_year && !is_representable(&instant) {
            return None;
        }
        Some(instant)
    }
}

fn starts_with_long_weekday(input: &str) -> bool {
    // 缩写只有三个字母
    input.split(',').next().is_some_and(|name| name.len() > 3)
}

fn ends_with_zone_label(input: &str) -> bool {
    input
        .rsplit(' ')
        .next()
        .is_some_and(|zone| !zone.is_empty() && zone.bytes().all(|b| b.is_ascii_alphabetic()))
}

/// HTTP-date 只能写出四位年份
pub(crate) fn is_representable(instant: &DateTime<Utc>) -> bool {
    (1000..=9999).contains(&instant.year())
}

/// 纯数字的 Unix 秒数，不允许符号
pub(crate) fn parse_epoch(input: &str) -> Option<DateTime<Utc>> {
    if input.is_empty() || !input.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let secs: u64 = input.parse().ok()?;
    DateTime::from_timestamp(i64::try_from(secs).ok()?, 0).filter(is_representable)
}
