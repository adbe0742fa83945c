use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use tracing::debug;

use crate::error::{HttpDefsError, Result};

/// delta-seconds 的上限，更大的值按此处理 (RFC 9111 1.2.2)
pub const DELTA_SECONDS_CAP: u64 = 2_147_483_648;

/// 不带值的 `max-stale`，表示接受任意陈旧程度
pub const UNBOUNDED_STALE: Duration = Duration::from_secs(u64::MAX);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheDirectiveKind {
    NoCache,
    NoStore,
    MaxAge,
    MaxStale,
    MinFresh,
    NoTransform,
    OnlyIfCached,
    Public,
    Private,
    MustRevalidate,
    ProxyRevalidate,
    SMaxAge,
}

impl CacheDirectiveKind {
    const ALL: [CacheDirectiveKind; 12] = [
        CacheDirectiveKind::NoCache,
        CacheDirectiveKind::NoStore,
        CacheDirectiveKind::MaxAge,
        CacheDirectiveKind::MaxStale,
        CacheDirectiveKind::MinFresh,
        CacheDirectiveKind::NoTransform,
        CacheDirectiveKind::OnlyIfCached,
        CacheDirectiveKind::Public,
        CacheDirectiveKind::Private,
        CacheDirectiveKind::MustRevalidate,
        CacheDirectiveKind::ProxyRevalidate,
        CacheDirectiveKind::SMaxAge,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CacheDirectiveKind::NoCache => "no-cache",
            CacheDirectiveKind::NoStore => "no-store",
            CacheDirectiveKind::MaxAge => "max-age",
            CacheDirectiveKind::MaxStale => "max-stale",
            CacheDirectiveKind::MinFresh => "min-fresh",
            CacheDirectiveKind::NoTransform => "no-transform",
            CacheDirectiveKind::OnlyIfCached => "only-if-cached",
            CacheDirectiveKind::Public => "public",
            CacheDirectiveKind::Private => "private",
            CacheDirectiveKind::MustRevalidate => "must-revalidate",
            CacheDirectiveKind::ProxyRevalidate => "proxy-revalidate",
            CacheDirectiveKind::SMaxAge => "s-maxage",
        }
    }

    /// 是否携带时间参数
    pub fn has_delta(&self) -> bool {
        matches!(
            self,
            CacheDirectiveKind::MaxAge
                | CacheDirectiveKind::SMaxAge
                | CacheDirectiveKind::MaxStale
                | CacheDirectiveKind::MinFresh
        )
    }
}

impl fmt::Display for CacheDirectiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CacheDirectiveKind {
    type Err = HttpDefsError;

    fn from_str(s: &str) -> Result<Self> {
        CacheDirectiveKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| HttpDefsError::InvalidToken(format!("unknown cache directive: {}", s)))
    }
}

/// 单个 Cache-Control 指令
///
/// 只有 `MaxAge`、`SMaxAge`、`MaxStale`、`MinFresh` 带时间，精度为秒。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheDirective {
    NoCache,
    NoStore,
    MaxAge(Duration),
    MaxStale(Duration),
    MinFresh(Duration),
    NoTransform,
    OnlyIfCached,
    Public,
    Private,
    MustRevalidate,
    ProxyRevalidate,
    SMaxAge(Duration),
}

impl CacheDirective {
    pub fn new(kind: CacheDirectiveKind) -> Self {
        Self::with_delta(kind, Duration::ZERO)
    }

    /// 不带时间的指令会忽略 `delta`，不足一秒的部分被截掉
    pub fn with_delta(kind: CacheDirectiveKind, delta: Duration) -> Self {
        let delta = Duration::from_secs(delta.as_secs());
        match kind {
            CacheDirectiveKind::NoCache => CacheDirective::NoCache,
            CacheDirectiveKind::NoStore => CacheDirective::NoStore,
            CacheDirectiveKind::MaxAge => CacheDirective::MaxAge(delta),
            CacheDirectiveKind::MaxStale => CacheDirective::MaxStale(delta),
            CacheDirectiveKind::MinFresh => CacheDirective::MinFresh(delta),
            CacheDirectiveKind::NoTransform => CacheDirective::NoTransform,
            CacheDirectiveKind::OnlyIfCached => CacheDirective::OnlyIfCached,
            CacheDirectiveKind::Public => CacheDirective::Public,
            CacheDirectiveKind::Private => CacheDirective::Private,
            CacheDirectiveKind::MustRevalidate => CacheDirective::MustRevalidate,
            CacheDirectiveKind::ProxyRevalidate => CacheDirective::ProxyRevalidate,
            CacheDirectiveKind::SMaxAge => CacheDirective::SMaxAge(delta),
        }
    }

    pub fn kind(&self) -> CacheDirectiveKind {
        match self {
            CacheDirective::NoCache => CacheDirectiveKind::NoCache,
            CacheDirective::NoStore => CacheDirectiveKind::NoStore,
            CacheDirective::MaxAge(_) => CacheDirectiveKind::MaxAge,
            CacheDirective::MaxStale(_) => CacheDirectiveKind::MaxStale,
            CacheDirective::MinFresh(_) => CacheDirectiveKind::MinFresh,
            CacheDirective::NoTransform => CacheDirectiveKind::NoTransform,
            CacheDirective::OnlyIfCached => CacheDirectiveKind::OnlyIfCached,
            CacheDirective::Public => CacheDirectiveKind::Public,
            CacheDirective::Private => CacheDirectiveKind::Private,
            CacheDirective::MustRevalidate => CacheDirectiveKind::MustRevalidate,
            CacheDirective::ProxyRevalidate => CacheDirectiveKind::ProxyRevalidate,
            CacheDirective::SMaxAge(_) => CacheDirectiveKind::SMaxAge,
        }
    }

    /// 读取时间参数，对不带时间的指令调用属于调用方错误
    pub fn delta(&self) -> Result<Duration> {
        match self {
            CacheDirective::MaxAge(delta)
            | CacheDirective::SMaxAge(delta)
            | CacheDirective::MaxStale(delta)
            | CacheDirective::MinFresh(delta) => Ok(*delta),
            other => Err(HttpDefsError::InvalidOperation(format!(
                "{} directive carries no delta",
                other.kind()
            ))),
        }
    }
}

impl From<CacheDirectiveKind> for CacheDirective {
    fn from(kind: CacheDirectiveKind) -> Self {
        CacheDirective::new(kind)
    }
}

impl fmt::Display for CacheDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheDirective::MaxStale(delta) if *delta == UNBOUNDED_STALE => f.write_str("max-stale"),
            CacheDirective::MaxAge(delta)
            | CacheDirective::SMaxAge(delta)
            | CacheDirective::MaxStale(delta)
            | CacheDirective::MinFresh(delta) => write!(f, "{}={}", self.kind(), delta.as_secs()),
            other => f.write_str(other.kind().as_str()),
        }
    }
}

impl FromStr for CacheDirective {
    type Err = HttpDefsError;

    fn from_str(s: &str) -> Result<Self> {
        let (name, value) = match s.split_once('=') {
            Some((name, value)) => (name.trim(), Some(value.trim())),
            None => (s.trim(), None),
        };
        let kind: CacheDirectiveKind = name.parse()?;

        if !kind.has_delta() {
            // no-cache / private 可以带字段名列表，这里不关心
            return Ok(CacheDirective::new(kind));
        }

        match value {
            Some(value) => Ok(CacheDirective::with_delta(kind, parse_delta_seconds(value)?)),
            None if kind == CacheDirectiveKind::MaxStale => Ok(CacheDirective::MaxStale(UNBOUNDED_STALE)),
            None => Err(HttpDefsError::InvalidToken(format!("{} requires a value", kind))),
        }
    }
}

fn parse_delta_seconds(value: &str) -> Result<Duration> {
    let digits = value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value);

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(HttpDefsError::InvalidToken(format!("invalid delta-seconds: {}", value)));
    }
    let secs = digits.parse::<u64>().unwrap_or(DELTA_SECONDS_CAP).min(DELTA_SECONDS_CAP);
    Ok(Duration::from_secs(secs))
}

/// Cache-Control 头部的指令列表
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheControl {
    directives: Vec<CacheDirective>,
}

impl CacheControl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, directive: CacheDirective) -> Self {
        self.directives.push(directive);
        self
    }

    pub fn push(&mut self, directive: CacheDirective) {
        self.directives.push(directive);
    }

    pub fn directives(&self) -> &[CacheDirective] {
        &self.directives
    }

    pub fn is_empty(&self) -> bool {
        self.directives.is_empty()
    }

    /// 查找第一个指定类型的指令
    pub fn find(&self, kind: CacheDirectiveKind) -> Option<&CacheDirective> {
        self.directives.iter().find(|d| d.kind() == kind)
    }

    pub fn contains(&self, kind: CacheDirectiveKind) -> bool {
        self.find(kind).is_some()
    }

    /// 解析逗号分隔的头部值，未知指令会被跳过
    ///
    /// # Examples
    /// ```
    /// use std::time::Duration;
    /// use http_defs::cache_directive::{CacheControl, CacheDirectiveKind};
    ///
    /// let cc = CacheControl::parse("public, max-age=3600, x-custom").unwrap();
    /// assert_eq!(cc.directives().len(), 2);
    /// let max_age = cc.find(CacheDirectiveKind::MaxAge).unwrap();
    /// assert_eq!(max_age.delta().unwrap(), Duration::from_secs(3600));
    /// ```
    pub fn parse(value: &str) -> Result<Self> {
        let mut cc = CacheControl::new();
        cc.extend_from_str(value)?;
        Ok(cc)
    }

    /// 追加另一行 Cache-Control 的内容
    pub fn extend_from_str(&mut self, value: &str) -> Result<()> {
        for part in split_directives(value).into_iter().map(str::trim).filter(|p| !p.is_empty()) {
            match part.parse::<CacheDirective>() {
                Ok(directive) => self.directives.push(directive),
                Err(HttpDefsError::InvalidToken(_)) if !is_known_directive(part) => {
                    debug!("Ignoring unknown cache directive: {}", part);
                }
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }
}

/// 按逗号切分，引号里的逗号不算
fn split_directives(value: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut in_quotes = false;
    let mut escaped = false;

    for (i, b) in value.bytes().enumerate() {
        match b {
            _ if escaped => escaped = false,
            b'\\' if in_quotes => escaped = true,
            b'"' => in_quotes = !in_quotes,
            b',' if !in_quotes => {
                parts.push(&value[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&value[start..]);
    parts
}

fn is_known_directive(part: &str) -> bool {
    let name = part.split_once('=').map_or(part, |(name, _)| name).trim();
    name.parse::<CacheDirectiveKind>().is_ok()
}

impl FromStr for CacheControl {
    type Err = HttpDefsError;

    fn from_str(s: &str) -> Result<Self> {
        CacheControl::parse(s)
    }
}

impl fmt::Display for CacheControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, directive) in self.directives.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", directive)?;
        }
        Ok(())
    }
}

impl FromIterator<CacheDirective> for CacheControl {
    fn from_iter<I: IntoIterator<Item = CacheDirective>>(iter: I) -> Self {
        Self { directives: iter.into_iter().collect() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delta_on_timed_directive() {
        let directive = CacheDirective::with_delta(CacheDirectiveKind::MaxAge, Duration::from_secs(3600));
        assert_eq!(directive.kind(), CacheDirectiveKind::MaxAge);
        assert_eq!(directive.delta().unwrap(), Duration::from_secs(3600));
    }

    #[test]
    fn test_delta_defaults_to_zero() {
        for kind in [
            CacheDirectiveKind::MaxAge,
            CacheDirectiveKind::SMaxAge,
            CacheDirectiveKind::MaxStale,
            CacheDirectiveKind::MinFresh,
        ] {
            assert_eq!(CacheDirective::new(kind).delta().unwrap(), Duration::ZERO);
        }
    }

    #[test]
    fn test_delta_on_untimed_directive_fails() {
        let directive = CacheDirective::new(CacheDirectiveKind::NoCache);
        let err = directive.delta().unwrap_err();
        assert!(matches!(err, HttpDefsError::InvalidOperation(_)));

        // 传入的时间被忽略
        let directive = CacheDirective::with_delta(CacheDirectiveKind::Private, Duration::from_secs(5));
        assert_eq!(directive, CacheDirective::Private);
        assert!(directive.delta().is_err());
    }

    #[test]
    fn test_subsecond_delta_truncated() {
        let directive = CacheDirective::with_delta(CacheDirectiveKind::MinFresh, Duration::from_millis(2_750));
        assert_eq!(directive.delta().unwrap(), Duration::from_secs(2));
    }

    #[test]
    fn test_kind_roundtrip() {
        for kind in CacheDirectiveKind::ALL {
            assert_eq!(CacheDirective::new(kind).kind(), kind);
            assert_eq!(kind.as_str().parse::<CacheDirectiveKind>().unwrap(), kind);
        }
        assert_eq!("Max-Age".parse::<CacheDirectiveKind>().unwrap(), CacheDirectiveKind::MaxAge);
    }

    #[test]
    fn test_directive_display() {
        assert_eq!(CacheDirective::SMaxAge(Duration::from_secs(60)).to_string(), "s-maxage=60");
        assert_eq!(CacheDirective::MustRevalidate.to_string(), "must-revalidate");
        assert_eq!(CacheDirective::MaxStale(UNBOUNDED_STALE).to_string(), "max-stale");
    }

    #[test]
    fn test_directive_from_str() {
        assert_eq!(
            "max-age=\"120\"".parse::<CacheDirective>().unwrap(),
            CacheDirective::MaxAge(Duration::from_secs(120))
        );
        assert_eq!("max-stale".parse::<CacheDirective>().unwrap(), CacheDirective::MaxStale(UNBOUNDED_STALE));
        assert_eq!("no-cache=\"Set-Cookie\"".parse::<CacheDirective>().unwrap(), CacheDirective::NoCache);
        assert!("max-age".parse::<CacheDirective>().is_err());
        assert!("max-age=-1".parse::<CacheDirective>().is_err());
        assert!("min-fresh=1h".parse::<CacheDirective>().is_err());
    }

    #[test]
    fn test_delta_overflow_is_capped() {
        let directive: CacheDirective = "max-age=99999999999999999999999".parse().unwrap();
        assert_eq!(directive.delta().unwrap(), Duration::from_secs(DELTA_SECONDS_CAP));
    }

    #[test]
    fn test_delta_above_cap_is_clamped() {
        let directive: CacheDirective = "max-age=4294967296".parse().unwrap();
        assert_eq!(directive.delta().unwrap(), Duration::from_secs(DELTA_SECONDS_CAP));

        let directive: CacheDirective = "s-maxage=2147483647".parse().unwrap();
        assert_eq!(directive.delta().unwrap(), Duration::from_secs(2_147_483_647));
    }

    #[test]
    fn test_quoted_commas_stay_in_directive() {
        let cc = CacheControl::parse("no-cache=\"Set-Cookie, Foo\", max-age=5").unwrap();
        assert_eq!(
            cc.directives(),
            &[CacheDirective::NoCache, CacheDirective::MaxAge(Duration::from_secs(5))]
        );

        let cc = CacheControl::parse("private=\"a\\\", b\", public").unwrap();
        assert_eq!(cc.directives(), &[CacheDirective::Private, CacheDirective::Public]);
    }

    #[test]
    fn test_cache_control_parse() {
        let cc = CacheControl::parse("no-store, , max-age=0, community=\"UCI\", s-maxage=10").unwrap();
        assert_eq!(
            cc.directives(),
            &[
                CacheDirective::NoStore,
                CacheDirective::MaxAge(Duration::ZERO),
                CacheDirective::SMaxAge(Duration::from_secs(10)),
            ]
        );
        assert!(cc.contains(CacheDirectiveKind::NoStore));
        assert!(!cc.contains(CacheDirectiveKind::Public));
        assert!(CacheControl::parse("max-age=abc").is_err());
    }

    #[test]
    fn test_cache_control_display() {
        let cc: CacheControl = [
            CacheDirective::Public,
            CacheDirective::MaxAge(Duration::from_secs(3600)),
        ]
        .into_iter()
        .collect();
        assert_eq!(cc.to_string(), "public, max-age=3600");
        assert_eq!(CacheControl::new().to_string(), "");
        assert_eq!(cc.to_string().parse::<CacheControl>().unwrap(), cc);
    }
}
