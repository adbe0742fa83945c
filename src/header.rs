//! 与 hyper 类型之间的转换，供头部层使用

use std::fmt::Write;

use bytes::BytesMut;
use hyper::header::{HeaderMap, HeaderValue, CACHE_CONTROL};
use tracing::debug;

use crate::cache_directive::CacheControl;
use crate::date::{DateFormat, HttpDate};
use crate::defs::{Method, StatusCode, Version};
use crate::error::{HttpDefsError, Result};

impl From<Version> for hyper::Version {
    fn from(version: Version) -> Self {
        match version {
            Version::Http10 => hyper::Version::HTTP_10,
            Version::Http11 => hyper::Version::HTTP_11,
        }
    }
}

impl TryFrom<hyper::Version> for Version {
    type Error = HttpDefsError;

    fn try_from(version: hyper::Version) -> Result<Self> {
        if version == hyper::Version::HTTP_10 {
            Ok(Version::Http10)
        } else if version == hyper::Version::HTTP_11 {
            Ok(Version::Http11)
        } else {
            Err(HttpDefsError::InvalidToken(format!("unsupported HTTP version: {:?}", version)))
        }
    }
}

impl From<Method> for hyper::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Options => hyper::Method::OPTIONS,
            Method::Get => hyper::Method::GET,
            Method::Post => hyper::Method::POST,
            Method::Head => hyper::Method::HEAD,
            Method::Put => hyper::Method::PUT,
            Method::Patch => hyper::Method::PATCH,
            Method::Delete => hyper::Method::DELETE,
            Method::Trace => hyper::Method::TRACE,
            Method::Connect => hyper::Method::CONNECT,
        }
    }
}

impl TryFrom<&hyper::Method> for Method {
    type Error = HttpDefsError;

    fn try_from(method: &hyper::Method) -> Result<Self> {
        method.as_str().parse()
    }
}

impl From<hyper::StatusCode> for StatusCode {
    fn from(status: hyper::StatusCode) -> Self {
        StatusCode::from_u16(status.as_u16())
    }
}

impl TryFrom<StatusCode> for hyper::StatusCode {
    type Error = HttpDefsError;

    fn try_from(status: StatusCode) -> Result<Self> {
        hyper::StatusCode::from_u16(status.as_u16()).map_err(|e| HttpDefsError::InvalidToken(e.to_string()))
    }
}

fn freeze_header_value(buf: BytesMut) -> Result<HeaderValue> {
    HeaderValue::from_maybe_shared(buf.freeze()).map_err(|e| HttpDefsError::InvalidToken(e.to_string()))
}

/// 生成 `Date`、`Expires`、`Last-Modified` 等头部使用的值，固定使用 GMT
pub fn date_header_value(date: &HttpDate) -> Result<HeaderValue> {
    let mut buf = BytesMut::with_capacity(29);
    date.write(&mut buf, DateFormat::Rfc1123Gmt)
        .map_err(|_| HttpDefsError::InvalidOperation("failed to format date".into()))?;
    freeze_header_value(buf)
}

pub fn parse_date_header(value: &HeaderValue) -> Result<HttpDate> {
    let s = value
        .to_str()
        .map_err(|_| HttpDefsError::DateFormat(String::from_utf8_lossy(value.as_bytes()).into_owned()))?;
    HttpDate::parse(s.trim())
}

pub fn cache_control_header_value(cc: &CacheControl) -> Result<HeaderValue> {
    let mut buf = BytesMut::new();
    write!(buf, "{}", cc).map_err(|_| HttpDefsError::InvalidOperation("failed to format cache-control".into()))?;
    freeze_header_value(buf)
}

/// 合并所有 Cache-Control 行，没有该头部时返回 `None`
pub fn parse_cache_control_headers(headers: &HeaderMap) -> Result<Option<CacheControl>> {
    let mut values = headers.get_all(CACHE_CONTROL).iter().peekable();
    if values.peek().is_none() {
        return Ok(None);
    }

    let mut cc = CacheControl::new();
    for value in values {
        match value.to_str() {
            Ok(s) => cc.extend_from_str(s)?,
            Err(_) => debug!("Skipping non-ASCII Cache-Control value"),
        }
    }
    Ok(Some(cc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache_directive::{CacheDirective, CacheDirectiveKind};
    use hyper::header::{DATE, EXPIRES};
    use std::time::Duration;

    #[test]
    fn test_version_conversion() {
        assert_eq!(hyper::Version::from(Version::Http11), hyper::Version::HTTP_11);
        assert_eq!(Version::try_from(hyper::Version::HTTP_10).unwrap(), Version::Http10);
        assert!(Version::try_from(hyper::Version::HTTP_2).is_err());
    }

    #[test]
    fn test_method_conversion() {
        assert_eq!(hyper::Method::from(Method::Delete), hyper::Method::DELETE);
        assert_eq!(Method::try_from(&hyper::Method::HEAD).unwrap(), Method::Head);
        let custom = hyper::Method::from_bytes(b"PURGE").unwrap();
        assert!(Method::try_from(&custom).is_err());
    }

    #[test]
    fn test_status_conversion() {
        let status = StatusCode::from(hyper::StatusCode::NOT_MODIFIED);
        assert_eq!(status, StatusCode::NOT_MODIFIED);
        assert_eq!(hyper::StatusCode::try_from(StatusCode::from_u16(299)).unwrap().as_u16(), 299);
        assert!(hyper::StatusCode::try_from(StatusCode::from_u16(42)).is_err());
    }

    #[test]
    fn test_date_header_roundtrip() {
        let date = HttpDate::from_timestamp(784111777).unwrap();
        let mut headers = HeaderMap::new();
        headers.insert(DATE, date_header_value(&date).unwrap());

        let value = headers.get(DATE).unwrap();
        assert_eq!(value, "Sun, 06 Nov 1994 08:49:37 GMT");
        assert_eq!(parse_date_header(value).unwrap(), date);
    }

    #[test]
    fn test_invalid_expires_header() {
        let mut headers = HeaderMap::new();
        headers.insert(EXPIRES, HeaderValue::from_static("0"));
        headers.insert(DATE, HeaderValue::from_static("yesterday"));

        // `Expires: 0` 按 Unix 秒数解析
        assert_eq!(parse_date_header(headers.get(EXPIRES).unwrap()).unwrap().timestamp(), 0);
        assert!(matches!(
            parse_date_header(headers.get(DATE).unwrap()),
            Err(HttpDefsError::DateFormat(_))
        ));
    }

    #[test]
    fn test_cache_control_headers() {
        let mut headers = HeaderMap::new();
        assert!(parse_cache_control_headers(&headers).unwrap().is_none());

        headers.append(CACHE_CONTROL, HeaderValue::from_static("private"));
        headers.append(CACHE_CONTROL, HeaderValue::from_static("max-age=60, must-revalidate"));

        let cc = parse_cache_control_headers(&headers).unwrap().unwrap();
        assert_eq!(cc.directives().len(), 3);
        assert_eq!(
            cc.find(CacheDirectiveKind::MaxAge).unwrap().delta().unwrap(),
            Duration::from_secs(60)
        );

        let value = cache_control_header_value(&cc).unwrap();
        assert_eq!(value, "private, max-age=60, must-revalidate");
        assert_eq!(cc.find(CacheDirectiveKind::Private), Some(&CacheDirective::Private));
    }
}
