use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::error::{HttpDefsError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Version {
    Http10,
    Http11,
}

impl Version {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Version::Http10 => "HTTP/1.0",
            Version::Http11 => "HTTP/1.1",
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Version {
    type Err = HttpDefsError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "HTTP/1.0" => Ok(Version::Http10),
            "HTTP/1.1" => Ok(Version::Http11),
            _ => Err(HttpDefsError::InvalidToken(format!("unknown HTTP version: {}", s))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Options,
    Get,
    Post,
    Head,
    Put,
    Patch,
    Delete,
    Trace,
    Connect,
}

impl Method {
    const ALL: [Method; 9] = [
        Method::Options,
        Method::Get,
        Method::Post,
        Method::Head,
        Method::Put,
        Method::Patch,
        Method::Delete,
        Method::Trace,
        Method::Connect,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Method::Options => "OPTIONS",
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Head => "HEAD",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
            Method::Trace => "TRACE",
            Method::Connect => "CONNECT",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = HttpDefsError;

    /// 方法名区分大小写
    fn from_str(s: &str) -> Result<Self> {
        Method::ALL
            .into_iter()
            .find(|method| method.as_str() == s)
            .ok_or_else(|| HttpDefsError::InvalidToken(format!("unknown HTTP method: {}", s)))
    }
}

/// HTTP 状态码，允许任意数值，未收录的状态码没有原因短语
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StatusCode(u16);

macro_rules! status_codes {
    ($(($num:literal, $konst:ident, $phrase:literal);)+) => {
        impl StatusCode {
            $(
                pub const $konst: StatusCode = StatusCode($num);
            )+

            /// 原因短语，未知状态码返回空串
            pub const fn reason(&self) -> &'static str {
                match self.0 {
                    $(
                        $num => $phrase,
                    )+
                    _ => "",
                }
            }
        }
    }
}

status_codes! {
    (100, CONTINUE, "Continue");
    (101, SWITCHING_PROTOCOLS, "Switching Protocols");
    (102, PROCESSING, "Processing");
    (103, EARLY_HINTS, "Early Hints");

    (200, OK, "OK");
    (201, CREATED, "Created");
    (202, ACCEPTED, "Accepted");
    (203, NON_AUTHORITATIVE_INFORMATION, "Non-Authoritative Information");
    (204, NO_CONTENT, "No Content");
    (205, RESET_CONTENT, "Reset Content");
    (206, PARTIAL_CONTENT, "Partial Content");
    (207, MULTI_STATUS, "Multi-Status");
    (208, ALREADY_REPORTED, "Already Reported");
    (226, IM_USED, "IM Used");

    (300, MULTIPLE_CHOICES, "Multiple Choices");
    (301, MOVED_PERMANENTLY, "Moved Permanently");
    (302, FOUND, "Found");
    (303, SEE_OTHER, "See Other");
    (304, NOT_MODIFIED, "Not Modified");
    (305, USE_PROXY, "Use Proxy");
    (307, TEMPORARY_REDIRECT, "Temporary Redirect");
    (308, PERMANENT_REDIRECT, "Permanent Redirect");

    (400, BAD_REQUEST, "Bad Request");
    (401, UNAUTHORIZED, "Unauthorized");
    (402, PAYMENT_REQUIRED, "Payment Required");
    (403, FORBIDDEN, "Forbidden");
    (404, NOT_FOUND, "Not Found");
    (405, METHOD_NOT_ALLOWED, "Method Not Allowed");
    (406, NOT_ACCEPTABLE, "Not Acceptable");
    (407, PROXY_AUTHENTICATION_REQUIRED, "Proxy Authentication Required");
    (408, REQUEST_TIMEOUT, "Request Timeout");
    (409, CONFLICT, "Conflict");
    (410, GONE, "Gone");
    (411, LENGTH_REQUIRED, "Length Required");
    (412, PRECONDITION_FAILED, "Precondition Failed");
    (413, PAYLOAD_TOO_LARGE, "Payload Too Large");
    (414, URI_TOO_LONG, "URI Too Long");
    (415, UNSUPPORTED_MEDIA_TYPE, "Unsupported Media Type");
    (416, RANGE_NOT_SATISFIABLE, "Range Not Satisfiable");
    (417, EXPECTATION_FAILED, "Expectation Failed");
    (418, IM_A_TEAPOT, "I'm a teapot");
    (421, MISDIRECTED_REQUEST, "Misdirected Request");
    (422, UNPROCESSABLE_ENTITY, "Unprocessable Entity");
    (423, LOCKED, "Locked");
    (424, FAILED_DEPENDENCY, "Failed Dependency");
    (425, TOO_EARLY, "Too Early");
    (426, UPGRADE_REQUIRED, "Upgrade Required");
    (428, PRECONDITION_REQUIRED, "Precondition Required");
    (429, TOO_MANY_REQUESTS, "Too Many Requests");
    (431, REQUEST_HEADER_FIELDS_TOO_LARGE, "Request Header Fields Too Large");
    (444, CONNECTION_CLOSED_WITHOUT_RESPONSE, "Connection Closed Without Response");
    (451, UNAVAILABLE_FOR_LEGAL_REASONS, "Unavailable For Legal Reasons");
    (499, CLIENT_CLOSED_REQUEST, "Client Closed Request");

    (500, INTERNAL_SERVER_ERROR, "Internal Server Error");
    (501, NOT_IMPLEMENTED, "Not Implemented");
    (502, BAD_GATEWAY, "Bad Gateway");
    (503, SERVICE_UNAVAILABLE, "Service Unavailable");
    (504, GATEWAY_TIMEOUT, "Gateway Timeout");
    (505, HTTP_VERSION_NOT_SUPPORTED, "HTTP Version Not Supported");
    (506, VARIANT_ALSO_NEGOTIATES, "Variant Also Negotiates");
    (507, INSUFFICIENT_STORAGE, "Insufficient Storage");
    (508, LOOP_DETECTED, "Loop Detected");
    (510, NOT_EXTENDED, "Not Extended");
    (511, NETWORK_AUTHENTICATION_REQUIRED, "Network Authentication Required");
    (598, NETWORK_READ_TIMEOUT, "Network Read Timeout Error");
    (599, NETWORK_CONNECT_TIMEOUT, "Network Connect Timeout Error");
}

impl StatusCode {
    pub const fn from_u16(code: u16) -> Self {
        StatusCode(code)
    }

    pub const fn as_u16(&self) -> u16 {
        self.0
    }

    pub fn is_known(&self) -> bool {
        !self.reason().is_empty()
    }
}

impl From<u16> for StatusCode {
    fn from(code: u16) -> Self {
        StatusCode(code)
    }
}

impl From<StatusCode> for u16 {
    fn from(code: StatusCode) -> Self {
        code.0
    }
}

/// 输出 `404 Not Found`，未知状态码只输出数字
impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.reason() {
            "" => write!(f, "{}", self.0),
            reason => write!(f, "{} {}", self.0, reason),
        }
    }
}

/// 携带状态码的 HTTP 错误，状态码可以不在表里
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{code} {reason}")]
pub struct HttpError {
    code: u16,
    reason: String,
}

impl HttpError {
    pub fn new(status: StatusCode, reason: impl Into<String>) -> Self {
        Self::from_code(status.as_u16(), reason)
    }

    pub fn from_code(code: u16, reason: impl Into<String>) -> Self {
        Self {
            code,
            reason: reason.into(),
        }
    }

    pub fn code(&self) -> u16 {
        self.code
    }

    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.code)
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}

impl From<StatusCode> for HttpError {
    /// 使用表里的原因短语
    fn from(status: StatusCode) -> Self {
        HttpError::new(status, status.reason())
    }
}

/// 写出响应行 `HTTP/1.1 200 OK`，不带 CRLF
///
/// 扩展状态码没有原因短语，仍然会写出状态行。
///
/// # Examples
/// ```
/// use http_defs::defs::{write_status_line, StatusCode, Version};
///
/// let mut line = String::new();
/// write_status_line(&mut line, Version::Http11, StatusCode::NOT_FOUND).unwrap();
/// assert_eq!(line, "HTTP/1.1 404 Not Found");
/// ```
pub fn write_status_line<W: fmt::Write>(out: &mut W, version: Version, status: StatusCode) -> fmt::Result {
    write!(out, "{} {} {}", version, status.as_u16(), status.reason())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_strings() {
        assert_eq!(Version::Http10.to_string(), "HTTP/1.0");
        assert_eq!(Version::Http11.as_str(), "HTTP/1.1");
        assert_eq!("HTTP/1.1".parse::<Version>().unwrap(), Version::Http11);
        assert!("HTTP/2".parse::<Version>().is_err());
    }

    #[test]
    fn test_method_strings() {
        for method in Method::ALL {
            assert_eq!(method.as_str().parse::<Method>().unwrap(), method);
        }
        assert_eq!(Method::Patch.to_string(), "PATCH");
        assert!("get".parse::<Method>().is_err());
    }

    #[test]
    fn test_status_reason() {
        assert_eq!(StatusCode::OK.reason(), "OK");
        assert_eq!(StatusCode::from_u16(404).reason(), "Not Found");
        assert_eq!(StatusCode::IM_A_TEAPOT.as_u16(), 418);
        assert!(StatusCode::from_u16(503).is_known());
    }

    #[test]
    fn test_unknown_status_is_empty() {
        let code = StatusCode::from_u16(299);
        assert_eq!(code.reason(), "");
        assert!(!code.is_known());
        assert_eq!(code.to_string(), "299");
        assert_eq!(StatusCode::from(0u16).reason(), "");
    }

    #[test]
    fn test_http_error() {
        let err = HttpError::new(StatusCode::NOT_FOUND, "no such segment");
        assert_eq!(err.code(), 404);
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "404 no such segment");

        let err = HttpError::from(StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(err.reason(), "Service Unavailable");
    }

    #[test]
    fn test_http_error_with_unknown_code() {
        let err = HttpError::from_code(799, "custom failure");
        assert_eq!(err.code(), 799);
        assert_eq!(err.reason(), "custom failure");
        assert_eq!(err.status().reason(), "");
        assert_eq!(err.to_string(), "799 custom failure");

        let err = HttpError::from(StatusCode::from_u16(799));
        assert_eq!(err.reason(), "");
    }

    #[test]
    fn test_status_line_with_unknown_code() {
        let mut line = String::new();
        write_status_line(&mut line, Version::Http10, StatusCode::from_u16(799)).unwrap();
        assert_eq!(line, "HTTP/1.0 799 ");
    }
}
