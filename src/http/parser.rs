use crate::http::request::{header_value, Method, Request};
use std::fmt;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt};

/// Longest request line or header line accepted, terminator excluded.
pub const MAX_LINE_BYTES: usize = 8 * 1024;
/// Most header lines accepted in one request.
pub const MAX_HEADER_LINES: usize = 100;

#[derive(Debug)]
pub enum ParseError {
    /// The peer closed the stream before sending a request line
    ConnectionClosed,
    /// The request line has fewer than two tokens
    Malformed,
    /// A line or the header section exceeded its limit
    TooLarge,
    Io(std::io::Error),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::ConnectionClosed => f.write_str("connection closed before request line"),
            ParseError::Malformed => f.write_str("malformed request line"),
            ParseError::TooLarge => f.write_str("request head too large"),
            ParseError::Io(e) => write!(f, "i/o error while reading request: {e}"),
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParseError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ParseError {
    fn from(e: std::io::Error) -> Self {
        ParseError::Io(e)
    }
}

/// Splits a request line into method, target and (possibly empty) version.
pub fn parse_request_line(line: &str) -> Result<(Method, String, String), ParseError> {
    let mut parts = line.split_whitespace();

    let method = parts.next().ok_or(ParseError::Malformed)?;
    let target = parts.next().ok_or(ParseError::Malformed)?;
    let version = parts.next().unwrap_or("");

    Ok((Method::parse(method), target.to_string(), version.to_string()))
}

/// Reads one request head: the request line, then header lines up to the
/// first empty line. End of stream inside the headers ends the headers.
///
/// Leaves the reader positioned at the first body byte.
pub async fn read_request<R>(reader: &mut R) -> Result<Request, ParseError>
where
    R: AsyncBufRead + Unpin,
{
    let mut buf = Vec::with_capacity(256);

    if read_line(reader, &mut buf).await? == 0 {
        return Err(ParseError::ConnectionClosed);
    }
    let request_line = String::from_utf8_lossy(&buf).into_owned();
    let (method, target, version) = parse_request_line(&request_line)?;

    let mut header_lines = Vec::new();
    loop {
        if read_line(reader, &mut buf).await? == 0 || buf.is_empty() {
            break;
        }
        if header_lines.len() == MAX_HEADER_LINES {
            return Err(ParseError::TooLarge);
        }
        header_lines.push(String::from_utf8_lossy(&buf).into_owned());
    }

    let authorization = header_value(&header_lines, "Authorization").map(str::to_string);

    Ok(Request {
        method,
        target,
        version,
        header_lines,
        authorization,
    })
}

/// Reads one CRLF- or LF-terminated line into `buf`, terminator stripped.
/// Returns the number of raw bytes consumed, 0 at end of stream.
async fn read_line<R>(reader: &mut R, buf: &mut Vec<u8>) -> Result<usize, ParseError>
where
    R: AsyncBufRead + Unpin,
{
    buf.clear();
    let limit = (MAX_LINE_BYTES + 2) as u64;
    let n = (&mut *reader).take(limit).read_until(b'\n', buf).await?;

    let terminated = buf.last() == Some(&b'\n');
    if terminated {
        buf.pop();
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }
    }
    if buf.len() > MAX_LINE_BYTES || (!terminated && n as u64 == limit) {
        return Err(ParseError::TooLarge);
    }
    Ok(n)
}
