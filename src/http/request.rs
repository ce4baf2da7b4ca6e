/// HTTP request methods.
///
/// Routing only distinguishes the methods the server implements. Anything
/// else is carried as `OTHER` with its spelling as sent so it can still be
/// logged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    /// GET - Retrieve a file
    GET,
    /// HEAD - Like GET but without the response body
    HEAD,
    /// POST - Echo the submitted body back
    POST,
    /// Any method the server does not implement
    OTHER(String),
}

impl Method {
    /// Maps a request-line token onto a method. Case-sensitive, like the
    /// request line itself.
    ///
    /// # Example
    ///
    /// ```
    /// # use jhttp::http::request::Method;
    /// assert_eq!(Method::parse("GET"), Method::GET);
    /// assert_eq!(Method::parse("get"), Method::OTHER("get".to_string()));
    /// ```
    pub fn parse(s: &str) -> Self {
        match s {
            "GET" => Method::GET,
            "HEAD" => Method::HEAD,
            "POST" => Method::POST,
            other => Method::OTHER(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Method::GET => "GET",
            Method::HEAD => "HEAD",
            Method::POST => "POST",
            Method::OTHER(s) => s,
        }
    }
}

/// A parsed request head.
///
/// Created once per connection by the parser and only read afterwards. The
/// body is not part of it: only POST consumes one, and the handler reads it
/// straight from the connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// The HTTP method
    pub method: Method,
    /// Raw request target as sent (e.g. "/docs/index.html?x=1")
    pub target: String,
    /// Protocol version token, empty for version-less requests
    pub version: String,
    /// Header lines in arrival order, line terminators stripped
    pub header_lines: Vec<String>,
    /// Value of the Authorization header, if one was sent
    pub authorization: Option<String>,
}

impl Request {
    /// Looks a header up by name, ignoring ASCII case. The first matching
    /// line wins.
    pub fn header(&self, name: &str) -> Option<&str> {
        header_value(&self.header_lines, name)
    }

    /// Parsed Content-Length, `None` when missing or not a number.
    pub fn content_length(&self) -> Option<usize> {
        self.header("Content-Length")
            .and_then(|v| v.parse().ok())
    }

    /// Whether the client spoke HTTP/1.0 or later. Version-less requests get
    /// error bodies without a status line.
    pub fn is_http(&self) -> bool {
        self.version.starts_with("HTTP/")
    }
}

/// Finds `name` among raw `Name: value` lines and returns the trimmed value.
pub fn header_value<'a>(lines: &'a [String], name: &str) -> Option<&'a str> {
    lines.iter().find_map(|line| {
        let (key, value) = line.split_once(':')?;
        key.trim()
            .eq_ignore_ascii_case(name)
            .then(|| value.trim())
    })
}
