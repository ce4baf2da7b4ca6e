use bytes::Bytes;

/// Content type of every page the server generates itself.
pub const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";

const NOT_FOUND_PAGE: &str = "<HTML><HEAD><TITLE>File Not Found</TITLE></HEAD><BODY>\
<H1>HTTP Error 404: File Not Found</H1></BODY></HTML>";

const NOT_IMPLEMENTED_PAGE: &str = "<HTML><HEAD><TITLE>Not Implemented</TITLE></HEAD><BODY>\
<H1>HTTP Error 501: Not Implemented</H1></BODY></HTML>";

const UNAUTHORIZED_PAGE: &str = "<HTML><HEAD><TITLE>Authentication Required</TITLE></HEAD><BODY>\
<H1>HTTP Error 401: Authentication Required</H1></BODY></HTML>";

/// HTTP status codes the server emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK
    Ok,
    /// 401 Unauthorized
    Unauthorized,
    /// 404 File Not Found
    NotFound,
    /// 501 Not Implemented
    NotImplemented,
}

impl StatusCode {
    /// Returns the numeric HTTP status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use jhttp::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// assert_eq!(StatusCode::NotFound.as_u16(), 404);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::Unauthorized => 401,
            StatusCode::NotFound => 404,
            StatusCode::NotImplemented => 501,
        }
    }

    /// Returns the reason phrase written on the status line.
    ///
    /// # Example
    ///
    /// ```
    /// # use jhttp::http::response::StatusCode;
    /// assert_eq!(StatusCode::NotFound.reason_phrase(), "File Not Found");
    /// ```
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::Unauthorized => "Unauthorized",
            StatusCode::NotFound => "File Not Found",
            StatusCode::NotImplemented => "Not Implemented",
        }
    }

    /// Error statuses that old version-less clients receive as a bare body.
    pub fn is_version_gated(&self) -> bool {
        matches!(self, StatusCode::NotFound | StatusCode::NotImplemented)
    }
}

/// A complete response, independent of how much of it goes on the wire.
#[derive(Debug, Clone)]
pub struct Response {
    pub status: StatusCode,
    pub content_type: String,
    /// Extra headers written after the fixed set
    pub headers: Vec<(String, String)>,
    pub body: Bytes,
}

/// Builder for constructing responses in a fluent style.
///
/// # Example
///
/// ```ignore
/// let response = ResponseBuilder::new(StatusCode::Ok)
///     .content_type("text/plain")
///     .body("hi")
///     .build();
/// ```
pub struct ResponseBuilder {
    status: StatusCode,
    content_type: String,
    headers: Vec<(String, String)>,
    body: Bytes,
}

impl ResponseBuilder {
    /// Starts an HTML response with an empty body.
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            content_type: HTML_CONTENT_TYPE.to_string(),
            headers: Vec::new(),
            body: Bytes::new(),
        }
    }

    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    /// Appends an extra header. Order is preserved on the wire.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    pub fn build(self) -> Response {
        Response {
            status: self.status,
            content_type: self.content_type,
            headers: self.headers,
            body: self.body,
        }
    }
}

impl Response {
    /// A 200 response carrying file contents.
    pub fn file(body: Bytes, content_type: impl Into<String>) -> Self {
        ResponseBuilder::new(StatusCode::Ok)
            .content_type(content_type)
            .body(body)
            .build()
    }

    pub fn not_found() -> Self {
        ResponseBuilder::new(StatusCode::NotFound)
            .body(NOT_FOUND_PAGE)
            .build()
    }

    pub fn not_implemented() -> Self {
        ResponseBuilder::new(StatusCode::NotImplemented)
            .body(NOT_IMPLEMENTED_PAGE)
            .build()
    }

    /// A 401 challenge for the given Basic realm.
    pub fn unauthorized(realm: &str) -> Self {
        ResponseBuilder::new(StatusCode::Unauthorized)
            .header("WWW-Authenticate", format!("Basic realm=\"{realm}\""))
            .body(UNAUTHORIZED_PAGE)
            .build()
    }

    /// The page echoing a POST body. The text is escaped before embedding.
    pub fn post_echo(text: &str) -> Self {
        let page = format!(
            "<HTML><HEAD><TITLE>POST Request Processed</TITLE></HEAD><BODY>\
             <H1>POST Request Processed</H1><p>Request Body: {}</p></BODY></HTML>",
            escape_html(text)
        );
        ResponseBuilder::new(StatusCode::Ok).body(page).build()
    }
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}
