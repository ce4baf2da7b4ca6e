use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::http::response::{Response, StatusCode};

const HTTP_VERSION: &str = "HTTP/1.0";

/// Value of the `Server` header.
pub const SERVER_NAME: &str = "JHTTP 2.0";

/// Which parts of a response go on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Framing {
    pub headers: bool,
    pub body: bool,
}

impl Framing {
    pub const FULL: Framing = Framing { headers: true, body: true };
    pub const HEADERS_ONLY: Framing = Framing { headers: true, body: false };
    pub const BODY_ONLY: Framing = Framing { headers: false, body: true };
}

/// Current server-local time in a human-readable form.
pub fn http_date() -> String {
    chrono::Local::now()
        .format("%a %b %d %H:%M:%S %z %Y")
        .to_string()
}

/// Serializes the status line and header block, blank line included.
pub fn serialize_header(
    status: StatusCode,
    content_type: &str,
    length: usize,
    extra: &[(String, String)],
    date: &str,
) -> Vec<u8> {
    let mut head = format!(
        "{} {} {}\r\n\
         Date: {}\r\n\
         Server: {}\r\n\
         Content-length: {}\r\n\
         Content-type: {}\r\n",
        HTTP_VERSION,
        status.as_u16(),
        status.reason_phrase(),
        date,
        SERVER_NAME,
        length,
        content_type,
    );

    for (k, v) in extra {
        head.push_str(k);
        head.push_str(": ");
        head.push_str(v);
        head.push_str("\r\n");
    }

    head.push_str("\r\n");
    head.into_bytes()
}

/// Writes responses onto the output half of a connection.
///
/// Headers are written and flushed before any body byte.
pub struct ResponseWriter<W> {
    out: W,
}

impl<W> ResponseWriter<W>
where
    W: AsyncWrite + Unpin,
{
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub async fn send_header(
        &mut self,
        status: StatusCode,
        content_type: &str,
        length: usize,
        extra: &[(String, String)],
    ) -> std::io::Result<()> {
        let head = serialize_header(status, content_type, length, extra, &http_date());
        self.out.write_all(&head).await?;
        self.out.flush().await
    }

    pub async fn send_body(&mut self, body: &[u8]) -> std::io::Result<()> {
        self.out.write_all(body).await?;
        self.out.flush().await
    }

    pub async fn send(&mut self, response: &Response, framing: Framing) -> std::io::Result<()> {
        if framing.headers {
            self.send_header(
                response.status,
                &response.content_type,
                response.body.len(),
                &response.headers,
            )
            .await?;
        }
        if framing.body && !response.body.is_empty() {
            self.send_body(&response.body).await?;
        }
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Shuts the output side down.
    pub async fn close(&mut self) -> std::io::Result<()> {
        self.out.shutdown().await
    }
}
