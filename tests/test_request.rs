use jhttp::http::request::{Method, Request};

fn request(version: &str, header_lines: &[&str]) -> Request {
    Request {
        method: Method::GET,
        target: "/".to_string(),
        version: version.to_string(),
        header_lines: header_lines.iter().map(|l| l.to_string()).collect(),
        authorization: None,
    }
}

#[test]
fn test_request_header_retrieval() {
    let req = request("HTTP/1.0", &["Host: example.com", "Content-Type: text/plain"]);

    assert_eq!(req.header("Host"), Some("example.com"));
    assert_eq!(req.header("content-type"), Some("text/plain"));
    assert_eq!(req.header("Missing"), None);
}

#[test]
fn test_request_header_first_match_wins() {
    let req = request("HTTP/1.0", &["X-A: one", "x-a: two"]);

    assert_eq!(req.header("X-A"), Some("one"));
}

#[test]
fn test_request_header_ignores_lines_without_colon() {
    let req = request("HTTP/1.0", &["garbage", "Host: h"]);

    assert_eq!(req.header("garbage"), None);
    assert_eq!(req.header("Host"), Some("h"));
}

#[test]
fn test_request_content_length_parsing() {
    let req = request("HTTP/1.0", &["Content-Length: 42"]);

    assert_eq!(req.content_length(), Some(42));
}

#[test]
fn test_request_content_length_missing() {
    assert_eq!(request("HTTP/1.0", &[]).content_length(), None);
}

#[test]
fn test_request_content_length_invalid() {
    let req = request("HTTP/1.0", &["Content-Length: not-a-number"]);

    assert_eq!(req.content_length(), None);
}

#[test]
fn test_request_is_http() {
    assert!(request("HTTP/1.0", &[]).is_http());
    assert!(request("HTTP/1.1", &[]).is_http());
    assert!(!request("", &[]).is_http());
    assert!(!request("http/1.0", &[]).is_http());
}

#[test]
fn test_request_method_parse() {
    assert_eq!(Method::parse("GET"), Method::GET);
    assert_eq!(Method::parse("HEAD"), Method::HEAD);
    assert_eq!(Method::parse("POST"), Method::POST);
    assert_eq!(Method::parse("PUT"), Method::OTHER("PUT".to_string()));
    assert_eq!(Method::parse("get"), Method::OTHER("get".to_string())); // Case-sensitive
}

#[test]
fn test_request_method_as_str() {
    assert_eq!(Method::HEAD.as_str(), "HEAD");
    assert_eq!(Method::OTHER("BREW".to_string()).as_str(), "BREW");
}
