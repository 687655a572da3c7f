use std::borrow::Cow;

use hyper::{
    body::Bytes,
    header::{HeaderMap, CONTENT_TYPE},
    Method, Uri,
};
use url::form_urlencoded;

/// A fully buffered inbound request, as seen by the matcher.
#[derive(Debug)]
pub(crate) struct InboundRequest {
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) query: Option<String>,
    pub(crate) headers: HeaderMap,
    pub(crate) body: Bytes,
}

impl InboundRequest {
    pub(crate) fn new(method: Method, uri: &Uri, headers: HeaderMap, body: Bytes) -> Self {
        Self {
            method,
            path: decode_path(uri.path()).into_owned(),
            query: uri.query().map(str::to_owned),
            headers,
            body,
        }
    }

    /// Returns the first value of the named header, or the empty string.
    /// Header names are case-insensitive.
    pub(crate) fn header(&self, name: &str) -> Cow<'_, str> {
        match self.headers.get(name) {
            Some(value) => String::from_utf8_lossy(value.as_bytes()),
            None => Cow::Borrowed(""),
        }
    }

    /// Returns the first value of the named parameter, or the empty string.
    ///
    /// A url-encoded POST, PUT or PATCH body is searched before the query
    /// string. Multipart bodies are not parsed, so their fields never match.
    pub(crate) fn form_value(&self, name: &str) -> String {
        let from_body = if self.has_form_body() {
            first_value(&self.body, name)
        } else {
            None
        };

        from_body
            .or_else(|| {
                self.query
                    .as_deref()
                    .and_then(|query| first_value(query.as_bytes(), name))
            })
            .unwrap_or_default()
    }

    fn has_form_body(&self) -> bool {
        if ![Method::POST, Method::PUT, Method::PATCH].contains(&self.method) {
            return false;
        }

        self.headers
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(';').next())
            .map(|mime| {
                mime.trim()
                    .eq_ignore_ascii_case("application/x-www-form-urlencoded")
            })
            .unwrap_or(false)
    }
}

/// Percent-decodes a request path. Paths that do not decode to UTF-8 are
/// returned as received.
pub(crate) fn decode_path(path: &str) -> Cow<'_, str> {
    urlencoding::decode(path).unwrap_or(Cow::Borrowed(path))
}

fn first_value(input: &[u8], name: &str) -> Option<String> {
    form_urlencoded::parse(input)
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}

#[cfg(test)]
mod test {
    use hyper::Request;

    use super::*;

    fn inbound(req: Request<&'static str>) -> InboundRequest {
        let (parts, body) = req.into_parts();
        InboundRequest::new(
            parts.method,
            &parts.uri,
            parts.headers,
            Bytes::from_static(body.as_bytes()),
        )
    }

    #[test]
    fn request_header_lookup() {
        let req = inbound(
            Request::get("/foo")
                .header("authorization", "basic abc")
                .header("Authorization", "basic def")
                .body("")
                .unwrap(),
        );

        assert_eq!(req.header("Authorization"), "basic abc");
        assert_eq!(req.header("X-Missing"), "");
        assert_eq!(req.header("not a header name"), "");
    }

    #[test]
    fn request_path_decoded() {
        let req = inbound(
            Request::get("/users/john%20doe/caf%C3%A9?x=%20")
                .body("")
                .unwrap(),
        );

        assert_eq!(req.path, "/users/john doe/café");
        assert_eq!(req.query.as_deref(), Some("x=%20"));
        assert_eq!(decode_path("/a+b"), "/a+b");
        assert_eq!(decode_path("/bad%FF"), "/bad%FF");
    }

    #[test]
    fn request_query_values() {
        let req = inbound(
            Request::get("/foo?page=1&page=2&q=hello+world&e=%2Fx")
                .body("")
                .unwrap(),
        );

        assert_eq!(req.path, "/foo");
        assert_eq!(req.form_value("page"), "1");
        assert_eq!(req.form_value("q"), "hello world");
        assert_eq!(req.form_value("e"), "/x");
        assert_eq!(req.form_value("missing"), "");
    }

    #[test]
    fn request_form_body_before_query() {
        let req = inbound(
            Request::post("/foo?page=1&sort=asc")
                .header(CONTENT_TYPE, "application/x-www-form-urlencoded; charset=utf-8")
                .body("page=2")
                .unwrap(),
        );

        assert_eq!(req.form_value("page"), "2");
        assert_eq!(req.form_value("sort"), "asc");
    }

    #[test]
    fn request_form_body_ignored_for_get() {
        let req = inbound(
            Request::get("/foo")
                .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body("page=2")
                .unwrap(),
        );

        assert_eq!(req.form_value("page"), "");
    }

    #[test]
    fn request_form_body_requires_content_type() {
        let req = inbound(Request::post("/foo").body("page=2").unwrap());
        assert_eq!(req.form_value("page"), "");
    }

    #[test]
    fn request_multipart_body_ignored() {
        let req = inbound(
            Request::post("/foo?page=1")
                .header(CONTENT_TYPE, "multipart/form-data; boundary=X")
                .body("--X\r\nContent-Disposition: form-data; name=\"page\"\r\n\r\n2\r\n--X--\r\n")
                .unwrap(),
        );

        assert_eq!(req.form_value("page"), "1");
    }
}
