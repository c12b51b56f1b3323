/// Everything that can end an invocation early. A missing OCR field is not
/// in here; that is a normal `OcrResult::not_found()`.
#[derive(Debug, Fail, PartialEq)]
pub enum HandlerError {
    #[fail(display = "Malformed event: {}", _0)]
    MalformedEvent(String),
    #[fail(display = "Error calling OCR service: {}", _0)]
    OcrTransport(String),
    #[fail(display = "Error publishing event: {}", _0)]
    Publish(String),
    #[fail(display = "Storage error: {}", _0)]
    Storage(String),
}

#[derive(Debug, Fail, PartialEq)]
pub enum ConfigError {
    #[fail(display = "{} environment variable unset", _0)]
    Missing(&'static str),
    #[fail(display = "{} is not a valid URL: {}", _0, _1)]
    InvalidUrl(&'static str, String),
    #[fail(display = "PORT is not a valid port: {}", _0)]
    InvalidPort(String),
}
