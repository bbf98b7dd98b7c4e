// 3rd party crates
use thiserror::Error;

/// Ways a DNS-over-HTTPS response can violate the expected wire format.
///
/// These indicate a misbehaving or spoofed responder. Each variant keeps
/// its own precise message and must never be collapsed into another error
/// kind.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DnsWireError {
    #[error("response is too short to carry a DNS header")]
    TooShort,

    #[error("response ends in the middle of a record")]
    UnexpectedEnd,

    #[error("transaction id {response:#06x} does not match query id {query:#06x}")]
    IdMismatch { query: u16, response: u16 },

    #[error("QR flag not set; the message is not a response")]
    NotAResponse,

    #[error("response is truncated (TC flag set)")]
    Truncated,

    #[error("server returned response code {0}")]
    ResponseCode(u8),

    #[error("expected exactly one answer, got {0}")]
    AnswerCount(u16),

    #[error("answer name \"{got}\" does not match query name \"{want}\"")]
    NameMismatch { want: String, got: String },

    #[error("answer type {got} does not match query type {want}")]
    TypeMismatch { want: u16, got: u16 },

    #[error("answer class {got} does not match query class {want}")]
    ClassMismatch { want: u16, got: u16 },

    #[error("expected exactly one TXT string, got {0}")]
    TxtStringCount(usize),

    #[error("TXT string is empty")]
    EmptyTxtString,

    #[error("TXT string is not valid UTF-8")]
    InvalidUtf8,

    #[error("unsupported label type {0:#04x} in a name")]
    BadLabel(u8),

    #[error("name compression pointer loop")]
    PointerLoop,
}
