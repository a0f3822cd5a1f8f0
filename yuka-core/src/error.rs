use thiserror::Error;

/// Failures of the script pipeline (data sector, element index, code stream, compiler, decompiler).
#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("offset out of range: offset=0x{offset:X}, len=0x{len:X}")]
    OutOfRange { offset: usize, len: usize },

    #[error("bad script signature")]
    BadSignature,

    #[error("bad script header: {0}")]
    BadHeader(String),

    #[error("invalid element type {tag} at index {index}")]
    InvalidElementType { index: usize, tag: u32 },

    #[error("corrupt script: {0}")]
    Corrupt(String),

    #[error("invalid script input: {0}")]
    Invalid(String),

    #[error("operation not supported: {0}")]
    Unsupported(String),

    #[error("internal compiler error: {0}")]
    Internal(String),

    #[error(transparent)]
    Encoding(#[from] yuka_nls::NlsError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures of the YKC archive container.
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("bad archive signature")]
    BadSignature,

    #[error("unsupported archive version {0}")]
    UnsupportedVersion(u16),

    #[error("bad archive header size {0}")]
    BadHeaderSize(u32),

    #[error("corrupt archive: {0}")]
    Corrupt(String),

    #[error("archive is opened read-only")]
    ReadOnly,

    #[error("file not found in archive: {0}")]
    NotFound(String),

    #[error("file is open for writing: {0}")]
    Busy(String),

    #[error("bad file pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error(transparent)]
    Encoding(#[from] yuka_nls::NlsError),
}

pub type ScriptResult<T> = std::result::Result<T, ScriptError>;
pub type ArchiveResult<T> = std::result::Result<T, ArchiveError>;
