use thiserror::Error;

/// Why a save could not be read, written, or imported.
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("save file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("save data could not be parsed: {0}")]
    Unparsable(#[from] serde_json::Error),

    #[error("save data is missing {0}")]
    MissingField(&'static str),

    #[error("invalid save version: expected 0x{expected:016X}, got 0x{found:016X}")]
    BadVersion { expected: u64, found: u64 },

    #[error("save payload claims {declared} bytes but the file holds {available}")]
    BadLength { declared: u32, available: u64 },

    #[error("save checksum verification failed")]
    ChecksumMismatch,

    #[error("could not determine the config directory")]
    NoSaveDir,
}
