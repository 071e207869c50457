use std::error::Error;
use std::fmt;
use std::io;

#[derive(Debug)]
pub enum ServeError {
    // Configuration errors
    InvalidDirectory(String),

    // Port errors
    PortUnavailable(u16),
    NoViablePort { requested: u16, fallback: u16 },

    // Network probe errors
    AddressResolution(String),

    // Listener errors
    BindError(String),
    StartupOrder(String),

    // System errors
    Io(io::Error),
}

impl fmt::Display for ServeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDirectory(msg) => write!(f, "Invalid directory: {}", msg),
            Self::PortUnavailable(port) => {
                write!(f, "Port {} is not able to be listened on", port)
            }
            Self::NoViablePort {
                requested,
                fallback,
            } => write!(
                f,
                "Port {} is not able to be listened on and fallback port {} is not available either",
                requested, fallback
            ),
            Self::AddressResolution(msg) => {
                write!(f, "Could not determine local outbound IP address: {}", msg)
            }
            Self::BindError(msg) => write!(f, "Failed to start listener: {}", msg),
            Self::StartupOrder(msg) => write!(f, "Startup step out of order: {}", msg),
            Self::Io(err) => write!(f, "I/O error: {}", err),
        }
    }
}

impl Error for ServeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for ServeError {
    fn from(err: io::Error) -> Self {
        ServeError::Io(err)
    }
}

// Generic result type for the server
pub type Result<T> = std::result::Result<T, ServeError>;
