use std::fmt;

/// The three UTS calls made by [`crate::UmlsClient`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call {
    Search,
    Source,
    Hierarchy,
}

impl Call {
    pub fn as_str(&self) -> &'static str {
        match self {
            Call::Search => "search",
            Call::Source => "source",
            Call::Hierarchy => "hierarchy",
        }
    }
}

impl fmt::Display for Call {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum UmlsError {
    #[error("{call} request failed: {source}")]
    Transport {
        call: Call,
        #[source]
        source: reqwest::Error,
    },
    #[error("{call} request returned status code {status}")]
    Status { call: Call, status: u16 },
    #[error("{call} response could not be decoded: {source}")]
    Decode {
        call: Call,
        #[source]
        source: reqwest::Error,
    },
    #[error("no SNOMEDCT_US atom found for CUI {cui}")]
    NoSourceCode { cui: String },
}

impl UmlsError {
    /// HTTP status returned by UTS, when the failure carried one.
    pub fn status(&self) -> Option<u16> {
        match self {
            UmlsError::Status { status, .. } => Some(*status),
            UmlsError::Transport { source, .. } | UmlsError::Decode { source, .. } => {
                source.status().map(|s| s.as_u16())
            }
            UmlsError::NoSourceCode { .. } => None,
        }
    }

    /// Which call failed. A missing source code belongs to the source lookup.
    pub fn call(&self) -> Call {
        match self {
            UmlsError::Transport { call, .. }
            | UmlsError::Status { call, .. }
            | UmlsError::Decode { call, .. } => *call,
            UmlsError::NoSourceCode { .. } => Call::Source,
        }
    }
}

pub type UmlsResult<T> = Result<T, UmlsError>;
