//! Channel-layer errors.

use crate::error::{Error, ErrorKind};
use std::io;
use thiserror::Error as ThisError;

/// Errors that can occur on a message channel round trip.
#[derive(Debug, ThisError)]
pub enum ChannelError {
    /// The channel was closed by either end.
    #[error("channel closed")]
    Closed,

    /// Underlying I/O error.
    #[error("I/O error: {source}")]
    Io {
        /// The source I/O error.
        #[from]
        source: io::Error,
    },

    /// The peer sent a frame that violates the wire protocol.
    #[error("protocol error: {details}")]
    Protocol {
        /// Details about the violation.
        details: String,
    },
}

impl From<ChannelError> for Error {
    fn from(err: ChannelError) -> Self {
        let kind = match &err {
            ChannelError::Closed => ErrorKind::TransportClosed,
            ChannelError::Io { .. } => ErrorKind::Transport,
            ChannelError::Protocol { .. } => ErrorKind::Protocol,
        };
        Self::new(kind).with_message(err.to_string()).with_source(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closed_channel_maps_to_transport_closed() {
        let err = Error::from(ChannelError::Closed);
        assert_eq!(err.kind(), ErrorKind::TransportClosed);
        assert!(err.is_transport());
    }

    #[test]
    fn io_failure_maps_to_transport() {
        let io = io::Error::new(io::ErrorKind::ConnectionReset, "reset");
        let err = Error::from(ChannelError::from(io));
        assert_eq!(err.kind(), ErrorKind::Transport);
    }
}
