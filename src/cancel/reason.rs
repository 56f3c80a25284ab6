use std::sync::Arc;

/// Why a [`CancellationToken`](crate::cancel::CancellationToken) fired.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CancelReason {
    /// [`CancellationSource::cancel`](crate::cancel::CancellationSource::cancel) was called.
    #[error("cancelled")]
    Cancelled,

    /// The token's deadline passed.
    #[error("deadline exceeded")]
    DeadlineExceeded,

    /// Cancelled with a caller supplied message.
    #[error("cancelled: {0}")]
    Custom(Arc<str>),
}

impl CancelReason {
    /// Create a [`Custom`](CancelReason::Custom) reason.
    pub fn custom(message: impl Into<Arc<str>>) -> Self {
        CancelReason::Custom(message.into())
    }
}
