use thiserror::Error;

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Collaborator capability not available: {0}")]
    NotAvailable(String),

    #[error("Remote listing failed: {0}")]
    ListingFailed(String),

    #[error("Transfer failed for {locator}: {message}")]
    TransferFailed { locator: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, BridgeError>;
