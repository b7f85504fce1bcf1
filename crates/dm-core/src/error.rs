use thiserror::Error;

pub type Result<T> = std::result::Result<T, BridgeError>;

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("Display error: {0}")]
    Display(#[from] dm_display::DisplayError),

    #[error("Input error: {0}")]
    Input(#[from] dm_input::InputError),

    #[error("Invalid source id: {0:?}")]
    InvalidSourceId(String),

    #[error("Mouse input disabled")]
    InputDisabled,
}
