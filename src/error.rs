/// Errors that can occur while talking to a JK BMS device.
///
/// Note that response decoding never produces an error: malformed or missing
/// fields resolve to absent values in [`crate::protocol::BmsReading`]. Only
/// transport-level failures surface here.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "serialport")]
    #[error("Serial port error: {0}")]
    Serial(#[from] serialport::Error),
}
