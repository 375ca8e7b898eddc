#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid option `{option}`: {message}")]
    InvalidOption {
        option: &'static str,
        message: String,
    },
    #[error(
        "bounds {width}x{height} leave no room inside padding {padding}: \
         both sides must exceed twice the padding"
    )]
    DegenerateBounds {
        width: f64,
        height: f64,
        padding: f64,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
