use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Malformed XML at {line}:{column}: {message}")]
    Xml {
        message: String,
        line: u32,
        column: u32,
    },
    #[error("Invalid AVD XML: no <animated-vector> or <vector> tag found")]
    MissingVector,
    #[error("Could not find an inline <vector> drawable inside <animated-vector>")]
    MissingDrawable,
}

impl From<roxmltree::Error> for ParseError {
    fn from(err: roxmltree::Error) -> Self {
        let pos = err.pos();
        ParseError::Xml {
            message: err.to_string(),
            line: pos.row,
            column: pos.col,
        }
    }
}
