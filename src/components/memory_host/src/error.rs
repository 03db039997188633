use element::Element;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum HostError {
    #[error("unknown element {0}")]
    UnknownElement(Element),

    #[error("attempt to recreate type '{0}'")]
    DuplicateType(String),
}
