use ohub_derive::ohub_error;
use std::borrow::Cow;

#[ohub_error]
pub enum DemoError {
    #[error("IO error{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },

    #[error("Missing order {id}{}", format_context(.context))]
    Missing { id: u32, context: Option<Cow<'static, str>> },
}

fn read() -> Result<(), std::io::Error> {
    Err(std::io::Error::other("disk"))
}

fn missing() -> Result<(), DemoError> {
    Err(DemoError::Missing { id: 7, context: None })
}

fn main() {
    let err = read().context("Loading catalog").unwrap_err();
    assert_eq!(err.to_string(), "IO error (Loading catalog): disk");

    let err = missing().context("Fetching order").unwrap_err();
    assert_eq!(err.to_string(), "Missing order 7 (Fetching order)");
}
