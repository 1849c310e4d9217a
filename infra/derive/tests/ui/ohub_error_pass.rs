use ohub_derive::ohub_error;
use std::borrow::Cow;

#[ohub_error]
pub enum DemoError {
    #[error("IO error{}: {source}", format_context(.context))]
    Io {
        #[source]
        source: std::io::Error,
        context: Option<Cow<'static, str>>,
    },

    #[error("Missing order {id}{}", format_context(.context))]
    Missing { id: u32, context: Option<Cow<'static, str>> },

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn main() {
    let from_str: DemoError = "boom".into();
    assert_eq!(from_str.to_string(), "Internal error: boom");

    let from_io: DemoError = std::io::Error::other("disk").into();
    assert!(matches!(from_io, DemoError::Io { context: None, .. }));
}
