/// Errors produced by the `mentor-core` crate.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum CoreError {
    /// A username was empty or all whitespace.
    #[error("username must not be empty")]
    EmptyUsername,

    /// A username exceeded the maximum accepted length.
    #[error("username too long: {len} chars (max {max})")]
    UsernameTooLong { len: usize, max: usize },
}
