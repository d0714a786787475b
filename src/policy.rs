//! Username policy.

use crate::error::{Error, Result};

pub const MIN_USERNAME_LENGTH: usize = 3;
pub const MAX_USERNAME_LENGTH: usize = 20;

/// Decides which display names are acceptable on a channel.
pub trait UsernamePolicy {
    fn validate(&self, username: &str) -> Result<()>;
}

/// 3 to 20 characters of `[A-Za-z0-9_-]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultUsernamePolicy;

impl UsernamePolicy for DefaultUsernamePolicy {
    fn validate(&self, username: &str) -> Result<()> {
        let length = username.chars().count();
        if !(MIN_USERNAME_LENGTH..=MAX_USERNAME_LENGTH).contains(&length) {
            return Err(Error::UsernameInvalid(format!(
                "'{}' must be {} to {} characters long",
                username, MIN_USERNAME_LENGTH, MAX_USERNAME_LENGTH
            )));
        }
        if let Some(c) = username
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '_' || *c == '-'))
        {
            return Err(Error::UsernameInvalid(format!(
                "'{}' contains forbidden character {:?}",
                username, c
            )));
        }
        Ok(())
    }
}

impl<F> UsernamePolicy for F
where
    F: Fn(&str) -> Result<()>,
{
    fn validate(&self, username: &str) -> Result<()> {
        self(username)
    }
}
