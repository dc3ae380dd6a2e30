use base64::{Engine, prelude::BASE64_URL_SAFE_NO_PAD};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Length of a generated album or photo id.
pub const RANDOM_ID_LENGTH: usize = 24;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid id {0:?}: expected {RANDOM_ID_LENGTH} url-safe base64 characters")]
pub struct InvalidId(pub String);

macro_rules! random_id {
    ($($id:ident),*$(,)?) => {
        $(
            #[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
            #[serde(try_from = "String", into = "String")]
            pub struct $id(String);

            impl $id {
                pub fn generate() -> Self {
                    Self(random_string())
                }

                pub fn as_str(&self) -> &str {
                    &self.0
                }
            }

            impl TryFrom<String> for $id {
                type Error = InvalidId;

                fn try_from(value: String) -> Result<Self, Self::Error> {
                    if is_random_id(&value) {
                        Ok(Self(value))
                    } else {
                        Err(InvalidId(value))
                    }
                }
            }

            impl ::std::str::FromStr for $id {
                type Err = InvalidId;

                fn from_str(s: &str) -> Result<Self, Self::Err> {
                    Self::try_from(s.to_string())
                }
            }

            impl From<$id> for String {
                fn from(value: $id) -> Self {
                    value.0
                }
            }

            impl ::std::fmt::Display for $id {
                fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    self.0.fmt(f)
                }
            }
        )*
    };
}

random_id![AlbumId, PhotoId];

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
#[repr(transparent)]
pub struct UserId(u64);

impl UserId {
    pub const ADMIN: UserId = UserId(0);
}

impl From<u64> for UserId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl ::std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// 18 random bytes, which encode to exactly 24 base64 characters.
fn random_string() -> String {
    let bytes: [u8; 18] = rand::random();
    BASE64_URL_SAFE_NO_PAD.encode(bytes)
}

pub fn is_random_id(value: &str) -> bool {
    value.len() == RANDOM_ID_LENGTH
        && value
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}
