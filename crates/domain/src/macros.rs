//! Macro for implementing Display and FromStr for small status enums
//!
//! # Example
//!
//! ```rust
//! use converge_domain::impl_domain_status_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Phase {
//!     Submitted,
//!     Settled,
//! }
//!
//! impl_domain_status_conversions!(Phase {
//!     Submitted => "submitted",
//!     Settled => "settled",
//! });
//!
//! assert_eq!(Phase::Settled.to_string(), "settled");
//! assert_eq!("SUBMITTED".parse::<Phase>(), Ok(Phase::Submitted));
//! ```

/// Implements Display and FromStr traits for status enums
///
/// - Display writes the lowercase label
/// - FromStr parses case-insensitively and names the enum in its error
#[macro_export]
macro_rules! impl_domain_status_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(Self::$variant => write!(f, $str),)+
                }
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                match s.to_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}
