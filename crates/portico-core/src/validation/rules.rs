//! Rule helpers called by `#[derive(Validate)]` expansions.
//!
//! Each rule returns `Err(message)` on violation. Absent optional values
//! (`None`) pass every rule except [`required`].

use std::sync::OnceLock;

pub use regex::Regex;

/// Values that can be checked for presence (`required`).
///
/// Mirrors a "non-zero value" check: `None`, empty strings, empty
/// collections, `false` and numeric zero are all absent.
pub trait Presence {
    /// Returns `true` if the value counts as provided.
    fn is_present(&self) -> bool;
}

impl<T> Presence for Option<T> {
    fn is_present(&self) -> bool {
        self.is_some()
    }
}

impl Presence for String {
    fn is_present(&self) -> bool {
        !self.is_empty()
    }
}

impl Presence for str {
    fn is_present(&self) -> bool {
        !self.is_empty()
    }
}

impl<T> Presence for Vec<T> {
    fn is_present(&self) -> bool {
        !self.is_empty()
    }
}

impl Presence for bool {
    fn is_present(&self) -> bool {
        *self
    }
}

/// Values with a measurable length (`length`).
pub trait HasLength {
    /// Length in characters or elements, `None` when absent.
    fn length(&self) -> Option<usize>;
}

impl HasLength for String {
    fn length(&self) -> Option<usize> {
        Some(self.chars().count())
    }
}

impl HasLength for str {
    fn length(&self) -> Option<usize> {
        Some(self.chars().count())
    }
}

impl<T> HasLength for Vec<T> {
    fn length(&self) -> Option<usize> {
        Some(self.len())
    }
}

impl<T: HasLength> HasLength for Option<T> {
    fn length(&self) -> Option<usize> {
        self.as_ref().and_then(HasLength::length)
    }
}

/// Numeric values (`range`).
pub trait AsNumber {
    /// The value widened to `f64`, `None` when absent.
    fn as_number(&self) -> Option<f64>;
}

impl<T: AsNumber> AsNumber for Option<T> {
    fn as_number(&self) -> Option<f64> {
        self.as_ref().and_then(AsNumber::as_number)
    }
}

/// Text values (`email`, `pattern`, `one_of`).
pub trait AsText {
    /// The value as a string slice, `None` when absent.
    fn as_text(&self) -> Option<&str>;
}

impl AsText for String {
    fn as_text(&self) -> Option<&str> {
        Some(self)
    }
}

impl AsText for str {
    fn as_text(&self) -> Option<&str> {
        Some(self)
    }
}

impl<T: AsText> AsText for Option<T> {
    fn as_text(&self) -> Option<&str> {
        self.as_ref().and_then(AsText::as_text)
    }
}

macro_rules! impl_numeric {
    ($($t:ty),*) => {
        $(
            impl Presence for $t {
                #[allow(clippy::float_cmp)]
                fn is_present(&self) -> bool {
                    *self != (0 as $t)
                }
            }

            impl AsNumber for $t {
                #[allow(clippy::cast_lossless, clippy::cast_possible_truncation)]
                fn as_number(&self) -> Option<f64> {
                    Some(*self as f64)
                }
            }
        )*
    };
}

impl_numeric!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);

/// The value must be present.
pub fn required<T: Presence + ?Sized>(value: &T) -> Result<(), String> {
    if value.is_present() {
        Ok(())
    } else {
        Err("is required".to_string())
    }
}

/// The length must lie within `min..=max` (either bound optional).
pub fn length<T: HasLength + ?Sized>(
    value: &T,
    min: Option<usize>,
    max: Option<usize>,
) -> Result<(), String> {
    let Some(len) = value.length() else {
        return Ok(());
    };

    match (min, max) {
        (Some(min), Some(max)) if len < min || len > max => {
            Err(format!("length must be between {min} and {max}"))
        }
        (Some(min), None) if len < min => Err(format!("length must be at least {min}")),
        (None, Some(max)) if len > max => Err(format!("length must be at most {max}")),
        _ => Ok(()),
    }
}

/// The number must lie within `min..=max` (either bound optional).
pub fn range<T: AsNumber + ?Sized>(
    value: &T,
    min: Option<f64>,
    max: Option<f64>,
) -> Result<(), String> {
    let Some(number) = value.as_number() else {
        return Ok(());
    };

    if let Some(min) = min {
        if number < min {
            return Err(format!("must be at least {min}"));
        }
    }
    if let Some(max) = max {
        if number > max {
            return Err(format!("must be at most {max}"));
        }
    }
    Ok(())
}

/// The text must look like an email address.
///
/// A shape check only, with no deliverability or RFC 5322 parsing: one `@`,
/// a local part of 1 to 64 characters, and a domain of at least two
/// non-empty dot-separated labels, all without whitespace.
pub fn email<T: AsText + ?Sized>(value: &T) -> Result<(), String> {
    match value.as_text() {
        Some(text) if !email_shape().is_match(text) => {
            Err("must be a valid email address".to_string())
        }
        _ => Ok(()),
    }
}

fn email_shape() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(r"^[^@\s]{1,64}@[^@\s.]+(\.[^@\s.]+)+$").expect("valid regex"))
}

/// The text must match `pattern`.
pub fn pattern<T: AsText + ?Sized>(value: &T, pattern: &Regex) -> Result<(), String> {
    match value.as_text() {
        Some(text) if !pattern.is_match(text) => {
            Err(format!("must match pattern {}", pattern.as_str()))
        }
        _ => Ok(()),
    }
}

/// The text must equal one of `allowed`.
pub fn one_of<T: AsText + ?Sized>(value: &T, allowed: &[&str]) -> Result<(), String> {
    match value.as_text() {
        Some(text) if !allowed.contains(&text) => {
            Err(format!("must be one of [{}]", allowed.join(", ")))
        }
        _ => Ok(()),
    }
}
