//! `MatchingData` — Type-erased data that flows between `DataInput` and `InputMatcher`
//!
//! `DataInputs` produce `MatchingData`, and `InputMatchers` consume it.
//! This allows `InputMatchers` to be non-generic and shareable across contexts.
//!
//! Resource attributes are either a single string (name, provider, service)
//! or an ordered list of strings (entrypoints), so those are the only shapes.

/// The erased data type that flows between `DataInput` and `InputMatcher`.
///
/// # Variants
///
/// - `None` — No data available (extractor returned nothing)
/// - `String` — A single string attribute
/// - `List` — An ordered list attribute; matchers succeed if any element matches
///
/// # Example
///
/// ```
/// use weave::MatchingData;
///
/// let data = MatchingData::String("hello".to_string());
/// assert_eq!(data.as_str(), Some("hello"));
/// assert!(!data.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchingData {
    /// No data available (extractor returned nothing).
    /// When a predicate receives this, it evaluates to `false`.
    None,

    /// A single string value.
    String(String),

    /// An ordered list of string values.
    List(Vec<String>),
}

impl MatchingData {
    /// Returns `true` if this is the `None` variant.
    ///
    /// # Example
    ///
    /// ```
    /// use weave::MatchingData;
    ///
    /// assert!(MatchingData::None.is_none());
    /// assert!(!MatchingData::String("x".to_string()).is_none());
    /// ```
    #[inline]
    #[must_use]
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Returns `true` if this is the `String` variant.
    #[inline]
    #[must_use]
    pub fn is_string(&self) -> bool {
        matches!(self, Self::String(_))
    }

    /// Returns `true` if this is the `List` variant.
    #[inline]
    #[must_use]
    pub fn is_list(&self) -> bool {
        matches!(self, Self::List(_))
    }

    /// Returns the string value if this is the `String` variant.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the elements if this is the `List` variant.
    #[inline]
    #[must_use]
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Returns `true` if `check` holds for the string, or for any list element.
    ///
    /// This is the shared "one of" rule every [`InputMatcher`](crate::InputMatcher)
    /// in this crate applies to list data. `None` never satisfies it.
    #[must_use]
    pub fn any_str(&self, mut check: impl FnMut(&str) -> bool) -> bool {
        match self {
            Self::None => false,
            Self::String(s) => check(s),
            Self::List(items) => items.iter().any(|s| check(s)),
        }
    }

    /// Returns a static string describing the data type.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::String(_) => "string",
            Self::List(_) => "list",
        }
    }
}

impl From<String> for MatchingData {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<&str> for MatchingData {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<Vec<String>> for MatchingData {
    fn from(items: Vec<String>) -> Self {
        Self::List(items)
    }
}

impl<T: Into<MatchingData>> From<Option<T>> for MatchingData {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Self::None, Into::into)
    }
}
