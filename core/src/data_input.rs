//! `DataInput` — Domain-specific data extraction
//!
//! The `DataInput` trait extracts data from a context (for the rule language,
//! a [`MatcherContext`](crate::MatcherContext)) and returns type-erased
//! `MatchingData`.
//!
//! This is generic over the context type `Ctx`, but returns domain-agnostic `MatchingData`,
//! enabling `InputMatchers` to be shared across different contexts.

use crate::MatchingData;
use std::fmt::Debug;

/// Extracts data from a domain-specific context.
///
/// `DataInput` is the bridge between a context and domain-agnostic matchers.
/// It extracts the relevant attribute and returns it as type-erased
/// [`MatchingData`].
///
/// # Thread Safety
///
/// All implementations must be `Send + Sync` so compiled programs can be
/// shared across pipeline passes running on different threads.
///
/// # Example
///
/// ```
/// use weave::{DataInput, MatchingData};
///
/// #[derive(Debug)]
/// struct Resource { name: String }
///
/// #[derive(Debug)]
/// struct ResourceNameInput;
///
/// impl DataInput<Resource> for ResourceNameInput {
///     fn get(&self, ctx: &Resource) -> MatchingData {
///         MatchingData::String(ctx.name.clone())
///     }
/// }
///
/// let data = ResourceNameInput.get(&Resource { name: "api@file".into() });
/// assert_eq!(data.as_str(), Some("api@file"));
/// ```
#[diagnostic::on_unimplemented(
    message = "`{Self}` does not implement `DataInput<{Ctx}>`",
    label = "this type cannot extract data from `{Ctx}`",
    note = "DataInput<Ctx> extracts data from a specific context type"
)]
pub trait DataInput<Ctx>: Send + Sync + Debug {
    /// Extract data from the given context.
    ///
    /// Returns [`MatchingData::None`] if the requested data is not present,
    /// in which case the owning predicate evaluates to `false`.
    fn get(&self, ctx: &Ctx) -> MatchingData;

    /// Returns a static string describing the type of data this input produces.
    ///
    /// Default is `"string"` since most inputs produce string data.
    fn data_type(&self) -> &'static str {
        "string"
    }
}

// Blanket implementation for boxed DataInputs
#[diagnostic::do_not_recommend]
impl<Ctx> DataInput<Ctx> for Box<dyn DataInput<Ctx>> {
    fn get(&self, ctx: &Ctx) -> MatchingData {
        (**self).get(ctx)
    }

    fn data_type(&self) -> &'static str {
        (**self).data_type()
    }
}
