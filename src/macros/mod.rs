/// Takes the owned value out of a `Cow`, or falls back to `$default` when the
/// `Cow` only borrows.
///
/// Formatting helpers hand back `Cow::Borrowed` when they left their input
/// untouched. The caller usually still owns that input, so it can be moved
/// into the result instead of being cloned.
macro_rules! owned_from_cow_or {
    ($getcow:expr, $default:expr) => {{
        match $getcow {
            std::borrow::Cow::Owned(value) => value,
            std::borrow::Cow::Borrowed(_) => $default,
        }
    }};
}

pub(crate) use owned_from_cow_or;
