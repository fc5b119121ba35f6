//! Helpers Module
//!
//! Small formatting helpers that don't clearly belong in another module.

/// Returns "s" unless the count is exactly one.
pub fn plural_s(count: impl TryInto<i64>) -> &'static str {
    if count.try_into().is_ok_and(|n| n == 1) { "" } else { "s" }
}

/// Join names as "a, b and c".
pub fn name_list(names: &[String]) -> String {
    match names {
        [] => String::new(),
        [only] => only.clone(),
        [rest @ .., last] => format!("{} and {last}", rest.join(", ")),
    }
}
