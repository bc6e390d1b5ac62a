use std::fmt::{Debug, Formatter};
use std::sync::Arc;

/// A pluggable function turning a bare type identifier into a collection name.
///
/// The default convention is [`snake_case`], so a `UserAccount` model is
/// stored in `user_account`. Any `Fn(&str) -> String` can be used instead.
///
/// # Examples
///
/// ```rust,ignore
/// use mogul::common::NamingConvention;
///
/// let plural = NamingConvention::new(|name| format!("{}s", name.to_lowercase()));
/// assert_eq!(plural.apply("Order"), "orders");
/// ```
#[derive(Clone)]
pub struct NamingConvention {
    func: Arc<dyn Fn(&str) -> String + Send + Sync>,
}

impl NamingConvention {
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        NamingConvention {
            func: Arc::new(func),
        }
    }

    /// `UserAccount` -> `user_account`.
    pub fn snake_case() -> Self {
        NamingConvention::new(snake_case)
    }

    /// `UserAccount` -> `useraccount`.
    pub fn lower_case() -> Self {
        NamingConvention::new(|name| name.to_lowercase())
    }

    /// Uses the type identifier unchanged.
    pub fn identity() -> Self {
        NamingConvention::new(|name| name.to_string())
    }

    pub fn apply(&self, type_name: &str) -> String {
        (self.func)(type_name)
    }
}

impl Default for NamingConvention {
    fn default() -> Self {
        NamingConvention::snake_case()
    }
}

impl Debug for NamingConvention {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "NamingConvention")
    }
}

/// Converts a camel-case identifier to snake case.
///
/// An underscore is inserted before an uppercase letter that follows a
/// lowercase letter or digit, and before the last uppercase letter of an
/// acronym when a lowercase letter follows it (`HTTPServer` -> `http_server`).
pub fn snake_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut result = String::with_capacity(name.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() {
            if i > 0 {
                let prev = chars[i - 1];
                let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
                let boundary = prev.is_lowercase()
                    || prev.is_ascii_digit()
                    || (prev.is_uppercase() && next_is_lower);
                if boundary && prev != '_' {
                    result.push('_');
                }
            }
            result.extend(c.to_lowercase());
        } else {
            result.push(c);
        }
    }
    result
}
