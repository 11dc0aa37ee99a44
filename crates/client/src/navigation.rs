//! Application navigation.

use std::sync::{Mutex, PoisonError};

/// Route for the sign-in page.
pub const LOGIN_PATH: &str = "/app/login";
/// Route shown when a profile cannot be resolved.
pub const NOT_FOUND_PATH: &str = "/404";
/// Route of the shop.
pub const PRODUCTS_PATH: &str = "/products";

/// Something that can move the user to another route.
pub trait Navigator: Send + Sync {
    fn current_path(&self) -> String;
    fn navigate(&self, path: &str);
}

/// Sign-in route that returns to `return_to` afterwards.
#[must_use]
pub fn login_with_return(return_to: &str) -> String {
    format!("{LOGIN_PATH}?returnUrl={}", urlencoding::encode(return_to))
}

/// Navigator that keeps the visited paths in memory.
#[derive(Debug)]
pub struct HistoryNavigator {
    history: Mutex<Vec<String>>,
}

impl HistoryNavigator {
    /// Start at `initial`.
    #[must_use]
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            history: Mutex::new(vec![initial.into()]),
        }
    }

    /// Every path visited, oldest first.
    #[must_use]
    pub fn history(&self) -> Vec<String> {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Default for HistoryNavigator {
    fn default() -> Self {
        Self::new("/")
    }
}

impl Navigator for HistoryNavigator {
    fn current_path(&self) -> String {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
            .unwrap_or_default()
    }

    fn navigate(&self, path: &str) {
        tracing::debug!(path, "navigate");
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(path.to_owned());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_with_return() {
        assert_eq!(
            login_with_return(PRODUCTS_PATH),
            "/app/login?returnUrl=%2Fproducts"
        );
    }

    #[test]
    fn test_history_navigator() {
        let nav = HistoryNavigator::new("/products");
        assert_eq!(nav.current_path(), "/products");

        nav.navigate("/404");
        assert_eq!(nav.current_path(), "/404");
        assert_eq!(nav.history(), vec!["/products", "/404"]);
    }
}
