//! Navigation targets of the client.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// Authenticated landing page
    Home,
    /// Unauthenticated landing page
    Login,
    Signup,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Home => "/home",
            Route::Login => "/login",
            Route::Signup => "/signup",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_paths() {
        assert_eq!(Route::Home.path(), "/home");
        assert_eq!(Route::Login.path(), "/login");
        assert_eq!(Route::Signup.path(), "/signup");
        assert_eq!(Route::Home.to_string(), "/home");
    }
}
