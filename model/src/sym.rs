use std::fmt::{Debug, Display};

use arcstr::ArcStr;

/// An interned symbol: relation names, object names, variable names.
///
/// Backed by an [`ArcStr`] so that clones are reference-count bumps; atoms
/// and states clone symbols heavily during exploration.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Sym(ArcStr);

impl Sym {
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Variable names carry a leading `?` by convention.
    pub fn is_var_name(&self) -> bool {
        self.0.starts_with('?')
    }
}

impl From<&str> for Sym {
    fn from(value: &str) -> Self {
        Sym(ArcStr::from(value))
    }
}

impl From<String> for Sym {
    fn from(value: String) -> Self {
        Sym(ArcStr::from(value))
    }
}

impl From<&Sym> for Sym {
    fn from(value: &Sym) -> Self {
        value.clone()
    }
}

impl Debug for Sym {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Display for Sym {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Sym {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}
