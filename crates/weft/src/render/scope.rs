//! Inherited scope chain for block rendering.

use std::collections::HashMap;

/// Assignments inherited from the enclosing render chain.
///
/// The chain is seeded with the session's global assignments at the root
/// and extended with each template's for-block tables on the way down, so a
/// block sees (nearest first): its own assignments, values its ancestors
/// assigned for their blocks, and finally globals.
#[derive(Debug, Clone, Default)]
pub(crate) struct Scope {
    assigns: HashMap<String, String>,
    fast_assigns: HashMap<String, String>,
}

impl Scope {
    /// Root scope: the session's global tables.
    pub(crate) fn root(
        globals: &HashMap<String, String>,
        fast_globals: &HashMap<String, String>,
    ) -> Scope {
        Scope {
            assigns: globals.clone(),
            fast_assigns: fast_globals.clone(),
        }
    }

    /// Extend the chain with a template's for-block tables.
    ///
    /// Entries from the nearer template win over inherited ones.
    pub(crate) fn descend(
        &self,
        block_assigns: &HashMap<String, String>,
        block_fast_assigns: &HashMap<String, String>,
    ) -> Scope {
        let mut child = self.clone();
        child
            .assigns
            .extend(block_assigns.iter().map(|(k, v)| (k.clone(), v.clone())));
        child.fast_assigns.extend(
            block_fast_assigns
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        );
        child
    }

    pub(crate) fn get(&self, name: &str) -> Option<&str> {
        self.assigns.get(name).map(String::as_str)
    }

    pub(crate) fn get_fast(&self, name: &str) -> Option<&str> {
        self.fast_assigns.get(name).map(String::as_str)
    }
}
