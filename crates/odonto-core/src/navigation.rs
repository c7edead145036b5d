//! Sidebar menu.

/// A sidebar entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuItem {
    pub title: &'static str,
    pub url: &'static str,
    /// Shown greyed out and not clickable
    pub disabled: bool,
}

/// Group label above the menu.
pub const MENU_GROUP: &str = "Clínica";

pub const MENU: [MenuItem; 3] = [
    MenuItem { title: "Pacientes", url: "/patients", disabled: false },
    MenuItem { title: "Prontuários", url: "/records", disabled: true },
    MenuItem { title: "Configurações", url: "/settings", disabled: false },
];

impl MenuItem {
    /// Whether the item owns `path` (the item URL itself or a sub-page).
    pub fn matches(&self, path: &str) -> bool {
        let path = path.trim_end_matches('/');
        path == self.url
            || path
                .strip_prefix(self.url)
                .is_some_and(|rest| rest.starts_with('/'))
    }
}

/// Enabled menu item to highlight for the current path.
pub fn active_item(path: &str) -> Option<&'static MenuItem> {
    MENU.iter().find(|item| !item.disabled && item.matches(path))
}
