//! Static contact directory with free-text lookup.

use serde::Deserialize;

/// A contact entry. `name` is the case-insensitive lookup key.
#[derive(Debug, Clone, Deserialize)]
pub struct Contact {
    pub name: String,
    pub phone_number: String,
}

/// Result of a successful lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactHit {
    pub display_name: String,
    pub phone_number: String,
}

/// Contact table, loaded once at startup and immutable afterwards.
pub struct Directory {
    contacts: Vec<Contact>,
}

impl Directory {
    pub fn new(contacts: Vec<Contact>) -> Self {
        Self { contacts }
    }

    /// Look for `call <name> number`, `<name> number` or `call <name>`
    /// anywhere in the text, case-insensitively. The first contact in
    /// declaration order wins, regardless of which phrase shape matched.
    pub fn lookup(&self, text: &str) -> Option<ContactHit> {
        let lower = text.to_lowercase();

        for contact in &self.contacts {
            let name = contact.name.to_lowercase();
            if lower.contains(&format!("call {name} number"))
                || lower.contains(&format!("{name} number"))
                || lower.contains(&format!("call {name}"))
            {
                return Some(ContactHit {
                    display_name: capitalize(&contact.name),
                    phone_number: contact.phone_number.clone(),
                });
            }
        }

        None
    }
}

/// Upper-case the first character of the stored key for display.
fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
