use itertools::Itertools;
use serde::Serialize;

use crate::model::{Address, User};

pub const FALLBACK_INITIALS: &str = "EH";
pub const FALLBACK_DISPLAY_NAME: &str = "Ervin Howell";

/// Uppercased first letter of every whitespace separated word in `name`.
pub fn initials(name: Option<&str>) -> String {
    let name = name.map(str::trim).unwrap_or_default();
    if name.is_empty() {
        return FALLBACK_INITIALS.to_string();
    }
    name.split_whitespace()
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .join("")
}

pub fn address_line(address: Option<&Address>) -> String {
    match address {
        Some(a) => format!("{}, {}, {}", a.street, a.city, a.zipcode),
        None => String::new(),
    }
}

/// Avatar and name shown in the header bar of both screens.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HeaderBadge {
    pub initials: String,
    pub display_name: String,
}

impl HeaderBadge {
    pub fn for_user(user: Option<&User>) -> Self {
        let name = user
            .and_then(|u| u.name.as_deref())
            .filter(|n| !n.trim().is_empty());
        Self {
            initials: initials(name),
            display_name: name.unwrap_or(FALLBACK_DISPLAY_NAME).to_string(),
        }
    }
}

/// Display-only fields of the profile card.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileView {
    pub user_id: u64,
    pub name: String,
    pub email: String,
    pub initials: String,
    pub address: String,
    pub phone: String,
}

impl ProfileView {
    pub fn from_user(user: &User) -> Self {
        Self {
            user_id: user.id,
            name: user.name.clone().unwrap_or_default(),
            email: user.email.clone(),
            initials: initials(user.name.as_deref()),
            address: address_line(user.address.as_ref()),
            phone: user.phone.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(name: Option<&str>, address: Option<Address>) -> User {
        User {
            id: 1,
            name: name.map(str::to_string),
            email: "Sincere@april.biz".to_string(),
            address,
            phone: "1-770-736-8031 x56442".to_string(),
        }
    }

    #[test]
    fn initials_take_first_letter_of_each_word() {
        assert_eq!(initials(Some("Leanne Graham")), "LG");
        assert_eq!(initials(Some("mrs. dennis  schulist")), "MDS");
        assert_eq!(initials(Some("cher")), "C");
    }

    #[test]
    fn initials_fall_back_when_name_missing() {
        assert_eq!(initials(None), "EH");
        assert_eq!(initials(Some("")), "EH");
        assert_eq!(initials(Some("   ")), "EH");
    }

    #[test]
    fn address_joins_street_city_zip() {
        let address = Address {
            street: "Kulas Light".to_string(),
            city: "Gwenborough".to_string(),
            zipcode: "92998-3874".to_string(),
        };
        assert_eq!(
            address_line(Some(&address)),
            "Kulas Light, Gwenborough, 92998-3874"
        );
        assert_eq!(address_line(None), "");
    }

    #[test]
    fn profile_view_derives_display_fields() {
        let view = ProfileView::from_user(&user(Some("Leanne Graham"), None));
        assert_eq!(view.initials, "LG");
        assert_eq!(view.address, "");
        assert_eq!(view.user_id, 1);
    }

    #[test]
    fn header_badge_falls_back_without_user() {
        let badge = HeaderBadge::for_user(None);
        assert_eq!(badge.initials, "EH");
        assert_eq!(badge.display_name, "Ervin Howell");

        let named = user(Some("Leanne Graham"), None);
        let badge = HeaderBadge::for_user(Some(&named));
        assert_eq!(badge.initials, "LG");
        assert_eq!(badge.display_name, "Leanne Graham");
    }
}
