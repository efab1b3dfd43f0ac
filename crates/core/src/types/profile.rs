//! Shopper account profile and delivery-detail validation.

use serde::{Deserialize, Serialize};

/// Minimum number of digits in a usable phone number.
pub const MIN_PHONE_DIGITS: usize = 10;

/// Minimum number of characters in a usable delivery address.
pub const MIN_ADDRESS_CHARS: usize = 10;

/// Profile fields stored on the shopper's account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// A profile field that is missing or too short to deliver to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileGap {
    Name,
    Phone,
    Address,
}

impl ProfileGap {
    /// What the shopper has to do to close this gap.
    #[must_use]
    pub const fn guidance(self) -> &'static str {
        match self {
            Self::Name => "add your full name",
            Self::Phone => "add a phone number with at least 10 digits",
            Self::Address => "add a delivery address of at least 10 characters",
        }
    }
}

/// Validated delivery details copied onto an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryProfile {
    pub customer_name: String,
    pub customer_phone: String,
    pub delivery_address: String,
}

impl UserProfile {
    /// Fields that stop this profile from being used for delivery, in a
    /// stable order (name, phone, address).
    #[must_use]
    pub fn gaps(&self) -> Vec<ProfileGap> {
        let mut gaps = Vec::new();
        if trimmed(self.full_name.as_deref()).is_empty() {
            gaps.push(ProfileGap::Name);
        }
        if !self.has_valid_phone() {
            gaps.push(ProfileGap::Phone);
        }
        if !self.has_valid_address() {
            gaps.push(ProfileGap::Address);
        }
        gaps
    }

    /// Whether the phone number carries at least [`MIN_PHONE_DIGITS`] digits.
    #[must_use]
    pub fn has_valid_phone(&self) -> bool {
        self.phone
            .as_deref()
            .is_some_and(|p| p.chars().filter(char::is_ascii_digit).count() >= MIN_PHONE_DIGITS)
    }

    /// Whether the address is at least [`MIN_ADDRESS_CHARS`] characters long.
    #[must_use]
    pub fn has_valid_address(&self) -> bool {
        trimmed(self.address.as_deref()).chars().count() >= MIN_ADDRESS_CHARS
    }

    /// Phone and address are both usable.
    #[must_use]
    pub fn has_delivery_details(&self) -> bool {
        self.has_valid_phone() && self.has_valid_address()
    }

    /// Build the delivery profile used for an order.
    ///
    /// # Errors
    ///
    /// Returns every missing field when the profile is incomplete.
    pub fn delivery_profile(&self) -> Result<DeliveryProfile, Vec<ProfileGap>> {
        let gaps = self.gaps();
        if !gaps.is_empty() {
            return Err(gaps);
        }
        Ok(DeliveryProfile {
            customer_name: trimmed(self.full_name.as_deref()).to_string(),
            customer_phone: trimmed(self.phone.as_deref()).to_string(),
            delivery_address: trimmed(self.address.as_deref()).to_string(),
        })
    }
}

fn trimmed(value: Option<&str>) -> &str {
    value.map_or("", str::trim)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(name: &str, phone: &str, address: &str) -> UserProfile {
        UserProfile {
            full_name: Some(name.to_string()),
            phone: Some(phone.to_string()),
            address: Some(address.to_string()),
        }
    }

    #[test]
    fn test_complete_profile() {
        let p = profile("Asha Rao", "+91 98765 43210", "12 Lake Road, Pune");
        let delivery = p.delivery_profile().unwrap_or_else(|gaps| {
            panic!("expected complete profile, missing {gaps:?}");
        });
        assert_eq!(delivery.customer_name, "Asha Rao");
        assert_eq!(delivery.delivery_address, "12 Lake Road, Pune");
    }

    #[test]
    fn test_phone_counts_digits_only() {
        // 9 digits padded with punctuation is still too short
        let p = profile("Asha", "(987) 654-321", "12 Lake Road, Pune");
        assert_eq!(p.gaps(), vec![ProfileGap::Phone]);
    }

    #[test]
    fn test_short_address_and_missing_name() {
        let p = UserProfile {
            full_name: Some("   ".to_string()),
            phone: Some("9876543210".to_string()),
            address: Some("Flat 2".to_string()),
        };
        assert_eq!(p.gaps(), vec![ProfileGap::Name, ProfileGap::Address]);
        assert!(!p.has_delivery_details());
    }

    #[test]
    fn test_empty_profile_lists_everything() {
        assert_eq!(
            UserProfile::default().gaps(),
            vec![ProfileGap::Name, ProfileGap::Phone, ProfileGap::Address]
        );
    }
}
