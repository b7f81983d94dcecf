//! # Domain Types
//!
//! Core domain types shared across the Shopkeep client.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │   UserProfile   │   │    NewSale      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  id             │   │  customer       │       │
//! │  │  name           │   │  username       │   │  customer_email │       │
//! │  │  price (Money)  │   │  email          │   │  discount       │       │
//! │  │  inventory      │   │  auth_provider  │   │  products       │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  UserPatch: the ONLY way to partially update a profile. Every field    │
//! │  is optional, unknown fields are rejected at deserialization.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Product
// =============================================================================

/// A catalog product as served by the backend.
///
/// `inventory` is the stock level at fetch time. The cart snapshots it
/// when a product is added, so later catalog refreshes don't silently
/// change what an in-progress sale is allowed to hold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique identifier.
    pub id: String,

    /// Display name shown in search results and on the receipt.
    pub name: String,

    /// Unit price in cents.
    pub price: Money,

    /// Units currently available for sale.
    pub inventory: i64,
}

// =============================================================================
// Auth Provider
// =============================================================================

/// How the user authenticated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum AuthProvider {
    /// Username/password account on our backend.
    #[default]
    Local,
    /// Google OAuth account.
    Google,
}

// =============================================================================
// User Profile
// =============================================================================

/// The authenticated user's profile.
///
/// Lives inside the session and is serialized into the session snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Unique user identifier.
    pub id: String,

    /// Display/login name.
    pub username: String,

    /// Contact email.
    pub email: String,

    /// Mobile number, if provided.
    #[serde(default)]
    pub mobile: Option<String>,

    /// Avatar image (URL or data URI).
    #[serde(default)]
    pub image: Option<String>,

    /// How this account authenticates.
    #[serde(default)]
    pub auth_provider: AuthProvider,

    /// Persistence preference: true → durable snapshot, false → ephemeral.
    /// Absent means "not chosen", which the store treats as true.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remember_me: Option<bool>,
}

impl UserProfile {
    /// Shallow-merges a partial update into this profile.
    ///
    /// Only fields present in the patch change; everything else is kept.
    /// The auth provider and id are fixed at login and cannot be patched.
    pub fn apply(&mut self, patch: &UserPatch) {
        if let Some(username) = &patch.username {
            self.username = username.clone();
        }
        if let Some(email) = &patch.email {
            self.email = email.clone();
        }
        if let Some(mobile) = &patch.mobile {
            self.mobile = Some(mobile.clone());
        }
        if let Some(image) = &patch.image {
            self.image = Some(image.clone());
        }
    }
}

// =============================================================================
// User Patch
// =============================================================================

/// A partial profile update.
///
/// This is the closed set of fields a profile refresh or edit may change.
/// Unknown fields in incoming JSON are a deserialization error rather than
/// a silent merge.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UserPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl UserPatch {
    /// Returns true if the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.email.is_none()
            && self.mobile.is_none()
            && self.image.is_none()
    }
}

// =============================================================================
// Sale Creation
// =============================================================================

/// One product line in a sale-creation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SaleLine {
    pub product_id: String,
    pub quantity: i64,
}

/// The sale-creation payload posted to the backend.
///
/// Field names follow the backend's wire contract, including the
/// `customermail` spelling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewSale {
    /// Customer display name.
    pub customer: String,

    /// Customer email (receives the receipt).
    #[serde(rename = "customermail")]
    pub customer_email: String,

    /// Discount percentage applied to the whole sale.
    pub discount: f64,

    /// Products and quantities sold.
    pub products: Vec<SaleLine>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> UserProfile {
        UserProfile {
            id: "u1".to_string(),
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            mobile: None,
            image: None,
            auth_provider: AuthProvider::Local,
            remember_me: Some(true),
        }
    }

    #[test]
    fn test_patch_applies_only_present_fields() {
        let mut user = profile();
        let patch = UserPatch {
            email: Some("new@example.com".to_string()),
            mobile: Some("555-0101".to_string()),
            ..UserPatch::default()
        };

        user.apply(&patch);

        assert_eq!(user.username, "alice"); // untouched
        assert_eq!(user.email, "new@example.com");
        assert_eq!(user.mobile.as_deref(), Some("555-0101"));
        assert_eq!(user.remember_me, Some(true)); // never patched
    }

    #[test]
    fn test_empty_patch_is_noop() {
        let mut user = profile();
        let before = user.clone();
        let patch = UserPatch::default();
        assert!(patch.is_empty());

        user.apply(&patch);
        assert_eq!(user, before);
    }

    #[test]
    fn test_patch_rejects_unknown_fields() {
        let json = r#"{"email":"a@b.com","isAdmin":true}"#;
        let parsed: Result<UserPatch, _> = serde_json::from_str(json);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_new_sale_wire_shape() {
        let sale = NewSale {
            customer: "Bob".to_string(),
            customer_email: "bob@example.com".to_string(),
            discount: 10.0,
            products: vec![SaleLine {
                product_id: "p1".to_string(),
                quantity: 2,
            }],
        };

        let json = serde_json::to_value(&sale).unwrap();
        assert_eq!(json["customermail"], "bob@example.com");
        assert_eq!(json["products"][0]["productId"], "p1");
    }

    #[test]
    fn test_profile_snapshot_round_trip() {
        let user = profile();
        let json = serde_json::to_string(&user).unwrap();
        let back: UserProfile = serde_json::from_str(&json).unwrap();
        assert_eq!(back, user);
    }

    #[test]
    fn test_auth_provider_serde() {
        assert_eq!(
            serde_json::to_string(&AuthProvider::Google).unwrap(),
            "\"google\""
        );
        assert_eq!(
            serde_json::from_str::<AuthProvider>("\"local\"").unwrap(),
            AuthProvider::Local
        );
    }
}
