//! Guest contact and region selection types.

use crate::error::CheckoutError;
use crate::ids::RegionId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Level in the region cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegionLevel {
    Province,
    City,
    District,
}

impl RegionLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RegionLevel::Province => "province",
            RegionLevel::City => "city",
            RegionLevel::District => "district",
        }
    }
}

impl fmt::Display for RegionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Province, city and district choice.
///
/// A child is only ever set while its parent is set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawRegionSelection")]
pub struct RegionSelection {
    province_id: Option<RegionId>,
    city_id: Option<RegionId>,
    district_id: Option<RegionId>,
}

#[derive(Deserialize)]
struct RawRegionSelection {
    #[serde(default)]
    province_id: Option<RegionId>,
    #[serde(default)]
    city_id: Option<RegionId>,
    #[serde(default)]
    district_id: Option<RegionId>,
}

impl TryFrom<RawRegionSelection> for RegionSelection {
    type Error = CheckoutError;

    fn try_from(raw: RawRegionSelection) -> Result<Self, Self::Error> {
        let mut selection = RegionSelection::default();
        if let Some(province) = raw.province_id {
            selection = selection.with_province(province);
        }
        if let Some(city) = raw.city_id {
            selection = selection.with_city(city)?;
        }
        if let Some(district) = raw.district_id {
            selection = selection.with_district(district)?;
        }
        Ok(selection)
    }
}

impl RegionSelection {
    pub fn province_id(&self) -> Option<&RegionId> {
        self.province_id.as_ref()
    }

    pub fn city_id(&self) -> Option<&RegionId> {
        self.city_id.as_ref()
    }

    pub fn district_id(&self) -> Option<&RegionId> {
        self.district_id.as_ref()
    }

    /// New province; city and district are always cleared.
    pub fn with_province(&self, province_id: RegionId) -> Self {
        Self {
            province_id: Some(province_id),
            city_id: None,
            district_id: None,
        }
    }

    /// New city; district is always cleared.
    pub fn with_city(&self, city_id: RegionId) -> Result<Self, CheckoutError> {
        if self.province_id.is_none() {
            return Err(CheckoutError::RegionOutOfOrder {
                level: RegionLevel::City.as_str(),
            });
        }
        Ok(Self {
            province_id: self.province_id.clone(),
            city_id: Some(city_id),
            district_id: None,
        })
    }

    /// New district.
    pub fn with_district(&self, district_id: RegionId) -> Result<Self, CheckoutError> {
        if self.city_id.is_none() {
            return Err(CheckoutError::RegionOutOfOrder {
                level: RegionLevel::District.as_str(),
            });
        }
        Ok(Self {
            district_id: Some(district_id),
            ..self.clone()
        })
    }
}

/// Guest contact form state for one checkout session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestContact {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub address_line1: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_line2: Option<String>,
    pub postal_code: String,
    #[serde(default)]
    pub region: RegionSelection,
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

impl GuestContact {
    pub fn has_full_name(&self) -> bool {
        !is_blank(&self.full_name)
    }

    pub fn has_email(&self) -> bool {
        !is_blank(&self.email)
    }

    pub fn has_phone(&self) -> bool {
        !is_blank(&self.phone)
    }

    pub fn has_address_line1(&self) -> bool {
        !is_blank(&self.address_line1)
    }

    pub fn has_postal_code(&self) -> bool {
        !is_blank(&self.postal_code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full() -> RegionSelection {
        RegionSelection::default()
            .with_province(RegionId::new("p1"))
            .with_city(RegionId::new("c1"))
            .unwrap()
            .with_district(RegionId::new("d1"))
            .unwrap()
    }

    #[test]
    fn test_province_clears_children() {
        let next = full().with_province(RegionId::new("p2"));
        assert_eq!(next.province_id(), Some(&RegionId::new("p2")));
        assert!(next.city_id().is_none());
        assert!(next.district_id().is_none());
    }

    #[test]
    fn test_same_province_still_clears_children() {
        let next = full().with_province(RegionId::new("p1"));
        assert!(next.city_id().is_none());
        assert!(next.district_id().is_none());
    }

    #[test]
    fn test_city_clears_district() {
        let next = full().with_city(RegionId::new("c2")).unwrap();
        assert_eq!(next.province_id(), Some(&RegionId::new("p1")));
        assert_eq!(next.city_id(), Some(&RegionId::new("c2")));
        assert!(next.district_id().is_none());
    }

    #[test]
    fn test_child_without_parent_rejected() {
        let empty = RegionSelection::default();
        assert_eq!(
            empty.with_city(RegionId::new("c1")),
            Err(CheckoutError::RegionOutOfOrder { level: "city" })
        );
        let province_only = empty.with_province(RegionId::new("p1"));
        assert!(province_only.with_district(RegionId::new("d1")).is_err());
    }

    #[test]
    fn test_deserialize_rejects_orphan_city() {
        let err = serde_json::from_str::<RegionSelection>(r#"{"city_id": "c1"}"#);
        assert!(err.is_err());

        let ok: RegionSelection =
            serde_json::from_str(r#"{"province_id": "p1", "city_id": "c1"}"#).unwrap();
        assert_eq!(ok.city_id(), Some(&RegionId::new("c1")));
    }

    #[test]
    fn test_blank_fields() {
        let contact = GuestContact {
            full_name: "   ".to_string(),
            email: "a@b.c".to_string(),
            ..Default::default()
        };
        assert!(!contact.has_full_name());
        assert!(contact.has_email());
        assert!(!contact.has_postal_code());
    }
}
