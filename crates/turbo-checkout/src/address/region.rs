//! Region lookup collaborator and picker lists.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::address::{AddressState, RegionLevel};
use crate::error::ServiceError;
use crate::ids::RegionId;

/// A province, city or district.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub id: RegionId,
    pub name: String,
}

impl Region {
    pub fn new(id: impl Into<RegionId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Remote region service. Trusted to return valid children for a valid parent.
#[async_trait]
pub trait RegionLookup: Send + Sync {
    async fn list_provinces(&self) -> Result<Vec<Region>, ServiceError>;

    async fn list_cities(&self, province_id: &RegionId) -> Result<Vec<Region>, ServiceError>;

    async fn list_districts(&self, city_id: &RegionId) -> Result<Vec<Region>, ServiceError>;
}

/// Handle for one outstanding lookup.
///
/// Its completion is applied only if no newer lookup or selection at the
/// same level has happened since it was issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionTicket {
    pub level: RegionLevel,
    /// Parent the lookup was issued for (`None` for provinces).
    pub parent: Option<RegionId>,
    generation: u64,
}

/// Region lists shown in the three pickers.
#[derive(Debug, Clone, Default)]
pub struct RegionLists {
    provinces: Vec<Region>,
    cities: Vec<Region>,
    districts: Vec<Region>,
    province_generation: u64,
    city_generation: u64,
    district_generation: u64,
}

impl RegionLists {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn provinces(&self) -> &[Region] {
        &self.provinces
    }

    pub fn cities(&self) -> &[Region] {
        &self.cities
    }

    pub fn districts(&self) -> &[Region] {
        &self.districts
    }

    /// Start a province lookup. Always eligible.
    pub fn begin_provinces(&mut self) -> RegionTicket {
        self.province_generation += 1;
        RegionTicket {
            level: RegionLevel::Province,
            parent: None,
            generation: self.province_generation,
        }
    }

    /// Start a city lookup; eligible only once a province is set.
    pub fn begin_cities(&mut self, state: &AddressState) -> Option<RegionTicket> {
        let parent = state.city_lookup_parent()?.clone();
        self.city_generation += 1;
        Some(RegionTicket {
            level: RegionLevel::City,
            parent: Some(parent),
            generation: self.city_generation,
        })
    }

    /// Start a district lookup; eligible only once a city is set.
    pub fn begin_districts(&mut self, state: &AddressState) -> Option<RegionTicket> {
        let parent = state.district_lookup_parent()?.clone();
        self.district_generation += 1;
        Some(RegionTicket {
            level: RegionLevel::District,
            parent: Some(parent),
            generation: self.district_generation,
        })
    }

    /// Whether a ticket still matches the current generation of its level.
    pub fn is_current(&self, ticket: &RegionTicket) -> bool {
        ticket.generation == self.generation(ticket.level)
    }

    /// Apply a finished lookup. Returns `false` when the ticket is stale and
    /// the result was dropped.
    pub fn complete(&mut self, ticket: &RegionTicket, regions: Vec<Region>) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        match ticket.level {
            RegionLevel::Province => self.provinces = regions,
            RegionLevel::City => self.cities = regions,
            RegionLevel::District => self.districts = regions,
        }
        true
    }

    /// A new choice at `level` invalidates every list below it, including
    /// lookups still in flight for the old parent.
    pub fn on_selected(&mut self, level: RegionLevel) {
        match level {
            RegionLevel::Province => {
                self.city_generation += 1;
                self.district_generation += 1;
                self.cities.clear();
                self.districts.clear();
            }
            RegionLevel::City => {
                self.district_generation += 1;
                self.districts.clear();
            }
            RegionLevel::District => {}
        }
    }

    fn generation(&self, level: RegionLevel) -> u64 {
        match level {
            RegionLevel::Province => self.province_generation,
            RegionLevel::City => self.city_generation,
            RegionLevel::District => self.district_generation,
        }
    }
}
