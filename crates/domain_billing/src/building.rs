//! Buildings and their permillage table

use std::collections::HashSet;

use core_kernel::{ApartmentId, BuildingId, Money};
use domain_quota::{Charge, Participant, WeightMode, PERMILLAGE_TOTAL};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{BillingError, BillingResult};

/// An apartment and its share of the building
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Apartment {
    pub id: ApartmentId,
    /// Door label, e.g. "1A"
    pub label: String,
    pub permillage: Decimal,
}

impl Apartment {
    pub fn new(label: impl Into<String>, permillage: Decimal) -> Self {
        Self {
            id: ApartmentId::new_v7(),
            label: label.into(),
            permillage,
        }
    }

    pub fn with_id(mut self, id: ApartmentId) -> Self {
        self.id = id;
        self
    }
}

/// A condominium building
///
/// Apartment order is significant: it is the order of every allocation,
/// and therefore decides which apartment gets a tied leftover cent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Building {
    id: BuildingId,
    name: String,
    apartments: Vec<Apartment>,
}

impl Building {
    /// Creates a building, rejecting duplicate apartment ids or labels
    ///
    /// Permillages are not required to add up to 1000 here; see [`Building::charge`].
    pub fn new(name: impl Into<String>, apartments: Vec<Apartment>) -> BillingResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(BillingError::InvalidConfiguration(
                "building name must not be empty".to_string(),
            ));
        }

        let mut ids = HashSet::new();
        let mut labels = HashSet::new();
        for apartment in &apartments {
            if apartment.label.trim().is_empty() {
                return Err(BillingError::InvalidConfiguration(format!(
                    "apartment {} has an empty label",
                    apartment.id
                )));
            }
            if !ids.insert(apartment.id) {
                return Err(BillingError::DuplicateApartment(apartment.id.to_string()));
            }
            if !labels.insert(apartment.label.as_str()) {
                return Err(BillingError::DuplicateApartment(apartment.label.clone()));
            }
        }

        Ok(Self {
            id: BuildingId::new_v7(),
            name,
            apartments,
        })
    }

    pub fn with_id(mut self, id: BuildingId) -> Self {
        self.id = id;
        self
    }

    pub fn id(&self) -> BuildingId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn apartments(&self) -> &[Apartment] {
        &self.apartments
    }

    pub fn apartment(&self, id: ApartmentId) -> Option<&Apartment> {
        self.apartments.iter().find(|a| a.id == id)
    }

    pub fn apartment_by_label(&self, label: &str) -> Option<&Apartment> {
        self.apartments.iter().find(|a| a.label == label)
    }

    /// Sum of all permillages, `None` when it leaves the `Decimal` range
    pub fn permillage_total(&self) -> Option<Decimal> {
        self.apartments
            .iter()
            .try_fold(Decimal::ZERO, |acc, a| acc.checked_add(a.permillage))
    }

    /// Engine participants in apartment order, weighted by permillage
    pub fn participants(&self) -> Vec<Participant<ApartmentId>> {
        self.apartments
            .iter()
            .map(|a| Participant::new(a.id, a.permillage))
            .collect()
    }

    /// Builds a charge over every apartment
    ///
    /// A permillage table that does not add up to 1000 is still usable, since
    /// weights are normalized, but it usually means a data entry mistake.
    pub fn charge(&self, total: Money, mode: WeightMode) -> Charge<ApartmentId> {
        if mode == WeightMode::Permillage {
            match self.permillage_total() {
                Some(sum) if sum == Decimal::from(PERMILLAGE_TOTAL) => {}
                Some(sum) => warn!(
                    building_id = %self.id,
                    permillage_total = %sum,
                    "Permillage table does not add up to 1000"
                ),
                None => warn!(building_id = %self.id, "Permillage table total overflows"),
            }
        }
        Charge::new(total, self.participants(), mode)
    }
}
