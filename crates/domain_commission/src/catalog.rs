//! Read-only registry of commission packs

use rust_decimal::Decimal;
use std::collections::BTreeMap;
use tracing::debug;

use core_kernel::PackId;
use crate::error::CommissionError;
use crate::pack::{CommissionPack, TierPosition};

/// Registry of the packs available to agents
///
/// Packs are loaded once, validated, and never mutated afterwards. A pack
/// with a gap or an overlap in its ranges is refused at load time.
#[derive(Debug, Clone, Default)]
pub struct PackCatalog {
    packs: BTreeMap<PackId, CommissionPack>,
}

impl PackCatalog {
    /// Builds a catalog from pack definitions
    ///
    /// # Errors
    ///
    /// `CommissionError::Configuration` if a pack violates the range
    /// invariants or two packs share an id.
    pub fn new(packs: impl IntoIterator<Item = CommissionPack>) -> Result<Self, CommissionError> {
        let mut catalog = BTreeMap::new();

        for pack in packs {
            pack.validate()?;
            if catalog.contains_key(&pack.id) {
                return Err(CommissionError::configuration(format!(
                    "duplicate pack id {}",
                    pack.id
                )));
            }
            debug!(pack_id = %pack.id, ranges = pack.ranges.len(), "Loaded commission pack");
            catalog.insert(pack.id.clone(), pack);
        }

        Ok(Self { packs: catalog })
    }

    /// Parses a JSON array of packs
    pub fn from_json(json: &str) -> Result<Self, CommissionError> {
        let packs: Vec<CommissionPack> = serde_json::from_str(json)
            .map_err(|e| CommissionError::configuration(format!("unreadable pack definitions: {}", e)))?;
        Self::new(packs)
    }

    /// All packs, ordered by id
    pub fn get_all(&self) -> Vec<&CommissionPack> {
        self.packs.values().collect()
    }

    /// Packs currently offered to agents
    pub fn get_active(&self) -> Vec<&CommissionPack> {
        self.packs.values().filter(|p| p.is_active).collect()
    }

    pub fn get_by_id(&self, id: &PackId) -> Result<&CommissionPack, CommissionError> {
        self.packs
            .get(id)
            .ok_or_else(|| CommissionError::PackNotFound(id.to_string()))
    }

    pub fn contains(&self, id: &PackId) -> bool {
        self.packs.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.packs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packs.is_empty()
    }

    /// Tier lookup for `amount` in `pack`
    pub fn range_for<'a>(
        &self,
        pack: &'a CommissionPack,
        amount: Decimal,
    ) -> Result<TierPosition<'a>, CommissionError> {
        pack.range_for(amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PACKS: &str = r#"[
        {
            "id": "starter",
            "name": "Starter",
            "year": 2024,
            "is_active": false,
            "monthly_fee": { "pre_tax": "99", "post_tax": "118.80" },
            "ranges": [
                { "min_amount": "0", "max_amount": "50000", "percentage": "70" },
                { "min_amount": "50001", "max_amount": null, "percentage": "75" }
            ]
        },
        {
            "id": "silver",
            "name": "Silver",
            "year": 2024,
            "is_active": true,
            "monthly_fee": { "pre_tax": "250", "post_tax": "300" },
            "referral_rate": "10",
            "ranges": [
                { "min_amount": "0", "max_amount": "35000", "percentage": "72" },
                { "min_amount": "35001", "max_amount": "70000", "percentage": "76" },
                { "min_amount": "70001", "max_amount": "100000", "percentage": "80" },
                { "min_amount": "100001", "max_amount": "150000", "percentage": "84" },
                { "min_amount": "150001", "max_amount": null, "percentage": "88" }
            ]
        }
    ]"#;

    #[test]
    fn test_from_json() {
        let catalog = PackCatalog::from_json(PACKS).unwrap();
        assert_eq!(catalog.len(), 2);

        let ids: Vec<_> = catalog.get_all().iter().map(|p| p.id.to_string()).collect();
        assert_eq!(ids, vec!["silver", "starter"]);

        let active: Vec<_> = catalog.get_active().iter().map(|p| p.id.to_string()).collect();
        assert_eq!(active, vec!["silver"]);
    }

    #[test]
    fn test_get_by_id_not_found() {
        let catalog = PackCatalog::from_json(PACKS).unwrap();
        let err = catalog.get_by_id(&PackId::from("platinum")).unwrap_err();
        assert!(matches!(err, CommissionError::PackNotFound(_)));
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let catalog = PackCatalog::from_json(PACKS).unwrap();
        let silver = catalog.get_by_id(&PackId::from("silver")).unwrap().clone();
        let err = PackCatalog::new(vec![silver.clone(), silver]).unwrap_err();
        assert!(matches!(err, CommissionError::Configuration(_)));
    }

    #[test]
    fn test_rejects_malformed_json() {
        let err = PackCatalog::from_json("[{\"id\": 1}]").unwrap_err();
        assert!(matches!(err, CommissionError::Configuration(_)));
    }

    #[test]
    fn test_rejects_out_of_range_percentage() {
        let json = PACKS.replace("\"88\"", "\"180\"");
        assert!(PackCatalog::from_json(&json).is_err());
    }
}
