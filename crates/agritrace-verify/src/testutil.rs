//! Shared fixtures for the unit tests in this crate.

use agritrace_core::{EntityId, LicenseNumber, Role, StakeholderId, TrackingNumber};
use agritrace_ledger::{
    BatchInfo, Ledger, LedgerConfig, ProductDraft, ProductStage, ShipmentDraft, StagePayload,
    StatusNote, TransportMode,
};
use agritrace_registry::{NewStakeholder, StakeholderRegistry};

pub mod ids {
    use agritrace_core::StakeholderId;

    fn id(s: &str) -> StakeholderId {
        StakeholderId::new(s).unwrap()
    }

    pub fn admin() -> StakeholderId {
        id("admin-1")
    }
    pub fn farmer() -> StakeholderId {
        id("farm-1")
    }
    pub fn processor() -> StakeholderId {
        id("proc-1")
    }
    pub fn distributor() -> StakeholderId {
        id("dist-1")
    }
    pub fn retailer() -> StakeholderId {
        id("retail-1")
    }
}

/// Registry with one active stakeholder per supply-chain role.
pub fn make_directory() -> StakeholderRegistry {
    let admin = ids::admin();
    let mut registry = StakeholderRegistry::bootstrap(
        admin.clone(),
        "AgriTrace Authority",
        LicenseNumber::new("ADMIN-1").unwrap(),
        "Sacramento, CA",
    )
    .unwrap();
    for (identity, role, lic) in [
        (ids::farmer(), Role::Farmer, "FARM-1"),
        (ids::processor(), Role::Processor, "PROC-1"),
        (ids::distributor(), Role::Distributor, "DIST-1"),
        (ids::retailer(), Role::Retailer, "RETAIL-1"),
    ] {
        registry
            .register(
                &admin,
                NewStakeholder {
                    identity: identity.clone(),
                    role,
                    business_name: format!("{identity} co"),
                    license: LicenseNumber::new(lic).unwrap(),
                    location: "CA".into(),
                    certifications: vec![],
                },
            )
            .unwrap();
    }
    registry
}

fn actor_for(stage: ProductStage) -> StakeholderId {
    match stage.required_role() {
        Role::Farmer => ids::farmer(),
        Role::Processor => ids::processor(),
        Role::Distributor => ids::distributor(),
        Role::Retailer => ids::retailer(),
        Role::Admin => ids::admin(),
    }
}

/// Ledger with one product advanced to the given stage by the proper
/// role-holders.
pub fn make_ledger_with_product(
    directory: &StakeholderRegistry,
    upto: ProductStage,
) -> (Ledger, EntityId) {
    let mut ledger = Ledger::in_memory(LedgerConfig::default());
    let pid = ledger
        .create_product(
            directory,
            &ids::farmer(),
            ProductDraft {
                name: "Heirloom Tomatoes".into(),
                description: "Vine-ripened batch".into(),
                batch: BatchInfo {
                    batch_code: "Batch-1".into(),
                    origin_farm: "Verde Farms".into(),
                },
                payload: StagePayload {
                    location: "Fresno, CA".into(),
                    details: "harvested".into(),
                },
            },
        )
        .unwrap();

    let mut stage = ProductStage::Farm;
    while stage < upto {
        let target = stage.next().unwrap();
        ledger
            .advance_product(
                directory,
                &actor_for(target),
                pid,
                target,
                StagePayload {
                    location: "en route".into(),
                    details: format!("entered {target}"),
                },
            )
            .unwrap();
        stage = target;
    }
    (ledger, pid)
}

/// Create a shipment for the product with the stock distributor/retailer
/// pair.
pub fn make_shipment(
    ledger: &mut Ledger,
    directory: &StakeholderRegistry,
    product: EntityId,
    tracking: &str,
) -> EntityId {
    ledger
        .create_shipment(
            directory,
            &ids::distributor(),
            ShipmentDraft {
                product,
                receiver: ids::retailer(),
                tracking_number: TrackingNumber::new(tracking).unwrap(),
                transport_mode: TransportMode::Truck,
                note: StatusNote {
                    note: "created".into(),
                    location: "depot".into(),
                },
            },
        )
        .unwrap()
}
