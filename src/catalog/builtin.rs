use super::{Catalog, CatalogEntry, NodeConfig, NodeRole};

const SERVICES: &str = "African Services";
const LOGIC: &str = "Logic";

pub(super) fn catalog() -> Catalog {
    let entries = vec![
        CatalogEntry::new("payment", "M-Pesa Payment", NodeRole::Step)
            .description("Process payments via M-Pesa")
            .category(SERVICES)
            .defaults(NodeConfig::new().with("phoneNumber", "").with("amount", 0.0).with("currency", "KES").with("description", "Payment for services")),
        CatalogEntry::new("messaging", "AfricasTalking SMS", NodeRole::Step)
            .description("Send SMS via AfricasTalking")
            .category(SERVICES)
            .defaults(NodeConfig::new().with("to", "").with("message", "Hello from Afreasy!").with("senderId", "AFREASY")),
        CatalogEntry::new("verification", "NAFDAC Check", NodeRole::Step)
            .description("Verify product compliance")
            .category(SERVICES)
            .defaults(NodeConfig::new().with("productId", "").with("checkType", "verification")),
        CatalogEntry::new("input", "Workflow Input", NodeRole::Source).description("Start of workflow").category(LOGIC),
        CatalogEntry::new("output", "Workflow Output", NodeRole::Sink).description("End of workflow").category(LOGIC),
        CatalogEntry::new("transform", "Transform Data", NodeRole::Step)
            .description("Transform data")
            .category(LOGIC)
            .defaults(NodeConfig::new().with("transformType", "map").with("expression", "{ result: input.value * 2 }")),
        CatalogEntry::new("condition", "Condition", NodeRole::Step)
            .description("Branch based on condition")
            .category(LOGIC)
            .defaults(NodeConfig::new().with("condition", "input.value > 10").with("trueLabel", "True").with("falseLabel", "False")),
    ];

    // builtin entries are non-blank
    Catalog {
        entries,
    }
}
