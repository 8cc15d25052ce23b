use ack_did::Service;

pub const SERVICE_TYPE_AGENT_CARD: &str = "AgentCard";

/// A DID document service entry pointing at an agent's A2A agent card.
pub fn create_agent_card_service_endpoint(did: &str, agent_card_url: &str) -> Service {
    Service::new(format!("{did}#agent-card"), SERVICE_TYPE_AGENT_CARD, agent_card_url)
}
