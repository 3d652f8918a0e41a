//! Test fixtures and helpers.

use std::sync::Arc;
use std::time::Duration;

use certverify_core::{Certificate, IssueRequest};
use certverify_rpc::{ContractGateway, GatewayConfig};

use crate::node::{DevNetwork, DevNode};

/// The certificate most scenarios start from.
pub fn alice() -> Certificate {
    Certificate {
        id: "2024-CS-001".into(),
        name: "Alice Johnson".into(),
        course: "B.Sc CS".into(),
        issue_date: "2024-05-01".into(),
        expiry_date: String::new(),
    }
}

/// [`alice`] as typed into the issue form.
pub fn alice_form() -> IssueRequest {
    let cert = alice();
    IssueRequest {
        id: cert.id,
        name: cert.name,
        course: cert.course,
        issue_date: cert.issue_date,
        expiry_date: cert.expiry_date,
    }
}

/// Gateway settings suited to tests: receipts are polled every millisecond.
pub fn test_gateway_config() -> GatewayConfig {
    GatewayConfig {
        receipt_poll_interval: Duration::from_millis(1),
        ..GatewayConfig::default()
    }
}

/// A dev node reachable through a gateway.
pub struct TestFixture {
    pub node: Arc<DevNode>,
    pub network: Arc<DevNetwork>,
    pub gateway: Arc<ContractGateway>,
}

impl TestFixture {
    /// One node at the default RPC URL hosting the default contract.
    pub fn new() -> Self {
        Self::with_node(DevNode::new())
    }

    pub fn with_node(node: Arc<DevNode>) -> Self {
        let network = Arc::new(DevNetwork::new().with_node(node.clone()));
        let gateway = Arc::new(ContractGateway::new(network.clone(), test_gateway_config()));
        Self {
            node,
            network,
            gateway,
        }
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use certverify_core::constants::{DEFAULT_CONTRACT_ADDRESS, DEFAULT_RPC_URL};
    use certverify_core::VerificationResult;

    #[test]
    fn test_alice_form_validates_to_alice() {
        assert_eq!(alice_form().validate().unwrap(), alice());
    }

    #[tokio::test]
    async fn test_fixture_round_trip() {
        let fixture = TestFixture::new();
        let receipt = fixture
            .gateway
            .issue(DEFAULT_CONTRACT_ADDRESS, DEFAULT_RPC_URL, &alice())
            .await
            .unwrap();
        assert_eq!(receipt.block_number, 2);
        assert_eq!(receipt.effective_gas_price, "1.875");

        let result = fixture
            .gateway
            .verify(DEFAULT_CONTRACT_ADDRESS, DEFAULT_RPC_URL, "2024-CS-001")
            .await;
        assert_eq!(result, VerificationResult::Valid(alice()));
        assert_eq!(fixture.network.connects(), 1);
    }
}
