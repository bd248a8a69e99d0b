//! # End-to-End Choreography Tests
//!
//! The relayer runs as its own task, driven only by the event stream:
//!
//! ```text
//! [Consumer] ──send_query──→ [Gateway] ──Packet──→ [Event Bus]
//!                                                      │
//!                                                      ↓
//!                                               [Relayer task]
//!                                                      │ receive_query
//!                                                      ↓
//! [Consumer] ←─on_query_result── [Gateway] ──SaveQueryData, ReceiveQuery──→ [Event Bus]
//! ```
//!
//! `ReceiveQuery` is published before the callback runs, so tests wait on the
//! relayer's own delivery outcomes rather than on bus events.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use primitive_types::U256;
    use shared_bus::{EventFilter, EventTopic};
    use shared_types::CallContext;
    use sq_02_gateway::{GatewayApi, GatewayError, QueryStatus};
    use tokio::sync::mpsc;
    use tokio::task::JoinHandle;
    use tokio::time::timeout;
    use tokio_stream::StreamExt;

    use crate::integration::harness::{mapping_request, Deployment, Relayer, RELAYER};

    const HOLDERS: usize = 12;

    fn holder(i: usize) -> [u8; 20] {
        [0x40 + i as u8; 20]
    }

    /// Spawn a relayer answering every packet on the bus. Each delivery
    /// outcome is reported once the consumer callback has returned.
    fn spawn_relayer(
        d: &Deployment,
    ) -> (JoinHandle<()>, mpsc::UnboundedReceiver<Result<(), GatewayError>>) {
        let mut stream = d
            .bus
            .event_stream(EventFilter::topics(vec![EventTopic::Gateway]));
        let relayer = d.relayer.with_address(RELAYER);
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(async move {
            while let Some(record) = stream.next().await {
                if let Some(outcome) = relayer.relay(&record).await {
                    let _ = tx.send(outcome);
                }
            }
        });
        (handle, rx)
    }

    async fn wait_for_deliveries(
        outcomes: &mut mpsc::UnboundedReceiver<Result<(), GatewayError>>,
        expected: usize,
    ) {
        for _ in 0..expected {
            let outcome = timeout(Duration::from_secs(5), outcomes.recv())
                .await
                .expect("timeout waiting for delivery")
                .expect("relayer stopped");
            assert_eq!(outcome, Ok(()));
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_relayer_task_answers_concurrent_balance_queries() {
        let d = Deployment::new();
        let index = U256::zero();
        let token = [0x55; 20];
        for i in 0..HOLDERS {
            d.chain
                .set_mapping(1, token, index, &holder(i), U256::from(i as u64 + 1));
        }
        let (relayer, mut outcomes) = spawn_relayer(&d);

        let balance = d.balance.clone();
        let mut issuers = Vec::new();
        for i in 0..HOLDERS {
            let balance = balance.clone();
            issuers.push(tokio::spawn(async move {
                balance
                    .send_query(
                        &CallContext::new(holder(i), 1_000),
                        vec![mapping_request(1, token, index, &holder(i), 10_000)],
                        vec![U256::from(18u64)],
                    )
                    .await
            }));
        }
        let mut ids = Vec::new();
        for issuer in issuers {
            ids.push(issuer.await.unwrap().unwrap());
        }

        wait_for_deliveries(&mut outcomes, HOLDERS).await;

        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), HOLDERS);
        assert_eq!(d.gateway.nonce(), HOLDERS as u64);
        for id in &ids {
            assert_eq!(d.gateway.query_status(id), QueryStatus::Fulfilled);
        }
        for i in 0..HOLDERS {
            assert_eq!(d.balance.balance_of(&holder(i)), U256::from(i as u64 + 1));
        }

        relayer.abort();
    }

    #[tokio::test]
    async fn test_relayer_task_drives_vote_and_cache() {
        let d = Deployment::new();
        let nft = [0x4E; 20];
        let voter = holder(0);
        d.chain.set_mapping(1, nft, U256::from(3u64), &voter, U256::one());
        let (relayer, mut outcomes) = spawn_relayer(&d);

        let proposal = d
            .voting
            .create_proposal(
                &CallContext::new(voter, 1_000),
                "Fund".to_string(),
                "Grant round".to_string(),
                600,
                U256::from(10_000u64),
            )
            .await
            .unwrap();
        let ownership = vec![mapping_request(1, nft, U256::from(3u64), &voter, 10_000)];
        d.voting
            .query_nft(&CallContext::new(voter, 1_000), ownership.clone(), proposal, false)
            .await
            .unwrap();
        d.custom
            .query(&CallContext::new(voter, 1_000), ownership.clone())
            .await
            .unwrap();

        wait_for_deliveries(&mut outcomes, 2).await;

        assert_eq!(d.voting.get_proposal(proposal).unwrap().no_count, 1);
        let mut word = vec![0u8; 32];
        word[31] = 1;
        assert_eq!(d.custom.get_cache(&ownership), Some(vec![word]));

        relayer.abort();
    }

    #[tokio::test]
    async fn test_dropped_consumer_keeps_proven_results() {
        let d = Deployment::new();
        let relayer = Relayer::new(RELAYER, d.gateway.clone(), Arc::clone(&d.chain));
        let bundle = vec![mapping_request(1, [0x55; 20], U256::zero(), &holder(1), 10_000)];
        let mut packets = d.gateway_events();
        let query_id = d
            .custom
            .query(&CallContext::new(holder(1), 1_000), bundle)
            .await
            .unwrap();

        drop(d.custom);

        let record = packets.drain().remove(0);
        let outcome = relayer.relay(&record).await.unwrap();
        assert!(outcome.is_err());
        assert_eq!(d.gateway.query_status(&query_id), QueryStatus::Fulfilled);
    }
}
