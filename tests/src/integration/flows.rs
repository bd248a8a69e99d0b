//! # Integration Test Flows
//!
//! Consumer → Gateway → Relayer → Gateway → Consumer, with the relayer
//! answering `Packet` events from a simulated source chain.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use primitive_types::U256;
    use shared_bus::{EventFilter, EventSubscriber, EventTopic, ProtocolEvent};
    use shared_types::{CallContext, QueryResponse};
    use sq_01_query_codec::{encode_results, store_key};
    use sq_02_gateway::{
        CheckpointLightClient, GatewayApi, GatewayConfig, GatewayError, QueryStatus,
    };
    use sq_03_query_consumers::{Consumer, ConsumerError, ProposalState};
    use sq_telemetry::{gather_metrics, register_metrics};

    use crate::integration::harness::{mapping_request, Deployment, OWNER, RELAYER};

    const ALICE: [u8; 20] = [0xA0; 20];
    const BOB: [u8; 20] = [0xB0; 20];
    const USDC: [u8; 20] = [0x55; 20];
    const DAI: [u8; 20] = [0xDA; 20];
    const NFT: [u8; 20] = [0x4E; 20];
    const ERC20_BALANCES: u64 = 0;
    const ERC721_BALANCES: u64 = 3;

    fn ether(n: u64) -> U256 {
        U256::from(n) * U256::exp10(18)
    }

    fn ctx(account: [u8; 20]) -> CallContext {
        CallContext::new(account, 1_000)
    }

    // =========================================================================
    // BALANCE AGGREGATION
    // =========================================================================

    #[tokio::test]
    async fn test_balance_across_two_chains() {
        let d = Deployment::new();
        let index = U256::from(ERC20_BALANCES);
        d.chain
            .set_mapping(1, USDC, index, &ALICE, U256::from(100_000_000u64));
        d.chain.set_mapping(137, DAI, index, &ALICE, ether(200));
        let mut packets = d.bus.subscribe(EventFilter::topics(vec![EventTopic::Gateway]));

        let query_id = d
            .balance
            .send_query(
                &ctx(ALICE),
                vec![
                    mapping_request(1, USDC, index, &ALICE, 10_000),
                    mapping_request(137, DAI, index, &ALICE, 20_000),
                ],
                vec![U256::from(6u64), U256::from(18u64)],
            )
            .await
            .unwrap();

        let outcomes = d.relay_all(&mut packets).await;
        assert_eq!(outcomes, vec![Ok(())]);

        assert_eq!(d.balance.balance_of(&ALICE), ether(300));
        assert_eq!(d.gateway.query_status(&query_id), QueryStatus::Fulfilled);
        let stored = d
            .gateway
            .stored_result(&store_key(&mapping_request(137, DAI, index, &ALICE, 0)))
            .unwrap();
        assert_eq!(stored.height, U256::from(20_000u64));

        let names: Vec<&str> = packets.drain().iter().map(|r| r.event.name()).collect();
        assert_eq!(names, vec!["SaveQueryData", "SaveQueryData", "ReceiveQuery"]);
    }

    #[tokio::test]
    async fn test_callback_failure_keeps_proven_values() {
        let d = Deployment::new();
        let req = mapping_request(1, USDC, U256::zero(), &ALICE, 10_000);
        d.chain.set(1, USDC, req.slot, vec![0xFF; 40]);
        let mut packets = d.gateway_events();

        let query_id = d
            .balance
            .send_query(&ctx(ALICE), vec![req.clone()], vec![U256::from(18u64)])
            .await
            .unwrap();
        let outcomes = d.relay_all(&mut packets).await;

        assert!(matches!(
            outcomes.as_slice(),
            [Err(GatewayError::CallbackFailed { .. })]
        ));
        assert_eq!(d.balance.balance_of(&ALICE), U256::zero());
        assert_eq!(d.gateway.query_status(&query_id), QueryStatus::Fulfilled);
        assert_eq!(
            d.gateway.stored_result(&store_key(&req)).unwrap().result,
            vec![0xFF; 40]
        );
    }

    // =========================================================================
    // CUSTOM QUERIES
    // =========================================================================

    #[tokio::test]
    async fn test_custom_cache_and_out_of_order_delivery() {
        let d = Deployment::new();
        let first = vec![mapping_request(1, USDC, U256::zero(), &ALICE, 10_000)];
        let second = vec![mapping_request(1, USDC, U256::zero(), &BOB, 10_000)];
        d.chain.set(1, USDC, first[0].slot, vec![1]);
        d.chain.set(1, USDC, second[0].slot, vec![2]);

        let id_a = d.custom.query(&ctx(ALICE), first.clone()).await.unwrap();
        let id_b = d.custom.query(&ctx(BOB), second.clone()).await.unwrap();

        let proof_b = d.relayer.prove(&id_b).unwrap();
        let proof_a = d.relayer.prove(&id_a).unwrap();
        let relayer = CallContext::new(RELAYER, 2_000);
        d.gateway.receive_query(&relayer, proof_b).await.unwrap();
        d.gateway.receive_query(&relayer, proof_a).await.unwrap();

        assert_eq!(d.custom.get_cache(&first), Some(vec![vec![1]]));
        assert_eq!(d.custom.get_cache(&second), Some(vec![vec![2]]));
        assert_eq!(d.gateway.pending_count(), 0);
    }

    #[tokio::test]
    async fn test_replayed_proof_is_already_fulfilled() {
        let d = Deployment::new();
        let bundle = vec![mapping_request(1, USDC, U256::zero(), &ALICE, 10_000)];
        let query_id = d.custom.query(&ctx(ALICE), bundle).await.unwrap();
        let proof = d.relayer.prove(&query_id).unwrap();
        let relayer = CallContext::new(RELAYER, 2_000);

        d.gateway.receive_query(&relayer, proof.clone()).await.unwrap();
        let err = d.gateway.receive_query(&relayer, proof).await.unwrap_err();

        assert_eq!(err, GatewayError::AlreadyFulfilled(query_id));
    }

    #[tokio::test]
    async fn test_proof_with_wrong_result_count() {
        let d = Deployment::new();
        let bundle = vec![
            mapping_request(1, USDC, U256::zero(), &ALICE, 10_000),
            mapping_request(1, USDC, U256::zero(), &BOB, 10_000),
        ];
        let query_id = d.custom.query(&ctx(ALICE), bundle).await.unwrap();
        let mut sub = d.gateway_events();

        let err = d
            .gateway
            .receive_query(
                &CallContext::new(RELAYER, 2_000),
                QueryResponse {
                    query_id,
                    proof: encode_results(&[vec![1]]),
                },
            )
            .await
            .unwrap_err();

        assert_eq!(
            err,
            GatewayError::ResultCountMismatch {
                expected: 2,
                got: 1
            }
        );
        assert!(sub.drain().is_empty());
        assert_eq!(d.gateway.query_status(&query_id), QueryStatus::Pending);
    }

    // =========================================================================
    // VOTING
    // =========================================================================

    #[tokio::test]
    async fn test_nft_gated_vote() {
        let d = Deployment::new();
        let index = U256::from(ERC721_BALANCES);
        d.chain.set_mapping(1, NFT, index, &ALICE, U256::one());
        let mut packets = d.gateway_events();
        let mut votes = d.bus.subscribe(EventFilter::topics(vec![EventTopic::Consumer]));

        let proposal = d
            .voting
            .create_proposal(
                &ctx(ALICE),
                "Upgrade".to_string(),
                "Move to v2".to_string(),
                3_600,
                U256::from(10_000u64),
            )
            .await
            .unwrap();
        assert_eq!(proposal, 1);

        d.voting
            .query_nft(
                &ctx(ALICE),
                vec![mapping_request(1, NFT, index, &ALICE, 10_000)],
                proposal,
                true,
            )
            .await
            .unwrap();
        d.voting
            .query_nft(
                &ctx(BOB),
                vec![mapping_request(1, NFT, index, &BOB, 10_000)],
                proposal,
                false,
            )
            .await
            .unwrap();
        let outcomes = d.relay_all(&mut packets).await;
        assert_eq!(outcomes, vec![Ok(()), Ok(())]);

        let view = d.voting.get_proposal(proposal).unwrap();
        assert_eq!(view.yes_count, 1);
        assert_eq!(view.no_count, 0);
        assert_eq!(view.voters, vec![ALICE]);
        assert_eq!(
            d.voting.proposal_state(proposal, 1_000 + 3_600),
            Some(ProposalState::Expired)
        );

        let events: Vec<ProtocolEvent> = votes.drain().into_iter().map(|r| r.event).collect();
        assert_eq!(events.len(), 2);
        assert_eq!(
            events[1],
            ProtocolEvent::VoteCasted {
                voter: ALICE,
                proposal_id: proposal,
                vote: true
            }
        );
    }

    #[tokio::test]
    async fn test_vote_on_missing_proposal() {
        let d = Deployment::new();
        let err = d
            .voting
            .query_nft(
                &ctx(ALICE),
                vec![mapping_request(1, NFT, U256::zero(), &ALICE, 10_000)],
                1,
                true,
            )
            .await
            .unwrap_err();

        assert_eq!(err, ConsumerError::InvalidProposal(1));
        assert_eq!(d.gateway.nonce(), 0);
    }

    // =========================================================================
    // FEES, RELAYERS AND LIGHT CLIENTS
    // =========================================================================

    #[tokio::test]
    async fn test_fee_is_forwarded_through_consumer() {
        let d = Deployment::with_config(GatewayConfig {
            per_request_fee: U256::from(1_000u64),
            ..GatewayConfig::for_testing()
        });
        let bundle = vec![mapping_request(1, USDC, U256::zero(), &ALICE, 10_000)];

        let err = d.custom.query(&ctx(ALICE), bundle.clone()).await.unwrap_err();
        assert_eq!(
            err,
            ConsumerError::Gateway(GatewayError::InsufficientFee {
                required: U256::from(1_000u64),
                provided: U256::zero(),
            })
        );
        assert_eq!(d.gateway.nonce(), 0);

        let paid = ctx(ALICE).with_value(U256::from(1_500u64));
        d.custom.query(&paid, bundle).await.unwrap();
        assert_eq!(d.gateway.collected_fees(), U256::from(1_500u64));
        assert_eq!(d.gateway.nonce(), 1);
    }

    #[tokio::test]
    async fn test_only_trusted_relayer_delivers() {
        let d = Deployment::with_config(GatewayConfig {
            trusted_relayers: vec![RELAYER],
            ..GatewayConfig::for_testing()
        });
        let bundle = vec![mapping_request(1, USDC, U256::zero(), &ALICE, 10_000)];
        let mut packets = d.gateway_events();
        let query_id = d.custom.query(&ctx(ALICE), bundle).await.unwrap();
        let records = packets.drain();

        let rogue = d.relayer.with_address(BOB);
        let outcome = rogue.relay(&records[0]).await;
        assert_eq!(outcome, Some(Err(GatewayError::AccessDenied(BOB))));
        assert_eq!(d.gateway.query_status(&query_id), QueryStatus::Pending);

        assert_eq!(d.relayer.relay(&records[0]).await, Some(Ok(())));
    }

    #[tokio::test]
    async fn test_checkpoint_light_client_gates_heights() {
        let d = Deployment::new();
        let checkpoint = Arc::new(CheckpointLightClient::new(U256::from(10_000u64)));
        let address = [0xA2; 20];
        d.add_light_client(address, checkpoint.clone());
        d.custom
            .set_light_client(&ctx(OWNER), address)
            .unwrap();

        let bundle = vec![mapping_request(1, USDC, U256::zero(), &ALICE, 12_000)];
        let query_id = d.custom.query(&ctx(ALICE), bundle).await.unwrap();
        let proof = d.relayer.prove(&query_id).unwrap();
        let relayer = CallContext::new(RELAYER, 2_000);

        let err = d
            .gateway
            .receive_query(&relayer, proof.clone())
            .await
            .unwrap_err();
        assert_eq!(
            err,
            GatewayError::ProofRejected {
                height: U256::from(12_000u64)
            }
        );

        checkpoint.advance(U256::from(12_000u64));
        d.gateway.receive_query(&relayer, proof).await.unwrap();
        assert_eq!(d.gateway.query_status(&query_id), QueryStatus::Fulfilled);
    }

    #[tokio::test]
    async fn test_metrics_exported() {
        register_metrics().unwrap();
        let d = Deployment::new();
        let bundle = vec![mapping_request(1, USDC, U256::zero(), &ALICE, 10_000)];
        let mut packets = d.gateway_events();
        d.custom.query(&ctx(ALICE), bundle).await.unwrap();
        d.relay_all(&mut packets).await;

        let text = gather_metrics().unwrap();
        assert!(text.contains("sq_gateway_queries_sent_total"));
        assert!(text.contains("sq_gateway_queries_fulfilled_total"));
        assert!(text.contains("sq_consumer_results_total"));
    }
}
