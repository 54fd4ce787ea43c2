// ==========================================
// Full business flow end-to-end test
// ==========================================
// Goal: drive one tender through every stage in order —
// shortlist → approval → negotiation → auction → evaluation —
// and verify the cross-stage contracts hold at each step.
// ==========================================


#[cfg(test)]
mod full_business_flow_e2e_test {
    use crate::test_helpers::{
        create_test_db, setup_stage, test_config, test_tender, test_vendor, ManualDelayRunner,
    };
    use chem_procure::domain::{
        AgentType, AuctionStatus, BidStatus, BidTerms, NegotiationStatus, TenderStatus,
    };
    use chem_procure::engine::{
        AuctionEngine, DeliverySampler, EvaluationEngine, NegotiationEngine, ShortlistingEngine,
    };

    #[test]
    fn tender_travels_the_whole_lifecycle() {
        let (_tmp, db_path) = create_test_db().unwrap();
        let (repos, transition) = setup_stage(&db_path);
        let runner = ManualDelayRunner::new();
        let config = test_config();

        let shortlisting =
            ShortlistingEngine::new(repos.clone(), transition.clone(), config.clone());
        let negotiation = NegotiationEngine::new(
            repos.clone(),
            transition.clone(),
            runner.clone(),
            config.clone(),
        );
        let auction_engine = AuctionEngine::new(repos.clone(), transition.clone(), config.clone());
        let evaluation = EvaluationEngine::new(
            repos.clone(),
            transition,
            DeliverySampler::seeded(11),
            config,
        );

        // --- Intake -------------------------------------------------
        let tender = test_tender("Sulfuric Acid", "Mumbai, Maharashtra");
        repos.tenders.insert(&tender).unwrap();

        // Perfect fit: specialization + certs + rating + location
        let acme = test_vendor(
            "Acme Chemicals",
            &["Sulfuric Acid Products"],
            &["ISO9001", "ISO14001"],
            4.8,
            "Mumbai",
        );
        // Decent fit: specialization + certs + rating, wrong city
        let beta = test_vendor(
            "Beta Supply",
            &["Sulfuric Compounds"],
            &["ISO9001", "GMP"],
            4.5,
            "Pune",
        );
        // No fit: falls below the score floor
        let weak = test_vendor("Weak Vendor", &["Dyes"], &[], 2.5, "Delhi");
        repos.vendors.insert(&acme).unwrap();
        repos.vendors.insert(&beta).unwrap();
        repos.vendors.insert(&weak).unwrap();

        // --- Shortlisting -------------------------------------------
        assert_eq!(shortlisting.run(&tender.tender_id).unwrap(), 2);
        let shortlist = repos.shortlist.list_by_tender(&tender.tender_id).unwrap();
        assert_eq!(shortlist[0].vendor_id, acme.vendor_id);
        assert_eq!(shortlist[0].fit_score, 100);
        let current = repos.tenders.find_by_id(&tender.tender_id).unwrap().unwrap();
        assert_eq!(current.status, TenderStatus::AwaitingApproval);
        assert_eq!(current.current_agent, AgentType::Manager);

        // --- Manager approval ---------------------------------------
        for entry in &shortlist {
            repos.shortlist.approve(&entry.shortlist_id).unwrap();
        }

        // --- Negotiation --------------------------------------------
        assert_eq!(negotiation.initiate(&tender.tender_id).unwrap(), 2);
        let current = repos.tenders.find_by_id(&tender.tender_id).unwrap().unwrap();
        assert_eq!(current.status, TenderStatus::Negotiating);

        negotiation
            .submit_bid(&tender.tender_id, &acme.vendor_id, 100_000.0, 30, BidTerms::default())
            .unwrap();
        negotiation
            .submit_bid(&tender.tender_id, &beta.vendor_id, 110_000.0, 25, BidTerms::default())
            .unwrap();
        // Counter-offers land
        assert_eq!(runner.run_pending(), 2);

        for vendor_id in [&acme.vendor_id, &beta.vendor_id] {
            let thread = repos
                .negotiations
                .find_by_tender_vendor(&tender.tender_id, vendor_id)
                .unwrap()
                .unwrap();
            negotiation
                .on_vendor_message(&thread.negotiation_id, "We accept your counter-offer.")
                .unwrap();
        }
        // Confirmations close both threads
        assert_eq!(runner.run_pending(), 2);

        let threads = repos.negotiations.list_by_tender(&tender.tender_id).unwrap();
        assert_eq!(threads.len(), 2);
        for thread in &threads {
            assert_eq!(thread.status, NegotiationStatus::Completed);
            assert!(thread.final_terms.is_some());
        }
        let acme_bid = repos
            .bids
            .find_by_tender_vendor(&tender.tender_id, &acme.vendor_id)
            .unwrap()
            .unwrap();
        assert_eq!(acme_bid.status, BidStatus::Accepted);
        assert_eq!(acme_bid.current_price, 95_000.0);

        // --- Auction ------------------------------------------------
        let auction = auction_engine.start(&tender.tender_id).unwrap().unwrap();
        // Seeded with the lowest negotiated price (95k beats 104.5k)
        assert_eq!(auction.starting_price, 95_000.0);
        let current = repos.tenders.find_by_id(&tender.tender_id).unwrap().unwrap();
        assert_eq!(current.status, TenderStatus::Auction);

        auction_engine
            .place_bid(&auction.auction_id, &beta.vendor_id, 94_000.0)
            .unwrap();
        let after = auction_engine
            .place_bid(&auction.auction_id, &acme.vendor_id, 93_000.0)
            .unwrap();
        assert_eq!(after.current_lowest_price, 93_000.0);
        assert_eq!(after.current_leader_id.as_deref(), Some(acme.vendor_id.as_str()));

        let closed = auction_engine.close(&auction.auction_id).unwrap();
        assert_eq!(closed.status, AuctionStatus::Completed);

        // --- Evaluation ---------------------------------------------
        assert_eq!(evaluation.evaluate(&tender.tender_id).unwrap(), 2);
        let evaluations = repos.evaluations.list_by_tender(&tender.tender_id).unwrap();
        assert_eq!(evaluations.len(), 2);
        let acme_eval = evaluations
            .iter()
            .find(|e| e.vendor_id == acme.vendor_id)
            .unwrap();
        // Lowest auction bid holds rank 0
        assert_eq!(acme_eval.price_score, 100);
        assert_eq!(acme_eval.quality_score, 96);
        assert_eq!(acme_eval.recommendation, "Highly recommended - best overall value");

        let finished = repos.tenders.find_by_id(&tender.tender_id).unwrap().unwrap();
        assert_eq!(finished.status, TenderStatus::Completed);
        assert_eq!(finished.current_agent, AgentType::Manager);

        // --- Audit trail --------------------------------------------
        let logs = repos.workflow_logs.list_by_tender(&tender.tender_id).unwrap();
        let actions: Vec<&str> = logs.iter().map(|l| l.action.as_str()).collect();
        assert_eq!(
            actions,
            vec![
                "shortlist_vendors",
                "initiate_negotiations",
                "start_auction",
                "evaluate_vendors",
            ]
        );
    }
}
