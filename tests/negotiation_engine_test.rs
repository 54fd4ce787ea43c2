// ==========================================
// Negotiation stage integration tests
// ==========================================
// Goal: verify thread initiation, the two-phase bid reply, and the
// fixed 5% concession protocol, with the paced follow-ups driven
// deterministically through ManualDelayRunner.
// ==========================================


#[cfg(test)]
mod negotiation_engine_test {
    use crate::test_helpers::{
        create_test_db, setup_stage, test_config, test_tender, test_vendor, ManualDelayRunner,
    };
    use chem_procure::domain::{
        AgentType, BidStatus, BidTerms, MessageSender, NegotiationStatus, TenderStatus, Vendor,
    };
    use chem_procure::engine::{NegotiationEngine, StageRepositories, VendorMessageOutcome};
    use chem_procure::repository::RepositoryError;
    use chem_procure::ShortlistedVendor;
    use std::sync::Arc;

    fn approve_vendor(repos: &StageRepositories, tender_id: &str, vendor: &Vendor) {
        let entry = ShortlistedVendor::pending(tender_id, &vendor.vendor_id, 80, "Good fit.");
        repos.shortlist.insert_many(&[entry.clone()]).unwrap();
        repos.shortlist.approve(&entry.shortlist_id).unwrap();
    }

    fn setup() -> (
        tempfile::NamedTempFile,
        StageRepositories,
        NegotiationEngine,
        Arc<ManualDelayRunner>,
    ) {
        let (tmp, db_path) = create_test_db().unwrap();
        let (repos, transition) = setup_stage(&db_path);
        let runner = ManualDelayRunner::new();
        let engine = NegotiationEngine::new(
            repos.clone(),
            transition,
            runner.clone(),
            test_config(),
        );
        (tmp, repos, engine, runner)
    }

    #[test]
    fn initiate_without_approved_vendors_does_nothing() {
        let (_tmp, repos, engine, _runner) = setup();

        let tender = test_tender("Sulfuric Acid", "Mumbai, Maharashtra");
        repos.tenders.insert(&tender).unwrap();

        // A pending (never approved) entry must not count
        let vendor = test_vendor("Pending Vendor", &["Acids"], &[], 4.0, "Pune");
        repos.vendors.insert(&vendor).unwrap();
        repos
            .shortlist
            .insert_many(&[ShortlistedVendor::pending(
                &tender.tender_id,
                &vendor.vendor_id,
                70,
                "Fit.",
            )])
            .unwrap();

        let opened = engine.initiate(&tender.tender_id).unwrap();
        assert_eq!(opened, 0);

        // No threads, no log, no stage advance
        assert!(repos
            .negotiations
            .list_by_tender(&tender.tender_id)
            .unwrap()
            .is_empty());
        assert!(repos
            .workflow_logs
            .list_by_tender(&tender.tender_id)
            .unwrap()
            .is_empty());
        let unchanged = repos.tenders.find_by_id(&tender.tender_id).unwrap().unwrap();
        assert_eq!(unchanged.status, TenderStatus::Draft);
    }

    #[test]
    fn initiate_opens_one_seeded_thread_per_approved_vendor() {
        let (_tmp, repos, engine, _runner) = setup();

        let tender = test_tender("Sulfuric Acid", "Mumbai, Maharashtra");
        repos.tenders.insert(&tender).unwrap();

        let alpha = test_vendor("Alpha Chem", &["Acids"], &["ISO9001"], 4.5, "Mumbai");
        let beta = test_vendor("Beta Supply", &["Acids"], &["ISO9001"], 4.0, "Pune");
        repos.vendors.insert(&alpha).unwrap();
        repos.vendors.insert(&beta).unwrap();
        approve_vendor(&repos, &tender.tender_id, &alpha);
        approve_vendor(&repos, &tender.tender_id, &beta);

        let opened = engine.initiate(&tender.tender_id).unwrap();
        assert_eq!(opened, 2);

        let threads = repos
            .negotiations
            .list_by_tender(&tender.tender_id)
            .unwrap();
        assert_eq!(threads.len(), 2);
        for thread in &threads {
            assert_eq!(thread.status, NegotiationStatus::Ongoing);
            assert!(thread.bid_id.is_none());
            assert_eq!(thread.messages.len(), 1);
            assert_eq!(thread.messages[0].sender, MessageSender::Agent);
            assert!(thread.messages[0]
                .message
                .contains("we invite you to participate in our tender"));
        }
        // The invitation is personalised with the vendor's name
        let alpha_thread = threads
            .iter()
            .find(|t| t.vendor_id == alpha.vendor_id)
            .unwrap();
        assert!(alpha_thread.messages[0].message.starts_with("Hello Alpha Chem"));

        let updated = repos.tenders.find_by_id(&tender.tender_id).unwrap().unwrap();
        assert_eq!(updated.status, TenderStatus::Negotiating);
        assert_eq!(updated.current_agent, AgentType::Negotiation);

        let logs = repos.workflow_logs.list_by_tender(&tender.tender_id).unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].action, "initiate_negotiations");
        assert_eq!(logs[0].input_json["vendor_count"], 2);
    }

    #[test]
    fn bid_submission_replies_in_two_phases() {
        let (_tmp, repos, engine, runner) = setup();

        let tender = test_tender("Sulfuric Acid", "Mumbai, Maharashtra");
        repos.tenders.insert(&tender).unwrap();
        let vendor = test_vendor("Alpha Chem", &["Acids"], &["ISO9001"], 4.5, "Mumbai");
        repos.vendors.insert(&vendor).unwrap();
        approve_vendor(&repos, &tender.tender_id, &vendor);
        engine.initiate(&tender.tender_id).unwrap();

        let submission = engine
            .submit_bid(
                &tender.tender_id,
                &vendor.vendor_id,
                100_000.0,
                30,
                BidTerms::default(),
            )
            .unwrap();
        assert!(submission.counter_offer.is_some());

        // Phase one: bid stored as submitted, thread notes the offer
        // and links the bid; no counter-offer yet.
        let bid = repos.bids.find_by_id(&submission.bid.bid_id).unwrap().unwrap();
        assert_eq!(bid.status, BidStatus::Submitted);
        assert_eq!(bid.initial_price, 100_000.0);
        assert_eq!(bid.current_price, 100_000.0);

        let thread = repos
            .negotiations
            .find_by_tender_vendor(&tender.tender_id, &vendor.vendor_id)
            .unwrap()
            .unwrap();
        assert_eq!(thread.bid_id.as_deref(), Some(bid.bid_id.as_str()));
        assert_eq!(thread.messages.len(), 2);
        assert_eq!(thread.messages[1].sender, MessageSender::Vendor);
        assert_eq!(
            thread.messages[1].message,
            "Initial bid submitted: ₹100000. Delivery time: 30 days."
        );
        assert_eq!(runner.pending_count(), 1);

        // Phase two: the paced counter-offer lands
        assert_eq!(runner.run_pending(), 1);

        let bid = repos.bids.find_by_id(&bid.bid_id).unwrap().unwrap();
        assert_eq!(bid.status, BidStatus::UnderNegotiation);
        let thread = repos
            .negotiations
            .find_by_id(&thread.negotiation_id)
            .unwrap()
            .unwrap();
        assert_eq!(thread.messages.len(), 3);
        assert_eq!(thread.messages[2].sender, MessageSender::Agent);
        assert!(thread.messages[2]
            .message
            .contains("Can you improve the price by 5%"));
    }

    #[test]
    fn bid_without_a_thread_is_stored_but_gets_no_reply() {
        let (_tmp, repos, engine, runner) = setup();

        let tender = test_tender("Sulfuric Acid", "Mumbai, Maharashtra");
        repos.tenders.insert(&tender).unwrap();
        let vendor = test_vendor("Stray Vendor", &["Acids"], &[], 4.0, "Pune");
        repos.vendors.insert(&vendor).unwrap();

        let submission = engine
            .submit_bid(
                &tender.tender_id,
                &vendor.vendor_id,
                90_000.0,
                20,
                BidTerms::default(),
            )
            .unwrap();
        assert!(submission.counter_offer.is_none());
        assert_eq!(runner.pending_count(), 0);
        assert!(repos
            .bids
            .find_by_id(&submission.bid.bid_id)
            .unwrap()
            .is_some());
    }

    #[test]
    fn non_positive_price_is_rejected() {
        let (_tmp, repos, engine, _runner) = setup();

        let tender = test_tender("Sulfuric Acid", "Mumbai, Maharashtra");
        repos.tenders.insert(&tender).unwrap();

        let result = engine.submit_bid(&tender.tender_id, "vendor-x", 0.0, 30, BidTerms::default());
        assert!(matches!(
            result,
            Err(RepositoryError::FieldValueError { ref field, .. }) if field == "price"
        ));
    }

    #[test]
    fn ordinary_message_is_noted_and_changes_nothing() {
        let (_tmp, repos, engine, runner) = setup();

        let tender = test_tender("Sulfuric Acid", "Mumbai, Maharashtra");
        repos.tenders.insert(&tender).unwrap();
        let vendor = test_vendor("Alpha Chem", &["Acids"], &["ISO9001"], 4.5, "Mumbai");
        repos.vendors.insert(&vendor).unwrap();
        approve_vendor(&repos, &tender.tender_id, &vendor);
        engine.initiate(&tender.tender_id).unwrap();
        let submission = engine
            .submit_bid(
                &tender.tender_id,
                &vendor.vendor_id,
                100_000.0,
                30,
                BidTerms::default(),
            )
            .unwrap();
        runner.run_pending();

        let thread = repos
            .negotiations
            .find_by_tender_vendor(&tender.tender_id, &vendor.vendor_id)
            .unwrap()
            .unwrap();
        let outcome = engine
            .on_vendor_message(&thread.negotiation_id, "Can you share the delivery schedule?")
            .unwrap();
        assert!(matches!(outcome, VendorMessageOutcome::Noted));

        // Recorded in the thread, but the bid did not move
        let thread = repos
            .negotiations
            .find_by_id(&thread.negotiation_id)
            .unwrap()
            .unwrap();
        assert_eq!(thread.messages.len(), 4);
        assert_eq!(thread.status, NegotiationStatus::Ongoing);
        let bid = repos.bids.find_by_id(&submission.bid.bid_id).unwrap().unwrap();
        assert_eq!(bid.status, BidStatus::UnderNegotiation);
        assert_eq!(bid.current_price, 100_000.0);
    }

    #[test]
    fn acceptance_applies_the_concession_and_completes_the_thread() {
        let (_tmp, repos, engine, runner) = setup();

        let tender = test_tender("Sulfuric Acid", "Mumbai, Maharashtra");
        repos.tenders.insert(&tender).unwrap();
        let vendor = test_vendor("Alpha Chem", &["Acids"], &["ISO9001"], 4.5, "Mumbai");
        repos.vendors.insert(&vendor).unwrap();
        approve_vendor(&repos, &tender.tender_id, &vendor);
        engine.initiate(&tender.tender_id).unwrap();
        let submission = engine
            .submit_bid(
                &tender.tender_id,
                &vendor.vendor_id,
                100_000.0,
                30,
                BidTerms::default(),
            )
            .unwrap();
        runner.run_pending();

        let thread = repos
            .negotiations
            .find_by_tender_vendor(&tender.tender_id, &vendor.vendor_id)
            .unwrap()
            .unwrap();
        let outcome = engine
            .on_vendor_message(&thread.negotiation_id, "We accept your counter-offer.")
            .unwrap();
        let VendorMessageOutcome::Accepted { agreed_price, .. } = outcome else {
            panic!("expected acceptance");
        };
        assert_eq!(agreed_price, 95_000.0);

        // Immediate write: price dropped 5%, bid accepted
        let bid = repos.bids.find_by_id(&submission.bid.bid_id).unwrap().unwrap();
        assert_eq!(bid.status, BidStatus::Accepted);
        assert_eq!(bid.current_price, 95_000.0);
        assert_eq!(bid.initial_price, 100_000.0);

        // Paced confirmation completes the thread with final terms
        assert_eq!(runner.run_pending(), 1);
        let thread = repos
            .negotiations
            .find_by_id(&thread.negotiation_id)
            .unwrap()
            .unwrap();
        assert_eq!(thread.status, NegotiationStatus::Completed);
        let terms = thread.final_terms.unwrap();
        assert_eq!(terms.agreed_price, 95_000.0);
        assert_eq!(terms.delivery_time_days, 30);
        let last = thread.messages.last().unwrap();
        assert_eq!(last.sender, MessageSender::Agent);
        assert!(last.message.contains("₹95000"));
        assert!(last.message.contains("accepted for the auction phase"));
    }

    #[test]
    fn completed_thread_ignores_a_repeat_acceptance() {
        let (_tmp, repos, engine, runner) = setup();

        let tender = test_tender("Sulfuric Acid", "Mumbai, Maharashtra");
        repos.tenders.insert(&tender).unwrap();
        let vendor = test_vendor("Alpha Chem", &["Acids"], &["ISO9001"], 4.5, "Mumbai");
        repos.vendors.insert(&vendor).unwrap();
        approve_vendor(&repos, &tender.tender_id, &vendor);
        engine.initiate(&tender.tender_id).unwrap();
        let submission = engine
            .submit_bid(
                &tender.tender_id,
                &vendor.vendor_id,
                100_000.0,
                30,
                BidTerms::default(),
            )
            .unwrap();
        runner.run_pending();

        let thread = repos
            .negotiations
            .find_by_tender_vendor(&tender.tender_id, &vendor.vendor_id)
            .unwrap()
            .unwrap();
        engine
            .on_vendor_message(&thread.negotiation_id, "We accept your counter-offer.")
            .unwrap();
        runner.run_pending();

        let completed = repos
            .negotiations
            .find_by_id(&thread.negotiation_id)
            .unwrap()
            .unwrap();
        assert_eq!(completed.status, NegotiationStatus::Completed);
        let message_count = completed.messages.len();

        // A second acceptance on the closed thread must not re-apply
        // the concession or rewrite the agreed terms.
        let outcome = engine
            .on_vendor_message(&thread.negotiation_id, "We accept!")
            .unwrap();
        assert!(matches!(outcome, VendorMessageOutcome::Ignored));
        assert_eq!(runner.run_pending(), 0);

        let bid = repos.bids.find_by_id(&submission.bid.bid_id).unwrap().unwrap();
        assert_eq!(bid.current_price, 95_000.0);
        assert_eq!(bid.status, BidStatus::Accepted);

        let unchanged = repos
            .negotiations
            .find_by_id(&thread.negotiation_id)
            .unwrap()
            .unwrap();
        assert_eq!(unchanged.status, NegotiationStatus::Completed);
        assert_eq!(unchanged.final_terms.unwrap().agreed_price, 95_000.0);
        assert_eq!(unchanged.messages.len(), message_count);
    }

    #[test]
    fn stale_counter_offer_does_not_regress_an_accepted_bid() {
        let (_tmp, repos, engine, runner) = setup();

        let tender = test_tender("Sulfuric Acid", "Mumbai, Maharashtra");
        repos.tenders.insert(&tender).unwrap();
        let vendor = test_vendor("Alpha Chem", &["Acids"], &["ISO9001"], 4.5, "Mumbai");
        repos.vendors.insert(&vendor).unwrap();
        approve_vendor(&repos, &tender.tender_id, &vendor);
        engine.initiate(&tender.tender_id).unwrap();
        let submission = engine
            .submit_bid(
                &tender.tender_id,
                &vendor.vendor_id,
                100_000.0,
                30,
                BidTerms::default(),
            )
            .unwrap();

        // Vendor accepts before the counter-offer fires
        let thread = repos
            .negotiations
            .find_by_tender_vendor(&tender.tender_id, &vendor.vendor_id)
            .unwrap()
            .unwrap();
        engine
            .on_vendor_message(&thread.negotiation_id, "I agree to the terms.")
            .unwrap();

        // Both paced tasks fire now; the stale counter must not pull
        // the accepted bid back to under_negotiation.
        runner.run_pending();
        let bid = repos.bids.find_by_id(&submission.bid.bid_id).unwrap().unwrap();
        assert_eq!(bid.status, BidStatus::Accepted);
        assert_eq!(bid.current_price, 95_000.0);
    }

    #[test]
    fn cancelled_follow_up_never_runs() {
        let (_tmp, repos, engine, runner) = setup();

        let tender = test_tender("Sulfuric Acid", "Mumbai, Maharashtra");
        repos.tenders.insert(&tender).unwrap();
        let vendor = test_vendor("Alpha Chem", &["Acids"], &["ISO9001"], 4.5, "Mumbai");
        repos.vendors.insert(&vendor).unwrap();
        approve_vendor(&repos, &tender.tender_id, &vendor);
        engine.initiate(&tender.tender_id).unwrap();

        let submission = engine
            .submit_bid(
                &tender.tender_id,
                &vendor.vendor_id,
                100_000.0,
                30,
                BidTerms::default(),
            )
            .unwrap();
        submission.counter_offer.unwrap().cancel();

        assert_eq!(runner.run_pending(), 0);
        let bid = repos.bids.find_by_id(&submission.bid.bid_id).unwrap().unwrap();
        assert_eq!(bid.status, BidStatus::Submitted);
    }

    #[test]
    fn message_to_unknown_thread_is_ignored() {
        let (_tmp, _repos, engine, _runner) = setup();
        let outcome = engine.on_vendor_message("no-such-thread", "accept").unwrap();
        assert!(matches!(outcome, VendorMessageOutcome::Ignored));
    }
}
