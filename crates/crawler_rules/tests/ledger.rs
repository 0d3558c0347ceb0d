use crawler_rules::AdmissionLedger;

#[test]
fn ledger_grows_monotonically() {
    let ledger = AdmissionLedger::new();
    assert!(ledger.is_empty());

    assert!(ledger.admit("https://a/"));
    assert!(ledger.admit("https://b/"));
    assert!(!ledger.admit("https://a/"));

    assert_eq!(ledger.len(), 2);
    assert!(ledger.contains("https://a/"));
}
