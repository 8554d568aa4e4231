use loan_schedule_core::loan::{Loan, RateOverride};
use loan_schedule_core::schedule::payment_schedule;
use loan_schedule_core::LoanScheduleError;

// ===========================================================================
// Wire contract: loans arrive as JSON documents
// ===========================================================================

#[test]
fn test_loan_deserializes_from_json_document() {
    let loan: Loan = serde_json::from_str(
        r#"{
            "amount": 1000000,
            "term": 12,
            "interest_rate": 400,
            "default_index_rate": 394,
            "overrides": [{ "segment_number": 6, "rate": 410 }]
        }"#,
    )
    .unwrap();

    assert_eq!(loan.amount(), 1_000_000);
    assert_eq!(loan.term(), 12);
    assert_eq!(loan.override_for_segment(6).map(|o| o.rate), Some(410));
    assert!(loan.validate().is_ok());
}

#[test]
fn test_loan_overrides_field_is_optional() {
    let loan: Loan = serde_json::from_str(
        r#"{ "amount": 100000, "term": 6, "interest_rate": 0, "default_index_rate": 0 }"#,
    )
    .unwrap();
    assert!(loan.overrides().is_empty());
    assert_eq!(payment_schedule(&loan).unwrap().len(), 6);
}

#[test]
fn test_loan_serializes_back_to_the_same_document() {
    let loan = Loan::new()
        .with_amount(250_000)
        .with_term(24)
        .with_interest_rate(550)
        .with_override(RateOverride {
            segment_number: 3,
            rate: 380,
        });
    let round_tripped: Loan = serde_json::from_value(serde_json::to_value(&loan).unwrap()).unwrap();
    assert_eq!(round_tripped, loan);
}

// ===========================================================================
// Ownership: overrides belong to exactly one loan
// ===========================================================================

#[test]
fn test_adopting_an_override_detaches_it_from_the_donor() {
    let mut donor = Loan::new()
        .with_term(12)
        .with_override(RateOverride {
            segment_number: 4,
            rate: 425,
        })
        .with_override(RateOverride {
            segment_number: 9,
            rate: 430,
        });
    let mut recipient = Loan::new().with_term(12);

    assert!(recipient.adopt_override(&mut donor, 9));

    assert_eq!(donor.overrides().len(), 1);
    assert!(donor.override_for_segment(9).is_none());
    assert_eq!(recipient.override_for_segment(9).map(|o| o.rate), Some(430));

    // Adopting again finds nothing; both loans keep their current sets.
    assert!(!recipient.adopt_override(&mut donor, 9));
    assert_eq!(donor.overrides().len(), 1);
    assert_eq!(recipient.overrides().len(), 1);
}

// ===========================================================================
// Validation messages
// ===========================================================================

#[test]
fn test_validation_message_texts() {
    let cases: Vec<(Loan, &str)> = vec![
        (
            Loan::new().with_amount(-1),
            "Amount should be greater than or equal to 0",
        ),
        (
            Loan::new().with_amount(10_000_000_000),
            "Amount is too big. It should have 10 digits or less",
        ),
        (
            Loan::new().with_term(100_000),
            "Term is too big. It should have 5 digits or less",
        ),
        (
            Loan::new().with_interest_rate(100_000),
            "Interest rate is too big. It should have 5 digits or less",
        ),
        (
            Loan::new().with_default_index_rate(100_000),
            "Default index rate is too big. It should have 5 digits or less",
        ),
        (
            Loan::new().with_override(RateOverride {
                segment_number: 0,
                rate: 100,
            }),
            "Segment number should be greater than 0",
        ),
        (
            Loan::new().with_override(RateOverride {
                segment_number: 1,
                rate: 100_000,
            }),
            "Rate is too big. It should have 5 digits or less",
        ),
    ];

    for (loan, expected) in cases {
        let err = loan.validate().unwrap_err();
        assert!(
            err.to_string().contains(expected),
            "expected '{}' in '{}'",
            expected,
            err
        );
    }
}

#[test]
fn test_duplicate_override_error_mentions_segment_and_position() {
    let loan = Loan::new()
        .with_override(RateOverride {
            segment_number: 7,
            rate: 100,
        })
        .with_override(RateOverride {
            segment_number: 7,
            rate: 200,
        });
    let err = loan.validate().unwrap_err();
    assert!(matches!(
        err,
        LoanScheduleError::DuplicateOverride {
            segment_number: 7,
            position: 1
        }
    ));
    assert_eq!(
        err.to_string(),
        "Rate override with segment number \"7\" already exists (position 1)"
    );
}
