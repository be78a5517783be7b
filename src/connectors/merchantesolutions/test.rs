use crate::{
    codes::{AvsCheck, CvvCheck},
    connection::test_utils::MockConnection,
    gateway::Gateway,
    masking::Secret,
    types::{
        Address, Card, ConnectorAuthType, ConnectorEnum, Currency, MinorUnit, PaymentMethod,
        PaymentOptions,
    },
};

const PURCHASE_OK: &str = "transaction_id=5547cc97dae23ea6ad1a4abd33445c91&error_code=000&auth_response_text=Exact Match&auth_code=12345A";
const PURCHASE_DECLINED: &str =
    "transaction_id=error&error_code=101&auth_response_text=Invalid I or Key Incomplete Request";

fn gateway(connection: MockConnection) -> Gateway<MockConnection> {
    Gateway::new(
        ConnectorEnum::Merchantesolutions,
        ConnectorAuthType::BodyKey {
            api_key: Secret::new("sekrit".to_string()),
            key1: Secret::new("login".to_string()),
        },
        true,
        connection,
    )
}

fn card() -> PaymentMethod {
    PaymentMethod::Card(Card {
        number: Secret::new("4111111111111111".to_string()),
        exp_month: Secret::new("9".to_string()),
        exp_year: Secret::new("2019".to_string()),
        cvv: Secret::new("123".to_string()),
        first_name: Some("Longbob".to_string()),
        last_name: Some("Longsen".to_string()),
    })
}

#[test]
fn successful_purchase() {
    let gateway = gateway(MockConnection::new().respond_with(200, PURCHASE_OK));
    let response = gateway
        .purchase(
            MinorUnit::new(100),
            Currency::Usd,
            card(),
            PaymentOptions::default(),
        )
        .unwrap();
    assert!(response.success);
    assert_eq!(response.message, "Exact Match");
    assert_eq!(
        response.authorization.as_deref(),
        Some("5547cc97dae23ea6ad1a4abd33445c91")
    );
    assert_eq!(response.error_code, None);
    assert!(response.test_mode);
}

#[test]
fn purchase_sends_the_full_trident_form() {
    let gateway = gateway(MockConnection::new().respond_with(200, PURCHASE_OK));
    gateway
        .purchase(
            MinorUnit::new(100),
            Currency::Usd,
            card(),
            PaymentOptions::default(),
        )
        .unwrap();
    assert_eq!(
        gateway.connection.body(0),
        "profile_id=login&profile_key=sekrit&transaction_type=D\
         &card_number=4111111111111111&cvv2=123&card_exp_date=0919\
         &transaction_amount=1.00"
    );
    assert_eq!(
        gateway.connection.requests()[0].url,
        "https://cert.merchante-solutions.com/mes-api/tridentApi"
    );
}

#[test]
fn authorize_uses_its_own_transaction_type() {
    let gateway = gateway(MockConnection::new().respond_with(200, PURCHASE_OK));
    gateway
        .authorize(
            MinorUnit::new(100),
            Currency::Usd,
            card(),
            PaymentOptions::default(),
        )
        .unwrap();
    assert!(gateway.connection.body(0).contains("transaction_type=P"));
}

#[test]
fn failed_purchase_keeps_the_provider_code() {
    let gateway = gateway(MockConnection::new().respond_with(200, PURCHASE_DECLINED));
    let response = gateway
        .purchase(
            MinorUnit::new(100),
            Currency::Usd,
            card(),
            PaymentOptions::default(),
        )
        .unwrap();
    assert!(!response.success);
    assert_eq!(response.message, "Invalid I or Key Incomplete Request");
    assert_eq!(response.error_code, Some(serde_json::json!("101")));
    // Trident echoes a transaction id even on declines; it stays available
    // as the support reference.
    assert_eq!(response.authorization.as_deref(), Some("error"));
}

#[test]
fn moto_indicator_is_forwarded() {
    let gateway = gateway(MockConnection::new().respond_with(200, PURCHASE_OK));
    let options = PaymentOptions {
        moto_ecommerce_ind: Some("7".to_string()),
        ..PaymentOptions::default()
    };
    gateway
        .purchase(MinorUnit::new(100), Currency::Usd, card(), options)
        .unwrap();
    assert!(gateway.connection.body(0).contains("moto_ecommerce_ind=7"));
}

#[test]
fn long_order_ids_are_truncated() {
    let gateway = gateway(MockConnection::new().respond_with(200, PURCHASE_OK));
    let options = PaymentOptions {
        order_id: Some("thisislongerthan17characters".to_string()),
        ..PaymentOptions::default()
    };
    gateway
        .purchase(MinorUnit::new(100), Currency::Usd, card(), options)
        .unwrap();
    let body = gateway.connection.body(0);
    assert!(body.contains("invoice_number=thisislongerthan1&"));
    assert!(!body.contains("thisislongerthan17"));
}

#[test]
fn capture_threads_the_authorize_token() {
    let token = "42e52603e4c83a55890fbbcfb92b8de1";
    let authorize_reply = format!(
        "transaction_id={token}&error_code=000&auth_response_text=Exact Match"
    );
    let gateway = gateway(
        MockConnection::new()
            .respond_with(200, &authorize_reply)
            .respond_with(200, &authorize_reply),
    );
    let authorized = gateway
        .authorize(
            MinorUnit::new(100),
            Currency::Usd,
            card(),
            PaymentOptions::default(),
        )
        .unwrap();
    let captured = gateway
        .capture(
            MinorUnit::new(100),
            authorized.authorization.as_deref().unwrap(),
            PaymentOptions::default(),
        )
        .unwrap();
    assert!(captured.success);
    assert_eq!(captured.authorization.as_deref(), Some(token));
    assert_eq!(
        gateway.connection.body(1),
        format!(
            "profile_id=login&profile_key=sekrit&transaction_type=S\
             &transaction_id={token}&transaction_amount=1.00"
        )
    );
}

#[test]
fn refund_references_the_transaction() {
    let gateway = gateway(MockConnection::new().respond_with(200, PURCHASE_OK));
    gateway
        .refund(
            MinorUnit::new(100),
            "42e52603e4c83a55890fbbcfb92b8de1",
            PaymentOptions::default(),
        )
        .unwrap();
    assert_eq!(
        gateway.connection.body(0),
        "profile_id=login&profile_key=sekrit&transaction_type=U\
         &transaction_id=42e52603e4c83a55890fbbcfb92b8de1&transaction_amount=1.00"
    );
}

#[test]
fn credit_pushes_funds_to_a_card() {
    let gateway = gateway(MockConnection::new().respond_with(200, PURCHASE_OK));
    gateway
        .credit(
            MinorUnit::new(100),
            Currency::Usd,
            card(),
            PaymentOptions::default(),
        )
        .unwrap();
    let body = gateway.connection.body(0);
    assert!(body.contains("transaction_type=C"));
    assert!(body.contains("card_number=4111111111111111"));
    assert!(body.contains("transaction_amount=1.00"));
}

#[test]
fn void_carries_no_amount() {
    let token = "1b08845c6dee3fa1a73fee2a009d33a7";
    let gateway = gateway(MockConnection::new().respond_with(
        200,
        &format!("transaction_id={token}&error_code=000&auth_response_text=Ok"),
    ));
    let response = gateway.void(token, PaymentOptions::default()).unwrap();
    assert!(response.success);
    assert_eq!(
        gateway.connection.body(0),
        format!(
            "profile_id=login&profile_key=sekrit&transaction_type=V&transaction_id={token}"
        )
    );
}

#[test]
fn store_and_unstore_card_data() {
    let card_id = "d79410c91b4b31ba99f5a90558565df9";
    let gateway = gateway(
        MockConnection::new()
            .respond_with(
                200,
                &format!("transaction_id={card_id}&error_code=000&auth_response_text=Ok"),
            )
            .respond_with(
                200,
                &format!("transaction_id={card_id}&error_code=000&auth_response_text=Ok"),
            ),
    );
    let raw_card = match card() {
        PaymentMethod::Card(card) => card,
        PaymentMethod::StoredCard { .. } => unreachable!(),
    };
    let stored = gateway.store(raw_card, PaymentOptions::default()).unwrap();
    assert!(stored.success);
    assert_eq!(
        gateway.connection.body(0),
        "profile_id=login&profile_key=sekrit&transaction_type=T\
         &card_number=4111111111111111&card_exp_date=0919"
    );

    gateway
        .unstore(Secret::new(card_id.to_string()))
        .unwrap();
    assert_eq!(
        gateway.connection.body(1),
        format!(
            "profile_id=login&profile_key=sekrit&transaction_type=X&card_id={card_id}"
        )
    );
}

#[test]
fn verify_is_a_single_zero_dollar_call() {
    let gateway = gateway(MockConnection::new().respond_with(
        200,
        "transaction_id=abc123&error_code=085&auth_response_text=Card Ok",
    ));
    let options = PaymentOptions {
        store_card: Some("y".to_string()),
        ..PaymentOptions::default()
    };
    let response = gateway.verify(card(), Currency::Usd, options).unwrap();
    assert!(response.success);
    assert_eq!(response.message, "Card Ok");
    assert_eq!(gateway.connection.request_count(), 1);
    let body = gateway.connection.body(0);
    assert!(body.contains("transaction_type=A"));
    assert!(body.contains("store_card=y"));
    assert!(body.contains("card_number=4111111111111111"));
    assert!(!body.contains("transaction_amount"));
}

#[test]
fn billing_address_maps_to_avs_fields() {
    let gateway = gateway(MockConnection::new().respond_with(200, PURCHASE_OK));
    let options = PaymentOptions {
        billing_address: Some(Address {
            line1: Some(Secret::new("123 Main St".to_string())),
            zip: Some(Secret::new("90210".to_string())),
            ..Address::default()
        }),
        ..PaymentOptions::default()
    };
    gateway
        .purchase(MinorUnit::new(100), Currency::Usd, card(), options)
        .unwrap();
    let body = gateway.connection.body(0);
    assert!(body.contains("cardholder_street_address=123+Main+St"));
    assert!(body.contains("cardholder_zip=90210"));
}

#[test]
fn avs_replies_classify_street_and_postal_match() {
    for (code, street, postal) in [
        ("Y", AvsCheck::Match, AvsCheck::Match),
        ("Z", AvsCheck::NoMatch, AvsCheck::Match),
        ("A", AvsCheck::Match, AvsCheck::NoMatch),
    ] {
        let gateway = gateway(MockConnection::new().respond_with(
            200,
            &format!("{PURCHASE_OK}&avs_result={code}"),
        ));
        let response = gateway
            .purchase(
                MinorUnit::new(100),
                Currency::Usd,
                card(),
                PaymentOptions::default(),
            )
            .unwrap();
        let avs = response.avs_result.unwrap();
        assert_eq!(avs.code, code);
        assert_eq!(avs.street_match, street);
        assert_eq!(avs.postal_match, postal);
    }
}

#[test]
fn cvv_replies_are_classified() {
    for (code, check) in [("M", CvvCheck::Matches), ("N", CvvCheck::DoesNotMatch)] {
        let gateway = gateway(MockConnection::new().respond_with(
            200,
            &format!("{PURCHASE_OK}&cvv2_result={code}"),
        ));
        let response = gateway
            .purchase(
                MinorUnit::new(100),
                Currency::Usd,
                card(),
                PaymentOptions::default(),
            )
            .unwrap();
        let cvv = response.cvv_result.unwrap();
        assert_eq!(cvv.code, code);
        assert_eq!(cvv.check, check);
    }
}

#[test]
fn visa_three_ds_fields_pass_through() {
    let gateway = gateway(MockConnection::new().respond_with(200, PURCHASE_OK));
    let options = PaymentOptions {
        xid: Some("1".to_string()),
        cavv: Some("2".to_string()),
        ..PaymentOptions::default()
    };
    gateway
        .purchase(MinorUnit::new(100), Currency::Usd, card(), options)
        .unwrap();
    let body = gateway.connection.body(0);
    assert!(body.contains("xid=1"));
    assert!(body.contains("cavv=2"));
}

#[test]
fn mastercard_ucaf_fields_pass_through() {
    let gateway = gateway(MockConnection::new().respond_with(200, PURCHASE_OK));
    let options = PaymentOptions {
        ucaf_collection_ind: Some("1".to_string()),
        ucaf_auth_data: Some("2".to_string()),
        ..PaymentOptions::default()
    };
    gateway
        .purchase(MinorUnit::new(100), Currency::Usd, card(), options)
        .unwrap();
    let body = gateway.connection.body(0);
    assert!(body.contains("ucaf_collection_ind=1"));
    assert!(body.contains("ucaf_auth_data=2"));
}

#[test]
fn scrub_redacts_credentials_and_card_data() {
    let gateway = gateway(MockConnection::new());
    let transcript = "POST https://cert.merchante-solutions.com/mes-api/tridentApi\n\
                      profile_id=login&profile_key=sekrit&transaction_type=D\
                      &card_number=4111111111111111&cvv2=123&card_exp_date=0919\
                      &transaction_amount=1.00\n\
                      transaction_id=5547cc97dae23ea6ad1a4abd33445c91&error_code=000";
    let scrubbed = gateway.scrub(transcript);
    assert!(scrubbed.contains("profile_key=[FILTERED]"));
    assert!(scrubbed.contains("card_number=[FILTERED]"));
    assert!(scrubbed.contains("cvv2=[FILTERED]"));
    assert!(!scrubbed.contains("sekrit"));
    assert!(!scrubbed.contains("4111111111111111"));
    assert!(scrubbed.contains("profile_id=login"));
    assert!(scrubbed.contains("transaction_id=5547cc97dae23ea6ad1a4abd33445c91"));
}

#[test]
fn empty_credentials_never_reach_the_wire() {
    let connection = MockConnection::new();
    let gateway = Gateway::new(
        ConnectorEnum::Merchantesolutions,
        ConnectorAuthType::BodyKey {
            api_key: Secret::new(String::new()),
            key1: Secret::new(String::new()),
        },
        true,
        connection,
    );
    assert!(gateway
        .purchase(
            MinorUnit::new(100),
            Currency::Usd,
            card(),
            PaymentOptions::default(),
        )
        .is_err());
    assert_eq!(gateway.connection.request_count(), 0);
}
