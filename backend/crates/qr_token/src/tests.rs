//! Unit tests for the qr_token crate

#[cfg(test)]
mod signer_tests {
    use crate::*;
    use kernel::id::{BookingId, TicketId};

    const WINDOW: i64 = 15_000;

    fn signer(secret: &str) -> TokenSigner {
        TokenSigner::new(QrSecret::from_text(secret).unwrap(), QrWindow::standard())
    }

    fn ids(booking: &str, ticket: &str) -> (BookingId, TicketId) {
        (
            BookingId::parse(booking).unwrap(),
            TicketId::parse(ticket).unwrap(),
        )
    }

    #[test]
    fn test_signing_input_format() {
        let (b, t) = ids("B123", "T9");
        assert_eq!(signing_input(&b, &t, Slot::new(1000)), "B123:T9:1000");
    }

    /// Fixed vectors every runtime (server, web client, native plugin) must reproduce
    #[test]
    fn test_cross_runtime_vectors() {
        let cases = [
            (
                "test-qr-secret",
                "B123",
                "T9",
                1000,
                "a799e0d3cd7a5872b127e5adc504680a763b6915061c1a8bb507297d50d86d24",
            ),
            (
                "test-qr-secret",
                "B123",
                "T9",
                1001,
                "bb248cace7579abfe3cdab68f169f8d564e042f3c5c0eccb2d0a2a0de72d5cb4",
            ),
            (
                "change-me",
                "jd7f2k9x0b1c",
                "k57a8xq9t0w1",
                115_200_000,
                "06603246346f93f338d35679b0f7a05d5ee011816bb03e865a1e160fa0c8099f",
            ),
        ];

        for (secret, booking, ticket, slot, expected) in cases {
            let (b, t) = ids(booking, ticket);
            assert_eq!(signer(secret).signature(&b, &t, Slot::new(slot)), expected);
        }
    }

    #[test]
    fn test_signature_is_deterministic_lowercase_hex() {
        let (b, t) = ids("B123", "T9");
        let s = signer("test-qr-secret");
        let a = s.signature(&b, &t, Slot::new(42));
        assert_eq!(a, s.signature(&b, &t, Slot::new(42)));
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
        assert_ne!(a, s.signature(&b, &t, Slot::new(43)));
        assert_ne!(a, signer("other").signature(&b, &t, Slot::new(42)));
    }

    #[test]
    fn test_issue_current_and_next_slot() {
        let (b, t) = ids("B123", "T9");
        let s = signer("test-qr-secret");
        let batch = s.issue(&b, &t, 1000 * WINDOW + 3_000).unwrap();

        assert_eq!(batch.window_ms, WINDOW);
        assert_eq!(batch.tokens.len(), 2);
        assert_eq!(batch.tokens[0].expires_at, 1001 * WINDOW);
        assert_eq!(batch.tokens[1].expires_at, 1002 * WINDOW);

        let first = QrPayload::parse(&batch.tokens[0].qr_value).unwrap();
        let second = QrPayload::parse(&batch.tokens[1].qr_value).unwrap();
        assert_eq!(first.ts, Slot::new(1000));
        assert_eq!(second.ts, Slot::new(1001));
        assert!(s.verify_signature(&first));
        assert!(s.verify_signature(&second));
    }

    #[test]
    fn test_issue_is_repeatable() {
        let (b, t) = ids("B123", "T9");
        let s = signer("test-qr-secret");
        let now = 1000 * WINDOW;
        assert_eq!(s.issue(&b, &t, now).unwrap(), s.issue(&b, &t, now + 14_999).unwrap());
    }

    #[test]
    fn test_batch_wire_shape() {
        let (b, t) = ids("B123", "T9");
        let batch = signer("test-qr-secret").issue(&b, &t, 1000 * WINDOW).unwrap();
        let json = serde_json::to_value(&batch).unwrap();
        assert_eq!(json["windowMs"], 15_000);
        assert_eq!(json["tokens"][0]["expiresAt"], 1001 * WINDOW);
        assert!(json["tokens"][0]["qrValue"].is_string());
    }

    #[test]
    fn test_signed_token_remaining() {
        let token = SignedToken {
            qr_value: String::new(),
            expires_at: 10_000,
        };
        assert_eq!(token.remaining_ms(4_000), 6_000);
        assert_eq!(token.remaining_ms(12_000), 0);
        assert!(!token.is_expired(9_999));
        assert!(token.is_expired(10_000));
    }
}

#[cfg(test)]
mod verifier_tests {
    use crate::*;
    use kernel::id::{BookingId, TicketId};

    const WINDOW: i64 = 15_000;

    fn verifier() -> TokenVerifier {
        let signer = TokenSigner::new(
            QrSecret::from_text("test-qr-secret").unwrap(),
            QrWindow::standard(),
        );
        TokenVerifier::new(signer, FreshnessPolicy::default())
    }

    fn token_at(v: &TokenVerifier, booking: &str, ticket: &str, slot: i64) -> QrPayload {
        v.signer().sign_slot(
            &BookingId::parse(booking).unwrap(),
            &TicketId::parse(ticket).unwrap(),
            Slot::new(slot),
        )
    }

    #[test]
    fn test_current_slot_accepted() {
        let v = verifier();
        let raw = token_at(&v, "B123", "T9", 1000).encode().unwrap();
        let payload = v.verify(&raw, 1000 * WINDOW).unwrap();
        assert_eq!(payload.booking_id.as_str(), "B123");
        assert!(v.verify(&raw, 1001 * WINDOW - 1).is_ok());
    }

    #[test]
    fn test_previous_slot_is_grace() {
        let v = verifier();
        let raw = token_at(&v, "B123", "T9", 1000).encode().unwrap();
        assert!(v.verify(&raw, 1001 * WINDOW).is_ok());
        assert!(v.verify(&raw, 1002 * WINDOW - 1).is_ok());
    }

    #[test]
    fn test_two_slots_old_is_expired() {
        let v = verifier();
        let raw = token_at(&v, "B123", "T9", 1000).encode().unwrap();
        let err = v.verify(&raw, 1002 * WINDOW).unwrap_err();
        assert!(err.is_freshness());
        assert!(matches!(err, TokenError::Expired { .. }));
    }

    #[test]
    fn test_future_slot_not_yet_valid() {
        let v = verifier();
        let raw = token_at(&v, "B123", "T9", 1002).encode().unwrap();
        assert!(matches!(
            v.verify(&raw, 1000 * WINDOW),
            Err(TokenError::NotYetValid { .. })
        ));
        assert!(v.verify(&raw, 1001 * WINDOW).is_ok());
    }

    #[test]
    fn test_device_clock_slightly_ahead() {
        // Device already rolled over to slot 1001; the gate is 1 s behind
        let v = verifier();
        let batch = v
            .signer()
            .issue(
                &BookingId::parse("B123").unwrap(),
                &TicketId::parse("T9").unwrap(),
                1001 * WINDOW + 200,
            )
            .unwrap();
        let gate_now = 1001 * WINDOW + 200 - 1_000;

        let payload = v.verify(&batch.tokens[0].qr_value, gate_now).unwrap();
        assert_eq!(payload.ts, Slot::new(1001));
        // Its next-slot token is two ahead of the gate
        assert!(matches!(
            v.verify(&batch.tokens[1].qr_value, gate_now),
            Err(TokenError::NotYetValid { .. })
        ));
    }

    #[test]
    fn test_flipping_any_sig_char_is_tamper() {
        let v = verifier();
        let payload = token_at(&v, "B123", "T9", 1000);
        for i in 0..payload.sig.len() {
            let mut forged = payload.clone();
            let mut chars: Vec<char> = forged.sig.chars().collect();
            chars[i] = if chars[i] == '0' { '1' } else { '0' };
            forged.sig = chars.into_iter().collect();
            let raw = forged.encode().unwrap();
            assert!(
                matches!(v.verify(&raw, 1000 * WINDOW), Err(TokenError::Tampered)),
                "flip at {i} accepted"
            );
        }
    }

    #[test]
    fn test_uppercase_sig_is_tamper() {
        let v = verifier();
        let mut payload = token_at(&v, "B123", "T9", 1000);
        payload.sig = payload.sig.to_uppercase();
        assert!(matches!(v.check_signature(&payload), Err(TokenError::Tampered)));
    }

    #[test]
    fn test_sig_transplanted_between_bookings_is_tamper() {
        let v = verifier();
        let genuine = token_at(&v, "B999", "T9", 1000);
        let mut forged = token_at(&v, "B123", "T9", 1000);
        forged.sig = genuine.sig.clone();
        assert!(matches!(v.check_signature(&forged), Err(TokenError::Tampered)));

        let mut forged = token_at(&v, "B999", "T1", 1000);
        forged.sig = genuine.sig;
        assert!(matches!(v.check_signature(&forged), Err(TokenError::Tampered)));
    }

    #[test]
    fn test_sig_from_other_slot_is_tamper() {
        let v = verifier();
        let mut payload = token_at(&v, "B123", "T9", 1000);
        payload.ts = Slot::new(1001);
        assert!(matches!(v.check_signature(&payload), Err(TokenError::Tampered)));
    }

    #[test]
    fn test_format_errors_classified_as_rejection() {
        let v = verifier();
        let err = v.verify("hello", 0).unwrap_err();
        assert!(err.is_rejection());
        assert!(!err.is_freshness());
        assert!(TokenError::Tampered.is_rejection());
    }

    #[test]
    fn test_other_secret_rejected() {
        let v = verifier();
        let other = TokenSigner::new(QrSecret::from_text("other").unwrap(), QrWindow::standard());
        let raw = other
            .sign_slot(
                &BookingId::parse("B123").unwrap(),
                &TicketId::parse("T9").unwrap(),
                Slot::new(1000),
            )
            .encode()
            .unwrap();
        assert!(matches!(
            v.verify(&raw, 1000 * WINDOW),
            Err(TokenError::Tampered)
        ));
    }
}
