// Copyright 2025 The c2pa-lineage Authors. All rights reserved.
// This file is licensed to you under the Apache License,
// Version 2.0 (http://www.apache.org/licenses/LICENSE-2.0)
// or the MIT license (http://opensource.org/licenses/MIT),
// at your option.

// Unless required by applicable law or agreed to in writing,
// this software is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR REPRESENTATIONS OF ANY KIND, either express or
// implied. See the LICENSE-MIT and LICENSE-APACHE files for the
// specific language governing permissions and limitations under
// each license.

use c2pa_lineage_status_tracker::{validation_codes::*, LogKind, StatusTracker};
use chrono::{TimeZone, Utc};

use crate::{
    cose::{parse_cose_sign1, sign, CertificateTrustPolicy, TrustAnchorType, Verifier},
    raw_signature::{signer_from_cert_chain_and_private_key, SigningAlg},
    tests::fixtures::*,
    time_stamp::CoseTimeStampAuthority,
};

const CLAIM: &[u8] = b"claim bytes";
const LABEL: &str = "self#jumbf=/c2pa/urn:c2pa:test/c2pa.signature";

fn policies() -> (CertificateTrustPolicy, CertificateTrustPolicy) {
    let mut trust = CertificateTrustPolicy::new();
    trust.add_trust_anchors(ROOT_CA).unwrap();
    trust.add_trust_anchors(EC_ROOT_CA).unwrap();

    let mut tsa = CertificateTrustPolicy::for_time_stamping();
    tsa.add_trust_anchors(TSA_ROOT_CA).unwrap();

    (trust, tsa)
}

fn tsa_at(year: i32) -> CoseTimeStampAuthority {
    let signer =
        signer_from_cert_chain_and_private_key(TSA_PUB, TSA_PRIV, SigningAlg::Ed25519).unwrap();
    CoseTimeStampAuthority::new(signer)
        .with_fixed_time(Utc.with_ymd_and_hms(year, 3, 1, 12, 0, 0).unwrap())
}

#[test]
fn trusted_and_valid() {
    let (trust, tsa) = policies();
    let verifier = Verifier::new(&trust, &tsa);

    let signer =
        signer_from_cert_chain_and_private_key(ES256_PUB, ES256_PRIV, SigningAlg::Es256).unwrap();
    let cose = sign(signer.as_ref(), CLAIM, None).unwrap();
    let sign1 = parse_cose_sign1(&cose, CLAIM).unwrap();

    let mut log = StatusTracker::default();

    assert!(verifier.check_time_stamp(&sign1).is_none());
    assert_eq!(
        verifier.verify_trust(LABEL, &sign1, None, &mut log).unwrap(),
        TrustAnchorType::TrustAnchor
    );
    assert_eq!(
        verifier.verify_signature(LABEL, &sign1, &mut log).unwrap(),
        SigningAlg::Es256
    );

    let codes: Vec<&str> = log.validation_codes().collect();
    assert_eq!(codes, vec![SIGNING_CREDENTIAL_TRUSTED, SIGNATURE_VALID]);
    assert!(!log.has_failure());
    assert_eq!(log.logged_items()[0].label, LABEL);
}

#[test]
fn untrusted_but_valid() {
    let trust = CertificateTrustPolicy::new();
    let tsa = CertificateTrustPolicy::for_time_stamping();
    let verifier = Verifier::new(&trust, &tsa);

    let signer =
        signer_from_cert_chain_and_private_key(ED25519_PUB, ED25519_PRIV, SigningAlg::Ed25519)
            .unwrap();
    let cose = sign(signer.as_ref(), CLAIM, None).unwrap();
    let sign1 = parse_cose_sign1(&cose, CLAIM).unwrap();

    let mut log = StatusTracker::default();

    assert!(verifier.verify_trust(LABEL, &sign1, None, &mut log).is_err());
    assert!(verifier.verify_signature(LABEL, &sign1, &mut log).is_ok());

    let codes: Vec<&str> = log.validation_codes().collect();
    assert_eq!(codes, vec![SIGNING_CREDENTIAL_UNTRUSTED, SIGNATURE_VALID]);
    assert_eq!(log.logged_items()[0].kind, LogKind::Failure);
    assert!(log.logged_items()[0].err_val.is_some());
}

#[test]
fn invalid_signature() {
    let (trust, tsa) = policies();
    let verifier = Verifier::new(&trust, &tsa);

    let signer =
        signer_from_cert_chain_and_private_key(ED25519_PUB, ED25519_PRIV, SigningAlg::Ed25519)
            .unwrap();
    let cose = sign(signer.as_ref(), CLAIM, None).unwrap();
    let sign1 = parse_cose_sign1(&cose, b"different claim bytes").unwrap();

    let mut log = StatusTracker::default();
    assert!(verifier.verify_signature(LABEL, &sign1, &mut log).is_err());
    assert!(log.has_status(SIGNATURE_INVALID));
}

#[test]
fn time_stamp_sets_signing_time() {
    let (trust, tsa_policy) = policies();
    let verifier = Verifier::new(&trust, &tsa_policy);

    let tsa = tsa_at(2030);
    let signer =
        signer_from_cert_chain_and_private_key(ED25519_PUB, ED25519_PRIV, SigningAlg::Ed25519)
            .unwrap();
    let cose = sign(signer.as_ref(), CLAIM, Some(&tsa)).unwrap();
    let sign1 = parse_cose_sign1(&cose, CLAIM).unwrap();

    let tst_result = verifier.check_time_stamp(&sign1).unwrap();
    let tst_info = tst_result.as_ref().unwrap();
    assert_eq!(
        tst_info.gen_time,
        Utc.with_ymd_and_hms(2030, 3, 1, 12, 0, 0).unwrap()
    );

    let mut log = StatusTracker::default();
    verifier.log_time_stamp(LABEL, &tst_result, &mut log);
    verifier
        .verify_trust(LABEL, &sign1, Some(tst_info), &mut log)
        .unwrap();
    verifier.verify_signature(LABEL, &sign1, &mut log).unwrap();

    let codes: Vec<&str> = log.validation_codes().collect();
    assert_eq!(
        codes,
        vec![TIMESTAMP_TRUSTED, SIGNING_CREDENTIAL_TRUSTED, SIGNATURE_VALID]
    );
}

#[test]
fn expired_signer_without_time_stamp() {
    let mut trust = CertificateTrustPolicy::new();
    trust.add_trust_anchors(ROOT_CA).unwrap();
    let tsa_policy = CertificateTrustPolicy::for_time_stamping();
    let verifier = Verifier::new(&trust, &tsa_policy);

    let signer =
        signer_from_cert_chain_and_private_key(EXPIRED_PUB, EXPIRED_PRIV, SigningAlg::Ed25519)
            .unwrap();
    let cose = sign(signer.as_ref(), CLAIM, None).unwrap();
    let sign1 = parse_cose_sign1(&cose, CLAIM).unwrap();

    let mut log = StatusTracker::default();
    assert!(verifier.verify_trust(LABEL, &sign1, None, &mut log).is_err());
    assert!(log.has_status(SIGNING_CREDENTIAL_UNTRUSTED));
}

#[test]
fn untrusted_time_stamp_authority() {
    let (trust, _) = policies();
    let empty_tsa_policy = CertificateTrustPolicy::for_time_stamping();
    let verifier = Verifier::new(&trust, &empty_tsa_policy);

    let tsa = tsa_at(2030);
    let signer =
        signer_from_cert_chain_and_private_key(ES384_PUB, ES384_PRIV, SigningAlg::Es384).unwrap();
    let cose = sign(signer.as_ref(), CLAIM, Some(&tsa)).unwrap();
    let sign1 = parse_cose_sign1(&cose, CLAIM).unwrap();

    let tst_result = verifier.check_time_stamp(&sign1).unwrap();
    assert!(tst_result.is_err());

    let mut log = StatusTracker::default();
    verifier.log_time_stamp(LABEL, &tst_result, &mut log);
    assert!(log.has_status(TIMESTAMP_UNTRUSTED));
    assert!(log.has_failure());

    // The claim signature itself is unaffected.
    verifier.verify_signature(LABEL, &sign1, &mut log).unwrap();
}

#[test]
fn time_stamp_does_not_cover_other_signature() {
    let (trust, tsa_policy) = policies();
    let verifier = Verifier::new(&trust, &tsa_policy);

    let tsa = tsa_at(2030);
    let signer =
        signer_from_cert_chain_and_private_key(ED25519_PUB, ED25519_PRIV, SigningAlg::Ed25519)
            .unwrap();
    let cose = sign(signer.as_ref(), CLAIM, Some(&tsa)).unwrap();
    let mut sign1 = parse_cose_sign1(&cose, CLAIM).unwrap();

    // Replace the signature; the time stamp no longer binds to it.
    sign1.signature[0] ^= 0x01;

    assert!(verifier.check_time_stamp(&sign1).unwrap().is_err());
}
