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

use chrono::{TimeZone, Utc};

use crate::{
    cose::{
        base64_sha256_cert_der, CertificateTrustError, CertificateTrustPolicy, EkuPurpose,
        TrustAnchorType,
    },
    tests::fixtures::{self, *},
};

fn check(ctp: &CertificateTrustPolicy, pems: &[u8]) -> Result<TrustAnchorType, CertificateTrustError> {
    check_at(ctp, pems, None)
}

fn check_at(
    ctp: &CertificateTrustPolicy,
    pems: &[u8],
    signing_time_epoch: Option<i64>,
) -> Result<TrustAnchorType, CertificateTrustError> {
    let chain = fixtures::ders(pems);
    ctp.check_certificate_trust(&chain[1..], &chain[0], signing_time_epoch)
}

fn policy_with_anchors(anchors: &[&[u8]]) -> CertificateTrustPolicy {
    let mut ctp = CertificateTrustPolicy::new();
    for anchor in anchors {
        ctp.add_trust_anchors(anchor).unwrap();
    }
    ctp
}

#[test]
fn trusted_chains() {
    let ctp = policy_with_anchors(&[ROOT_CA, EC_ROOT_CA]);

    assert_eq!(check(&ctp, ED25519_PUB), Ok(TrustAnchorType::TrustAnchor));
    assert_eq!(check(&ctp, ES256_PUB), Ok(TrustAnchorType::TrustAnchor));
    assert_eq!(check(&ctp, ES384_PUB), Ok(TrustAnchorType::TrustAnchor));
}

#[test]
fn chain_without_root_still_reaches_anchor() {
    let ctp = policy_with_anchors(&[ROOT_CA]);
    let chain = fixtures::ders(ED25519_PUB);

    assert_eq!(
        ctp.check_certificate_trust(&[], &chain[0], None),
        Ok(TrustAnchorType::TrustAnchor)
    );
}

#[test]
fn unrelated_anchor() {
    let ctp = policy_with_anchors(&[OTHER_ROOT_CA]);

    assert_eq!(
        check(&ctp, ED25519_PUB),
        Err(CertificateTrustError::CertificateNotTrusted)
    );
}

#[test]
fn no_anchors() {
    let ctp = CertificateTrustPolicy::new();
    assert!(ctp.is_empty());

    assert_eq!(
        check(&ctp, ED25519_PUB),
        Err(CertificateTrustError::CertificateNotTrusted)
    );
}

#[test]
fn expired_certificate() {
    let ctp = policy_with_anchors(&[ROOT_CA]);

    assert_eq!(
        check(&ctp, EXPIRED_PUB),
        Err(CertificateTrustError::CertificateOutsideValidityPeriod)
    );
}

#[test]
fn validity_is_checked_at_signing_time() {
    let ctp = policy_with_anchors(&[ROOT_CA]);

    let before_issue = Utc.with_ymd_and_hms(2023, 6, 1, 0, 0, 0).unwrap().timestamp();
    assert_eq!(
        check_at(&ctp, ED25519_PUB, Some(before_issue)),
        Err(CertificateTrustError::CertificateOutsideValidityPeriod)
    );

    let in_range = Utc.with_ymd_and_hms(2030, 6, 1, 0, 0, 0).unwrap().timestamp();
    assert_eq!(
        check_at(&ctp, ED25519_PUB, Some(in_range)),
        Ok(TrustAnchorType::TrustAnchor)
    );
}

#[test]
fn wrong_eku() {
    let mut ctp = policy_with_anchors(&[ROOT_CA]);

    assert_eq!(
        check(&ctp, WRONG_EKU_PUB),
        Err(CertificateTrustError::InvalidEku)
    );

    // id-kp-serverAuth
    ctp.add_valid_ekus(b"# extra signer EKUs\n1.3.6.1.5.5.7.3.1\n");

    assert_eq!(check(&ctp, WRONG_EKU_PUB), Ok(TrustAnchorType::TrustAnchor));
}

#[test]
fn time_stamping_purpose() {
    let mut signers = policy_with_anchors(&[TSA_ROOT_CA]);
    assert_eq!(signers.purpose(), EkuPurpose::ClaimSigning);
    assert_eq!(check(&signers, TSA_PUB), Err(CertificateTrustError::InvalidEku));

    let mut tsa = CertificateTrustPolicy::for_time_stamping();
    tsa.add_trust_anchors(TSA_ROOT_CA).unwrap();
    assert_eq!(check(&tsa, TSA_PUB), Ok(TrustAnchorType::TrustAnchor));

    // A claim signer is not a time stamp authority.
    tsa.add_trust_anchors(ROOT_CA).unwrap();
    assert_eq!(check(&tsa, ED25519_PUB), Err(CertificateTrustError::InvalidEku));

    signers.clear();
    assert!(signers.is_empty());
}

#[test]
fn end_entity_allow_list() {
    let mut ctp = CertificateTrustPolicy::new();

    // Only the leaf certificate.
    let chain = fixtures::ders(WRONG_EKU_PUB);
    let leaf_hash = base64_sha256_cert_der(&chain[0]);
    ctp.add_end_entity_credentials(format!("{leaf_hash}\n").as_bytes())
        .unwrap();

    assert_eq!(check(&ctp, WRONG_EKU_PUB), Ok(TrustAnchorType::EndEntity));
    assert_eq!(
        check(&ctp, ED25519_PUB),
        Err(CertificateTrustError::CertificateNotTrusted)
    );
}

#[test]
fn end_entity_allow_list_from_pem() {
    let mut ctp = CertificateTrustPolicy::new();

    // The first PEM block is the leaf; the root is allow-listed too but
    // never presented as an end entity.
    ctp.add_end_entity_credentials(ES256_PUB).unwrap();

    assert_eq!(check(&ctp, ES256_PUB), Ok(TrustAnchorType::EndEntity));
}

#[test]
fn revoked_leaf() {
    let mut ctp = policy_with_anchors(&[ROOT_CA]);
    let chain = fixtures::ders(ED25519_PUB);

    ctp.add_revoked_credentials(base64_sha256_cert_der(&chain[0]).as_bytes())
        .unwrap();

    assert_eq!(
        check(&ctp, ED25519_PUB),
        Err(CertificateTrustError::CertificateRevoked)
    );

    // Revocation wins over the allow-list.
    ctp.add_end_entity_credentials(ED25519_PUB).unwrap();
    assert_eq!(
        check(&ctp, ED25519_PUB),
        Err(CertificateTrustError::CertificateRevoked)
    );
}

#[test]
fn revoked_intermediate_or_root() {
    let mut ctp = policy_with_anchors(&[EC_ROOT_CA]);
    ctp.add_revoked_credentials(EC_ROOT_CA).unwrap();

    assert_eq!(
        check(&ctp, ES256_PUB),
        Err(CertificateTrustError::CertificateRevoked)
    );
}

#[test]
fn invalid_pem() {
    let mut ctp = CertificateTrustPolicy::new();

    assert!(ctp
        .add_trust_anchors(b"-----BEGIN CERTIFICATE-----\n@@@@\n-----END CERTIFICATE-----\n")
        .is_err());
}
