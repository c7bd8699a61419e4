// self
use tuya_signer::{
	auth::Credential,
	sign::{self, RequestSpec, SignRequest, Timestamp},
};

const T: u64 = 1_700_000_000_000;

fn credential() -> Credential {
	Credential::new("abc123", "s3cr3t").expect("Credential fixture should be valid.")
}

fn full_spec() -> RequestSpec {
	RequestSpec::new("tok-1", "/v1.0/devices/dev1?b=2&a=1").with_query([("c", "3")])
}

#[test]
fn golden_vectors_hold_for_every_mode() {
	let t = Timestamp::from_millis(T);
	let simple = sign::sign_at(&credential(), &SignRequest::Simple, t.clone());
	let token = sign::sign_at(&credential(), &SignRequest::token(), t.clone());
	let full = sign::sign_at(&credential(), &full_spec().into(), t.clone());
	let post = sign::sign_at(
		&credential(),
		&RequestSpec::new("tok-1", "/v1.0/devices/dev1/commands")
			.with_method("POST")
			.with_body(serde_json::json!({ "z": 1, "a": "x" }))
			.into(),
		t,
	);

	assert_eq!(simple.sign, "130E0D78A4C6F5AE048B3CDC29477F66D455178EEA5567C1781BC7D88C22FC88");
	assert_eq!(token.sign, "FE0035154634C25E59D44C315441C3FB3987DE2EAC9B22D33D9B4616AF4C9FFC");
	assert_eq!(full.sign, "634FB5C165290C164B63EFB1B33F2395062552E69C1D7E1D37CE9D94D33FBFD7");
	assert_eq!(full.path.as_deref(), Some("/v1.0/devices/dev1?a=1&b=2&c=3"));
	assert_eq!(full.access_token.as_deref(), Some("tok-1"));
	assert_eq!(post.sign, "5BAAEC781E67A8268DA9D18BDFBE5AAA29D2CA44DA1A525165F167C02FF2AF42");
}

#[test]
fn simple_mode_matches_an_independent_hmac() {
	let t = Timestamp::from_millis(T);
	let result = sign::sign_at(&credential(), &SignRequest::Simple, t);
	let expected = sign::hmac_sha256_upper_hex("s3cr3t", "abc1231700000000000");

	assert_eq!(result.sign, expected);
	assert_eq!(result.sign.len(), 64);
	assert!(result.sign.bytes().all(|b| b.is_ascii_digit() || b.is_ascii_uppercase()));
}

#[test]
fn one_byte_perturbations_change_the_sign() {
	let t = Timestamp::from_millis(T);
	let base = sign::sign_at(&credential(), &SignRequest::Simple, t.clone()).sign;
	let other_id = Credential::new("abc124", "s3cr3t").expect("Perturbed id should be valid.");
	let other_secret =
		Credential::new("abc123", "s3cr3u").expect("Perturbed secret should be valid.");

	assert_ne!(sign::sign_at(&other_id, &SignRequest::Simple, t.clone()).sign, base);
	assert_ne!(sign::sign_at(&other_secret, &SignRequest::Simple, t).sign, base);
	assert_ne!(
		sign::sign_at(&credential(), &SignRequest::Simple, Timestamp::from_millis(T + 1)).sign,
		base
	);
}

#[test]
fn full_mode_is_invariant_to_parameter_order() {
	let t = Timestamp::from_millis(T);
	let shuffled = RequestSpec::new("tok-1", "/v1.0/devices/dev1?c=3&a=1").with_query([("b", "2")]);
	let explicit = RequestSpec::new("tok-1", "/v1.0/devices/dev1")
		.with_query([("b", "2"), ("c", "3"), ("a", "1")]);
	let reference = sign::sign_at(&credential(), &full_spec().into(), t.clone());

	for spec in [shuffled, explicit] {
		let result = sign::sign_at(&credential(), &spec.into(), t.clone());

		assert_eq!(result.sign, reference.sign);
		assert_eq!(result.path, reference.path);
	}
}

#[test]
fn full_mode_path_has_exactly_one_question_mark_when_parameters_exist() {
	let t = Timestamp::from_millis(T);
	let bare =
		sign::sign_at(&credential(), &RequestSpec::new("tok-1", "/v1.0/devices").into(), t.clone());
	let with_query = sign::sign_at(&credential(), &full_spec().into(), t);

	assert_eq!(bare.path.as_deref(), Some("/v1.0/devices"));
	assert_eq!(with_query.path.as_deref().map(|path| path.matches('?').count()), Some(1));
}

#[test]
fn absent_body_signs_like_an_empty_object() {
	let t = Timestamp::from_millis(T);
	let absent =
		sign::sign_at(&credential(), &RequestSpec::new("tok-1", "/v1.0/devices").into(), t.clone());
	let empty = sign::sign_at(
		&credential(),
		&RequestSpec::new("tok-1", "/v1.0/devices").with_body(serde_json::json!({})).into(),
		t,
	);

	assert_eq!(absent.sign, empty.sign);
}
