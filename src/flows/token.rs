//! Token endpoint flows.
//!
//! [`VendorClient::fetch_token`] turns the vendor's token response into a [`TokenRecord`], while
//! [`VendorClient::sign_token`] hands the raw `result` object back to the caller together with the
//! signature that obtained it. Both sign in token mode: a body-less `GET` whose content hash is
//! taken over the empty string and whose message carries no access token.

// self
use crate::{
	_prelude::*,
	auth::{Credential, TokenRecord},
	error::FetchError,
	flows::{VendorClient, common},
	http::{VendorHttpClient, VendorRequest},
	obs::{self, FlowKind},
	sign::{self, SignRequest, SignatureResult},
	vendor::{TokenResult, VendorEnvelope},
};

impl<C> VendorClient<C>
where
	C: ?Sized + VendorHttpClient,
{
	/// Requests a fresh access token for `credential`.
	pub async fn fetch_token(&self, credential: &Credential) -> Result<TokenRecord> {
		obs::observe(FlowKind::TokenFetch, &self.descriptor.base_url, async move {
			let issued_at = OffsetDateTime::now_utc();
			let (result, _) = self.token_exchange(credential).await?;
			let token: TokenResult =
				serde_path_to_error::deserialize(result).map_err(|source| {
					Error::TokenFetch(FetchError::Parse { source, status: None })
				})?;
			let mut builder = TokenRecord::builder(credential.client_id.clone())
				.access_token(token.access_token)
				.issued_at(issued_at)
				.expires_in(Duration::seconds(token.expire_time));

			if let Some(refresh_token) = token.refresh_token {
				builder = builder.refresh_token(refresh_token);
			}
			if let Some(uid) = token.uid {
				builder = builder.uid(uid);
			}

			builder.build().map_err(common::map_token_builder_error)
		})
		.await
	}

	/// Requests a token and returns the vendor `result` object merged with the signature
	/// metadata (`client_id`, `t`, `sign`, `sign_method`).
	///
	/// A non-object `result` is nested under a `result` key so the metadata always has a home.
	pub async fn sign_token(&self, credential: &Credential) -> Result<JsonValue> {
		obs::observe(FlowKind::SignToken, &self.descriptor.base_url, async move {
			let (result, signature) = self.token_exchange(credential).await?;
			let mut object = match result {
				JsonValue::Object(map) => map,
				other => {
					let mut map = JsonMap::new();

					map.insert("result".into(), other);

					map
				},
			};

			object.insert("client_id".into(), signature.client_id.into());
			object.insert("t".into(), signature.t.into());
			object.insert("sign".into(), signature.sign.into());
			object.insert("sign_method".into(), signature.sign_method.into());

			Ok(JsonValue::Object(object))
		})
		.await
	}

	async fn token_exchange(&self, credential: &Credential) -> Result<(JsonValue, SignatureResult)> {
		let request = SignRequest::Token { path: self.descriptor.token_path.clone() };
		let signature = sign::sign(credential, &request);
		let outbound = VendorRequest::get(self.descriptor.token_url()?, self.descriptor.timeout)
			.signed(&signature);
		let result = common::send::<C, JsonValue>(self, outbound)
			.await
			.and_then(VendorEnvelope::into_result)
			.map_err(Error::TokenFetch)?;

		Ok((result, signature))
	}
}
