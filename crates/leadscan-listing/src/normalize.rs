//! Conversion from [`RawBusiness`] to [`Candidate`].

use leadscan_core::{Candidate, PriceTier};

use crate::types::RawBusiness;

/// Normalizes one raw listing into a [`Candidate`].
///
/// Returns `None` when the entry carries no usable place identifier: such
/// a listing cannot be upserted, so it is not a candidate at all.
#[must_use]
pub fn normalize_business(raw: &RawBusiness) -> Option<Candidate> {
    let external_id = first_non_empty([
        raw.google_id.as_deref(),
        raw.place_id.as_deref(),
        raw.business_id.as_deref(),
    ])?;

    let name = first_non_empty([raw.name.as_deref()])
        .unwrap_or_else(|| "Unknown Business".to_string());

    let photo_count = raw
        .photo_count
        .unwrap_or_else(|| u64::try_from(raw.photos_sample.len()).unwrap_or(u64::MAX));

    Some(Candidate {
        external_id,
        name,
        address: first_non_empty([raw.full_address.as_deref(), raw.address.as_deref()]),
        phone: first_non_empty([raw.phone_number.as_deref(), raw.phone.as_deref()]),
        website: first_non_empty([raw.website.as_deref()]),
        rating: raw.rating.filter(|r| r.is_finite()).map(|r| r.clamp(0.0, 5.0)),
        review_count: saturating_u32(raw.review_count.unwrap_or(0)),
        photo_count: saturating_u32(photo_count),
        price_tier: raw.price_level.as_ref().and_then(parse_price_level),
        business_status: first_non_empty([raw.business_status.as_deref()]),
        category: first_non_empty([raw.category.as_deref()]),
    })
}

fn first_non_empty<const N: usize>(values: [Option<&str>; N]) -> Option<String> {
    values
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|v| !v.is_empty())
        .map(str::to_owned)
}

fn saturating_u32(value: u64) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

fn parse_price_level(value: &serde_json::Value) -> Option<PriceTier> {
    match value {
        serde_json::Value::String(s) => PriceTier::parse(s),
        serde_json::Value::Number(n) => n
            .as_u64()
            .and_then(|n| u8::try_from(n).ok())
            .and_then(|n| PriceTier::try_from(n).ok()),
        _ => None,
    }
}
