/// Current UTC timestamp in milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Generate a resource ID for new documents.
///
/// Layout (53 bits, fits in JavaScript's Number.MAX_SAFE_INTEGER so host
/// frontends can round-trip it):
///   - 41 bits: milliseconds since 2024-01-01 UTC (~69 years)
///   - 12 bits: random (4096 values per ms)
pub fn resource_id() -> String {
    use rand::Rng;
    // Custom epoch: 2024-01-01 00:00:00 UTC
    const EPOCH_MS: i64 = 1_704_067_200_000;
    let now = now_millis();
    let ts = (now - EPOCH_MS) & 0x1FF_FFFF_FFFF; // 41 bits
    let rand_bits: i64 = rand::thread_rng().gen_range(0..0x1000); // 12 bits
    ((ts << 12) | rand_bits).to_string()
}

/// Derive the ID of the record spawned by a quantity split: the source ID
/// plus a disambiguating suffix, deterministic given the split instant.
pub fn split_item_id(source_id: &str, at_millis: i64) -> String {
    format!("{source_id}_surplus_{at_millis}")
}
