// Clock and id helpers. Browser builds read js_sys; native builds (tests) use std.

use std::cell::Cell;

thread_local! {
    static ID_SEQ: Cell<u64> = const { Cell::new(0) };
}

#[cfg(target_arch = "wasm32")]
pub fn now_millis() -> u64 {
    js_sys::Date::now().max(0.0) as u64
}

#[cfg(not(target_arch = "wasm32"))]
pub fn now_millis() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(target_arch = "wasm32")]
fn random_u32() -> u32 {
    (js_sys::Math::random() * u32::MAX as f64) as u32
}

#[cfg(not(target_arch = "wasm32"))]
fn random_u32() -> u32 {
    // splitmix64 over the sequence counter mixed with the clock
    let seq = ID_SEQ.with(|c| c.get());
    let mut z = now_millis()
        .wrapping_add(seq.wrapping_mul(0x9E37_79B9_7F4A_7C15));
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    (z ^ (z >> 31)) as u32
}

fn to_base36(mut n: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".into();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

/// `token-<millis>-<random>`; the per-thread sequence keeps ids distinct even
/// within one millisecond.
pub fn new_token_id() -> String {
    let seq = ID_SEQ.with(|c| {
        let next = c.get().wrapping_add(1);
        c.set(next);
        next
    });
    let suffix = ((random_u32() as u64) << 16) ^ seq;
    format!("token-{}-{}", now_millis(), to_base36(suffix))
}
