use rand::Rng;
use rand::distributions::Alphanumeric;

/// Generate a numeric virtual account number of `length` digits. Leading zeros
/// are allowed, so the value is kept as text.
pub fn generate_virtual_account(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
        .collect()
}

/// Generate an opaque alphanumeric session token.
pub fn generate_session_token(length: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}
