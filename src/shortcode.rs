use rand::Rng;

/// Length of every public short code.
pub const SHORT_CODE_LENGTH: usize = 6;

const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Produces candidate short codes. Candidates are not guaranteed unique;
/// the shorten handler checks each one against the store.
pub trait CodeSource: Send + Sync {
    fn next_code(&self) -> String;
}

/// Uniformly random codes of [`SHORT_CODE_LENGTH`] characters.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomCodes;

impl CodeSource for RandomCodes {
    fn next_code(&self) -> String {
        generate_short_code(SHORT_CODE_LENGTH)
    }
}

/// Generate a random alphanumeric string of the given length.
pub fn generate_short_code(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect()
}

/// Exactly [`SHORT_CODE_LENGTH`] ASCII letters or digits.
pub fn is_valid_short_code(code: &str) -> bool {
    code.len() == SHORT_CODE_LENGTH && code.bytes().all(|b| b.is_ascii_alphanumeric())
}
