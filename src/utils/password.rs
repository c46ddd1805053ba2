use crate::error::Error;

/// bcrypt only looks at the first 72 bytes; longer input is rejected instead of truncated.
pub const MAX_PASSWORD_BYTES: usize = 72;

pub const INVALID_PASSWORD: &str = "invalid_password";

pub fn hash_password(password: &str, cost: u32) -> Result<String, Error> {
  if password.len() > MAX_PASSWORD_BYTES {
    return Err(Error::invalid_argument(
      INVALID_PASSWORD,
      format!("password must be at most {} bytes", MAX_PASSWORD_BYTES),
    ));
  }

  bcrypt::hash(password, cost)
    .map_err(|e| Error::invalid_argument(INVALID_PASSWORD, format!("unable to hash password: {}", e)).with_source(e))
}

#[cfg(test)]
pub fn verify_password(password: &str, encoded: &str) -> bool {
  bcrypt::verify(password, encoded).unwrap_or(false)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::error::ErrorKind;

  #[test]
  fn test_hash_password_verifies() {
    let encoded = hash_password("password123", 4).expect("hash");
    assert_ne!(encoded, "password123");
    assert!(verify_password("password123", &encoded));
    assert!(!verify_password("password124", &encoded));
  }

  #[test]
  fn test_hash_password_is_salted() {
    let a = hash_password("same", 4).expect("hash");
    let b = hash_password("same", 4).expect("hash");
    assert_ne!(a, b);
  }

  #[test]
  fn test_hash_password_cost_out_of_range() {
    let err = hash_password("password123", 2).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    assert_eq!(err.code(), INVALID_PASSWORD);
  }

  #[test]
  fn test_hash_password_too_long() {
    let err = hash_password(&"a".repeat(73), 4).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
  }

  #[test]
  fn test_verify_password_garbage_hash() {
    assert!(!verify_password("password123", "not-a-hash"));
  }
}
