//! Password strength policy.
//!
//! Validates candidate passwords against the account password policy.

/// Errors related to password policy validation.
#[derive(Debug, Clone)]
pub enum PolicyError {
    /// Password is too short.
    PasswordTooShort {
        min_length: usize,
        actual_length: usize,
    },
    /// Password missing uppercase letter.
    PasswordMissingUppercase,
    /// Password missing lowercase letter.
    PasswordMissingLowercase,
    /// Password missing number.
    PasswordMissingNumber,
    /// Password missing special character.
    PasswordMissingSpecial,
}

impl std::fmt::Display for PolicyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PolicyError::PasswordTooShort {
                min_length,
                actual_length,
            } => {
                write!(
                    f,
                    "Password must be at least {} characters (got {})",
                    min_length, actual_length
                )
            }
            PolicyError::PasswordMissingUppercase => {
                write!(f, "Password must contain at least one uppercase letter")
            }
            PolicyError::PasswordMissingLowercase => {
                write!(f, "Password must contain at least one lowercase letter")
            }
            PolicyError::PasswordMissingNumber => {
                write!(f, "Password must contain at least one number")
            }
            PolicyError::PasswordMissingSpecial => {
                write!(f, "Password must contain at least one special character")
            }
        }
    }
}

impl std::error::Error for PolicyError {}

/// Password strength policy. Every predicate is independent; a password must
/// satisfy all of them.
#[derive(Debug, Clone)]
pub struct PasswordPolicy {
    pub min_length: usize,
    pub require_uppercase: bool,
    pub require_lowercase: bool,
    pub require_number: bool,
    pub require_special: bool,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: 8,
            require_uppercase: true,
            require_lowercase: true,
            require_number: true,
            require_special: true,
        }
    }
}

fn is_special(c: char) -> bool {
    matches!(
        c,
        '!' | '@'
            | '#'
            | '$'
            | '%'
            | '^'
            | '&'
            | '*'
            | '('
            | ')'
            | '-'
            | '_'
            | '='
            | '+'
            | '['
            | ']'
            | '{'
            | '}'
            | '|'
            | '\\'
            | ';'
            | ':'
            | '\''
            | '"'
            | ','
            | '.'
            | '<'
            | '>'
            | '/'
            | '?'
            | '`'
            | '~'
    )
}

impl PasswordPolicy {
    /// Validate a password against the policy.
    ///
    /// Returns Ok(()) if the password meets all requirements,
    /// or Err with the first policy violation found.
    pub fn validate_password(&self, password: &str) -> Result<(), PolicyError> {
        if password.chars().count() < self.min_length {
            return Err(PolicyError::PasswordTooShort {
                min_length: self.min_length,
                actual_length: password.chars().count(),
            });
        }

        if self.require_uppercase && !password.chars().any(|c| c.is_ascii_uppercase()) {
            return Err(PolicyError::PasswordMissingUppercase);
        }

        if self.require_lowercase && !password.chars().any(|c| c.is_ascii_lowercase()) {
            return Err(PolicyError::PasswordMissingLowercase);
        }

        if self.require_number && !password.chars().any(|c| c.is_ascii_digit()) {
            return Err(PolicyError::PasswordMissingNumber);
        }

        if self.require_special && !password.chars().any(is_special) {
            return Err(PolicyError::PasswordMissingSpecial);
        }

        Ok(())
    }
}
