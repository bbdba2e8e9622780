//! Argon2id password hasher producing PHC strings.

use crate::user::{
    domain::{PasswordHash, PlainPassword},
    ports::{CredentialError, PasswordHasher},
};
use argon2::password_hash::{SaltString, rand_core::OsRng};
use argon2::{
    Algorithm, Argon2, Params, PasswordHash as PhcHash, PasswordHasher as _,
    PasswordVerifier as _, Version,
};
use std::sync::Arc;

/// Password hasher backed by `argon2`.
///
/// Stored hashes carry their own cost parameters; verification refuses
/// hashes whose costs exceed the ones this hasher was built with.
#[derive(Debug, Clone, Default)]
pub struct Argon2PasswordHasher {
    params: Params,
}

impl Argon2PasswordHasher {
    /// Creates a hasher with explicit Argon2id cost parameters.
    #[must_use]
    pub const fn new(params: Params) -> Self {
        Self { params }
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    fn within_budget(&self, stored: &Params) -> bool {
        stored.m_cost() <= self.params.m_cost()
            && stored.t_cost() <= self.params.t_cost()
            && stored.p_cost() <= self.params.p_cost()
    }
}

fn backend(err: argon2::password_hash::Error) -> CredentialError {
    CredentialError::Backend(Arc::new(err))
}

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, password: &PlainPassword) -> Result<PasswordHash, CredentialError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2()
            .hash_password(password.expose().as_bytes(), &salt)
            .map_err(backend)?;
        Ok(PasswordHash::from_encoded(hash.to_string()))
    }

    fn verify(
        &self,
        password: &PlainPassword,
        hash: &PasswordHash,
    ) -> Result<bool, CredentialError> {
        let parsed = PhcHash::new(hash.as_str()).map_err(|_| CredentialError::UnsupportedFormat)?;
        let algorithm = Algorithm::try_from(parsed.algorithm);
        if !matches!(algorithm, Ok(Algorithm::Argon2id)) {
            return Err(CredentialError::UnsupportedFormat);
        }
        let stored = Params::try_from(&parsed).map_err(|_| CredentialError::UnsupportedFormat)?;
        if !self.within_budget(&stored) {
            return Err(CredentialError::ExcessiveCost);
        }

        match self
            .argon2()
            .verify_password(password.expose().as_bytes(), &parsed)
        {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(err) => Err(backend(err)),
        }
    }
}
