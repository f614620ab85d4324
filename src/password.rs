use anyhow::Context;
use argon2::{password_hash::{rand_core::OsRng, SaltString}, Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use secrecy::{ExposeSecret, SecretString};

use crate::telemetry::spawn_blocking_with_tracing;

pub const MIN_PASSWORD_LENGTH: usize = 6;

pub fn validate_password(password: &SecretString) -> Result<(), String>{
    if password.expose_secret().chars().count() < MIN_PASSWORD_LENGTH {
        return Err(format!("password must be at least {} characters long", MIN_PASSWORD_LENGTH))
    }

    Ok(())
}

// Function to compute password hash
pub fn compute_password_hash(password: SecretString) -> Result<SecretString, anyhow::Error>{
    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
                            .hash_password(password.expose_secret().as_bytes(), &salt)
                            .map_err(|_| anyhow::anyhow!("Failed to compute password hash"))?
                            .to_string();

    Ok(SecretString::from(password_hash))
}

// Hashing is slow on purpose, keep it off the executor
pub async fn hash_password(password: SecretString) -> Result<String, anyhow::Error>{
    let hash = spawn_blocking_with_tracing(move || {
        compute_password_hash(password)
    })
    .await
    .context("Failed due to threadpool error")??;

    Ok(hash.expose_secret().to_string())
}

// Function to verify if password matches hash
pub async fn verify_password(password: SecretString, hashed_password: String) -> Result<bool, anyhow::Error>{
    let verified = spawn_blocking_with_tracing(move || -> Result<bool, anyhow::Error> {
        let argon2 = Argon2::default();
        let hashed_password = PasswordHash::try_from(hashed_password.as_str())
                    .map_err(|_| anyhow::anyhow!("Failed to parse PasswordHash \
                            from stored hashed password"))?;

        Ok(argon2
            .verify_password(password.expose_secret().as_bytes(), &hashed_password)
            .is_ok()
        )
    })
    .await
    .context("Failed due to threadpool error")?;

    verified
}
