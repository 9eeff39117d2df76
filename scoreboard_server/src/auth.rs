use anyhow::anyhow;
use argon2::Argon2;
use argon2::password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};


pub fn hash_password(password: &str) -> anyhow::Result<String> {
    let salt = SaltString::encode_b64(&rand::random::<[u8; 16]>())
        .map_err(|err| anyhow!("Cannot generate password salt: {err}"))?;
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|err| anyhow!("Cannot hash password: {err}"))?;
    Ok(hash.to_string())
}

// Returns `Ok(false)` on a password mismatch and `Err` when the hash itself is unusable.
pub fn verify_password(password: &str, password_hash: &str) -> anyhow::Result<bool> {
    let parsed = PasswordHash::new(password_hash)
        .map_err(|err| anyhow!("Invalid password hash: {err}"))?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(err) => Err(anyhow!("Cannot verify password: {err}")),
    }
}

// The single admin credential guarding score updates.
#[derive(Clone)]
pub struct AdminAuth {
    password_hash: String,
}

impl AdminAuth {
    pub fn new(password_hash: String) -> anyhow::Result<Self> {
        let password_hash = password_hash.trim().to_owned();
        PasswordHash::new(&password_hash)
            .map_err(|err| anyhow!("Invalid admin password hash: {err}"))?;
        Ok(AdminAuth { password_hash })
    }

    pub fn verify(&self, password: &str) -> anyhow::Result<bool> {
        verify_password(password, &self.password_hash)
    }
}
